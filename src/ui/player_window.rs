use imgui::{Condition, DrawListMut, Ui};

use crate::audio::VolumeLevel;
use crate::playback::Player;
use crate::ui::backdrop::Backdrop;
use crate::ui::seek_bar::{SeekBar, SeekBarData};
use crate::ui::toasts::wrap_words;

const SUBTITLE_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.75];
const CODE_COLOR: [f32; 4] = [0.55, 0.85, 0.6, 0.9];
const CODE_DONE_COLOR: [f32; 4] = [0.55, 0.85, 0.6, 0.5];
const CONTROLS_HEIGHT: f32 = 70.0;

/// Requests the window cannot carry out itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    ToggleFullscreen,
}

/// The video screen plus the control bar under it
pub struct PlayerWindow {
    seek_bar: SeekBar,
    /// Slider value while the user is dragging it
    volume_edit: Option<f32>,
}

impl PlayerWindow {
    pub fn new() -> Self {
        Self {
            seek_bar: SeekBar::new(),
            volume_edit: None,
        }
    }

    pub fn render(&mut self, ui: &Ui, player: &mut Player) -> Option<PlayerAction> {
        let mut action = None;

        ui.window("Tutorial Player")
            .size([900.0, 620.0], Condition::FirstUseEver)
            .position([60.0, 40.0], Condition::FirstUseEver)
            .build(|| {
                ui.text(player.title());
                if let Some(chapter) = player.active_chapter().and_then(|i| player.chapters().get(i)) {
                    ui.same_line();
                    ui.text_disabled(format!("  {}", chapter.title));
                }
                ui.separator();

                self.render_screen(ui, player);
                action = self.render_controls(ui, player);
            });

        action
    }

    fn render_screen(&mut self, ui: &Ui, player: &mut Player) {
        let avail = ui.content_region_avail();
        let width = avail[0].max(1.0);
        let height = (width * 9.0 / 16.0).min(avail[1] - CONTROLS_HEIGHT).max(1.0);
        let min = ui.cursor_screen_pos();
        let max = [min[0] + width, min[1] + height];

        if ui.invisible_button("##screen", [width, height]) {
            player.toggle_play();
        }

        let state = player.state();
        let backdrop = Backdrop::compute(state.progress(), state.elapsed, state.playing);
        let [ul, ur, br, bl] = backdrop.corners();

        let draw_list = ui.get_window_draw_list();
        draw_list.add_rect_filled_multicolor(min, max, ul, ur, br, bl);
        draw_list
            .add_rect(min, max, [0.0, 0.0, 0.0, (1.0 - backdrop.overlay_opacity) * 0.5])
            .filled(true)
            .build();

        self.draw_code(ui, &draw_list, player, min, max);

        if !state.playing {
            Self::draw_play_button(&draw_list, min, max);
        }

        self.draw_subtitle(ui, &draw_list, player, min, max);
    }

    fn draw_code(&self, ui: &Ui, draw_list: &DrawListMut, player: &Player, min: [f32; 2], max: [f32; 2]) {
        let line_height = ui.text_line_height_with_spacing();
        let mut y = min[1] + 16.0;

        for line in player.code_lines() {
            if y + line_height > max[1] - 80.0 {
                break;
            }
            if line.text.is_empty() && !line.complete {
                continue;
            }
            let color = if line.complete { CODE_DONE_COLOR } else { CODE_COLOR };
            let text = if line.complete {
                line.text.clone()
            } else {
                format!("{}|", line.text)
            };
            draw_list.add_text([min[0] + 20.0, y], color, text);
            y += line_height;
        }
    }

    fn draw_play_button(draw_list: &DrawListMut, min: [f32; 2], max: [f32; 2]) {
        let center = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];
        let radius = 40.0;

        draw_list
            .add_circle(center, radius, [1.0, 1.0, 1.0, 0.2])
            .filled(true)
            .num_segments(32)
            .build();
        draw_list
            .add_triangle(
                [center[0] - 12.0, center[1] - 18.0],
                [center[0] - 12.0, center[1] + 18.0],
                [center[0] + 20.0, center[1]],
                [1.0, 1.0, 1.0, 0.9],
            )
            .filled(true)
            .build();
    }

    fn draw_subtitle(&self, ui: &Ui, draw_list: &DrawListMut, player: &Player, min: [f32; 2], max: [f32; 2]) {
        let subtitles = player.subtitles();
        let Some(text) = subtitles.visible_text() else {
            return;
        };
        if text.is_empty() {
            return;
        }

        let opacity = subtitles.opacity();
        let max_width = (max[0] - min[0]) * 0.8;
        let lines = wrap_words(ui, text, max_width - 24.0);
        let line_height = ui.text_line_height_with_spacing();
        let text_width = lines
            .iter()
            .map(|l| ui.calc_text_size(l)[0])
            .fold(0.0_f32, f32::max);

        let box_w = text_width + 24.0;
        let box_h = lines.len() as f32 * line_height + 16.0;
        let center_x = (min[0] + max[0]) / 2.0;
        let top = max[1] - 24.0 - box_h;

        draw_list
            .add_rect(
                [center_x - box_w / 2.0, top],
                [center_x + box_w / 2.0, top + box_h],
                [SUBTITLE_BG[0], SUBTITLE_BG[1], SUBTITLE_BG[2], SUBTITLE_BG[3] * opacity],
            )
            .filled(true)
            .rounding(6.0)
            .build();

        let mut y = top + 8.0;
        for line in &lines {
            let w = ui.calc_text_size(line)[0];
            draw_list.add_text([center_x - w / 2.0, y], [1.0, 1.0, 1.0, opacity], line);
            y += line_height;
        }
    }

    fn render_controls(&mut self, ui: &Ui, player: &mut Player) -> Option<PlayerAction> {
        let mut action = None;
        let state = player.state();

        let data = SeekBarData {
            position: state.progress(),
            total: state.total,
            markers: player
                .chapters()
                .iter()
                .map(|c| (c.start, c.title.clone()))
                .collect(),
        };
        if let Some(fraction) = self.seek_bar.render(ui, &data) {
            player.seek(fraction as f64);
        }

        let play_label = if state.playing { "Pause" } else { "Play" };
        if ui.button(play_label) {
            player.toggle_play();
        }
        ui.same_line();
        ui.text(player.time_label());

        ui.same_line();
        let audio = player.audio();
        let mute_label = match audio.level() {
            VolumeLevel::Muted => "Unmute",
            VolumeLevel::Low | VolumeLevel::High => "Mute",
        };
        if ui.button(mute_label) {
            player.toggle_mute();
        }

        ui.same_line();
        let mut volume = self.volume_edit.unwrap_or(audio.volume);
        ui.set_next_item_width(100.0);
        if ui.slider("##volume", 0.0, 1.0, &mut volume) {
            self.volume_edit = Some(volume);
        }
        if ui.is_item_deactivated_after_edit() {
            player.set_volume(volume);
            self.volume_edit = None;
        }

        ui.same_line();
        if ui.button(format!("{}x##rate", player.rate())) {
            player.cycle_rate();
        }

        ui.same_line();
        let engagement = player.engagement();
        let like = format!(
            "{} {}##like",
            if engagement.liked { "Liked" } else { "Like" },
            engagement.like_label()
        );
        if ui.button(like) {
            player.toggle_like();
        }

        ui.same_line();
        if ui.button(if engagement.saved { "Saved##save" } else { "Save##save" }) {
            player.toggle_save();
        }

        ui.same_line();
        if ui.button("Share") {
            let text = player.share();
            ui.set_clipboard_text(text);
        }

        ui.same_line();
        let fullscreen_label = if player.is_fullscreen() { "Exit Fullscreen" } else { "Fullscreen" };
        if ui.button(fullscreen_label) {
            action = Some(PlayerAction::ToggleFullscreen);
        }

        if player.has_voice() && player.is_speaking() {
            ui.same_line();
            ui.text_disabled("Speaking...");
        }

        action
    }
}

impl Default for PlayerWindow {
    fn default() -> Self {
        Self::new()
    }
}
