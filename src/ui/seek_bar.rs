//! Thin progress track with a round thumb and chapter dots

use imgui::{DrawListMut, MouseButton, Ui};

use crate::core::format_time;

const TRACK_HEIGHT: f32 = 4.0;
const THUMB_RADIUS: f32 = 7.0;
const TRACK_COLOR: [f32; 4] = [0.25, 0.25, 0.28, 1.0];
const FILL_COLOR: [f32; 4] = [0.4, 0.49, 0.92, 1.0];
const MARKER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

/// What the track needs to know about the course
pub struct SeekBarData {
    /// 0.0 to 1.0
    pub position: f32,
    pub total: u32,
    /// Chapter starts in seconds
    pub markers: Vec<(u32, String)>,
}

impl SeekBarData {
    pub fn marker_fraction(&self, seconds: u32) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (seconds as f32 / self.total as f32).clamp(0.0, 1.0)
        }
    }

    pub fn seconds_at(&self, fraction: f32) -> u32 {
        (fraction.clamp(0.0, 1.0) as f64 * self.total as f64).floor() as u32
    }
}

/// Fraction of the track under `x`
pub fn fraction_at(x: f32, min_x: f32, max_x: f32) -> f32 {
    let width = max_x - min_x;
    if width <= 0.0 {
        return 0.0;
    }
    ((x - min_x) / width).clamp(0.0, 1.0)
}

/// A press on the track followed by drags and a release.
/// Only the release commits a seek; drags move the preview.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SeekGesture {
    preview: Option<f32>,
}

impl SeekGesture {
    pub fn press(&mut self, fraction: f32) {
        self.preview = Some(fraction.clamp(0.0, 1.0));
    }

    pub fn drag(&mut self, fraction: f32) {
        if self.preview.is_some() {
            self.preview = Some(fraction.clamp(0.0, 1.0));
        }
    }

    /// Ends the gesture, returning the fraction to seek to
    pub fn release(&mut self) -> Option<f32> {
        self.preview.take()
    }

    pub fn preview(&self) -> Option<f32> {
        self.preview
    }

    pub fn is_active(&self) -> bool {
        self.preview.is_some()
    }
}

pub struct SeekBar {
    gesture: SeekGesture,
    hovered: bool,
}

impl SeekBar {
    pub fn new() -> Self {
        Self {
            gesture: SeekGesture::default(),
            hovered: false,
        }
    }

    fn draw_track(&self, draw_list: &DrawListMut, data: &SeekBarData, min: [f32; 2], max: [f32; 2]) {
        let track_y = (min[1] + max[1]) / 2.0;
        let position = self.gesture.preview().unwrap_or(data.position);

        draw_list
            .add_rect([min[0], track_y - TRACK_HEIGHT / 2.0], [max[0], track_y + TRACK_HEIGHT / 2.0], TRACK_COLOR)
            .filled(true)
            .rounding(2.0)
            .build();

        let thumb_x = min[0] + position * (max[0] - min[0]);
        draw_list
            .add_rect([min[0], track_y - TRACK_HEIGHT / 2.0], [thumb_x, track_y + TRACK_HEIGHT / 2.0], FILL_COLOR)
            .filled(true)
            .rounding(2.0)
            .build();

        for (start, _) in &data.markers {
            let x = min[0] + data.marker_fraction(*start) * (max[0] - min[0]);
            draw_list
                .add_circle([x, track_y], 3.0, MARKER_COLOR)
                .filled(true)
                .num_segments(10)
                .build();
        }

        // Thumb only shows while hovered or dragging
        if self.hovered || self.gesture.is_active() {
            draw_list
                .add_circle([thumb_x, track_y], THUMB_RADIUS, [0.5, 0.6, 1.0, 1.0])
                .filled(true)
                .num_segments(20)
                .build();
        }
    }

    /// Draw the track across the available width. Returns a seek fraction once the mouse is released.
    pub fn render(&mut self, ui: &Ui, data: &SeekBarData) -> Option<f32> {
        let height = 24.0;
        let width = ui.content_region_avail()[0];
        let min = ui.cursor_screen_pos();
        let max = [min[0] + width, min[1] + height];

        ui.invisible_button("##seek", [width.max(1.0), height]);
        self.hovered = ui.is_item_hovered();

        let draw_list = ui.get_window_draw_list();
        self.draw_track(&draw_list, data, min, max);

        let mouse = ui.io().mouse_pos;
        let fraction = fraction_at(mouse[0], min[0], max[0]);

        if self.hovered {
            let chapter = data
                .markers
                .iter()
                .rev()
                .find(|(start, _)| *start <= data.seconds_at(fraction))
                .map(|(_, title)| title.as_str());
            ui.tooltip(|| {
                ui.text(format!("Seek to: {}", format_time(data.seconds_at(fraction))));
                if let Some(title) = chapter {
                    ui.text_colored([0.7, 0.7, 0.7, 1.0], title);
                }
            });

            if ui.is_mouse_clicked(MouseButton::Left) {
                self.gesture.press(fraction);
            }
        }

        if ui.is_mouse_down(MouseButton::Left) {
            self.gesture.drag(fraction);
        }

        if ui.is_mouse_released(MouseButton::Left) {
            return self.gesture.release();
        }
        None
    }
}

impl Default for SeekBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_clamps() {
        assert_eq!(fraction_at(50.0, 0.0, 200.0), 0.25);
        assert_eq!(fraction_at(-10.0, 0.0, 200.0), 0.0);
        assert_eq!(fraction_at(500.0, 0.0, 200.0), 1.0);
        assert_eq!(fraction_at(5.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_marker_fraction() {
        let data = SeekBarData {
            position: 0.0,
            total: 1200,
            markers: vec![(0, "Intro".to_string()), (600, "Middle".to_string())],
        };
        assert_eq!(data.marker_fraction(600), 0.5);
        assert_eq!(data.marker_fraction(5000), 1.0);
        assert_eq!(data.seconds_at(0.25), 300);

        let empty = SeekBarData { position: 0.0, total: 0, markers: Vec::new() };
        assert_eq!(empty.marker_fraction(10), 0.0);
    }

    #[test]
    fn test_drag_seeks_once_on_release() {
        let mut gesture = SeekGesture::default();
        gesture.press(0.1);
        for frame in 0..60 {
            gesture.drag(0.1 + frame as f32 * 0.01);
        }
        assert_eq!(gesture.preview(), Some(0.1 + 59.0 * 0.01));
        assert_eq!(gesture.release(), Some(0.1 + 59.0 * 0.01));
        assert_eq!(gesture.release(), None);
        assert!(!gesture.is_active());
    }

    #[test]
    fn test_click_seeks_on_release() {
        let mut gesture = SeekGesture::default();
        gesture.press(0.5);
        assert_eq!(gesture.release(), Some(0.5));
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut gesture = SeekGesture::default();
        gesture.drag(0.7);
        assert_eq!(gesture.preview(), None);
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn test_drag_produces_one_jump_toast() {
        use crate::core::Course;
        use crate::playback::Player;

        let mut player = Player::new(&Course::builtin(), None, None);
        let mut gesture = SeekGesture::default();
        gesture.press(0.0);
        // Sixty frames of dragging, ending at the middle of the track
        for frame in 0..60 {
            gesture.drag(frame as f32 / 118.0);
        }
        if let Some(fraction) = gesture.release() {
            player.seek(fraction as f64);
        }

        let jumps = player
            .notifier()
            .iter()
            .filter(|toast| toast.message.starts_with("Jumped to"))
            .count();
        assert_eq!(jumps, 1);
        assert_eq!(player.elapsed(), 770);
    }

    #[test]
    fn test_preview_clamps() {
        let mut gesture = SeekGesture::default();
        gesture.press(0.2);
        gesture.drag(1.5);
        assert_eq!(gesture.preview(), Some(1.0));
    }
}
