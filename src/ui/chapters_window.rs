use imgui::{Condition, Ui};

use crate::core::format_time;
use crate::playback::Player;

/// Label for one row of the chapter list
pub fn chapter_label(start: u32, title: &str) -> String {
    format!("{:>5}  {}", format_time(start), title)
}

/// Clickable chapter list; the chapter under the playhead is highlighted
pub fn render_chapters(ui: &Ui, player: &mut Player, opened: &mut bool) {
    let mut clicked = None;

    ui.window("Chapters")
        .size([320.0, 420.0], Condition::FirstUseEver)
        .position([980.0, 40.0], Condition::FirstUseEver)
        .opened(opened)
        .build(|| {
            let active = player.active_chapter();
            for (i, chapter) in player.chapters().iter().enumerate() {
                let label = format!("{}##chapter{}", chapter_label(chapter.start, &chapter.title), i);
                if ui.selectable_config(&label).selected(active == Some(i)).build() {
                    clicked = Some(chapter.title.clone());
                }
            }

            if player.chapters().is_empty() {
                ui.text_disabled("This course has no chapters");
            }
        });

    if let Some(title) = clicked {
        player.jump_to_chapter(&title);
    }
}
