use imgui::Ui;

use crate::core::Notifier;

const TOAST_WIDTH: f32 = 300.0;
const TOAST_MARGIN: f32 = 20.0;
const TOAST_PADDING: [f32; 2] = [15.0, 12.0];

/// Draw toasts stacked in the top-right corner, sliding in from the edge
pub fn render_toasts(ui: &Ui, notifier: &Notifier) {
    if notifier.is_empty() {
        return;
    }

    let display = ui.io().display_size;
    let draw_list = ui.get_foreground_draw_list();
    let mut y = TOAST_MARGIN + 20.0;

    for toast in notifier.iter() {
        // Draw list text has no wrapping; wrap by words
        let lines = wrap_words(ui, &toast.message, TOAST_WIDTH - TOAST_PADDING[0] * 2.0);
        let height = lines.len().max(1) as f32 * ui.text_line_height() + TOAST_PADDING[1] * 2.0;

        // Off-screen to the right when slide is 0
        let offset = (1.0 - toast.slide()) * (TOAST_WIDTH + TOAST_MARGIN);
        let x = display[0] - TOAST_MARGIN - TOAST_WIDTH + offset;

        draw_list
            .add_rect([x + 2.0, y + 4.0], [x + TOAST_WIDTH + 2.0, y + height + 4.0], [0.0, 0.0, 0.0, 0.2])
            .filled(true)
            .rounding(8.0)
            .build();
        draw_list
            .add_rect([x, y], [x + TOAST_WIDTH, y + height], toast.kind.color())
            .filled(true)
            .rounding(8.0)
            .build();

        let mut line_y = y + TOAST_PADDING[1];
        for line in &lines {
            draw_list.add_text([x + TOAST_PADDING[0], line_y], [1.0, 1.0, 1.0, 1.0], line);
            line_y += ui.text_line_height();
        }

        y += height + 10.0;
    }
}

pub(crate) fn wrap_words(ui: &Ui, text: &str, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if !current.is_empty() && ui.calc_text_size(&candidate)[0] > width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
