use imgui::{Condition, Ui};
use rfd::FileDialog;
use std::path::PathBuf;

use crate::resources::Resource;

/// Native save dialogs for downloads and exports
pub struct FileDialogs;

impl FileDialogs {
    /// Ask where to save a downloadable resource
    pub fn save_resource(resource: Resource) -> Option<PathBuf> {
        let file_name = resource.file_name()?;
        FileDialog::new()
            .add_filter("Text Files", &["txt"])
            .add_filter("All Files", &["*"])
            .set_title(format!("Save {}", resource.title()))
            .set_file_name(file_name)
            .save_file()
    }

    /// Ask where to export the tool list
    pub fn export_tools_csv() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .set_title("Export Tool List")
            .set_file_name("design-tools.csv")
            .save_file()
    }
}

/// Help > About window
pub struct AboutDialog {
    show: bool,
}

impl AboutDialog {
    pub fn new() -> Self {
        Self { show: false }
    }

    pub fn show(&mut self) {
        self.show = true;
    }

    pub fn render(&mut self, ui: &Ui, voice: Option<&str>) {
        if !self.show {
            return;
        }

        let mut open = self.show;
        ui.window("About Lesson Player")
            .size([400.0, 280.0], Condition::FirstUseEver)
            .opened(&mut open)
            .build(|| {
                ui.text("Lesson Player");
                ui.text_colored([0.7, 0.7, 0.7, 1.0], format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.text_wrapped("A tutorial player with narrated chapters, typed subtitles and a live code backdrop.");
                ui.separator();
                ui.text("Features:");
                ui.bullet_text("Chapter index and search");
                ui.bullet_text("Narration with typed subtitles");
                ui.bullet_text("Downloadable course resources");
                ui.separator();
                match voice {
                    Some(name) => ui.text(format!("Speech engine: {}", name)),
                    None => ui.text_disabled("Speech engine: none (subtitles only)"),
                }
                if ui.button("Close") {
                    self.show = false;
                }
            });

        if !open {
            self.show = false;
        }
    }
}

impl Default for AboutDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These open real dialogs; run them by hand

    #[test]
    #[ignore]
    fn test_save_resource_dialog() {
        if let Some(path) = FileDialogs::save_resource(Resource::Guide) {
            println!("Selected file: {:?}", path);
        }
    }

    #[test]
    #[ignore]
    fn test_export_tools_dialog() {
        if let Some(path) = FileDialogs::export_tools_csv() {
            println!("Selected file: {:?}", path);
        }
    }

    #[test]
    fn test_tools_have_no_save_dialog() {
        assert!(FileDialogs::save_resource(Resource::Tools).is_none());
    }
}
