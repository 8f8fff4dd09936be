use anyhow::{Context, Result};
use imgui::{Condition, Ui};
use std::fs::File;
use std::path::Path;
use tracing::error;

use crate::core::Notifier;
use crate::resources::{categories, download_message, recommended_tools, write_download, write_tools_csv, Resource, Tool};
use crate::ui::FileDialogs;

/// Resources panel plus the tool recommendations window
pub struct ResourcesWindow {
    tools: Vec<Tool>,
    show_tools: bool,
}

impl ResourcesWindow {
    pub fn new() -> Self {
        Self {
            tools: recommended_tools(),
            show_tools: false,
        }
    }

    /// Save `resource` to `path` and report the outcome as a toast
    pub fn save_resource(resource: Resource, path: &Path, notifier: &mut Notifier) {
        match write_download(resource, path) {
            Ok(()) => notifier.success(download_message(resource)),
            Err(e) => {
                error!("Download failed: {:#}", e);
                notifier.error(format!("Could not save {}", resource.title()));
            }
        }
    }

    pub fn export_tools(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_tools_csv(&self.tools, file)
    }

    pub fn render(&mut self, ui: &Ui, notifier: &mut Notifier, opened: &mut bool) {
        ui.window("Learning Resources")
            .size([360.0, 320.0], Condition::FirstUseEver)
            .position([1000.0, 520.0], Condition::FirstUseEver)
            .opened(opened)
            .build(|| {
                for resource in Resource::ALL {
                    ui.text_colored([0.4, 0.49, 0.92, 1.0], resource.title());
                    ui.text_wrapped(resource.blurb());

                    let label = if resource.file_name().is_some() {
                        format!("Download##{}", resource.title())
                    } else {
                        format!("View List##{}", resource.title())
                    };
                    if ui.button(&label) {
                        if resource.file_name().is_none() {
                            self.show_tools = true;
                        } else if let Some(path) = FileDialogs::save_resource(resource) {
                            Self::save_resource(resource, &path, notifier);
                        }
                    }
                    ui.separator();
                }
            });

        if self.show_tools {
            self.render_tools(ui, notifier);
        }
    }

    fn render_tools(&mut self, ui: &Ui, notifier: &mut Notifier) {
        let mut open = self.show_tools;
        let mut export = false;

        ui.window("Recommended Design Tools")
            .size([480.0, 560.0], Condition::FirstUseEver)
            .opened(&mut open)
            .build(|| {
                if ui.button("Export CSV...") {
                    export = true;
                }
                ui.separator();

                for category in categories(&self.tools) {
                    if ui.collapsing_header(category, imgui::TreeNodeFlags::DEFAULT_OPEN) {
                        for tool in self.tools.iter().filter(|t| t.category == category) {
                            ui.text(tool.name);
                            ui.text_wrapped(tool.description);
                            if !tool.price.is_empty() {
                                ui.text_colored([0.4, 0.49, 0.92, 1.0], tool.price);
                            }
                            ui.text_disabled(tool.url);
                            if ui.is_item_clicked() {
                                ui.set_clipboard_text(tool.url);
                                notifier.info(format!("Copied {}", tool.url));
                            }
                            ui.spacing();
                        }
                    }
                }
            });

        self.show_tools = open;

        if export {
            if let Some(path) = FileDialogs::export_tools_csv() {
                match self.export_tools(&path) {
                    Ok(()) => notifier.success(format!("Exported {} tools", self.tools.len())),
                    Err(e) => {
                        error!("Tool export failed: {:#}", e);
                        notifier.error("Could not export the tool list");
                    }
                }
            }
        }
    }
}

impl Default for ResourcesWindow {
    fn default() -> Self {
        Self::new()
    }
}
