//! System clipboard for imgui's copy/paste and `set_clipboard_text`

use copypasta::{ClipboardContext, ClipboardProvider};
use imgui::ClipboardBackend;
use tracing::warn;

pub struct SystemClipboard(ClipboardContext);

impl SystemClipboard {
    /// Connect to the desktop clipboard. `None` when there is no display to talk to.
    pub fn init() -> Option<Self> {
        match ClipboardContext::new() {
            Ok(ctx) => Some(Self(ctx)),
            Err(e) => {
                warn!("System clipboard unavailable: {}", e);
                None
            }
        }
    }
}

impl ClipboardBackend for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        self.0.get_contents().ok()
    }

    fn set(&mut self, value: &str) {
        if let Err(e) = self.0.set_contents(value.to_owned()) {
            warn!("Failed to copy to clipboard: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Talks to the real clipboard; run by hand in a desktop session

    #[test]
    #[ignore]
    fn test_set_then_get() {
        let mut clipboard = SystemClipboard::init().unwrap();
        clipboard.set("lesson-player clipboard check");
        assert_eq!(clipboard.get().as_deref(), Some("lesson-player clipboard check"));
    }
}
