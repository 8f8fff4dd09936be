use imgui::{Condition, Ui};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Seconds moved by the arrow keys
pub const SEEK_STEP: i64 = 10;

/// Keyboard shortcut manager
pub struct ShortcutManager {
    shortcuts: Vec<Shortcut>,
}

#[derive(Clone)]
pub struct Shortcut {
    pub key: PhysicalKey,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub action: ShortcutAction,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    TogglePlay,
    ToggleMute,
    SeekForward,
    SeekBackward,
    CycleRate,
    OpenSearch,
    CloseSearch,
    ToggleFullscreen,
    Quit,
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut manager = Self {
            shortcuts: Vec::new(),
        };
        manager.register_defaults();
        manager
    }

    fn register_defaults(&mut self) {
        // Playback
        self.bind(KeyCode::Space, false, false, ShortcutAction::TogglePlay, "Play/Pause");
        self.bind(KeyCode::KeyM, false, false, ShortcutAction::ToggleMute, "Mute/Unmute");
        self.bind(KeyCode::ArrowRight, false, false, ShortcutAction::SeekForward, "Forward 10s");
        self.bind(KeyCode::ArrowLeft, false, false, ShortcutAction::SeekBackward, "Back 10s");
        self.bind(KeyCode::Equal, false, false, ShortcutAction::CycleRate, "Change Speed");
        // '+' on most layouts
        self.bind(KeyCode::Equal, false, true, ShortcutAction::CycleRate, "Change Speed");
        self.bind(KeyCode::NumpadAdd, false, false, ShortcutAction::CycleRate, "Change Speed");

        // Search
        self.bind(KeyCode::KeyK, true, false, ShortcutAction::OpenSearch, "Search Content");
        self.bind(KeyCode::Escape, false, false, ShortcutAction::CloseSearch, "Close Search");

        // View
        self.bind(KeyCode::F11, false, false, ShortcutAction::ToggleFullscreen, "Toggle Fullscreen");

        // Other
        self.bind(KeyCode::KeyQ, true, false, ShortcutAction::Quit, "Quit");
    }

    fn bind(&mut self, code: KeyCode, ctrl: bool, shift: bool, action: ShortcutAction, description: &str) {
        self.shortcuts.push(Shortcut {
            key: PhysicalKey::Code(code),
            ctrl,
            shift,
            alt: false,
            action,
            description: description.to_string(),
        });
    }

    /// Action bound to a key and modifier combination
    pub fn lookup(&self, key: PhysicalKey, ctrl: bool, shift: bool, alt: bool) -> Option<ShortcutAction> {
        self.shortcuts
            .iter()
            .find(|s| s.key == key && s.ctrl == ctrl && s.shift == shift && s.alt == alt)
            .map(|s| s.action)
    }

    /// Process a key event and return the matching action (if any).
    /// While a text field has focus only [`ShortcutManager::allowed_while_typing`] actions pass.
    pub fn process_event(
        &self,
        event: &KeyEvent,
        ctrl: bool,
        shift: bool,
        alt: bool,
        typing: bool,
    ) -> Option<ShortcutAction> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        self.lookup(event.physical_key, ctrl, shift, alt)
            .filter(|action| !typing || Self::allowed_while_typing(*action))
    }

    /// Esc must still close search while its query box has focus
    pub fn allowed_while_typing(action: ShortcutAction) -> bool {
        matches!(action, ShortcutAction::CloseSearch)
    }

    /// Render a shortcuts help window
    pub fn render_help(&self, ui: &Ui, is_open: &mut bool) {
        ui.window("Keyboard Shortcuts")
            .size([350.0, 320.0], Condition::FirstUseEver)
            .position([500.0, 200.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                let mut current_category = "";
                let mut last_description = "";

                for shortcut in &self.shortcuts {
                    let category = match shortcut.action {
                        ShortcutAction::TogglePlay
                        | ShortcutAction::ToggleMute
                        | ShortcutAction::SeekForward
                        | ShortcutAction::SeekBackward
                        | ShortcutAction::CycleRate => "Playback",
                        ShortcutAction::OpenSearch | ShortcutAction::CloseSearch => "Search",
                        ShortcutAction::ToggleFullscreen => "View",
                        ShortcutAction::Quit => "General",
                    };

                    if category != current_category {
                        if !current_category.is_empty() {
                            ui.separator();
                        }
                        ui.text(category);
                        current_category = category;
                    }

                    // Alternate bindings share a row
                    if shortcut.description == last_description {
                        continue;
                    }
                    last_description = &shortcut.description;

                    ui.text(format!("  {:15} - {}", shortcut_label(shortcut), shortcut.description));
                }
            });
    }
}

fn shortcut_label(shortcut: &Shortcut) -> String {
    let mut label = String::new();
    if shortcut.ctrl {
        label.push_str("Ctrl+");
    }
    if shortcut.shift {
        label.push_str("Shift+");
    }
    if shortcut.alt {
        label.push_str("Alt+");
    }
    label.push_str(&key_to_string(shortcut.key));
    label
}

fn key_to_string(key: PhysicalKey) -> String {
    match key {
        PhysicalKey::Code(code) => match code {
            KeyCode::Space => "Space".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::ArrowLeft => "←".to_string(),
            KeyCode::ArrowRight => "→".to_string(),
            KeyCode::Equal => "+".to_string(),
            KeyCode::NumpadAdd => "Num +".to_string(),
            KeyCode::F11 => "F11".to_string(),
            KeyCode::KeyK => "K".to_string(),
            KeyCode::KeyM => "M".to_string(),
            KeyCode::KeyQ => "Q".to_string(),
            _ => format!("{:?}", code),
        },
        _ => "?".to_string(),
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn test_default_bindings() {
        let shortcuts = ShortcutManager::new();
        assert_eq!(shortcuts.lookup(key(KeyCode::Space), false, false, false), Some(ShortcutAction::TogglePlay));
        assert_eq!(shortcuts.lookup(key(KeyCode::KeyM), false, false, false), Some(ShortcutAction::ToggleMute));
        assert_eq!(shortcuts.lookup(key(KeyCode::KeyK), true, false, false), Some(ShortcutAction::OpenSearch));
        assert_eq!(shortcuts.lookup(key(KeyCode::Escape), false, false, false), Some(ShortcutAction::CloseSearch));
    }

    #[test]
    fn test_plus_and_equals_cycle_rate() {
        let shortcuts = ShortcutManager::new();
        assert_eq!(shortcuts.lookup(key(KeyCode::Equal), false, false, false), Some(ShortcutAction::CycleRate));
        assert_eq!(shortcuts.lookup(key(KeyCode::Equal), false, true, false), Some(ShortcutAction::CycleRate));
        assert_eq!(shortcuts.lookup(key(KeyCode::NumpadAdd), false, false, false), Some(ShortcutAction::CycleRate));
    }

    #[test]
    fn test_modifiers_must_match() {
        let shortcuts = ShortcutManager::new();
        assert_eq!(shortcuts.lookup(key(KeyCode::KeyK), false, false, false), None);
        assert_eq!(shortcuts.lookup(key(KeyCode::Space), true, false, false), None);
        assert_eq!(shortcuts.lookup(key(KeyCode::KeyM), false, false, true), None);
    }

    #[test]
    fn test_only_escape_passes_while_typing() {
        assert!(ShortcutManager::allowed_while_typing(ShortcutAction::CloseSearch));
        for action in [
            ShortcutAction::TogglePlay,
            ShortcutAction::ToggleMute,
            ShortcutAction::SeekForward,
            ShortcutAction::SeekBackward,
            ShortcutAction::CycleRate,
            ShortcutAction::OpenSearch,
            ShortcutAction::ToggleFullscreen,
            ShortcutAction::Quit,
        ] {
            assert!(!ShortcutManager::allowed_while_typing(action), "{action:?}");
        }
    }

    #[test]
    fn test_labels() {
        let shortcuts = ShortcutManager::new();
        let search = shortcuts
            .shortcuts
            .iter()
            .find(|s| s.action == ShortcutAction::OpenSearch)
            .unwrap();
        assert_eq!(shortcut_label(search), "Ctrl+K");
    }
}
