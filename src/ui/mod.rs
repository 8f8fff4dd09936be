pub mod backdrop;
pub mod chapters_window;
pub mod clipboard;
pub mod contact_form;
pub mod dialogs;
pub mod player_window;
pub mod resources_window;
pub mod search;
pub mod seek_bar;
pub mod shortcuts;
pub mod toasts;

pub use chapters_window::render_chapters;
pub use clipboard::SystemClipboard;
pub use contact_form::ContactForm;
pub use dialogs::{AboutDialog, FileDialogs};
pub use player_window::{PlayerAction, PlayerWindow};
pub use resources_window::ResourcesWindow;
pub use search::SearchWindow;
pub use shortcuts::{ShortcutAction, ShortcutManager, SEEK_STEP};
pub use toasts::render_toasts;
