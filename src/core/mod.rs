pub mod contact;
pub mod course;
pub mod engagement;
pub mod notification;
pub mod timecode;

pub use contact::{ContactDraft, ContactError, ContactRecord};
pub use course::{ChapterMark, Course, NarrationCue};
pub use engagement::{share_text, Engagement};
pub use notification::{Notifier, Toast, ToastKind};
pub use timecode::{format_time, parse_time, CourseError};
