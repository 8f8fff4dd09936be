use super::notification::Notifier;
use super::timecode::format_time;

/// Like / save state for the tutorial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    pub liked: bool,
    pub saved: bool,
}

impl Engagement {
    pub fn like_label(&self) -> &'static str {
        if self.liked { "2.2K" } else { "2.1K" }
    }

    pub fn toggle_like(&mut self, notifier: &mut Notifier) -> bool {
        self.liked = !self.liked;
        if self.liked {
            notifier.success("Thanks for liking this tutorial!");
        } else {
            notifier.info("Like removed");
        }
        self.liked
    }

    pub fn toggle_save(&mut self, notifier: &mut Notifier) -> bool {
        self.saved = !self.saved;
        if self.saved {
            notifier.success("Tutorial saved for later!");
        } else {
            notifier.info("Removed from saved tutorials");
        }
        self.saved
    }
}

/// Text copied to the clipboard by the share button
pub fn share_text(elapsed: u32) -> String {
    format!(
        "Check out this amazing UI Design Tutorial! Currently at {}",
        format_time(elapsed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notification::ToastKind;

    #[test]
    fn test_toggle_like() {
        let mut notifier = Notifier::new();
        let mut engagement = Engagement::default();
        assert_eq!(engagement.like_label(), "2.1K");

        assert!(engagement.toggle_like(&mut notifier));
        assert_eq!(engagement.like_label(), "2.2K");
        assert_eq!(notifier.latest().unwrap().kind, ToastKind::Success);

        assert!(!engagement.toggle_like(&mut notifier));
        assert_eq!(notifier.latest().unwrap().message, "Like removed");
    }

    #[test]
    fn test_toggle_save() {
        let mut notifier = Notifier::new();
        let mut engagement = Engagement::default();
        assert!(engagement.toggle_save(&mut notifier));
        assert!(!engagement.toggle_save(&mut notifier));
        assert_eq!(notifier.len(), 2);
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            share_text(345),
            "Check out this amazing UI Design Tutorial! Currently at 5:45"
        );
    }
}
