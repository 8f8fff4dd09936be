use std::time::Duration;

/// Share of the display time spent typing
const TYPING_SHARE: f64 = 0.4;
const MAX_TYPING_WINDOW: Duration = Duration::from_millis(2500);
const MIN_CHAR_DELAY: Duration = Duration::from_millis(40);
const MIN_HOLD: Duration = Duration::from_millis(500);
pub const FADE_TIME: Duration = Duration::from_millis(300);

/// Where a subtitle is in its life
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubtitlePhase {
    /// `revealed` characters shown, next one due in `until_next`
    Typing { revealed: usize, until_next: Duration },
    Holding { remaining: Duration },
    Fading { remaining: Duration },
}

#[derive(Debug, Clone)]
struct Subtitle {
    text: String,
    char_count: usize,
    display: Duration,
    per_char: Duration,
    /// Unrounded delay in milliseconds; the hold is measured against this
    per_char_ms: f64,
    /// Keeps typing while playback is stopped (completion line)
    standalone: bool,
    phase: SubtitlePhase,
}

impl Subtitle {
    fn new(text: &str, display_seconds: f32, standalone: bool) -> Self {
        // Whole milliseconds, like a browser timer
        let display_ms = (display_seconds.max(0.0) as f64 * 1000.0).round();
        let display = Duration::from_millis(display_ms as u64);
        let char_count = text.chars().count();
        let window_ms = (display_ms * TYPING_SHARE).min(MAX_TYPING_WINDOW.as_millis() as f64);

        let min_ms = MIN_CHAR_DELAY.as_millis() as f64;
        let (per_char_ms, phase) = if char_count == 0 {
            (min_ms, SubtitlePhase::Holding { remaining: display.max(MIN_HOLD) })
        } else {
            let per_char_ms = (window_ms / char_count as f64).max(min_ms);
            let until_next = Duration::from_millis(per_char_ms.round() as u64);
            (per_char_ms, SubtitlePhase::Typing { revealed: 0, until_next })
        };
        // Each step fires on a whole-millisecond timer
        let per_char = Duration::from_millis(per_char_ms.round() as u64);

        Self {
            text: text.to_string(),
            char_count,
            display,
            per_char,
            per_char_ms,
            standalone,
            phase,
        }
    }

    fn hold_time(&self, revealed: usize) -> Duration {
        let typed_ms = (self.per_char_ms * revealed as f64).round() as u64;
        self.display.saturating_sub(Duration::from_millis(typed_ms)).max(MIN_HOLD)
    }
}

/// Types out one subtitle at a time, then holds and fades it
#[derive(Debug, Default)]
pub struct SubtitleRenderer {
    current: Option<Subtitle>,
}

impl SubtitleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any visible subtitle with `text`
    pub fn show(&mut self, text: &str, display_seconds: f32) {
        self.current = Some(Subtitle::new(text, display_seconds, false));
    }

    /// Like [`show`](Self::show) but keeps typing while playback is stopped
    pub fn show_standalone(&mut self, text: &str, display_seconds: f32) {
        self.current = Some(Subtitle::new(text, display_seconds, true));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn phase(&self) -> Option<SubtitlePhase> {
        self.current.as_ref().map(|s| s.phase)
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.text.as_str())
    }

    pub fn per_char_delay(&self) -> Option<Duration> {
        self.current.as_ref().map(|s| s.per_char)
    }

    /// The part of the line revealed so far
    pub fn visible_text(&self) -> Option<&str> {
        let subtitle = self.current.as_ref()?;
        match subtitle.phase {
            SubtitlePhase::Typing { revealed, .. } => {
                let end = subtitle
                    .text
                    .char_indices()
                    .nth(revealed)
                    .map(|(i, _)| i)
                    .unwrap_or(subtitle.text.len());
                Some(&subtitle.text[..end])
            }
            _ => Some(&subtitle.text),
        }
    }

    pub fn opacity(&self) -> f32 {
        match self.phase() {
            None => 0.0,
            Some(SubtitlePhase::Fading { remaining }) => {
                remaining.as_secs_f32() / FADE_TIME.as_secs_f32()
            }
            Some(_) => 1.0,
        }
    }

    /// Advance by `dt`. A reveal interrupted by pause or mute removes the line.
    pub fn update(&mut self, dt: Duration, playing: bool, muted: bool) {
        let Some(subtitle) = self.current.as_mut() else {
            return;
        };

        let mut dt = dt;
        loop {
            match subtitle.phase {
                SubtitlePhase::Typing { revealed, until_next } => {
                    if (!playing && !subtitle.standalone) || muted {
                        self.current = None;
                        return;
                    }
                    if dt < until_next {
                        subtitle.phase = SubtitlePhase::Typing { revealed, until_next: until_next - dt };
                        return;
                    }
                    dt -= until_next;

                    let revealed = revealed + 1;
                    subtitle.phase = if revealed >= subtitle.char_count {
                        SubtitlePhase::Holding { remaining: subtitle.hold_time(revealed) }
                    } else {
                        SubtitlePhase::Typing { revealed, until_next: subtitle.per_char }
                    };
                }
                SubtitlePhase::Holding { remaining } => {
                    if dt < remaining {
                        subtitle.phase = SubtitlePhase::Holding { remaining: remaining - dt };
                        return;
                    }
                    dt -= remaining;
                    subtitle.phase = SubtitlePhase::Fading { remaining: FADE_TIME };
                }
                SubtitlePhase::Fading { remaining } => {
                    if dt < remaining {
                        subtitle.phase = SubtitlePhase::Fading { remaining: remaining - dt };
                        return;
                    }
                    self.current = None;
                    return;
                }
            }
        }
    }
}
