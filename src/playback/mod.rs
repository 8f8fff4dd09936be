pub mod chapters;
pub mod clock;
pub mod code_typing;
pub mod narration;
pub mod player;
pub mod subtitle;

pub use chapters::ChapterIndex;
pub use clock::PlaybackClock;
pub use code_typing::{CodeLine, CodeTyper};
pub use narration::{NarrationScheduler, VoiceContext};
pub use player::Player;
pub use subtitle::{SubtitlePhase, SubtitleRenderer};

/// Selectable playback rates, cycled in order
pub const PLAYBACK_RATES: [f32; 7] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Index of 1.0x in [`PLAYBACK_RATES`]
pub const NORMAL_RATE_INDEX: usize = 3;

/// Simulated playback position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Whole seconds, 0..=total
    pub elapsed: u32,
    pub total: u32,
    pub rate_index: usize,
    pub playing: bool,
}

impl PlaybackState {
    pub fn new(total: u32) -> Self {
        Self {
            elapsed: 0,
            total,
            rate_index: NORMAL_RATE_INDEX,
            playing: false,
        }
    }

    pub fn rate(&self) -> f32 {
        PLAYBACK_RATES[self.rate_index]
    }

    /// 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.elapsed as f32 / self.total as f32
        }
    }
}

/// Signals emitted by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Started,
    Paused,
    Ticked(u32),
    Completed,
}
