pub mod speech;
pub mod tone;

pub use speech::{detect_engine, SimulatedSpeech, SpeechEngine, SpeechHandle, SpeechOutcome, Utterance};
pub use tone::{play_tone, LogToneSink, Tone, ToneKind, ToneSink};

/// Master volume and mute switch shared by speech and tones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSettings {
    /// 0.0 to 1.0
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { volume: 0.8, muted: false }
    }
}

/// Icon state for the volume button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    High,
}

impl AudioSettings {
    pub fn level(&self) -> VolumeLevel {
        if self.muted || self.volume <= 0.0 {
            VolumeLevel::Muted
        } else if self.volume < 0.5 {
            VolumeLevel::Low
        } else {
            VolumeLevel::High
        }
    }

    /// Whether anything should be audible at all
    pub fn audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_level() {
        assert_eq!(AudioSettings { volume: 0.8, muted: false }.level(), VolumeLevel::High);
        assert_eq!(AudioSettings { volume: 0.3, muted: false }.level(), VolumeLevel::Low);
        assert_eq!(AudioSettings { volume: 0.0, muted: false }.level(), VolumeLevel::Muted);
        assert_eq!(AudioSettings { volume: 0.8, muted: true }.level(), VolumeLevel::Muted);
        assert!(!AudioSettings { volume: 0.8, muted: true }.audible());
    }
}
