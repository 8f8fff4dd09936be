use std::time::Duration;
use tracing::debug;

use super::AudioSettings;

/// UI feedback tones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneKind {
    Play,
    Pause,
    Volume,
    Seek,
    Mute,
    Default,
}

/// A short oscillator blip: frequency sweep plus an attack/decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub kind: ToneKind,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Time taken by the frequency sweep
    pub sweep: Duration,
    /// Total length of the blip
    pub length: Duration,
    pub peak_gain: f32,
}

impl Tone {
    pub fn new(kind: ToneKind, volume: f32) -> Self {
        let (start_hz, end_hz, sweep_ms) = match kind {
            ToneKind::Play => (440.0, 880.0, 100),
            ToneKind::Pause => (880.0, 440.0, 100),
            ToneKind::Volume => (600.0, 600.0, 0),
            ToneKind::Seek => (800.0, 400.0, 50),
            ToneKind::Mute => (200.0, 200.0, 0),
            ToneKind::Default => (500.0, 500.0, 0),
        };

        Self {
            kind,
            start_hz,
            end_hz,
            sweep: Duration::from_millis(sweep_ms),
            length: Duration::from_millis(100),
            peak_gain: volume.clamp(0.0, 1.0) * 0.1,
        }
    }

    /// Instantaneous frequency (exponential ramp, like an oscillator's exponential sweep)
    pub fn frequency_at(&self, t: Duration) -> f32 {
        if self.sweep.is_zero() || t >= self.sweep {
            return if self.sweep.is_zero() { self.start_hz } else { self.end_hz };
        }
        let progress = t.as_secs_f32() / self.sweep.as_secs_f32();
        self.start_hz * (self.end_hz / self.start_hz).powf(progress)
    }

    /// Envelope gain: 10 ms linear attack, exponential decay to 0.001 at the end
    pub fn gain_at(&self, t: Duration) -> f32 {
        let attack = 0.01;
        let t = t.as_secs_f32();
        let length = self.length.as_secs_f32();
        if t >= length {
            0.0
        } else if t < attack {
            self.peak_gain * t / attack
        } else {
            let floor: f32 = 0.001;
            let progress = (t - attack) / (length - attack);
            let peak = self.peak_gain.max(floor);
            peak * (floor / peak).powf(progress)
        }
    }
}

/// Where tones end up
pub trait ToneSink: Send {
    fn play(&mut self, tone: Tone);
}

/// Sink that records tones in the log
#[derive(Default)]
pub struct LogToneSink;

impl ToneSink for LogToneSink {
    fn play(&mut self, tone: Tone) {
        debug!(
            "Tone {:?}: {:.0}->{:.0} Hz, gain {:.3}",
            tone.kind, tone.start_hz, tone.end_hz, tone.peak_gain
        );
    }
}

/// Play `kind` on `sink` unless audio is muted or silent
pub fn play_tone(sink: Option<&mut (dyn ToneSink + '_)>, kind: ToneKind, audio: &AudioSettings) {
    if audio.muted || audio.volume <= 0.0 {
        return;
    }
    if let Some(sink) = sink {
        sink.play(Tone::new(kind, audio.volume));
    }
}
