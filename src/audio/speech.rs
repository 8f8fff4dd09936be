use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::AbortHandle;
use tracing::debug;

/// Speaking-rate bounds applied to every request
pub const MIN_SPEECH_RATE: f32 = 0.6;
pub const MAX_SPEECH_RATE: f32 = 1.8;

/// A request to speak one line
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub volume: f32,
}

impl Utterance {
    /// Scale the base rate by the playback rate and clamp it to the engine's range
    pub fn new(text: &str, base_rate: f32, playback_rate: f32, volume: f32) -> Self {
        Self {
            text: text.to_string(),
            rate: (base_rate * playback_rate).clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE),
            volume,
        }
    }
}

/// How a speech session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    Finished,
    Interrupted,
    Failed(String),
}

/// Completion side of one utterance. Resolves exactly once.
pub struct SpeechHandle {
    done: Option<oneshot::Receiver<SpeechOutcome>>,
    task: Option<AbortHandle>,
}

impl SpeechHandle {
    pub fn new(done: oneshot::Receiver<SpeechOutcome>, task: Option<AbortHandle>) -> Self {
        Self { done: Some(done), task }
    }

    /// A handle that has already finished, for engines that cannot speak
    pub fn finished(outcome: SpeechOutcome) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self::new(rx, None)
    }

    /// Non-blocking check. Returns the outcome once; a dropped sender reads as interrupted.
    pub fn try_outcome(&mut self) -> Option<SpeechOutcome> {
        let done = self.done.as_mut()?;
        let outcome = match done.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => SpeechOutcome::Interrupted,
        };
        self.done = None;
        Some(outcome)
    }

    /// Best-effort stop of the underlying utterance
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.done = None;
    }

    pub fn is_resolved(&self) -> bool {
        self.done.is_none()
    }
}

/// A text-to-speech backend
pub trait SpeechEngine: Send {
    fn name(&self) -> &str;

    /// Start speaking. Fire-and-forget; completion arrives through the handle.
    fn speak(&mut self, utterance: Utterance) -> SpeechHandle;
}

/// Speech engine that simulates utterance length from the word count
pub struct SimulatedSpeech {
    runtime: Handle,
    words_per_minute: f32,
}

impl SimulatedSpeech {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime, words_per_minute: 150.0 }
    }

    /// Estimated speaking time at the utterance's rate
    pub fn estimate(&self, utterance: &Utterance) -> Duration {
        let words = utterance.text.split_whitespace().count().max(1) as f32;
        let rate = utterance.rate.max(MIN_SPEECH_RATE);
        Duration::from_secs_f32(words * 60.0 / (self.words_per_minute * rate))
    }
}

impl SpeechEngine for SimulatedSpeech {
    fn name(&self) -> &str {
        "simulated"
    }

    fn speak(&mut self, utterance: Utterance) -> SpeechHandle {
        let length = self.estimate(&utterance);
        debug!("Speaking {:?} for {:?} at rate {:.2}", utterance.text, length, utterance.rate);

        let (tx, rx) = oneshot::channel();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(length).await;
            let _ = tx.send(SpeechOutcome::Finished);
        });

        SpeechHandle::new(rx, Some(task.abort_handle()))
    }
}

/// Decide once, at startup, whether narration has a voice
pub fn detect_engine(enabled: bool, runtime: &Handle) -> Option<Box<dyn SpeechEngine>> {
    if enabled {
        Some(Box::new(SimulatedSpeech::new(runtime.clone())))
    } else {
        None
    }
}
