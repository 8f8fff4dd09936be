use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::audio::{SpeechEngine, SpeechHandle, SpeechOutcome, Utterance};
use crate::core::NarrationCue;

/// Base speaking rate for scripted cues
pub const CUE_SPEECH_RATE: f32 = 0.9;

/// Player state the scheduler needs when deciding whether to speak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceContext {
    pub playing: bool,
    pub muted: bool,
    pub volume: f32,
    pub playback_rate: f32,
}

impl VoiceContext {
    fn audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }
}

/// The single in-flight utterance
#[derive(Default)]
struct SpeechSession {
    active_text: Option<String>,
    speaking: bool,
    handle: Option<SpeechHandle>,
}

/// Fires narration cues from the cue table, one utterance at a time
pub struct NarrationScheduler {
    cues: BTreeMap<u32, NarrationCue>,
    session: SpeechSession,
    last_fired: Option<u32>,
    engine: Option<Box<dyn SpeechEngine>>,
}

impl NarrationScheduler {
    pub fn new(cues: &[NarrationCue], engine: Option<Box<dyn SpeechEngine>>) -> Self {
        if engine.is_none() {
            info!("No speech engine available, narration is subtitles only");
        }

        Self {
            cues: cues.iter().map(|c| (c.mark, c.clone())).collect(),
            session: SpeechSession::default(),
            last_fired: None,
            engine,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.session.speaking
    }

    pub fn active_text(&self) -> Option<&str> {
        self.session.active_text.as_deref()
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.as_ref().map(|e| e.name())
    }

    pub fn cue_at(&self, elapsed: u32) -> Option<&NarrationCue> {
        self.cues.get(&elapsed)
    }

    pub fn last_fired(&self) -> Option<u32> {
        self.last_fired
    }

    /// Record `mark` as fired without speaking its cue
    pub fn mark_fired(&mut self, mark: u32) {
        self.last_fired = Some(mark);
    }

    /// Forget fired marks so a new play-through narrates again
    pub fn reset_marks(&mut self) {
        self.last_fired = None;
    }

    /// Collect the outcome of the current session, if it has ended
    pub fn poll(&mut self) -> Option<SpeechOutcome> {
        let outcome = self.session.handle.as_mut()?.try_outcome()?;
        match &outcome {
            SpeechOutcome::Failed(reason) => warn!("Speech failed: {}", reason),
            outcome => debug!("Speech ended: {:?}", outcome),
        }
        self.end_session();
        Some(outcome)
    }

    /// Tick hook. Starts the cue at `elapsed` when nothing else is being said.
    /// Returns the cue so the caller can put up its subtitle.
    pub fn on_tick(&mut self, elapsed: u32, ctx: VoiceContext) -> Option<NarrationCue> {
        self.poll();

        let cue = self.cues.get(&elapsed)?;
        if !ctx.playing || ctx.muted || self.session.speaking || self.last_fired == Some(elapsed) {
            return None;
        }

        let cue = cue.clone();
        self.last_fired = Some(elapsed);
        info!("Narration cue at {}s", elapsed);

        // The session counts as busy even if the engine completes immediately
        self.session.speaking = true;
        self.session.active_text = Some(cue.text.clone());
        self.speak(&cue.text, CUE_SPEECH_RATE, ctx);

        Some(cue)
    }

    /// Speak a one-off line, replacing whatever is being said.
    /// Returns false when nothing could be spoken (no engine, muted, or silent).
    pub fn speak(&mut self, text: &str, base_rate: f32, ctx: VoiceContext) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            self.end_session();
            return false;
        };
        if !ctx.audible() {
            self.end_session();
            return false;
        }

        if self.session.handle.is_some() && self.session.active_text.as_deref() == Some(text) {
            return true;
        }
        if let Some(mut previous) = self.session.handle.take() {
            previous.cancel();
        }

        let handle = engine.speak(Utterance::new(text, base_rate, ctx.playback_rate, ctx.volume));
        self.session = SpeechSession {
            active_text: Some(text.to_string()),
            speaking: true,
            handle: Some(handle),
        };
        true
    }

    /// Interrupt the current session
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.session.handle.take() {
            handle.cancel();
            debug!("Speech interrupted");
        }
        self.end_session();
    }

    fn end_session(&mut self) {
        self.session = SpeechSession::default();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::Course;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    /// Speech engine that records requests and either finishes them at once
    /// or holds them until the test releases them.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSpeech {
        pub spoken: Arc<Mutex<Vec<Utterance>>>,
        pub hold: bool,
        pending: Arc<Mutex<Vec<oneshot::Sender<SpeechOutcome>>>>,
    }

    impl RecordingSpeech {
        pub fn holding() -> Self {
            Self { hold: true, ..Self::default() }
        }

        pub fn texts(&self) -> Vec<String> {
            self.spoken.lock().unwrap().iter().map(|u| u.text.clone()).collect()
        }

        pub fn count(&self, text: &str) -> usize {
            self.texts().iter().filter(|t| t.as_str() == text).count()
        }

        /// Finish every held utterance
        pub fn release_all(&self) {
            for tx in self.pending.lock().unwrap().drain(..) {
                let _ = tx.send(SpeechOutcome::Finished);
            }
        }
    }

    impl SpeechEngine for RecordingSpeech {
        fn name(&self) -> &str {
            "recording"
        }

        fn speak(&mut self, utterance: Utterance) -> SpeechHandle {
            self.spoken.lock().unwrap().push(utterance);
            if self.hold {
                let (tx, rx) = oneshot::channel();
                self.pending.lock().unwrap().push(tx);
                SpeechHandle::new(rx, None)
            } else {
                SpeechHandle::finished(SpeechOutcome::Finished)
            }
        }
    }

    fn ctx() -> VoiceContext {
        VoiceContext { playing: true, muted: false, volume: 0.8, playback_rate: 1.0 }
    }

    fn scheduler(engine: &RecordingSpeech) -> NarrationScheduler {
        NarrationScheduler::new(&Course::builtin().cues, Some(Box::new(engine.clone())))
    }

    #[test]
    fn test_cue_fires_on_exact_mark() {
        let engine = RecordingSpeech::default();
        let mut narration = scheduler(&engine);

        assert!(narration.on_tick(4, ctx()).is_none());
        let cue = narration.on_tick(5, ctx()).unwrap();
        assert_eq!(cue.display_seconds, 4.0);
        assert_eq!(engine.texts(), vec![cue.text.clone()]);
        assert!((engine.spoken.lock().unwrap()[0].rate - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_same_mark_never_refires() {
        let engine = RecordingSpeech::default();
        let mut narration = scheduler(&engine);

        assert!(narration.on_tick(5, ctx()).is_some());
        narration.poll();
        assert!(narration.on_tick(5, ctx()).is_none());
        assert_eq!(engine.texts().len(), 1);

        narration.reset_marks();
        assert!(narration.on_tick(5, ctx()).is_some());
    }

    #[test]
    fn test_each_cue_fires_once_per_play_through() {
        let engine = RecordingSpeech::default();
        let mut narration = scheduler(&engine);
        let course = Course::builtin();

        for elapsed in 1..=course.total {
            narration.on_tick(elapsed, ctx());
        }

        assert_eq!(engine.texts().len(), course.cues.len());
        for cue in &course.cues {
            assert_eq!(engine.count(&cue.text), 1);
        }
    }

    #[test]
    fn test_busy_session_skips_cues_without_queueing() {
        let engine = RecordingSpeech::holding();
        let mut narration = scheduler(&engine);

        assert!(narration.on_tick(5, ctx()).is_some());
        assert!(narration.is_speaking());
        assert!(narration.on_tick(12, ctx()).is_none());

        engine.release_all();
        assert_eq!(narration.poll(), Some(SpeechOutcome::Finished));
        assert!(!narration.is_speaking());

        // 12 has passed; it is skipped, not replayed
        assert!(narration.on_tick(13, ctx()).is_none());
        assert!(narration.on_tick(20, ctx()).is_some());
        assert_eq!(engine.texts().len(), 2);
    }

    #[test]
    fn test_muted_or_paused_suppresses_cues() {
        let engine = RecordingSpeech::default();
        let mut narration = scheduler(&engine);

        let muted = VoiceContext { muted: true, ..ctx() };
        assert!(narration.on_tick(5, muted).is_none());
        let paused = VoiceContext { playing: false, ..ctx() };
        assert!(narration.on_tick(5, paused).is_none());
        assert!(engine.texts().is_empty());
    }

    #[test]
    fn test_zero_volume_completes_immediately() {
        let engine = RecordingSpeech::holding();
        let mut narration = scheduler(&engine);

        let silent = VoiceContext { volume: 0.0, ..ctx() };
        assert!(narration.on_tick(5, silent).is_some());
        assert!(!narration.is_speaking());
        assert!(engine.texts().is_empty());
    }

    #[test]
    fn test_without_engine_cues_still_surface() {
        let mut narration = NarrationScheduler::new(&Course::builtin().cues, None);
        assert!(narration.on_tick(5, ctx()).is_some());
        assert!(!narration.is_speaking());
        assert!(!narration.has_engine());
    }

    #[test]
    fn test_speak_replaces_current_session() {
        let engine = RecordingSpeech::holding();
        let mut narration = scheduler(&engine);

        assert!(narration.speak("first", 1.0, ctx()));
        assert!(narration.speak("first", 1.0, ctx()));
        assert!(narration.speak("second", 1.2, ctx()));
        assert_eq!(engine.texts(), vec!["first", "second"]);
        assert_eq!(narration.active_text(), Some("second"));

        narration.stop();
        assert!(!narration.is_speaking());
        assert_eq!(narration.active_text(), None);
    }
}
