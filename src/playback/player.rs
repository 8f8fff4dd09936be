use std::time::Duration;
use tracing::info;

use crate::audio::{play_tone, AudioSettings, SpeechEngine, ToneKind, ToneSink};
use crate::core::{format_time, share_text, Course, Engagement, NarrationCue, Notifier};
use crate::playback::narration::CUE_SPEECH_RATE;
use crate::playback::{
    ChapterIndex, ClockEvent, CodeLine, CodeTyper, NarrationScheduler, PlaybackClock,
    PlaybackState, SubtitleRenderer, VoiceContext,
};

const SEEK_SPEECH_RATE: f32 = 1.2;
const RATE_SPEECH_RATE: f32 = 1.5;
const COMPLETION_DELAY: Duration = Duration::from_millis(500);

/// The simulated tutorial player
///
/// Owns the clock and every effect hanging off it. The UI calls the operation
/// methods on input and [`Player::update`] once per frame.
pub struct Player {
    title: String,
    clock: PlaybackClock,
    narration: NarrationScheduler,
    subtitles: SubtitleRenderer,
    code: CodeTyper,
    chapters: ChapterIndex,
    audio: AudioSettings,
    notifier: Notifier,
    tones: Option<Box<dyn ToneSink>>,
    engagement: Engagement,
    welcome: String,
    completion: NarrationCue,
    pending_completion: Option<Duration>,
    active_chapter: Option<usize>,
    fullscreen: bool,
}

impl Player {
    pub fn new(
        course: &Course,
        engine: Option<Box<dyn SpeechEngine>>,
        tones: Option<Box<dyn ToneSink>>,
    ) -> Self {
        let chapters = ChapterIndex::new(course.chapters.clone());
        let active_chapter = chapters.active_index(0);

        Self {
            title: course.title.clone(),
            clock: PlaybackClock::new(course.total),
            narration: NarrationScheduler::new(&course.cues, engine),
            subtitles: SubtitleRenderer::new(),
            code: CodeTyper::new(course.code_lines.clone(), course.checkpoints()),
            chapters,
            audio: AudioSettings::default(),
            notifier: Notifier::new(),
            tones,
            engagement: Engagement::default(),
            welcome: course.welcome.clone(),
            completion: course.completion.clone(),
            pending_completion: None,
            active_chapter,
            fullscreen: false,
        }
    }

    /// Apply saved preferences without any feedback
    pub fn restore(&mut self, audio: AudioSettings, rate: f32, engagement: Engagement) {
        self.audio = AudioSettings {
            volume: audio.volume.clamp(0.0, 1.0),
            muted: audio.muted,
        };
        self.clock.set_rate(rate);
        self.engagement = engagement;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn elapsed(&self) -> u32 {
        self.clock.elapsed()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn rate(&self) -> f32 {
        self.clock.rate()
    }

    pub fn time_label(&self) -> String {
        format!("{} / {}", format_time(self.clock.elapsed()), format_time(self.clock.total()))
    }

    pub fn audio(&self) -> AudioSettings {
        self.audio
    }

    pub fn engagement(&self) -> Engagement {
        self.engagement
    }

    pub fn chapters(&self) -> &ChapterIndex {
        &self.chapters
    }

    pub fn active_chapter(&self) -> Option<usize> {
        self.active_chapter
    }

    pub fn subtitles(&self) -> &SubtitleRenderer {
        &self.subtitles
    }

    pub fn code_lines(&self) -> &[CodeLine] {
        self.code.lines()
    }

    pub fn is_speaking(&self) -> bool {
        self.narration.is_speaking()
    }

    pub fn has_voice(&self) -> bool {
        self.narration.has_engine()
    }

    pub fn voice_name(&self) -> Option<&str> {
        self.narration.engine_name()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Advance every effect by one frame
    pub fn update(&mut self, dt: Duration) {
        self.narration.poll();

        let playing = self.clock.is_playing();
        self.subtitles.update(dt, playing, self.audio.muted);
        self.code.update(dt, playing);

        for event in self.clock.advance(dt) {
            self.handle_clock_event(event);
        }

        if let Some(remaining) = self.pending_completion {
            if dt >= remaining {
                self.pending_completion = None;
                self.announce_completion();
            } else {
                self.pending_completion = Some(remaining - dt);
            }
        }

        self.notifier.update(dt);
    }

    /// Advance the clock by exactly one simulated second
    pub fn tick(&mut self) {
        if let Some(event) = self.clock.tick() {
            self.handle_clock_event(event);
        }
    }

    pub fn toggle_play(&mut self) {
        let event = self.clock.toggle_play();
        self.handle_play_state(event, true);
    }

    /// Jump to `fraction` of the course. Play state and subtitle are untouched.
    pub fn seek(&mut self, fraction: f64) {
        let elapsed = self.clock.seek(fraction);
        self.after_seek(elapsed);
    }

    pub fn seek_to_second(&mut self, seconds: u32) {
        let elapsed = self.clock.seek_to(seconds);
        self.after_seek(elapsed);
    }

    /// Relative seek in whole seconds
    pub fn skip(&mut self, delta: i64) {
        let target = (self.clock.elapsed() as i64 + delta).max(0);
        self.seek_to_second(target.min(u32::MAX as i64) as u32);
    }

    pub fn cycle_rate(&mut self) -> f32 {
        let rate = self.clock.cycle_rate();
        self.tone(ToneKind::Volume);
        let voice = self.voice();
        self.narration
            .speak(&format!("Playback speed changed to {} times", rate), RATE_SPEECH_RATE, voice);
        self.notifier.info(format!("Playback speed: {}x", rate));
        rate
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.audio.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.tone(ToneKind::Volume);
        self.notifier
            .info(format!("Volume: {}%", (self.audio.volume * 100.0).round() as u32));
    }

    pub fn toggle_mute(&mut self) {
        self.audio.muted = !self.audio.muted;
        if self.audio.muted {
            self.stop_speaking();
            self.notifier.info("Audio muted");
        } else {
            self.notifier.info("Audio unmuted");
        }
        self.tone(ToneKind::Mute);
    }

    /// Jump to the chapter titled `title` and start playing. Unknown titles are ignored.
    pub fn jump_to_chapter(&mut self, title: &str) -> Option<u32> {
        let chapter = self.chapters.find(title)?.clone();

        let elapsed = self.clock.seek_to(chapter.start);
        self.narration.mark_fired(elapsed);
        self.active_chapter = self.chapters.active_index(elapsed);
        self.tone(ToneKind::Seek);

        let intro = if chapter.intro.is_empty() {
            format!("Now starting: {}", chapter.title)
        } else {
            chapter.intro.clone()
        };
        let voice = self.voice();
        self.narration.speak(&intro, 1.0, voice);
        self.notifier.success(format!("Jumped to: {}", chapter.title));
        info!("Jumped to chapter {:?} at {}", chapter.title, format_time(elapsed));

        if let Some(event) = self.clock.play() {
            self.handle_play_state(event, false);
        }
        Some(elapsed)
    }

    pub fn toggle_like(&mut self) -> bool {
        self.engagement.toggle_like(&mut self.notifier)
    }

    pub fn toggle_save(&mut self) -> bool {
        self.engagement.toggle_save(&mut self.notifier)
    }

    /// Text for the clipboard
    pub fn share(&mut self) -> String {
        let text = share_text(self.clock.elapsed());
        self.notifier.success("Link copied to clipboard!");
        text
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        if self.fullscreen {
            self.notifier.info("Entered fullscreen mode");
        } else {
            self.notifier.info("Exited fullscreen mode");
        }
        self.fullscreen
    }

    fn voice(&self) -> VoiceContext {
        VoiceContext {
            playing: self.clock.is_playing(),
            muted: self.audio.muted,
            volume: self.audio.volume,
            playback_rate: self.clock.rate(),
        }
    }

    fn tone(&mut self, kind: ToneKind) {
        play_tone(self.tones.as_deref_mut(), kind, &self.audio);
    }

    fn stop_speaking(&mut self) {
        self.narration.stop();
        self.subtitles.clear();
    }

    fn after_seek(&mut self, elapsed: u32) {
        self.active_chapter = self.chapters.active_index(elapsed);
        self.tone(ToneKind::Seek);
        if let Some(chapter) = self.chapters.active(elapsed) {
            let line = format!("Jumped to {}", chapter.title);
            let voice = self.voice();
            self.narration.speak(&line, SEEK_SPEECH_RATE, voice);
        }
        self.notifier.info(format!("Jumped to {}", format_time(elapsed)));
    }

    fn handle_play_state(&mut self, event: ClockEvent, welcome: bool) {
        match event {
            ClockEvent::Started => {
                self.pending_completion = None;
                self.tone(ToneKind::Play);
                if welcome {
                    let voice = self.voice();
                    self.narration.speak(&self.welcome, 1.0, voice);
                }
                self.code.start(true);
                self.notifier.info("Video playing - UI Design Tutorial");
            }
            ClockEvent::Paused => {
                self.tone(ToneKind::Pause);
                self.stop_speaking();
                self.code.stop();
                self.notifier.info("Video paused");
            }
            _ => {}
        }
    }

    fn handle_clock_event(&mut self, event: ClockEvent) {
        match event {
            ClockEvent::Ticked(elapsed) => self.on_tick(elapsed),
            ClockEvent::Completed => self.on_complete(),
            event => self.handle_play_state(event, true),
        }
    }

    fn on_tick(&mut self, elapsed: u32) {
        self.active_chapter = self.chapters.active_index(elapsed);
        self.code.sync(elapsed, self.clock.is_playing());

        let voice = self.voice();
        if let Some(cue) = self.narration.on_tick(elapsed, voice) {
            self.subtitles.show(&cue.text, cue.display_seconds);
        }
    }

    fn on_complete(&mut self) {
        info!("Course completed");
        self.active_chapter = self.chapters.active_index(0);
        self.stop_speaking();
        self.code.stop();
        self.narration.reset_marks();
        self.pending_completion = Some(COMPLETION_DELAY);
        self.notifier
            .success("Tutorial completed! Check out our resources below.");
    }

    fn announce_completion(&mut self) {
        let cue = self.completion.clone();
        self.subtitles.show_standalone(&cue.text, cue.display_seconds);
        let voice = self.voice();
        self.narration.speak(&cue.text, CUE_SPEECH_RATE, voice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tone::tests::RecordingToneSink;
    use crate::core::ToastKind;
    use crate::playback::narration::tests::RecordingSpeech;
    use crate::playback::SubtitlePhase;

    fn player_with(engine: &RecordingSpeech, tones: &RecordingToneSink) -> Player {
        Player::new(
            &Course::builtin(),
            Some(Box::new(engine.clone())),
            Some(Box::new(tones.clone())),
        )
    }

    fn player() -> (Player, RecordingSpeech, RecordingToneSink) {
        let engine = RecordingSpeech::default();
        let tones = RecordingToneSink::default();
        (player_with(&engine, &tones), engine, tones)
    }

    fn cue_text(mark: u32) -> String {
        Course::builtin()
            .cues
            .into_iter()
            .find(|c| c.mark == mark)
            .map(|c| c.text)
            .unwrap()
    }

    #[test]
    fn test_play_then_135_ticks() {
        let (mut player, engine, _) = player();
        player.toggle_play();
        for _ in 0..135 {
            player.tick();
        }

        assert_eq!(player.elapsed(), 135);
        let active = player.active_chapter().unwrap();
        assert_eq!(player.chapters().get(active).unwrap().title, "What is UI Design?");
        assert_eq!(engine.count(&cue_text(135)), 1);
        assert_eq!(player.subtitles().text(), Some(cue_text(135).as_str()));
    }

    #[test]
    fn test_jump_to_chapter_starts_playback() {
        let (mut player, engine, _) = player();
        assert_eq!(player.jump_to_chapter("Color Theory Fundamentals"), Some(330));
        assert_eq!(player.elapsed(), 330);
        assert!(player.is_playing());

        let intro = player.chapters().find("Color Theory Fundamentals").unwrap().intro.clone();
        for _ in 0..20 {
            player.tick();
        }
        assert_eq!(engine.count(&intro), 1);
        assert_eq!(engine.count(&Course::builtin().welcome), 0);
        assert_eq!(player.notifier().iter().next().unwrap().kind, ToastKind::Success);
    }

    #[test]
    fn test_jump_to_unknown_chapter_is_ignored() {
        let (mut player, engine, tones) = player();
        assert_eq!(player.jump_to_chapter("Nope"), None);
        assert_eq!(player.elapsed(), 0);
        assert!(!player.is_playing());
        assert!(engine.texts().is_empty());
        assert!(tones.played.lock().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_play_feedback() {
        let (mut player, engine, tones) = player();
        player.toggle_play();
        assert_eq!(engine.texts(), vec![Course::builtin().welcome]);
        assert_eq!(player.notifier().latest().unwrap().message, "Video playing - UI Design Tutorial");

        player.toggle_play();
        assert_eq!(*tones.played.lock().unwrap(), vec![ToneKind::Play, ToneKind::Pause]);
        assert_eq!(player.notifier().latest().unwrap().message, "Video paused");
        assert!(!player.is_speaking());
    }

    #[test]
    fn test_pause_removes_subtitle() {
        let (mut player, _, _) = player();
        player.toggle_play();
        for _ in 0..5 {
            player.tick();
        }
        assert!(player.subtitles().is_visible());
        player.toggle_play();
        assert!(!player.subtitles().is_visible());
    }

    #[test]
    fn test_seek_keeps_subtitle_and_announces_chapter() {
        let (mut player, engine, tones) = player();
        player.toggle_play();
        for _ in 0..5 {
            player.tick();
        }
        player.seek(0.5);

        assert_eq!(player.elapsed(), 770);
        assert!(player.is_playing());
        assert_eq!(player.subtitles().text(), Some(cue_text(5).as_str()));
        assert_eq!(engine.count("Jumped to Typography and Font Selection"), 1);
        assert_eq!(player.notifier().latest().unwrap().message, "Jumped to 12:50");
        assert_eq!(tones.played.lock().unwrap().last(), Some(&ToneKind::Seek));
    }

    #[test]
    fn test_skip_clamps() {
        let (mut player, _, _) = player();
        player.skip(-10);
        assert_eq!(player.elapsed(), 0);
        player.skip(10);
        assert_eq!(player.elapsed(), 10);
        player.seek_to_second(5000);
        assert_eq!(player.elapsed(), 1540);
    }

    #[test]
    fn test_cycle_rate_announces() {
        let (mut player, engine, _) = player();
        assert_eq!(player.cycle_rate(), 1.25);
        assert_eq!(engine.texts(), vec!["Playback speed changed to 1.25 times"]);
        assert!((engine.spoken.lock().unwrap()[0].rate - 1.8).abs() < 1e-6);
        assert_eq!(player.notifier().latest().unwrap().message, "Playback speed: 1.25x");

        for _ in 0..6 {
            player.cycle_rate();
        }
        assert_eq!(player.rate(), 1.0);
    }

    #[test]
    fn test_volume_and_mute() {
        let (mut player, _, tones) = player();
        player.set_volume(1.7);
        assert_eq!(player.audio().volume, 1.0);
        player.set_volume(0.25);
        assert_eq!(player.notifier().latest().unwrap().message, "Volume: 25%");

        player.toggle_mute();
        assert!(player.audio().muted);
        assert_eq!(player.notifier().latest().unwrap().message, "Audio muted");
        player.toggle_mute();
        assert_eq!(player.notifier().latest().unwrap().message, "Audio unmuted");

        assert_eq!(
            *tones.played.lock().unwrap(),
            vec![ToneKind::Volume, ToneKind::Volume, ToneKind::Mute]
        );
    }

    #[test]
    fn test_muted_player_skips_narration() {
        let (mut player, engine, _) = player();
        player.toggle_mute();
        player.toggle_play();
        for _ in 0..30 {
            player.tick();
        }
        assert!(engine.texts().is_empty());
        assert!(!player.subtitles().is_visible());
    }

    #[test]
    fn test_completion() {
        let (mut player, engine, _) = player();
        player.seek_to_second(1539);
        player.toggle_play();
        player.tick();

        assert_eq!(player.elapsed(), 0);
        assert!(!player.is_playing());
        assert_eq!(
            player.notifier().latest().unwrap().message,
            "Tutorial completed! Check out our resources below."
        );

        let completion = Course::builtin().completion.text;
        player.update(Duration::from_millis(499));
        assert_eq!(engine.count(&completion), 0);
        player.update(Duration::from_millis(1));
        assert_eq!(engine.count(&completion), 1);
        assert_eq!(player.subtitles().text(), Some(completion.as_str()));

        // Types out while stopped
        player.update(Duration::from_millis(5000));
        assert!(matches!(player.subtitles().phase(), Some(SubtitlePhase::Holding { .. })));
    }

    #[test]
    fn test_replay_after_completion_narrates_again() {
        let (mut player, engine, _) = player();
        player.toggle_play();
        for _ in 0..1540 {
            player.tick();
        }
        assert!(!player.is_playing());

        player.toggle_play();
        for _ in 0..5 {
            player.tick();
        }
        assert_eq!(engine.count(&cue_text(5)), 2);
    }

    #[test]
    fn test_update_drives_clock_and_code() {
        let (mut player, _, _) = player();
        player.toggle_play();
        for _ in 0..30 {
            player.update(Duration::from_millis(100));
        }
        assert_eq!(player.elapsed(), 3);
        assert!(player.code_lines().iter().any(|l| !l.text.is_empty()));
    }

    #[test]
    fn test_without_collaborators() {
        let mut player = Player::new(&Course::builtin(), None, None);
        player.toggle_play();
        for _ in 0..10 {
            player.tick();
        }
        assert!(!player.has_voice());
        assert!(player.subtitles().is_visible());
    }

    #[test]
    fn test_share_and_engagement() {
        let (mut player, _, _) = player();
        player.seek_to_second(95);
        assert_eq!(player.share(), "Check out this amazing UI Design Tutorial! Currently at 1:35");
        assert!(player.toggle_like());
        assert!(player.toggle_save());
        assert!(!player.toggle_like());
        assert!(player.toggle_fullscreen());
    }
}
