use crate::playback::{ClockEvent, PlaybackState, PLAYBACK_RATES};
use std::time::Duration;

/// Simulated playback clock
///
/// One simulated second elapses every `1000 / rate` ms of wall time. Wall time
/// is fed in through [`PlaybackClock::advance`] once per frame.
pub struct PlaybackClock {
    state: PlaybackState,
    accumulator: Duration,
}

impl PlaybackClock {
    pub fn new(total: u32) -> Self {
        Self {
            state: PlaybackState::new(total),
            accumulator: Duration::ZERO,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn elapsed(&self) -> u32 {
        self.state.elapsed
    }

    pub fn total(&self) -> u32 {
        self.state.total
    }

    pub fn rate(&self) -> f32 {
        self.state.rate()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    /// Wall time per simulated second at the current rate
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate() as f64)
    }

    /// Advance by one simulated second
    pub fn tick(&mut self) -> Option<ClockEvent> {
        if !self.state.playing {
            return None;
        }

        if self.state.elapsed < self.state.total {
            self.state.elapsed += 1;
        }

        if self.state.elapsed >= self.state.total {
            self.state.playing = false;
            self.state.elapsed = 0;
            self.accumulator = Duration::ZERO;
            return Some(ClockEvent::Completed);
        }

        Some(ClockEvent::Ticked(self.state.elapsed))
    }

    /// Feed wall time; returns the events of every tick that fell due
    pub fn advance(&mut self, dt: Duration) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        if !self.state.playing {
            self.accumulator = Duration::ZERO;
            return events;
        }

        self.accumulator += dt;
        loop {
            // Re-read every tick so a rate change applies immediately
            let interval = self.tick_interval();
            if self.accumulator < interval {
                break;
            }
            self.accumulator -= interval;

            match self.tick() {
                Some(event) => {
                    events.push(event);
                    if event == ClockEvent::Completed {
                        break;
                    }
                }
                None => break,
            }
        }

        events
    }

    pub fn toggle_play(&mut self) -> ClockEvent {
        self.state.playing = !self.state.playing;
        self.accumulator = Duration::ZERO;
        if self.state.playing {
            ClockEvent::Started
        } else {
            ClockEvent::Paused
        }
    }

    /// Start if paused
    pub fn play(&mut self) -> Option<ClockEvent> {
        if self.state.playing {
            None
        } else {
            Some(self.toggle_play())
        }
    }

    /// Pause if playing
    pub fn pause(&mut self) -> Option<ClockEvent> {
        if self.state.playing {
            Some(self.toggle_play())
        } else {
            None
        }
    }

    /// Jump to `floor(total * fraction)`. Play state is untouched.
    pub fn seek(&mut self, fraction: f64) -> u32 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.seek_to((self.state.total as f64 * fraction).floor() as u32)
    }

    /// Jump to an absolute second, clamped to the course length
    pub fn seek_to(&mut self, seconds: u32) -> u32 {
        self.state.elapsed = seconds.min(self.state.total);
        self.accumulator = Duration::ZERO;
        self.state.elapsed
    }

    /// Move to the next rate, wrapping after the fastest
    pub fn cycle_rate(&mut self) -> f32 {
        self.state.rate_index = (self.state.rate_index + 1) % PLAYBACK_RATES.len();
        self.rate()
    }

    /// Select a rate from the enumerated set; other values are refused
    pub fn set_rate(&mut self, rate: f32) -> bool {
        match PLAYBACK_RATES.iter().position(|&r| r == rate) {
            Some(index) => {
                self.state.rate_index = index;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_requires_playing() {
        let mut clock = PlaybackClock::new(10);
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.elapsed(), 0);

        assert_eq!(clock.toggle_play(), ClockEvent::Started);
        assert_eq!(clock.tick(), Some(ClockEvent::Ticked(1)));
        assert_eq!(clock.toggle_play(), ClockEvent::Paused);
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.elapsed(), 1);
    }

    #[test]
    fn test_completes_exactly_once() {
        let total = 1540;
        let mut clock = PlaybackClock::new(total);
        clock.toggle_play();

        let mut completions = 0;
        for _ in 0..total {
            if clock.tick() == Some(ClockEvent::Completed) {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(clock.elapsed(), 0);
        assert!(!clock.is_playing());
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_seek_floors_fraction() {
        let mut clock = PlaybackClock::new(1540);
        for i in 0..=100 {
            let fraction = i as f64 / 100.0;
            let elapsed = clock.seek(fraction);
            assert_eq!(elapsed, (1540.0 * fraction).floor() as u32);
            assert!(elapsed <= clock.total());
        }

        assert_eq!(clock.seek(0.5), 770);
        assert_eq!(clock.seek(1.0), 1540);
        assert_eq!(clock.seek(-0.3), 0);
        assert_eq!(clock.seek(7.0), 1540);
        assert_eq!(clock.seek(f64::NAN), 0);
    }

    #[test]
    fn test_seek_keeps_play_state() {
        let mut clock = PlaybackClock::new(100);
        clock.seek(0.5);
        assert!(!clock.is_playing());
        clock.toggle_play();
        clock.seek(0.2);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_tick_at_end_completes() {
        let mut clock = PlaybackClock::new(100);
        clock.seek(1.0);
        clock.toggle_play();
        assert_eq!(clock.tick(), Some(ClockEvent::Completed));
        assert_eq!(clock.elapsed(), 0);
    }

    #[test]
    fn test_rate_cycles_through_seven_values() {
        let mut clock = PlaybackClock::new(100);
        let start = clock.rate();
        assert_eq!(start, 1.0);

        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(clock.cycle_rate());
        }

        assert_eq!(seen, vec![1.25, 1.5, 2.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(clock.rate(), start);
    }

    #[test]
    fn test_set_rate() {
        let mut clock = PlaybackClock::new(100);
        assert!(clock.set_rate(1.5));
        assert_eq!(clock.rate(), 1.5);
        assert!(!clock.set_rate(3.0));
        assert_eq!(clock.rate(), 1.5);
    }

    #[test]
    fn test_advance_scales_with_rate() {
        let mut clock = PlaybackClock::new(100);
        assert!(clock.advance(Duration::from_secs(5)).is_empty());

        clock.toggle_play();
        let events = clock.advance(Duration::from_millis(2500));
        assert_eq!(events, vec![ClockEvent::Ticked(1), ClockEvent::Ticked(2)]);

        // 500 ms carried over; at 2x a tick is 500 ms
        clock.set_rate(2.0);
        let events = clock.advance(Duration::from_millis(500));
        assert_eq!(events, vec![ClockEvent::Ticked(3), ClockEvent::Ticked(4)]);
        assert_eq!(clock.tick_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_advance_stops_at_completion() {
        let mut clock = PlaybackClock::new(3);
        clock.toggle_play();
        let events = clock.advance(Duration::from_secs(10));
        assert_eq!(
            events,
            vec![ClockEvent::Ticked(1), ClockEvent::Ticked(2), ClockEvent::Completed]
        );
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_pause_discards_partial_tick() {
        let mut clock = PlaybackClock::new(100);
        clock.toggle_play();
        clock.advance(Duration::from_millis(900));
        clock.toggle_play();
        clock.toggle_play();
        assert!(clock.advance(Duration::from_millis(200)).is_empty());
        assert_eq!(clock.advance(Duration::from_millis(800)), vec![ClockEvent::Ticked(1)]);
    }
}
