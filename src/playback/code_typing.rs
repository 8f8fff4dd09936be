use std::time::Duration;
use tracing::debug;

const BASE_DELAY: Duration = Duration::from_millis(60);
const LINE_PAUSE: Duration = Duration::from_millis(600);
const RESYNC_DELAY: Duration = Duration::from_millis(500);
/// Seconds either side of a checkpoint that trigger a restart
const CHECKPOINT_WINDOW: u32 = 2;

/// One line of the code backdrop as currently shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLine {
    pub text: String,
    pub complete: bool,
}

/// Decorative code that types itself out while the video plays
///
/// Pausing drops the pending step but keeps the line/char position, so typing
/// resumes mid-line. Passing near a checkpoint clears everything and starts
/// over from the first line.
#[derive(Debug, Clone)]
pub struct CodeTyper {
    lines: Vec<String>,
    slots: Vec<CodeLine>,
    line_index: usize,
    char_index: usize,
    pending: Option<Duration>,
    checkpoints: Vec<u32>,
}

impl CodeTyper {
    pub fn new(lines: Vec<String>, checkpoints: Vec<u32>) -> Self {
        Self {
            slots: vec![CodeLine::default(); lines.len()],
            lines,
            line_index: 0,
            char_index: 0,
            pending: None,
            checkpoints,
        }
    }

    pub fn lines(&self) -> &[CodeLine] {
        &self.slots
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line_index, self.char_index)
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin or resume typing
    pub fn start(&mut self, playing: bool) {
        if playing && self.pending.is_none() {
            let delay = self.step();
            self.pending = Some(delay);
        }
    }

    /// Drop the pending step; the position is kept
    pub fn stop(&mut self) {
        self.pending = None;
    }

    /// Restart from the first line when `elapsed` is near a checkpoint
    pub fn sync(&mut self, elapsed: u32, playing: bool) -> bool {
        if !playing {
            return false;
        }
        if !self.checkpoints.iter().any(|&t| elapsed.abs_diff(t) < CHECKPOINT_WINDOW) {
            return false;
        }

        debug!("Code typing restarted at {}s", elapsed);
        self.clear_all();
        self.line_index = 0;
        self.char_index = 0;
        self.pending = Some(RESYNC_DELAY);
        true
    }

    pub fn update(&mut self, dt: Duration, playing: bool) {
        if !playing {
            self.pending = None;
            return;
        }

        let mut dt = dt;
        while let Some(remaining) = self.pending {
            if dt < remaining {
                self.pending = Some(remaining - dt);
                return;
            }
            dt -= remaining;
            let delay = self.step();
            self.pending = Some(delay);
        }
    }

    /// Reveal one more character (or finish the line) and return the delay to the next step
    fn step(&mut self) -> Duration {
        if self.lines.is_empty() {
            return LINE_PAUSE;
        }
        if self.line_index >= self.lines.len() {
            self.line_index = 0;
            self.clear_all();
        }

        let line = &self.lines[self.line_index];
        let len = line.chars().count();

        if self.char_index <= len {
            let shown: String = line.chars().take(self.char_index).collect();
            let next = line.chars().nth(self.char_index);
            self.slots[self.line_index].text = shown;
            self.char_index += 1;

            match next {
                Some(' ') => BASE_DELAY / 2,
                Some(';') => BASE_DELAY * 2,
                _ => BASE_DELAY,
            }
        } else {
            self.slots[self.line_index].complete = true;
            self.char_index = 0;
            self.line_index += 1;
            LINE_PAUSE
        }
    }

    fn clear_all(&mut self) {
        for slot in &mut self.slots {
            *slot = CodeLine::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typer() -> CodeTyper {
        CodeTyper::new(vec!["a b;".to_string(), "xy".to_string()], vec![0, 135])
    }

    #[test]
    fn test_step_delays_follow_characters() {
        let mut code = typer();
        // "" then "a" (next ' '), "a " (next 'b'), "a b" (next ';'), "a b;"
        assert_eq!(code.step(), BASE_DELAY);
        assert_eq!(code.step(), BASE_DELAY / 2);
        assert_eq!(code.step(), BASE_DELAY);
        assert_eq!(code.step(), BASE_DELAY * 2);
        assert_eq!(code.step(), BASE_DELAY);
        assert_eq!(code.lines()[0].text, "a b;");
        assert!(!code.lines()[0].complete);

        assert_eq!(code.step(), LINE_PAUSE);
        assert!(code.lines()[0].complete);
        assert_eq!(code.position(), (1, 0));
    }

    #[test]
    fn test_wraps_and_clears_after_last_line() {
        let mut code = typer();
        // 6 steps for line 0, 4 for line 1
        for _ in 0..10 {
            code.step();
        }
        assert_eq!(code.position(), (2, 0));
        assert!(code.lines().iter().all(|l| l.complete));

        code.step();
        assert_eq!(code.position(), (0, 1));
        assert_eq!(code.lines()[0], CodeLine::default());
        assert_eq!(code.lines()[1], CodeLine::default());
    }

    #[test]
    fn test_pause_keeps_position() {
        let mut code = typer();
        code.start(true);
        code.update(Duration::from_millis(60), true);
        code.update(Duration::from_millis(30), true);
        let position = code.position();
        assert_eq!(position, (0, 3));

        code.stop();
        assert!(!code.is_scheduled());
        code.update(Duration::from_secs(5), false);
        assert_eq!(code.position(), position);

        code.start(true);
        assert_eq!(code.position(), (0, 4));
        assert_eq!(code.lines()[0].text, "a b");
    }

    #[test]
    fn test_start_does_not_double_schedule() {
        let mut code = typer();
        code.start(true);
        code.start(true);
        assert_eq!(code.position(), (0, 1));

        let mut paused = typer();
        paused.start(false);
        assert!(!paused.is_scheduled());
    }

    #[test]
    fn test_sync_near_checkpoint_restarts() {
        let mut code = typer();
        code.start(true);
        code.update(Duration::from_secs(1), true);
        assert_ne!(code.position(), (0, 0));

        assert!(!code.sync(100, true));
        assert!(!code.sync(134, false));
        assert!(code.sync(134, true));
        assert_eq!(code.position(), (0, 0));
        assert!(code.lines().iter().all(|l| l.text.is_empty()));

        code.update(Duration::from_millis(499), true);
        assert_eq!(code.position(), (0, 0));
        code.update(Duration::from_millis(1), true);
        assert_eq!(code.position(), (0, 1));

        assert!(code.sync(136, true));
        assert!(!code.sync(137, true));
    }

    #[test]
    fn test_update_drops_pending_when_stopped() {
        let mut code = typer();
        code.start(true);
        code.update(Duration::from_millis(10), false);
        assert!(!code.is_scheduled());
    }
}
