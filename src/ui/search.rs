use imgui::{Condition, Key, Ui};

use crate::core::{format_time, Course};
use crate::playback::Player;

const MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Chapter,
    Narration,
}

/// One searchable line of course content
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub seconds: u32,
    pub kind: HitKind,
    pub text: String,
}

/// Lower-cased copy of every chapter title, chapter intro and narration line
pub struct SearchIndex {
    entries: Vec<(SearchHit, String)>,
}

impl SearchIndex {
    pub fn new(course: &Course) -> Self {
        let mut entries = Vec::new();

        for chapter in &course.chapters {
            let haystack = format!("{}\n{}", chapter.title, chapter.intro).to_lowercase();
            let hit = SearchHit {
                seconds: chapter.start,
                kind: HitKind::Chapter,
                text: chapter.title.clone(),
            };
            entries.push((hit, haystack));
        }

        for cue in &course.cues {
            let hit = SearchHit {
                seconds: cue.mark,
                kind: HitKind::Narration,
                text: cue.text.clone(),
            };
            entries.push((hit, cue.text.to_lowercase()));
        }

        entries.sort_by_key(|(hit, _)| hit.seconds);
        Self { entries }
    }

    /// Case-insensitive substring match, in playback order. Blank queries match nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|(_, haystack)| haystack.contains(&query))
            .map(|(hit, _)| hit.clone())
            .collect()
    }
}

/// Ctrl+K search overlay
pub struct SearchWindow {
    index: SearchIndex,
    query: String,
    open: bool,
    focus_input: bool,
}

impl SearchWindow {
    pub fn new(course: &Course) -> Self {
        Self {
            index: SearchIndex::new(course),
            query: String::new(),
            open: false,
            focus_input: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus_input = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn render(&mut self, ui: &Ui, player: &mut Player) {
        if !self.open {
            return;
        }

        let display = ui.io().display_size;
        let mut open = self.open;
        let mut selected = None;
        let mut dismissed = false;

        ui.window("Search Tutorial Content")
            .size([500.0, 320.0], Condition::Appearing)
            .position([display[0] / 2.0, display[1] / 2.0], Condition::Appearing)
            .position_pivot([0.5, 0.5])
            .collapsible(false)
            .opened(&mut open)
            .build(|| {
                if self.focus_input {
                    ui.set_keyboard_focus_here();
                    self.focus_input = false;
                }
                ui.set_next_item_width(-1.0);
                ui.input_text("##query", &mut self.query)
                    .hint("Search for topics, tools, or concepts...")
                    .build();
                if ui.is_window_focused() && ui.is_key_pressed(Key::Escape) {
                    dismissed = true;
                }
                ui.separator();

                let hits = self.index.search(&self.query);
                if self.query.trim().is_empty() {
                    ui.text_disabled("Type to search chapters and narration");
                } else if hits.is_empty() {
                    ui.text_disabled("No results");
                }

                ui.child_window("results").build(|| {
                    for (i, hit) in hits.iter().take(MAX_RESULTS).enumerate() {
                        let tag = match hit.kind {
                            HitKind::Chapter => "Chapter",
                            HitKind::Narration => "Narration",
                        };
                        let label = format!("{:>6}  [{}] {}##hit{}", format_time(hit.seconds), tag, hit.text, i);
                        if ui.selectable(&label) {
                            selected = Some(hit.seconds);
                        }
                    }
                });
            });

        self.open = open && !dismissed;
        if let Some(seconds) = selected {
            player.seek_to_second(seconds);
            self.close();
        }
    }
}
