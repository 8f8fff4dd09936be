use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use super::timecode::{format_time, parse_time, CourseError};

/// A scripted narration line spoken when the clock reaches `mark`
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationCue {
    pub mark: u32,
    pub text: String,
    pub display_seconds: f32,
}

/// A chapter start mark
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterMark {
    pub start: u32,
    pub title: String,
    /// Line spoken when the viewer jumps straight to this chapter
    pub intro: String,
}

/// Everything the player needs to run one tutorial
#[derive(Debug, Clone)]
pub struct Course {
    pub title: String,
    /// Length in whole seconds
    pub total: u32,
    pub chapters: Vec<ChapterMark>,
    pub cues: Vec<NarrationCue>,
    pub code_lines: Vec<String>,
    pub welcome: String,
    pub completion: NarrationCue,
}

/// On-disk course description. Chapter starts are `m:ss` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFile {
    pub title: String,
    pub duration: String,
    pub chapters: Vec<ChapterEntry>,
    pub cues: Vec<CueEntry>,
    pub code_lines: Vec<String>,
    pub welcome: String,
    pub completion: CueEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub start: String,
    pub title: String,
    #[serde(default)]
    pub intro: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueEntry {
    #[serde(default)]
    pub mark: u32,
    pub text: String,
    pub seconds: f32,
}

const BUILTIN_TOTAL: u32 = 25 * 60 + 40;

const BUILTIN_CHAPTERS: &[(u32, &str, &str)] = &[
    (0, "Introduction and Welcome",
        "Welcome to our comprehensive UI design tutorial! Let's begin your journey into the world of user interface design."),
    (135, "What is UI Design?",
        "Now let's explore what UI design really means and why it's so important in today's digital world."),
    (330, "Color Theory Fundamentals",
        "Time to dive into color theory - the foundation of great visual design. We'll learn how colors work together."),
    (645, "Typography and Font Selection",
        "Typography is crucial for readability and brand identity. Let's learn how to choose and pair fonts effectively."),
    (980, "Layout and Spacing Principles",
        "Good spacing and layout create visual hierarchy and improve user experience. Let's master these principles."),
    (1270, "Design Tools and Workflow",
        "Finally, let's explore the tools and workflows that will make you an efficient UI designer."),
];

const BUILTIN_CUES: &[(u32, &str, f32)] = &[
    (5, "Welcome to the complete UI Design Tutorial for Beginners!", 4.0),
    (12, "In this comprehensive course, we'll cover all essential design principles.", 5.0),
    (20, "By the end, you'll be able to create beautiful, functional interfaces.", 4.0),
    (30, "Let's start with the fundamentals. What exactly is UI Design?", 5.0),
    (40, "UI stands for User Interface - the visual elements users interact with.", 5.0),
    (50, "Good UI design makes apps and websites easy and enjoyable to use.", 4.0),
    (60, "Now, let's explore the key principles that make designs successful.", 5.0),
    (135, "Chapter 2: Understanding UI Design in depth.", 3.0),
    (145, "UI design is about creating interfaces that are both beautiful and functional.", 5.0),
    (155, "It's the bridge between users and technology.", 4.0),
    (165, "A well-designed interface feels intuitive and natural to use.", 4.0),
    (175, "Users should never have to think about how to use your interface.", 5.0),
    (330, "Chapter 3: Color Theory - The foundation of visual design.", 4.0),
    (340, "Colors evoke emotions and guide user attention.", 4.0),
    (350, "Understanding the color wheel helps create harmonious schemes.", 5.0),
    (360, "Primary colors are red, blue, and yellow.", 3.0),
    (370, "Secondary colors are created by mixing primaries.", 4.0),
    (380, "Complementary colors create strong contrast and visual impact.", 5.0),
    (390, "Analogous colors create harmony and are pleasing to the eye.", 4.0),
    (645, "Chapter 4: Typography - The art of arranging text.", 4.0),
    (655, "Typography can make or break your design.", 3.0),
    (665, "Choose fonts that match your brand personality.", 4.0),
    (675, "Sans-serif fonts are modern and clean for digital interfaces.", 5.0),
    (685, "Serif fonts are traditional and great for readability.", 4.0),
    (695, "Font pairing is an art - stick to 2-3 fonts maximum.", 4.0),
    (705, "Hierarchy helps users scan and understand content quickly.", 5.0),
    (980, "Chapter 5: Layout and Spacing - Creating visual hierarchy.", 4.0),
    (990, "Proper spacing, also called white space, gives designs room to breathe.", 5.0),
    (1000, "Grid systems help create consistent and balanced layouts.", 4.0),
    (1010, "The rule of thirds creates more interesting compositions.", 4.0),
    (1020, "Alignment creates order and professional appearance.", 4.0),
    (1030, "Proximity groups related elements together visually.", 4.0),
    (1270, "Chapter 6: Design Tools and Workflow optimization.", 4.0),
    (1280, "The right tools can significantly speed up your workflow.", 4.0),
    (1290, "Figma is perfect for beginners and collaboration.", 4.0),
    (1300, "Start with wireframes before diving into visual design.", 4.0),
    (1310, "Always design for mobile first, then scale up.", 4.0),
    (1320, "Test your designs with real users whenever possible.", 4.0),
    (1330, "Practice is key - start with simple projects first.", 4.0),
];

const BUILTIN_CODE_LINES: &[&str] = &[
    "// UI Design Tutorial - Getting Started",
    "const designPrinciples = {",
    "  colors: ['#667eea', '#764ba2'],",
    "  typography: 'Inter, sans-serif',",
    "  spacing: '8px, 16px, 24px',",
    "  layout: 'responsive-grid'",
    "};",
    "// Creating beautiful interfaces...",
];

impl Course {
    /// The UI design tutorial shipped with the player
    pub fn builtin() -> Self {
        Self {
            title: "UI Design Tutorial for Beginners".to_string(),
            total: BUILTIN_TOTAL,
            chapters: BUILTIN_CHAPTERS
                .iter()
                .map(|&(start, title, intro)| ChapterMark {
                    start,
                    title: title.to_string(),
                    intro: intro.to_string(),
                })
                .collect(),
            cues: BUILTIN_CUES
                .iter()
                .map(|&(mark, text, display_seconds)| NarrationCue {
                    mark,
                    text: text.to_string(),
                    display_seconds,
                })
                .collect(),
            code_lines: BUILTIN_CODE_LINES.iter().map(|s| s.to_string()).collect(),
            welcome: "Welcome to the UI Design Tutorial for Beginners. Let's start learning!".to_string(),
            completion: NarrationCue {
                mark: BUILTIN_TOTAL,
                text: "Congratulations! You've completed the UI Design Tutorial. Check out our resources below to continue your learning journey.".to_string(),
                display_seconds: 6.0,
            },
        }
    }

    /// Check ordering and range invariants
    pub fn validate(&self) -> Result<(), CourseError> {
        if self.chapters.is_empty() {
            return Err(CourseError::NoChapters);
        }
        if self.code_lines.is_empty() {
            return Err(CourseError::NoCodeLines);
        }

        let mut previous: Option<u32> = None;
        for chapter in &self.chapters {
            if previous.is_some_and(|p| chapter.start <= p) {
                return Err(CourseError::UnorderedChapter {
                    title: chapter.title.clone(),
                    start: chapter.start,
                });
            }
            if chapter.start > self.total {
                return Err(CourseError::MarkOutOfRange { mark: chapter.start, total: self.total });
            }
            previous = Some(chapter.start);
        }

        let mut seen = BTreeSet::new();
        for cue in &self.cues {
            if !seen.insert(cue.mark) {
                return Err(CourseError::DuplicateCue(cue.mark));
            }
            if cue.mark > self.total {
                return Err(CourseError::MarkOutOfRange { mark: cue.mark, total: self.total });
            }
        }

        Ok(())
    }

    /// Build a validated course from its file representation
    pub fn from_file(file: CourseFile) -> Result<Self, CourseError> {
        let total = parse_time(&file.duration)?;

        let mut chapters = Vec::with_capacity(file.chapters.len());
        for entry in file.chapters {
            let start = parse_time(&entry.start)?;
            let intro = entry
                .intro
                .unwrap_or_else(|| format!("Now starting: {}", entry.title));
            chapters.push(ChapterMark { start, title: entry.title, intro });
        }

        let course = Self {
            title: file.title,
            total,
            chapters,
            cues: file
                .cues
                .into_iter()
                .map(|c| NarrationCue { mark: c.mark, text: c.text, display_seconds: c.seconds })
                .collect(),
            code_lines: file.code_lines,
            welcome: file.welcome,
            completion: NarrationCue {
                mark: total,
                text: file.completion.text,
                display_seconds: file.completion.seconds,
            },
        };

        course.validate()?;
        Ok(course)
    }

    /// Load and validate a course description from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read course file {}", path.display()))?;
        let file: CourseFile = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse course file {}", path.display()))?;
        let course = Self::from_file(file)
            .with_context(|| format!("invalid course file {}", path.display()))?;
        Ok(course)
    }

    /// Use the override at `path` when present and valid, the built-in course otherwise
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.exists() => match Self::load(path) {
                Ok(course) => {
                    info!("Loaded course {:?} from {}", course.title, path.display());
                    course
                }
                Err(e) => {
                    error!("{:#}; using the built-in course", e);
                    Self::builtin()
                }
            },
            _ => Self::builtin(),
        }
    }

    /// Code-typing checkpoints: the chapter start times
    pub fn checkpoints(&self) -> Vec<u32> {
        self.chapters.iter().map(|c| c.start).collect()
    }

    /// Total length as `m:ss`
    pub fn duration_label(&self) -> String {
        format_time(self.total)
    }
}
