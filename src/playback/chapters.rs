use crate::core::ChapterMark;

/// Ordered chapter marks
#[derive(Debug, Clone, Default)]
pub struct ChapterIndex {
    chapters: Vec<ChapterMark>,
}

impl ChapterIndex {
    /// `chapters` must be ascending by start time (checked by `Course::validate`)
    pub fn new(chapters: Vec<ChapterMark>) -> Self {
        Self { chapters }
    }

    /// Index of the chapter with the greatest start time <= `elapsed`.
    /// Falls back to the first chapter.
    pub fn active_index(&self, elapsed: u32) -> Option<usize> {
        if self.chapters.is_empty() {
            return None;
        }

        let mut active = 0;
        for (i, chapter) in self.chapters.iter().enumerate() {
            if elapsed >= chapter.start {
                active = i;
            }
        }
        Some(active)
    }

    pub fn active(&self, elapsed: u32) -> Option<&ChapterMark> {
        self.active_index(elapsed).map(|i| &self.chapters[i])
    }

    pub fn find(&self, title: &str) -> Option<&ChapterMark> {
        self.chapters.iter().find(|c| c.title == title)
    }

    pub fn get(&self, index: usize) -> Option<&ChapterMark> {
        self.chapters.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChapterMark> {
        self.chapters.iter()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn starts(&self) -> Vec<u32> {
        self.chapters.iter().map(|c| c.start).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Course;

    fn index() -> ChapterIndex {
        ChapterIndex::new(Course::builtin().chapters)
    }

    #[test]
    fn test_active_is_floor_search() {
        let index = index();
        assert_eq!(index.active(0).unwrap().title, "Introduction and Welcome");
        assert_eq!(index.active(134).unwrap().title, "Introduction and Welcome");
        assert_eq!(index.active(135).unwrap().title, "What is UI Design?");
        assert_eq!(index.active(329).unwrap().title, "What is UI Design?");
        assert_eq!(index.active(330).unwrap().title, "Color Theory Fundamentals");
        assert_eq!(index.active(1540).unwrap().title, "Design Tools and Workflow");
    }

    #[test]
    fn test_active_defaults_to_first_chapter() {
        let index = ChapterIndex::new(vec![ChapterMark {
            start: 10,
            title: "Late start".to_string(),
            intro: String::new(),
        }]);
        assert_eq!(index.active_index(3), Some(0));
        assert_eq!(ChapterIndex::default().active(3), None);
    }

    #[test]
    fn test_find_by_title() {
        let index = index();
        assert_eq!(index.find("Color Theory Fundamentals").unwrap().start, 330);
        assert!(index.find("Color Theory").is_none());
        assert_eq!(index.starts(), vec![0, 135, 330, 645, 980, 1270]);
    }
}
