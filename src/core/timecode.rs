use thiserror::Error;

/// Errors raised while validating course content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    #[error("malformed time {0:?}, expected m:ss")]
    MalformedTime(String),

    #[error("chapter {title:?} at {start}s does not start after the previous chapter")]
    UnorderedChapter { title: String, start: u32 },

    #[error("duplicate narration mark at {0}s")]
    DuplicateCue(u32),

    #[error("mark at {mark}s is past the end of the course ({total}s)")]
    MarkOutOfRange { mark: u32, total: u32 },

    #[error("course has no chapters")]
    NoChapters,

    #[error("course has no code lines")]
    NoCodeLines,
}

/// Format whole seconds as `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse an `m:ss` timestamp into whole seconds
pub fn parse_time(text: &str) -> Result<u32, CourseError> {
    let malformed = || CourseError::MalformedTime(text.to_string());

    let (mins, secs) = text.trim().split_once(':').ok_or_else(malformed)?;
    if secs.len() != 2 {
        return Err(malformed());
    }

    let mins: u32 = mins.parse().map_err(|_| malformed())?;
    let secs: u32 = secs.parse().map_err(|_| malformed())?;
    if secs >= 60 {
        return Err(malformed());
    }

    mins.checked_mul(60)
        .and_then(|total| total.checked_add(secs))
        .ok_or_else(malformed)
}
