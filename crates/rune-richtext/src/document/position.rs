use serde::{Deserialize, Serialize};

/// A point between two characters: `character` counts chars from the
/// start of `line` and ranges over `0..=line length`.
///
/// Ordering is lexicographic on (line, character).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TextPosition {
    pub line: usize,
    pub character: usize,
}

impl TextPosition {
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl From<(usize, usize)> for TextPosition {
    fn from((line, character): (usize, usize)) -> Self {
        Self { line, character }
    }
}

/// Direction of a word-boundary search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordDirection {
    /// Towards the start of the current or previous word.
    Backward,
    /// Towards the end of the current or next word.
    Forward,
}
