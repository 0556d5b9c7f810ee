/// Editing actions a host maps its key events to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Type text at the caret, replacing any selection.
    Insert(String),
    Backspace,
    Delete,
    Home { extend: bool },
    End { extend: bool },
    Left { extend: bool, by_word: bool },
    Right { extend: bool, by_word: bool },
    Up { extend: bool },
    Down { extend: bool },
    SelectAll,
    Copy,
    Cut,
}
