/// Errors raised while loading persisted text data.
///
/// Loading either fully succeeds or is rejected; there is no partial
/// recovery.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("document has no `lines` array")]
    MissingLines,
    #[error("line {line} is not an array of spans")]
    InvalidLine { line: usize },
    #[error("line {line} has no spans")]
    EmptyLine { line: usize },
    #[error("span {span} on line {line} is malformed: {reason}")]
    InvalidSpan {
        line: usize,
        span: usize,
        reason: String,
    },
    #[error("span {span} on line {line} contains a line break")]
    LineBreakInSpan { line: usize, span: usize },
    #[error("layer parameter `{name}` is invalid: {reason}")]
    InvalidParam { name: String, reason: String },
}

/// Error returned when a color string is not `#rgb`, `#rgba`, `#rrggbb`
/// or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`")]
pub struct ParseColorError(pub String);

/// Error returned when a layout option name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

pub type Result<T> = std::result::Result<T, DocumentError>;
