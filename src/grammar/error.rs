use thiserror::Error;

/// Errors reported while reading grammar text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Line {0}: missing \"->\"")]
    MissingArrow(usize),

    #[error("Line {0}: too many \"->\"")]
    TooManyArrows(usize),

    #[error("Line {0}: empty left side")]
    EmptyLeft(usize),

    #[error("Line {0}: left side contains whitespace")]
    LeftContainsWhitespace(usize),

    #[error("Line {0}: cannot find left side")]
    NoPreviousLeft(usize),

    #[error("Line {0}: empty alternative, write \"&\" for an empty body")]
    EmptyAlternative(usize),

    #[error("Line {0}: \"{1}\" is reserved")]
    ReservedSymbol(usize, String),

    #[error("the grammar has no productions")]
    Empty,
}
