use std::fmt;

/// Error returned when an allow-list entry does not name an exception kind.
///
/// Kind names must be Python identifiers; anything else is rejected rather than
/// silently matching nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidKindError {
    /// The name was empty.
    Empty,
    /// The name is not a valid identifier.
    NotIdentifier(String),
}

impl fmt::Display for InvalidKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("exception kind name is empty"),
            Self::NotIdentifier(name) => write!(f, "'{name}' is not a valid exception class name"),
        }
    }
}

impl std::error::Error for InvalidKindError {}
