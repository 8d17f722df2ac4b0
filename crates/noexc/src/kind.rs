use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::InvalidKindError, exc_type::ExcType, exception::Exception};

/// Descriptor for one class of exceptions in an allow-list.
///
/// Built-in kinds match by walking the [`ExcType`] hierarchy. Custom kinds match
/// user-defined exception classes by name anywhere in their MRO.
///
/// Serializes as the bare class name, e.g. `"KeyError"` or `"RetryableError"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExcKind {
    Builtin(ExcType),
    Custom(String),
}

impl ExcKind {
    /// Returns true if `exc` is an instance of this kind or one of its subclasses.
    #[must_use]
    pub fn matches(&self, exc: &Exception) -> bool {
        match self {
            Self::Builtin(exc_type) => exc.exc_type().is_subclass_of(*exc_type),
            Self::Custom(name) => exc.matches_custom_handler_name(name),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(exc_type) => exc_type.name(),
            Self::Custom(name) => name,
        }
    }
}

impl From<ExcType> for ExcKind {
    fn from(exc_type: ExcType) -> Self {
        Self::Builtin(exc_type)
    }
}

impl fmt::Display for ExcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExcKind {
    type Err = InvalidKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(exc_type) = s.parse::<ExcType>() {
            return Ok(Self::Builtin(exc_type));
        }
        if s.is_empty() {
            return Err(InvalidKindError::Empty);
        }
        if s.split('.').all(is_identifier) {
            Ok(Self::Custom(s.to_owned()))
        } else {
            Err(InvalidKindError::NotIdentifier(s.to_owned()))
        }
    }
}

impl TryFrom<String> for ExcKind {
    type Error = InvalidKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExcKind> for String {
    fn from(kind: ExcKind) -> Self {
        match kind {
            ExcKind::Builtin(exc_type) => exc_type.name().to_owned(),
            ExcKind::Custom(name) => name,
        }
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
