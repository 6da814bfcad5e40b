//! Field rules shared by all entities.
//!
//! Lengths are counted in characters, not bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MAGAZINE_NAME_MIN_CHARS: usize = 2;
pub const MAGAZINE_NAME_MAX_CHARS: usize = 16;
pub const ARTICLE_TITLE_MIN_CHARS: usize = 5;
pub const ARTICLE_TITLE_MAX_CHARS: usize = 50;

/// A field value was rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    LengthOutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must be a non-empty string"),
            Self::LengthOutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} must be between {min} and {max} characters long, got {actual}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// A write-once field was assigned a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    WriteOnce { field: &'static str },
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteOnce { field } => {
                write!(f, "{field} is already set and cannot be changed")
            }
        }
    }
}

impl Error for StateError {}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub(crate) fn require_char_len(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::LengthOutOfRange {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_char_len, require_non_empty, ValidationError};

    #[test]
    fn non_empty_rejects_empty_only() {
        assert_eq!(
            require_non_empty("name", ""),
            Err(ValidationError::Empty { field: "name" })
        );
        assert!(require_non_empty("name", " ").is_ok());
    }

    #[test]
    fn char_len_bounds_are_inclusive() {
        assert!(require_char_len("name", "ab", 2, 4).is_ok());
        assert!(require_char_len("name", "abcd", 2, 4).is_ok());
        assert!(require_char_len("name", "a", 2, 4).is_err());
        assert!(require_char_len("name", "abcde", 2, 4).is_err());
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        // 4 characters, 8 bytes.
        assert!(require_char_len("name", "ñañá", 2, 4).is_ok());
        let err = require_char_len("name", "日本語です!", 2, 4).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthOutOfRange {
                field: "name",
                min: 2,
                max: 4,
                actual: 6,
            }
        );
    }
}
