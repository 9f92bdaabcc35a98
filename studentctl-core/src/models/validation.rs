//! Validation error types

use std::fmt;

/// Validation error for console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field should hold an integer
    NotANumber { field: &'static str, value: String },

    /// Integer outside the accepted range
    OutOfRange {
        field: &'static str,
        min: i32,
        max: i32,
    },

    /// Menu selection outside the offered keys
    InvalidChoice { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::NotANumber { field, value } => {
                write!(f, "{} must be a whole number, got '{}'", field, value)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::InvalidChoice { value } => write!(f, "Invalid choice: '{}'", value),
        }
    }
}

impl std::error::Error for ValidationError {}
