//! Student number validation
//!
//! The number is the lookup key for find, update and delete. It is matched
//! exactly as stored, so surrounding whitespace is kept.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for student numbers
const MAX_NUMBER_LEN: usize = 64;

/// Validated student number (not blank, kept verbatim)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentNumber(pub(crate) String);

impl StudentNumber {
    /// Create a new student number.
    ///
    /// # Rules
    /// - Not blank (whitespace alone is rejected)
    /// - Max 64 characters
    ///
    /// # Example
    /// ```
    /// use studentctl_core::StudentNumber;
    ///
    /// assert!(StudentNumber::new("1234567890").is_ok());
    /// assert!(StudentNumber::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "number" });
        }

        if s.chars().count() > MAX_NUMBER_LEN {
            return Err(ValidationError::TooLong {
                field: "number",
                max: MAX_NUMBER_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StudentNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for StudentNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StudentNumber {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<StudentNumber> for String {
    fn from(n: StudentNumber) -> Self {
        n.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_surrounding_whitespace() {
        let n = StudentNumber::new("  555 ").unwrap();
        assert_eq!(n.as_str(), "  555 ");
        assert_ne!(n, StudentNumber::new("555").unwrap());
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(
            StudentNumber::new(""),
            Err(ValidationError::Empty { field: "number" })
        );
        assert!(StudentNumber::new("\t\n").is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = "9".repeat(MAX_NUMBER_LEN + 1);
        assert!(matches!(
            StudentNumber::new(&long),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(StudentNumber::new(&"9".repeat(MAX_NUMBER_LEN)).is_ok());
    }

    #[test]
    fn keeps_leading_zeros() {
        assert_eq!(StudentNumber::new("000000").unwrap().as_str(), "000000");
    }
}
