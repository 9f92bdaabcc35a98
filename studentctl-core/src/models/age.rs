//! Age parsing
//!
//! Ages arrive as console text and are stored in an `INT` column, so they are
//! coerced here and rejected before reaching the database.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

const MIN_AGE: i32 = 0;
const MAX_AGE: i32 = 150;

/// Validated student age
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Age(pub(crate) i32);

impl Age {
    /// Build an age from an integer, checking the accepted range.
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(MIN_AGE..=MAX_AGE).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "age",
                min: MIN_AGE,
                max: MAX_AGE,
            });
        }
        Ok(Self(value))
    }

    /// Parse console input such as `" 23 "`.
    ///
    /// # Example
    /// ```
    /// use studentctl_core::Age;
    ///
    /// assert_eq!(Age::parse("23").unwrap().get(), 23);
    /// assert!(Age::parse("twenty").is_err());
    /// assert!(Age::parse("-1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "age" });
        }

        let value: i32 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
            field: "age",
            value: trimmed.to_owned(),
        })?;

        Self::new(value)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Age {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i32> for Age {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for i32 {
    fn from(age: Age) -> Self {
        age.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_with_whitespace() {
        assert_eq!(Age::parse(" 23\n").unwrap().get(), 23);
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(
            Age::parse("23y"),
            Err(ValidationError::NotANumber {
                field: "age",
                value: "23y".into()
            })
        );
        assert_eq!(Age::parse(""), Err(ValidationError::Empty { field: "age" }));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(Age::parse("0").is_ok());
        assert!(Age::parse("150").is_ok());
        assert!(Age::parse("151").is_err());
    }

    proptest! {
        #[test]
        fn in_range_integers_round_trip(n in MIN_AGE..=MAX_AGE) {
            let age = Age::parse(&n.to_string()).unwrap();
            prop_assert_eq!(age.get(), n);
        }

        #[test]
        fn out_of_range_integers_rejected(n in prop_oneof![i32::MIN..MIN_AGE, (MAX_AGE + 1)..=i32::MAX]) {
            let is_out_of_range = matches!(
                Age::parse(&n.to_string()),
                Err(ValidationError::OutOfRange { .. })
            );
            prop_assert!(is_out_of_range);
        }

        #[test]
        fn arbitrary_text_never_panics(s in "\\PC*") {
            let _ = Age::parse(&s);
        }
    }
}
