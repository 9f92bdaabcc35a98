//! Single-field update selection
//!
//! The column name written into the UPDATE statement always comes from
//! [`StudentField::column`], never from user text.

use std::fmt;

use super::{Age, ValidationError};

/// Column that `update-field` may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    Name,
    Address,
    Age,
}

impl StudentField {
    /// Menu order shown to the user; keys are 1-based.
    pub const ALL: [StudentField; 3] = [Self::Name, Self::Address, Self::Age];

    /// Parse a menu key (`"1"`, `"2"`, `"3"`) or a column name.
    ///
    /// # Example
    /// ```
    /// use studentctl_core::StudentField;
    ///
    /// assert_eq!(StudentField::from_choice("2").unwrap(), StudentField::Address);
    /// assert_eq!(StudentField::from_choice("age").unwrap(), StudentField::Age);
    /// assert!(StudentField::from_choice("4").is_err());
    /// ```
    pub fn from_choice(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "name" => Ok(Self::Name),
            "2" | "address" => Ok(Self::Address),
            "3" | "age" => Ok(Self::Age),
            _ => Err(ValidationError::InvalidChoice {
                value: s.to_owned(),
            }),
        }
    }

    /// Menu key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "1",
            Self::Address => "2",
            Self::Age => "3",
        }
    }

    /// Column name in the `students` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Age => "age",
        }
    }

    /// Prompt used when asking for the replacement value.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Name => "Enter new name:",
            Self::Address => "Enter new address:",
            Self::Age => "Enter new age:",
        }
    }

    /// Column name with its first letter upper-cased, for confirmations.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Address => "Address",
            Self::Age => "Age",
        }
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key(), self.column())
    }
}

impl std::str::FromStr for StudentField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_choice(s)
    }
}

/// A selected field together with its validated replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Address(String),
    Age(Age),
}

impl FieldUpdate {
    /// Validate `raw` as the new value for `field`.
    pub fn parse(field: StudentField, raw: &str) -> Result<Self, ValidationError> {
        match field {
            StudentField::Name => Ok(Self::Name(raw.to_owned())),
            StudentField::Address => Ok(Self::Address(raw.to_owned())),
            StudentField::Age => Age::parse(raw).map(Self::Age),
        }
    }

    pub fn field(&self) -> StudentField {
        match self {
            Self::Name(_) => StudentField::Name,
            Self::Address(_) => StudentField::Address,
            Self::Age(_) => StudentField::Age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_keys_map_to_columns() {
        let columns: Vec<_> = StudentField::ALL
            .iter()
            .map(|f| (f.key(), f.column()))
            .collect();
        assert_eq!(
            columns,
            vec![("1", "name"), ("2", "address"), ("3", "age")]
        );
    }

    #[test]
    fn rejects_choices_outside_menu() {
        for bad in ["0", "4", "", "number", "student_id", "1; DROP TABLE students"] {
            assert_eq!(
                StudentField::from_choice(bad),
                Err(ValidationError::InvalidChoice {
                    value: bad.to_owned()
                }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn column_names_accepted_case_insensitively() {
        assert_eq!(StudentField::from_choice("NAME").unwrap(), StudentField::Name);
        assert_eq!(StudentField::from_choice(" 3 ").unwrap(), StudentField::Age);
    }

    #[test]
    fn age_update_is_coerced() {
        let update = FieldUpdate::parse(StudentField::Age, "41").unwrap();
        assert_eq!(update, FieldUpdate::Age(Age::new(41).unwrap()));
        assert_eq!(update.field(), StudentField::Age);

        assert!(FieldUpdate::parse(StudentField::Age, "forty").is_err());
    }

    #[test]
    fn text_updates_keep_raw_input() {
        let update = FieldUpdate::parse(StudentField::Address, " 9 Elm Rd ").unwrap();
        assert_eq!(update, FieldUpdate::Address(" 9 Elm Rd ".into()));
    }
}
