//! Student record types

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Age, StudentNumber, ValidationError};

/// Full row from the `students` table.
///
/// Every column except `student_id` is nullable in the schema.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Student {
    pub student_id: i32,
    pub name: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub number: Option<String>,
}

/// The four mutable fields, as returned by find-by-number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub number: Option<String>,
}

impl From<Student> for StudentInfo {
    fn from(s: Student) -> Self {
        Self {
            name: s.name,
            address: s.address,
            age: s.age,
            number: s.number,
        }
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

impl fmt::Display for StudentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let age = self.age.map(|a| a.to_string());
        write!(
            f,
            "Name: {}, Address: {}, Age: {}, Number: {}",
            or_dash(self.name.as_deref()),
            or_dash(self.address.as_deref()),
            or_dash(age.as_deref()),
            or_dash(self.number.as_deref()),
        )
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ", self.student_id)?;
        StudentInfo::from(self.clone()).fmt(f)
    }
}

/// Validated input for inserts and whole-record updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub address: String,
    pub age: Age,
    pub number: StudentNumber,
}

impl NewStudent {
    /// Validate the four raw console values.
    pub fn parse(
        name: &str,
        address: &str,
        age: &str,
        number: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.to_owned(),
            address: address.to_owned(),
            age: Age::parse(age)?,
            number: StudentNumber::new(number)?,
        })
    }

    /// The hard-coded record written by `seed`.
    pub fn fixture() -> Self {
        Self {
            name: "John".to_owned(),
            address: "123 Some Street".to_owned(),
            age: Age(23),
            number: StudentNumber("1234567890".to_owned()),
        }
    }
}

impl From<&NewStudent> for StudentInfo {
    fn from(s: &NewStudent) -> Self {
        Self {
            name: Some(s.name.clone()),
            address: Some(s.address.clone()),
            age: Some(s.age.get()),
            number: Some(s.number.as_str().to_owned()),
        }
    }
}
