//! Student domain types with validation at construction
//!
//! Console input is parsed into these types before any connection is opened.
//! Invalid input returns ValidationError, not panic.

pub mod age;
pub mod field;
pub mod number;
pub mod student;
pub mod validation;

pub use age::Age;
pub use field::{FieldUpdate, StudentField};
pub use number::StudentNumber;
pub use student::{NewStudent, Student, StudentInfo};
pub use validation::ValidationError;
