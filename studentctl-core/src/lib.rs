//! studentctl-core: student records against PostgreSQL
//!
//! Input types in [`models`] validate console text before any connection is
//! opened; [`StudentStore`] runs each operation on its own connection.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use config::{ConnectionOverrides, DatabaseConfig, EffectiveConfig};
pub use error::{ConfigError, StoreError, StoreResult};
pub use models::{
    Age, FieldUpdate, NewStudent, Student, StudentField, StudentInfo, StudentNumber,
    ValidationError,
};
pub use store::{SchemaStatus, StudentStore};
