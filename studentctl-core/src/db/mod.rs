//! Database layer - per-operation connections and SQL
//!
//! # Design Principles
//!
//! - One `PgConnection` per operation, closed on every path (no pool)
//! - Parameterized statements only; column names come from closed enums
//! - Rely on the unique index on `number`, handle conflicts - no check-then-insert
//! - Transactions for read-then-write sequences

pub mod connection;
pub mod queries;
pub mod schema;

pub use connection::{connect, release};
