//! Database layer for the review assigner
//!
//! SQLite persistence for teams, users, pull requests and reviewer
//! assignments, exposed to the service through `SqliteStore`.

pub mod connection;
pub mod error;
pub mod repos;
pub mod store;

pub use connection::Database;
pub use error::{Error, Result};
pub use store::SqliteStore;
