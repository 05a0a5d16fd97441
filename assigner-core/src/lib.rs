//! Assigner Core - reviewer assignment for pull requests
//!
//! This crate holds the assignment rules: which team members review a new
//! pull request, who replaces a reviewer that drops out, and the lifecycle
//! of teams, users and pull requests around them. Persistence is reached
//! only through the [`Store`] trait.

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod selection;
pub mod service;
pub mod store;

pub use config::{CliOverrides, Config};
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use models::{
    PrStatus, PullRequest, PullRequestShort, Reassignment, ReviewStats, Team, TeamMember, User,
    UserReviews,
};
pub use service::AssignmentService;
pub use store::{Entity, ReviewCounts, Store, StoreError};
