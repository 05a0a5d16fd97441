//! Persistence abstraction used by the assignment service.
//!
//! The service holds no state of its own; everything lives behind `Store`.
//! Backends must provide two guarantees the assignment rules rely on:
//!
//! - multi-row writes (`create_team`, `create_pull_request`) commit as a
//!   single transaction, so a failure leaves nothing behind;
//! - conditional writes (`merge_pull_request`, `replace_reviewer`) only
//!   apply when their precondition still holds and report
//!   `StoreError::Conflict` when it does not.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PullRequest, PullRequestShort, Team, User};

/// Kind of record a store error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Team,
    User,
    PullRequest,
    Reviewer,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Team => "team",
            Entity::User => "user",
            Entity::PullRequest => "pull request",
            Entity::Reviewer => "reviewer",
        };
        f.write_str(name)
    }
}

/// Errors reported by storage backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0} already exists")]
    AlreadyExists(Entity),

    /// A conditional write matched no rows
    #[error("conditional write matched no rows")]
    Conflict,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Reviewer assignment counts grouped both ways
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCounts {
    /// Reviewer user ID -> number of assigned pull requests
    pub by_reviewer: BTreeMap<String, u64>,

    /// Pull request ID -> number of assigned reviewers
    pub by_pull_request: BTreeMap<String, u64>,
}

/// Storage backend for teams, users, pull requests and reviewer assignments
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert the team and all of its members atomically.
    ///
    /// `AlreadyExists(Team)` when the name is taken, `AlreadyExists(User)`
    /// when a member ID is taken.
    async fn create_team(&self, team: &Team) -> Result<(), StoreError>;

    /// Get a team with its members in stored order.
    async fn get_team(&self, team_name: &str) -> Result<Team, StoreError>;

    async fn get_user(&self, user_id: &str) -> Result<User, StoreError>;

    /// Set the active flag and return the updated user.
    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError>;

    /// Insert the pull request and its reviewer rows atomically.
    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), StoreError>;

    /// Get a pull request with its reviewers in assignment order.
    async fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest, StoreError>;

    /// Transition `OPEN` -> `MERGED` as a compare-and-set.
    ///
    /// `NotFound(PullRequest)` when the PR is missing, `Conflict` when it is
    /// no longer open.
    async fn merge_pull_request(&self, pr_id: &str) -> Result<PullRequest, StoreError>;

    /// Replace `old_reviewer` by `new_reviewer` on the pull request.
    ///
    /// Must affect exactly one reviewer row; `Conflict` when `old_reviewer`
    /// is no longer assigned or the pull request was merged meanwhile.
    async fn replace_reviewer(
        &self,
        pr_id: &str,
        old_reviewer: &str,
        new_reviewer: &str,
    ) -> Result<(), StoreError>;

    /// Pull requests the user currently reviews, each listed once.
    async fn get_reviews_for_user(&self, user_id: &str)
        -> Result<Vec<PullRequestShort>, StoreError>;

    /// Both reviewer groupings, read from one snapshot.
    ///
    /// The two maps must describe the same set of assignments, so their
    /// totals always agree.
    async fn review_counts(&self) -> Result<ReviewCounts, StoreError>;
}
