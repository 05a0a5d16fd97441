//! Error types for reviewer assignment

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for assignment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for assignment operations
///
/// Every business rule violation has its own variant so callers can branch
/// exhaustively instead of matching on messages.
#[derive(Error, Debug)]
pub enum Error {
    /// A team with this name already exists
    #[error("team '{0}' already exists")]
    TeamAlreadyExists(String),

    /// No team with this name
    #[error("team '{0}' not found")]
    TeamNotFound(String),

    /// A user with this ID already exists (user IDs are global)
    #[error("user '{0}' already exists")]
    UserAlreadyExists(String),

    /// No user with this ID
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// A pull request with this ID already exists
    #[error("pull request '{0}' already exists")]
    PrAlreadyExists(String),

    /// No pull request with this ID
    #[error("pull request '{0}' not found")]
    PrNotFound(String),

    /// The author's team has no active member other than the author
    #[error("not enough active reviewers in team '{0}'")]
    NotEnoughReviewers(String),

    /// The pull request is merged and can no longer change
    #[error("pull request '{0}' is already merged")]
    PrAlreadyMerged(String),

    /// The user is not a reviewer of the pull request
    #[error("user '{user_id}' is not assigned as reviewer of pull request '{pr_id}'")]
    ReviewerNotAssigned { pr_id: String, user_id: String },

    /// Nobody in the reviewer's team can take over
    #[error("no active replacement candidate in team '{team_name}' for pull request '{pr_id}'")]
    NoReplacementCandidate { pr_id: String, team_name: String },

    /// The reviewer relation changed between reading and replacing it
    #[error("reviewer '{user_id}' of pull request '{pr_id}' changed concurrently")]
    StaleAssignment { pr_id: String, user_id: String },

    /// Malformed request data
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Persistence failure that is not a business rule violation
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
