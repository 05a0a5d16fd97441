//! Reviewer selection logic
//!
//! Both selections scan the team roster in stored order and take the first
//! eligible members. Nothing here depends on current review load.

use crate::models::{PullRequest, TeamMember};

/// Number of reviewers a new pull request asks for
pub const REVIEWERS_PER_PR: usize = 2;

/// Pick reviewers for a new pull request.
///
/// Returns up to `limit` active members other than the author, in roster
/// order. The result may be shorter than `limit` (or empty) when the team
/// does not have enough eligible members.
pub fn select_reviewers(members: &[TeamMember], author_id: &str, limit: usize) -> Vec<String> {
    members
        .iter()
        .filter(|m| m.is_active && m.user_id != author_id)
        .take(limit)
        .map(|m| m.user_id.clone())
        .collect()
}

/// Pick a replacement for `old_reviewer` on `pr`.
///
/// The candidate must be active, must not be the reviewer being replaced,
/// the author, or anyone already reviewing the pull request.
pub fn select_replacement<'a>(
    members: &'a [TeamMember],
    pr: &PullRequest,
    old_reviewer: &str,
) -> Option<&'a TeamMember> {
    members.iter().find(|m| {
        m.is_active
            && m.user_id != old_reviewer
            && m.user_id != pr.author_id
            && !pr.has_reviewer(&m.user_id)
    })
}
