//! In-memory implementation of `Store`.
//!
//! All state is held in memory and lost on restart. Each operation runs
//! under a single lock acquisition, which gives the same atomicity the
//! SQLite backend gets from transactions and conditional updates.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{PrStatus, PullRequest, PullRequestShort, Team, TeamMember, User};
use crate::store::{Entity, ReviewCounts, Store, StoreError};

#[derive(Debug, Default)]
struct State {
    /// Team name -> member user IDs in roster order
    teams: HashMap<String, Vec<String>>,
    users: HashMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
}

/// In-memory store backed by a `RwLock`
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_team(&self, team: &Team) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        if state.teams.contains_key(&team.team_name) {
            return Err(StoreError::AlreadyExists(Entity::Team));
        }

        // Validate every member before touching anything
        let mut seen = Vec::with_capacity(team.members.len());
        for member in &team.members {
            if state.users.contains_key(&member.user_id) || seen.contains(&&member.user_id) {
                return Err(StoreError::AlreadyExists(Entity::User));
            }
            seen.push(&member.user_id);
        }

        for member in &team.members {
            state.users.insert(
                member.user_id.clone(),
                User {
                    user_id: member.user_id.clone(),
                    username: member.username.clone(),
                    team_name: team.team_name.clone(),
                    is_active: member.is_active,
                },
            );
        }
        state.teams.insert(
            team.team_name.clone(),
            team.members.iter().map(|m| m.user_id.clone()).collect(),
        );

        Ok(())
    }

    async fn get_team(&self, team_name: &str) -> Result<Team, StoreError> {
        let state = self.state.read().await;
        let roster = state
            .teams
            .get(team_name)
            .ok_or(StoreError::NotFound(Entity::Team))?;

        let members = roster
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|u| TeamMember {
                user_id: u.user_id.clone(),
                username: u.username.clone(),
                is_active: u.is_active,
            })
            .collect();

        Ok(Team::new(team_name, members))
    }

    async fn get_user(&self, user_id: &str) -> Result<User, StoreError> {
        let state = self.state.read().await;
        state
            .users
            .get(user_id)
            .cloned()
            .ok_or(StoreError::NotFound(Entity::User))
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or(StoreError::NotFound(Entity::User))?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        if state.pull_requests.contains_key(&pr.pull_request_id) {
            return Err(StoreError::AlreadyExists(Entity::PullRequest));
        }
        let referenced = std::iter::once(&pr.author_id).chain(&pr.assigned_reviewers);
        for user_id in referenced {
            if !state.users.contains_key(user_id) {
                return Err(StoreError::NotFound(Entity::User));
            }
        }

        let mut stored = pr.clone();
        stored.status = PrStatus::Open;
        stored.merged_at = None;
        if stored.created_at.is_none() {
            stored.created_at = Some(Utc::now());
        }
        state
            .pull_requests
            .insert(pr.pull_request_id.clone(), stored);

        Ok(())
    }

    async fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest, StoreError> {
        let state = self.state.read().await;
        state
            .pull_requests
            .get(pr_id)
            .cloned()
            .ok_or(StoreError::NotFound(Entity::PullRequest))
    }

    async fn merge_pull_request(&self, pr_id: &str) -> Result<PullRequest, StoreError> {
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(pr_id)
            .ok_or(StoreError::NotFound(Entity::PullRequest))?;

        if pr.status != PrStatus::Open {
            return Err(StoreError::Conflict);
        }
        pr.status = PrStatus::Merged;
        pr.merged_at = Some(Utc::now());

        Ok(pr.clone())
    }

    async fn replace_reviewer(
        &self,
        pr_id: &str,
        old_reviewer: &str,
        new_reviewer: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(new_reviewer) {
            return Err(StoreError::NotFound(Entity::User));
        }

        let pr = state
            .pull_requests
            .get_mut(pr_id)
            .ok_or(StoreError::NotFound(Entity::PullRequest))?;
        if pr.is_merged() {
            return Err(StoreError::Conflict);
        }

        let slot = pr
            .assigned_reviewers
            .iter()
            .position(|r| r == old_reviewer)
            .ok_or(StoreError::Conflict)?;
        if pr.has_reviewer(new_reviewer) {
            return Err(StoreError::AlreadyExists(Entity::Reviewer));
        }
        pr.assigned_reviewers[slot] = new_reviewer.to_string();

        Ok(())
    }

    async fn get_reviews_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<PullRequestShort>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .map(PullRequest::short)
            .collect())
    }

    async fn review_counts(&self) -> Result<ReviewCounts, StoreError> {
        let state = self.state.read().await;

        let mut counts = ReviewCounts::default();
        for pr in state.pull_requests.values() {
            if pr.assigned_reviewers.is_empty() {
                continue;
            }
            counts.by_pull_request.insert(
                pr.pull_request_id.clone(),
                pr.assigned_reviewers.len() as u64,
            );
            for reviewer in &pr.assigned_reviewers {
                *counts.by_reviewer.entry(reviewer.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
