//! `Store` implementation backed by SQLite

use assigner_core::{
    PullRequest, PullRequestShort, ReviewCounts, Store, StoreError, Team, User,
};
use async_trait::async_trait;

use crate::repos::{PullRequestRepository, StatsRepository, TeamRepository, UserRepository};
use crate::Database;

/// Persistent store for the assignment service
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn teams(&self) -> TeamRepository<'_> {
        TeamRepository::new(self.db.pool())
    }

    fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.db.pool())
    }

    fn pull_requests(&self) -> PullRequestRepository<'_> {
        PullRequestRepository::new(self.db.pool())
    }

    fn stats(&self) -> StatsRepository<'_> {
        StatsRepository::new(self.db.pool())
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_team(&self, team: &Team) -> Result<(), StoreError> {
        self.teams().create(team).await
    }

    async fn get_team(&self, team_name: &str) -> Result<Team, StoreError> {
        self.teams().get(team_name).await
    }

    async fn get_user(&self, user_id: &str) -> Result<User, StoreError> {
        self.users().get(user_id).await
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        self.users().set_active(user_id, is_active).await
    }

    async fn create_pull_request(&self, pr: &PullRequest) -> Result<(), StoreError> {
        self.pull_requests().create(pr).await
    }

    async fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest, StoreError> {
        self.pull_requests().get(pr_id).await
    }

    async fn merge_pull_request(&self, pr_id: &str) -> Result<PullRequest, StoreError> {
        self.pull_requests().merge(pr_id).await
    }

    async fn replace_reviewer(
        &self,
        pr_id: &str,
        old_reviewer: &str,
        new_reviewer: &str,
    ) -> Result<(), StoreError> {
        self.pull_requests()
            .replace_reviewer(pr_id, old_reviewer, new_reviewer)
            .await
    }

    async fn get_reviews_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<PullRequestShort>, StoreError> {
        self.pull_requests().reviews_for_user(user_id).await
    }

    async fn review_counts(&self) -> Result<ReviewCounts, StoreError> {
        self.stats().counts().await
    }
}
