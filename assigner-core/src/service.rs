//! Assignment service
//!
//! Team, user and pull request lifecycle plus the reviewer assignment
//! rules. The service keeps no state of its own: it validates a request,
//! reads what it needs from the `Store`, computes the decision and writes
//! it back. Concurrency safety comes from the store's atomic and
//! conditional writes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{PullRequest, Reassignment, ReviewStats, Team, User, UserReviews};
use crate::selection::{select_replacement, select_reviewers, REVIEWERS_PER_PR};
use crate::store::{Entity, Store, StoreError};
use crate::{Error, Result};

/// Reviewer assignment engine
#[derive(Clone)]
pub struct AssignmentService {
    store: Arc<dyn Store>,
}

impl AssignmentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a team together with its members.
    ///
    /// Team and members are written atomically; on any failure nothing is
    /// stored.
    pub async fn create_team(&self, team: Team) -> Result<Team> {
        info!(team_name = %team.team_name, members = team.members.len(), "Creating team");

        validate_team(&team)?;

        match self.store.create_team(&team).await {
            Ok(()) => Ok(team),
            Err(StoreError::AlreadyExists(Entity::Team)) => {
                Err(Error::TeamAlreadyExists(team.team_name))
            }
            Err(StoreError::AlreadyExists(Entity::User)) => {
                Err(Error::UserAlreadyExists(self.taken_member(&team).await))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_team(&self, team_name: &str) -> Result<Team> {
        debug!(team_name, "Fetching team");
        self.load_team(team_name).await
    }

    /// Flip a user's reviewer eligibility.
    ///
    /// Existing assignments are left untouched.
    pub async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        info!(user_id, is_active, "Setting user active flag");

        self.store
            .set_user_active(user_id, is_active)
            .await
            .map_err(|e| not_found_as(e, Entity::User, || Error::UserNotFound(user_id.to_string())))
    }

    /// Open a pull request and assign reviewers from the author's team.
    ///
    /// Up to two active team members other than the author are picked in
    /// roster order. At least one is required.
    pub async fn create_pull_request(
        &self,
        pr_id: &str,
        title: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        info!(pr_id, author_id, "Creating pull request");

        if pr_id.trim().is_empty() {
            return Err(Error::InvalidInput("pull_request_id must not be empty".to_string()));
        }

        match self.store.get_pull_request(pr_id).await {
            Ok(_) => return Err(Error::PrAlreadyExists(pr_id.to_string())),
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let author = self.load_user(author_id).await?;
        let team = self.load_team(&author.team_name).await?;

        let reviewers = select_reviewers(&team.members, author_id, REVIEWERS_PER_PR);
        if reviewers.is_empty() {
            warn!(pr_id, team_name = %team.team_name, "No eligible reviewers");
            return Err(Error::NotEnoughReviewers(team.team_name));
        }

        let mut pr = PullRequest::new(pr_id, title, author_id);
        pr.assigned_reviewers = reviewers;
        pr.created_at = Some(Utc::now());

        self.store.create_pull_request(&pr).await.map_err(|e| match e {
            StoreError::AlreadyExists(Entity::PullRequest) => Error::PrAlreadyExists(pr_id.to_string()),
            e => e.into(),
        })?;

        info!(
            pr_id,
            reviewers_count = pr.assigned_reviewers.len(),
            reviewers = ?pr.assigned_reviewers,
            "Created pull request"
        );

        Ok(pr)
    }

    /// Mark an open pull request as merged.
    ///
    /// Concurrent merges of the same pull request produce exactly one
    /// success; the others fail with `PrAlreadyMerged`.
    pub async fn merge_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
        info!(pr_id, "Merging pull request");

        let pr = self.load_pull_request(pr_id).await?;
        if pr.is_merged() {
            return Err(Error::PrAlreadyMerged(pr_id.to_string()));
        }

        self.store.merge_pull_request(pr_id).await.map_err(|e| match e {
            StoreError::Conflict => Error::PrAlreadyMerged(pr_id.to_string()),
            StoreError::NotFound(_) => Error::PrNotFound(pr_id.to_string()),
            e => e.into(),
        })
    }

    /// Replace a reviewer on an open pull request.
    ///
    /// The replacement is the first member of the old reviewer's team that
    /// is active, is not the old reviewer, is not the author and does not
    /// already review the pull request.
    pub async fn reassign_reviewer(&self, pr_id: &str, old_reviewer: &str) -> Result<Reassignment> {
        info!(pr_id, old_reviewer, "Reassigning reviewer");

        let pr = self.load_pull_request(pr_id).await?;
        if pr.is_merged() {
            return Err(Error::PrAlreadyMerged(pr_id.to_string()));
        }

        let user = self.load_user(old_reviewer).await?;
        if !pr.has_reviewer(&user.user_id) {
            return Err(Error::ReviewerNotAssigned {
                pr_id: pr_id.to_string(),
                user_id: old_reviewer.to_string(),
            });
        }

        let team = self.load_team(&user.team_name).await?;
        let new_reviewer = match select_replacement(&team.members, &pr, old_reviewer) {
            Some(member) => member.user_id.clone(),
            None => {
                warn!(pr_id, team_name = %team.team_name, "No replacement candidate");
                return Err(Error::NoReplacementCandidate {
                    pr_id: pr_id.to_string(),
                    team_name: team.team_name,
                });
            }
        };

        match self
            .store
            .replace_reviewer(pr_id, old_reviewer, &new_reviewer)
            .await
        {
            Ok(()) => {}
            // The old row vanished, the candidate got assigned, or the PR was merged meanwhile
            Err(StoreError::Conflict | StoreError::AlreadyExists(Entity::Reviewer)) => {
                if self.load_pull_request(pr_id).await?.is_merged() {
                    warn!(pr_id, old_reviewer, "Pull request merged during reassignment");
                    return Err(Error::PrAlreadyMerged(pr_id.to_string()));
                }
                return Err(Error::StaleAssignment {
                    pr_id: pr_id.to_string(),
                    user_id: old_reviewer.to_string(),
                });
            }
            Err(StoreError::NotFound(Entity::PullRequest)) => {
                return Err(Error::PrNotFound(pr_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        let pull_request = self.load_pull_request(pr_id).await?;

        info!(
            pr_id,
            old_reviewer,
            new_reviewer = %new_reviewer,
            "Reassigned reviewer"
        );

        Ok(Reassignment {
            pull_request,
            replaced_by: new_reviewer,
        })
    }

    /// Pull requests the user currently reviews.
    pub async fn get_reviews_for_user(&self, user_id: &str) -> Result<UserReviews> {
        debug!(user_id, "Fetching reviews for user");

        self.load_user(user_id).await?;

        let mut seen = HashSet::new();
        let pull_requests = self
            .store
            .get_reviews_for_user(user_id)
            .await?
            .into_iter()
            .filter(|pr| seen.insert(pr.pull_request_id.clone()))
            .collect();

        Ok(UserReviews {
            user_id: user_id.to_string(),
            pull_requests,
        })
    }

    /// Review load snapshot, recomputed on every call.
    pub async fn get_stats(&self) -> Result<ReviewStats> {
        let counts = self.store.review_counts().await?;
        Ok(ReviewStats::from_counts(counts.by_reviewer, counts.by_pull_request))
    }

    async fn load_user(&self, user_id: &str) -> Result<User> {
        self.store
            .get_user(user_id)
            .await
            .map_err(|e| not_found_as(e, Entity::User, || Error::UserNotFound(user_id.to_string())))
    }

    async fn load_team(&self, team_name: &str) -> Result<Team> {
        self.store
            .get_team(team_name)
            .await
            .map_err(|e| not_found_as(e, Entity::Team, || Error::TeamNotFound(team_name.to_string())))
    }

    async fn load_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
        self.store.get_pull_request(pr_id).await.map_err(|e| {
            not_found_as(e, Entity::PullRequest, || Error::PrNotFound(pr_id.to_string()))
        })
    }

    /// Find the member whose ID is already registered, for error reporting.
    ///
    /// Falls back to listing every member when none can be pinned down.
    async fn taken_member(&self, team: &Team) -> String {
        for member in &team.members {
            if self.store.get_user(&member.user_id).await.is_ok() {
                return member.user_id.clone();
            }
        }

        team.members
            .iter()
            .map(|m| m.user_id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn not_found_as(err: StoreError, entity: Entity, to_error: impl FnOnce() -> Error) -> Error {
    match err {
        StoreError::NotFound(e) if e == entity => to_error(),
        e => e.into(),
    }
}

fn validate_team(team: &Team) -> Result<()> {
    if team.team_name.trim().is_empty() {
        return Err(Error::InvalidInput("team_name must not be empty".to_string()));
    }

    let mut ids = HashSet::new();
    for member in &team.members {
        if member.user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id must not be empty".to_string()));
        }
        if !ids.insert(member.user_id.as_str()) {
            return Err(Error::InvalidInput(format!(
                "user '{}' is listed twice",
                member.user_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{PrStatus, PullRequestShort, TeamMember};
    use async_trait::async_trait;
    use crate::store::ReviewCounts;

    fn service() -> AssignmentService {
        AssignmentService::new(Arc::new(MemoryStore::new()))
    }

    /// `[A(active), B(inactive), C(active), D(active)]`
    fn abcd() -> Team {
        Team::new(
            "backend",
            vec![
                TeamMember::new("a", "Alice"),
                TeamMember::new("b", "Bob").inactive(),
                TeamMember::new("c", "Carol"),
                TeamMember::new("d", "Dave"),
            ],
        )
    }

    async fn service_with(team: Team) -> AssignmentService {
        let service = service();
        service.create_team(team).await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_create_and_get_team() {
        let service = service_with(abcd()).await;

        let team = service.get_team("backend").await.unwrap();
        assert_eq!(team, abcd());
    }

    #[tokio::test]
    async fn test_get_unknown_team() {
        let err = service().get_team("nope").await.unwrap_err();
        assert!(matches!(err, Error::TeamNotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_duplicate_team_leaves_first_unchanged() {
        let service = service_with(abcd()).await;

        let other = Team::new("backend", vec![TeamMember::new("z", "Zed")]);
        let err = service.create_team(other).await.unwrap_err();
        assert!(matches!(err, Error::TeamAlreadyExists(_)));

        assert_eq!(service.get_team("backend").await.unwrap(), abcd());
        assert!(matches!(
            service.set_user_active("z", true).await.unwrap_err(),
            Error::UserNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_member_of_another_team_is_rejected() {
        let service = service_with(abcd()).await;

        let other = Team::new(
            "frontend",
            vec![TeamMember::new("x", "Xena"), TeamMember::new("c", "Carol")],
        );
        let err = service.create_team(other).await.unwrap_err();
        assert!(matches!(err, Error::UserAlreadyExists(id) if id == "c"));
        assert!(matches!(
            service.get_team("frontend").await.unwrap_err(),
            Error::TeamNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_invalid_team_input() {
        let service = service();

        let err = service.create_team(Team::new(" ", vec![])).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let twice = Team::new(
            "backend",
            vec![TeamMember::new("a", "Alice"), TeamMember::new("a", "Alias")],
        );
        let err = service.create_team(twice).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_selection_order_is_deterministic() {
        let service = service_with(abcd()).await;

        let pr = service
            .create_pull_request("pr-1", "Add search", "a")
            .await
            .unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["c", "d"]);
        assert_eq!(pr.status, PrStatus::Open);
        assert!(pr.created_at.is_some());
    }

    #[tokio::test]
    async fn test_author_never_reviews_own_pr() {
        let service = service_with(abcd()).await;

        for (i, author) in ["a", "c", "d"].iter().enumerate() {
            let pr = service
                .create_pull_request(&format!("pr-{}", i), "Title", author)
                .await
                .unwrap();
            assert!(!pr.has_reviewer(author));

            let distinct: HashSet<_> = pr.assigned_reviewers.iter().collect();
            assert_eq!(distinct.len(), pr.assigned_reviewers.len());
        }
    }

    #[tokio::test]
    async fn test_single_eligible_reviewer_is_accepted() {
        let team = Team::new(
            "pair",
            vec![TeamMember::new("a", "Alice"), TeamMember::new("b", "Bob")],
        );
        let service = service_with(team).await;

        let pr = service.create_pull_request("pr-1", "Title", "a").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["b"]);
    }

    #[tokio::test]
    async fn test_not_enough_reviewers_creates_nothing() {
        let team = Team::new(
            "solo",
            vec![
                TeamMember::new("a", "Alice"),
                TeamMember::new("b", "Bob").inactive(),
            ],
        );
        let service = service_with(team).await;

        let err = service
            .create_pull_request("pr-1", "Title", "a")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotEnoughReviewers(team) if team == "solo"));

        let err = service.merge_pull_request("pr-1").await.unwrap_err();
        assert!(matches!(err, Error::PrNotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_pr_and_unknown_author() {
        let service = service_with(abcd()).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let err = service
            .create_pull_request("pr-1", "Again", "c")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PrAlreadyExists(_)));

        let err = service
            .create_pull_request("pr-2", "Title", "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_deactivated_user_is_not_selected() {
        let service = service_with(abcd()).await;

        let user = service.set_user_active("c", false).await.unwrap();
        assert!(!user.is_active);
        assert_eq!(user.team_name, "backend");

        let pr = service.create_pull_request("pr-1", "Title", "a").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["d"]);
    }

    #[tokio::test]
    async fn test_deactivation_keeps_existing_assignments() {
        let service = service_with(abcd()).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        service.set_user_active("c", false).await.unwrap();

        let reviews = service.get_reviews_for_user("c").await.unwrap();
        assert_eq!(reviews.pull_requests.len(), 1);
    }

    #[tokio::test]
    async fn test_merge_then_merge_again() {
        let service = service_with(abcd()).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let merged = service.merge_pull_request("pr-1").await.unwrap();
        assert_eq!(merged.status, PrStatus::Merged);
        assert_eq!(merged.assigned_reviewers, vec!["c", "d"]);
        assert!(merged.merged_at.is_some());

        let err = service.merge_pull_request("pr-1").await.unwrap_err();
        assert!(matches!(err, Error::PrAlreadyMerged(_)));

        let err = service.merge_pull_request("pr-404").await.unwrap_err();
        assert!(matches!(err, Error::PrNotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_merges_single_winner() {
        let service = service_with(abcd()).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.merge_pull_request("pr-1").await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(Error::PrAlreadyMerged(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_reassign_replaces_only_target() {
        let mut team = abcd();
        team.members.push(TeamMember::new("e", "Erin"));
        let service = service_with(team).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let result = service.reassign_reviewer("pr-1", "c").await.unwrap();
        assert_eq!(result.replaced_by, "e");
        assert_eq!(result.pull_request.assigned_reviewers, vec!["e", "d"]);

        let team = service.get_team("backend").await.unwrap();
        let member = team
            .members
            .iter()
            .find(|m| m.user_id == result.replaced_by)
            .unwrap();
        assert!(member.is_active);
        assert_ne!(member.user_id, result.pull_request.author_id);
    }

    #[tokio::test]
    async fn test_reassign_not_assigned() {
        let service = service_with(abcd()).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let err = service.reassign_reviewer("pr-1", "b").await.unwrap_err();
        assert!(matches!(err, Error::ReviewerNotAssigned { user_id, .. } if user_id == "b"));

        let err = service.reassign_reviewer("pr-1", "ghost").await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));

        let err = service.reassign_reviewer("pr-404", "c").await.unwrap_err();
        assert!(matches!(err, Error::PrNotFound(_)));
    }

    #[tokio::test]
    async fn test_reassign_on_merged_pr() {
        let mut team = abcd();
        team.members.push(TeamMember::new("e", "Erin"));
        let service = service_with(team).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();
        service.merge_pull_request("pr-1").await.unwrap();

        let err = service.reassign_reviewer("pr-1", "c").await.unwrap_err();
        assert!(matches!(err, Error::PrAlreadyMerged(_)));

        let reviews = service.get_reviews_for_user("c").await.unwrap();
        assert_eq!(reviews.pull_requests[0].status, PrStatus::Merged);
    }

    #[tokio::test]
    async fn test_reassign_without_candidate_keeps_reviewer() {
        let service = service_with(abcd()).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let err = service.reassign_reviewer("pr-1", "c").await.unwrap_err();
        assert!(matches!(err, Error::NoReplacementCandidate { .. }));

        let reviews = service.get_reviews_for_user("c").await.unwrap();
        assert_eq!(reviews.pull_requests.len(), 1);
        assert_eq!(reviews.pull_requests[0].pull_request_id, "pr-1");
    }

    #[tokio::test]
    async fn test_reviews_for_unknown_user() {
        let err = service().get_reviews_for_user("ghost").await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_stats_are_consistent() {
        let mut team = abcd();
        team.members.push(TeamMember::new("e", "Erin"));
        let service = service_with(team).await;

        service.create_pull_request("pr-1", "One", "a").await.unwrap();
        service.create_pull_request("pr-2", "Two", "c").await.unwrap();
        service.create_pull_request("pr-3", "Three", "e").await.unwrap();
        service.reassign_reviewer("pr-1", "c").await.unwrap();

        let stats = service.get_stats().await.unwrap();
        let by_user: u64 = stats.user_assignments.values().sum();
        let by_pr: u64 = stats.pr_reviewer_counts.values().sum();
        assert_eq!(by_user, by_pr);
        assert_eq!(stats.total_assignments, 6);
        assert_eq!(stats.prs_with_reviewers, 3);
        assert_eq!(
            stats.reviewers_with_assignments,
            stats.user_assignments.len() as u64
        );
    }

    #[tokio::test]
    async fn test_reassigned_reviewers_stay_distinct() {
        let mut team = abcd();
        team.members.push(TeamMember::new("e", "Erin"));
        let service = service_with(team).await;
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();

        let result = service.reassign_reviewer("pr-1", "d").await.unwrap();
        let distinct: HashSet<_> = result.pull_request.assigned_reviewers.iter().collect();
        assert_eq!(distinct.len(), 2);
        assert!(!result.pull_request.has_reviewer("d"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stats_stay_consistent_during_writes() {
        let service = service_with(abcd()).await;

        let writers: Vec<_> = (0..2)
            .map(|w| {
                let service = service.clone();
                tokio::spawn(async move {
                    for i in 0..200 {
                        service
                            .create_pull_request(&format!("pr-{}-{}", w, i), "Title", "a")
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();

        while writers.iter().any(|w| !w.is_finished()) {
            let stats = service.get_stats().await.unwrap();
            let by_pr: u64 = stats.pr_reviewer_counts.values().sum();
            assert_eq!(stats.total_assignments, by_pr);
            assert_eq!(stats.total_assignments, 2 * stats.prs_with_reviewers);
            tokio::task::yield_now().await;
        }
        for writer in writers {
            writer.await.unwrap();
        }

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.total_assignments, 800);
    }

    /// How `RacingStore` interferes with the wrapped store
    #[derive(Clone, Copy)]
    enum Race {
        /// Every replacement finds its reviewer row gone
        StaleRow,
        /// The pull request is merged right before the replacement
        MergeFirst,
        /// Team inserts report a taken member ID without naming it
        TakenMember,
    }

    /// Delegates to a `MemoryStore`, losing the race described by `race`.
    struct RacingStore {
        inner: MemoryStore,
        race: Race,
    }

    #[async_trait]
    impl Store for RacingStore {
        async fn create_team(&self, team: &Team) -> std::result::Result<(), StoreError> {
            match self.race {
                Race::TakenMember => Err(StoreError::AlreadyExists(Entity::User)),
                _ => self.inner.create_team(team).await,
            }
        }
        async fn get_team(&self, team_name: &str) -> std::result::Result<Team, StoreError> {
            self.inner.get_team(team_name).await
        }
        async fn get_user(&self, user_id: &str) -> std::result::Result<User, StoreError> {
            self.inner.get_user(user_id).await
        }
        async fn set_user_active(
            &self,
            user_id: &str,
            is_active: bool,
        ) -> std::result::Result<User, StoreError> {
            self.inner.set_user_active(user_id, is_active).await
        }
        async fn create_pull_request(&self, pr: &PullRequest) -> std::result::Result<(), StoreError> {
            self.inner.create_pull_request(pr).await
        }
        async fn get_pull_request(&self, pr_id: &str) -> std::result::Result<PullRequest, StoreError> {
            self.inner.get_pull_request(pr_id).await
        }
        async fn merge_pull_request(
            &self,
            pr_id: &str,
        ) -> std::result::Result<PullRequest, StoreError> {
            self.inner.merge_pull_request(pr_id).await
        }
        async fn replace_reviewer(
            &self,
            pr_id: &str,
            old_reviewer: &str,
            new_reviewer: &str,
        ) -> std::result::Result<(), StoreError> {
            match self.race {
                Race::StaleRow => Err(StoreError::Conflict),
                Race::MergeFirst => {
                    self.inner.merge_pull_request(pr_id).await?;
                    self.inner
                        .replace_reviewer(pr_id, old_reviewer, new_reviewer)
                        .await
                }
                Race::TakenMember => {
                    self.inner
                        .replace_reviewer(pr_id, old_reviewer, new_reviewer)
                        .await
                }
            }
        }
        async fn get_reviews_for_user(
            &self,
            user_id: &str,
        ) -> std::result::Result<Vec<PullRequestShort>, StoreError> {
            self.inner.get_reviews_for_user(user_id).await
        }
        async fn review_counts(&self) -> std::result::Result<ReviewCounts, StoreError> {
            self.inner.review_counts().await
        }
    }

    async fn racing_service(race: Race) -> AssignmentService {
        let inner = MemoryStore::new();
        let mut team = abcd();
        team.members.push(TeamMember::new("e", "Erin"));
        inner.create_team(&team).await.unwrap();

        let service = AssignmentService::new(Arc::new(RacingStore { inner, race }));
        service.create_pull_request("pr-1", "Title", "a").await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_lost_replacement_race_is_reported() {
        let service = racing_service(Race::StaleRow).await;

        let err = service.reassign_reviewer("pr-1", "c").await.unwrap_err();
        assert!(matches!(err, Error::StaleAssignment { user_id, .. } if user_id == "c"));
    }

    #[tokio::test]
    async fn test_merge_during_reassignment_reports_merged() {
        let service = racing_service(Race::MergeFirst).await;

        let err = service.reassign_reviewer("pr-1", "c").await.unwrap_err();
        assert!(matches!(err, Error::PrAlreadyMerged(id) if id == "pr-1"));

        let pr = service.merge_pull_request("pr-1").await.unwrap_err();
        assert!(matches!(pr, Error::PrAlreadyMerged(_)));
        let reviews = service.get_reviews_for_user("c").await.unwrap();
        assert_eq!(reviews.pull_requests.len(), 1);
    }

    #[tokio::test]
    async fn test_unidentified_member_collision_names_the_team_members() {
        let service = racing_service(Race::TakenMember).await;

        let team = Team::new(
            "frontend",
            vec![TeamMember::new("x", "Xena"), TeamMember::new("y", "Yuri")],
        );
        let err = service.create_team(team).await.unwrap_err();
        assert!(matches!(err, Error::UserAlreadyExists(ref ids) if ids == "x, y"));
        assert!(!err.to_string().contains("''"));
    }
}
