//! Pull request repository: pull requests and their reviewer rows

use assigner_core::{Entity, PrStatus, PullRequest, PullRequestShort, StoreError};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{insert_error, lookup_error, Error};

type PullRequestRow = (
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn parse_status(status: &str) -> Result<PrStatus, Error> {
    status
        .parse()
        .map_err(|_| Error::InvalidData(format!("pull request status '{}'", status)))
}

/// Repository for pull requests
pub struct PullRequestRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PullRequestRepository<'a> {
    /// Create a new pull request repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pull request and its reviewers in one transaction
    pub async fn create(&self, pr: &PullRequest) -> Result<(), StoreError> {
        let created_at = pr.created_at.unwrap_or_else(Utc::now);
        let mut tx = self.pool.begin().await.map_err(Error::from)?;

        sqlx::query(
            r#"
            INSERT INTO pull_requests (id, title, author_id, status, created_at, merged_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pr.pull_request_id)
        .bind(&pr.pull_request_name)
        .bind(&pr.author_id)
        .bind(pr.status.as_str())
        .bind(created_at)
        .bind(pr.merged_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_error(e, Entity::PullRequest))?;

        for (slot, reviewer_id) in pr.assigned_reviewers.iter().enumerate() {
            sqlx::query("INSERT INTO pr_reviewers (pr_id, reviewer_id, slot) VALUES (?, ?, ?)")
                .bind(&pr.pull_request_id)
                .bind(reviewer_id)
                .bind(slot as i64)
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_error(e, Entity::Reviewer))?;
        }

        tx.commit().await.map_err(Error::from)?;

        tracing::debug!(
            pr_id = %pr.pull_request_id,
            reviewers = pr.assigned_reviewers.len(),
            "Stored pull request"
        );
        Ok(())
    }

    /// Get a pull request with reviewers in assignment order
    pub async fn get(&self, pr_id: &str) -> Result<PullRequest, StoreError> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT id, title, author_id, status, created_at, merged_at
            FROM pull_requests WHERE id = ?
            "#,
        )
        .bind(pr_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| lookup_error(e, Entity::PullRequest))?;

        self.with_reviewers(row).await
    }

    /// Mark an open pull request as merged
    ///
    /// The status check and the update are one statement, so concurrent
    /// merges of the same pull request see exactly one success.
    pub async fn merge(&self, pr_id: &str) -> Result<PullRequest, StoreError> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            UPDATE pull_requests SET status = 'MERGED', merged_at = ?
            WHERE id = ? AND status = 'OPEN'
            RETURNING id, title, author_id, status, created_at, merged_at
            "#,
        )
        .bind(Utc::now())
        .bind(pr_id)
        .fetch_optional(self.pool)
        .await
        .map_err(Error::from)?;

        match row {
            Some(row) => self.with_reviewers(row).await,
            None => {
                // Either missing or no longer open
                self.get(pr_id).await?;
                Err(StoreError::Conflict)
            }
        }
    }

    /// Swap one reviewer for another, keeping the slot
    pub async fn replace_reviewer(
        &self,
        pr_id: &str,
        old_reviewer: &str,
        new_reviewer: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE pr_reviewers SET reviewer_id = ?
            WHERE pr_id = ? AND reviewer_id = ?
              AND EXISTS (
                SELECT 1 FROM pull_requests
                WHERE id = pr_reviewers.pr_id AND status = 'OPEN'
              )
            "#,
        )
        .bind(new_reviewer)
        .bind(pr_id)
        .bind(old_reviewer)
        .execute(self.pool)
        .await
        .map_err(|e| insert_error(e, Entity::Reviewer))?;

        if result.rows_affected() == 0 {
            self.get(pr_id).await?;
            return Err(StoreError::Conflict);
        }

        tracing::debug!(pr_id, old_reviewer, new_reviewer, "Replaced reviewer");
        Ok(())
    }

    /// Pull requests the user is a reviewer of
    pub async fn reviews_for_user(&self, user_id: &str) -> Result<Vec<PullRequestShort>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String, String)>(
            r#"
            SELECT p.id, p.title, p.author_id, p.status
            FROM pull_requests p
            JOIN pr_reviewers r ON r.pr_id = p.id
            WHERE r.reviewer_id = ?
            ORDER BY p.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(Error::from)?;

        let mut prs = Vec::with_capacity(rows.len());
        for (pull_request_id, pull_request_name, author_id, status) in rows {
            prs.push(PullRequestShort {
                pull_request_id,
                pull_request_name,
                author_id,
                status: parse_status(&status)?,
            });
        }
        Ok(prs)
    }

    async fn with_reviewers(&self, row: PullRequestRow) -> Result<PullRequest, StoreError> {
        let (pull_request_id, pull_request_name, author_id, status, created_at, merged_at) = row;

        let reviewers: Vec<(String,)> = sqlx::query_as(
            "SELECT reviewer_id FROM pr_reviewers WHERE pr_id = ? ORDER BY slot ASC",
        )
        .bind(&pull_request_id)
        .fetch_all(self.pool)
        .await
        .map_err(Error::from)?;

        Ok(PullRequest {
            pull_request_id,
            pull_request_name,
            author_id,
            status: parse_status(&status)?,
            assigned_reviewers: reviewers.into_iter().map(|(id,)| id).collect(),
            created_at: Some(created_at),
            merged_at,
        })
    }
}
