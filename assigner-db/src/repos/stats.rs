//! Aggregate queries over reviewer assignments

use std::collections::BTreeMap;

use assigner_core::{ReviewCounts, StoreError};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::Error;

/// Read-only counts over `pr_reviewers`
pub struct StatsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Reviewer and pull request groupings from one read transaction
    pub async fn counts(&self) -> Result<ReviewCounts, StoreError> {
        let mut tx = self.pool.begin().await.map_err(Error::from)?;

        let by_reviewer = grouped(
            &mut tx,
            "SELECT reviewer_id, COUNT(*) FROM pr_reviewers GROUP BY reviewer_id",
        )
        .await?;
        let by_pull_request = grouped(
            &mut tx,
            "SELECT pr_id, COUNT(*) FROM pr_reviewers GROUP BY pr_id",
        )
        .await?;

        tx.commit().await.map_err(Error::from)?;

        Ok(ReviewCounts {
            by_reviewer,
            by_pull_request,
        })
    }
}

async fn grouped(
    tx: &mut Transaction<'_, Sqlite>,
    sql: &str,
) -> Result<BTreeMap<String, u64>, StoreError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(sql)
        .fetch_all(&mut **tx)
        .await
        .map_err(Error::from)?;

    Ok(rows
        .into_iter()
        .map(|(key, count)| (key, count.max(0) as u64))
        .collect())
}
