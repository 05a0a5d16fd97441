//! User repository

use assigner_core::{Entity, StoreError, User};
use sqlx::SqlitePool;

use crate::error::{lookup_error, Error};

type UserRow = (String, String, String, bool);

fn into_user((user_id, username, team_name, is_active): UserRow) -> User {
    User {
        user_id,
        username,
        team_name,
        is_active,
    }
}

/// Repository for user records
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, team_name, active FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
            .map(into_user)
            .map_err(|e| lookup_error(e, Entity::User))
    }

    /// Set the active flag, returning the updated user
    pub async fn set_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET active = ?
            WHERE id = ?
            RETURNING id, name, team_name, active
            "#,
        )
        .bind(is_active)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .map_err(Error::from)?;

        row.map(into_user).ok_or(StoreError::NotFound(Entity::User))
    }
}
