//! Team repository: teams and their rosters

use assigner_core::{Entity, StoreError, Team, TeamMember};
use sqlx::SqlitePool;

use crate::error::{insert_error, Error};

/// Repository for teams and their members
pub struct TeamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TeamRepository<'a> {
    /// Create a new team repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a team and all of its members in one transaction
    pub async fn create(&self, team: &Team) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(Error::from)?;

        sqlx::query("INSERT INTO teams (name) VALUES (?)")
            .bind(&team.team_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_error(e, Entity::Team))?;

        for (position, member) in team.members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, team_name, active, position)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&member.user_id)
            .bind(&member.username)
            .bind(&team.team_name)
            .bind(member.is_active)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_error(e, Entity::User))?;
        }

        // Dropping the transaction on any early return rolls it back
        tx.commit().await.map_err(Error::from)?;

        tracing::debug!(team_name = %team.team_name, "Stored team");
        Ok(())
    }

    /// Get a team with its members in roster order
    pub async fn get(&self, team_name: &str) -> Result<Team, StoreError> {
        let exists: Option<(String,)> = sqlx::query_as("SELECT name FROM teams WHERE name = ?")
            .bind(team_name)
            .fetch_optional(self.pool)
            .await
            .map_err(Error::from)?;

        if exists.is_none() {
            return Err(StoreError::NotFound(Entity::Team));
        }

        let rows = sqlx::query_as::<_, (String, String, bool)>(
            "SELECT id, name, active FROM users WHERE team_name = ? ORDER BY position ASC",
        )
        .bind(team_name)
        .fetch_all(self.pool)
        .await
        .map_err(Error::from)?;

        let members = rows
            .into_iter()
            .map(|(user_id, username, is_active)| TeamMember {
                user_id,
                username,
                is_active,
            })
            .collect();

        Ok(Team::new(team_name, members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_test_db() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn backend() -> Team {
        Team::new(
            "backend",
            vec![
                TeamMember::new("u3", "Carol"),
                TeamMember::new("u1", "Alice").inactive(),
                TeamMember::new("u2", "Bob"),
            ],
        )
    }

    #[tokio::test]
    async fn test_create_and_get_team() {
        let db = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());

        repo.create(&backend()).await.unwrap();

        // Roster order is insertion order, not ID order
        let team = repo.get("backend").await.unwrap();
        assert_eq!(team, backend());
    }

    #[tokio::test]
    async fn test_get_missing_team() {
        let db = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());

        let err = repo.get("nope").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(Entity::Team));
    }

    #[tokio::test]
    async fn test_duplicate_team_name() {
        let db = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());
        repo.create(&backend()).await.unwrap();

        let again = Team::new("backend", vec![TeamMember::new("u9", "Zed")]);
        let err = repo.create(&again).await.unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists(Entity::Team));

        // The member of the rejected team was never written
        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = 'u9'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(users.0, 0);
    }

    #[tokio::test]
    async fn test_member_collision_rolls_back_team() {
        let db = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());
        repo.create(&backend()).await.unwrap();

        let clash = Team::new(
            "frontend",
            vec![TeamMember::new("u8", "Yan"), TeamMember::new("u2", "Bob")],
        );
        let err = repo.create(&clash).await.unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists(Entity::User));

        assert_eq!(
            repo.get("frontend").await.unwrap_err(),
            StoreError::NotFound(Entity::Team)
        );
        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = 'u8'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(users.0, 0);
    }
}
