//! CLI command implementations

pub mod pr;
pub mod serve;
pub mod team;
pub mod user;

pub use pr::PrArgs;
pub use serve::ServeArgs;
pub use team::TeamArgs;
pub use user::UserArgs;

use std::sync::Arc;

use assigner_core::{AssignmentService, Config};
use assigner_db::{Database, SqliteStore};
use serde::Serialize;

/// Open the configured database and build a service on top of it
pub async fn open_service(config: &Config) -> anyhow::Result<AssignmentService> {
    let db = Database::connect(&config.database).await?;
    db.migrate().await?;

    tracing::debug!(path = %config.database.path.display(), "Database ready");
    Ok(AssignmentService::new(Arc::new(SqliteStore::new(db))))
}

/// Print a command result as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
