//! Persistence factory for the subscription store.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::sqlite::database::connection::open;
use crate::adapter::outbound::sqlite::SqliteSubscriptionStore;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Open the SQLite database, apply migrations and return the store.
pub fn build_store(config: &Config) -> Result<Arc<SqliteSubscriptionStore>> {
    let pool = open(&config.database)?;
    info!(database = %config.database, "Database initialized");
    Ok(Arc::new(SqliteSubscriptionStore::new(pool)))
}
