use std::path::PathBuf;
use std::sync::Arc;

use boostwatch::adapter::outbound::sqlite::database::connection::open;
use boostwatch::adapter::outbound::sqlite::SqliteSubscriptionStore;
use tempfile::TempDir;

/// Temporary SQLite database for integration tests.
///
/// The file lives in a temp directory removed on drop.
pub struct TempDb {
    dir: TempDir,
}

impl TempDb {
    pub fn create() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("boostwatch.db")
    }

    pub fn path_string(&self) -> String {
        self.path().to_string_lossy().to_string()
    }

    /// Open (and migrate) the database as a subscription store.
    pub fn store(&self) -> Arc<SqliteSubscriptionStore> {
        let pool = open(&self.path_string()).expect("open sqlite database");
        Arc::new(SqliteSubscriptionStore::new(pool))
    }
}
