//! Online backup and reset.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::backup::Backup;
use rusqlite::Connection;

use agenr_core::errors::{AgenrError, AgenrResult, StorageError};

use crate::to_storage_err;

/// Create a sibling backup file named
/// `{dbPath}.backup-pre-reset-{ISO timestamp, ':' and '.' replaced by '-',
/// trailing 'Z'}` using SQLite's online backup API, so a live writer does
/// not need to pause for the copy to complete.
pub fn backup_db(db_path: &Path) -> AgenrResult<PathBuf> {
    if db_path.as_os_str() == ":memory:" {
        return Err(AgenrError::Storage(StorageError::InMemoryUnsupported {
            operation: "backupDb".to_string(),
        }));
    }

    let stamp = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let safe_stamp = stamp.replace(':', "-").replace('.', "-");
    let backup_path = PathBuf::from(format!(
        "{}.backup-pre-reset-{safe_stamp}",
        db_path.display()
    ));

    let src = Connection::open(db_path).map_err(|e| to_storage_err(e.to_string()))?;
    let mut dst = Connection::open(&backup_path).map_err(|e| to_storage_err(e.to_string()))?;
    {
        let backup =
            Backup::new(&src, &mut dst).map_err(|e| to_storage_err(e.to_string()))?;
        backup
            .run_to_completion(5, std::time::Duration::from_millis(250), None)
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    tracing::info!(path = %backup_path.display(), "database backed up");
    Ok(backup_path)
}

/// Drop and recreate every schema object. Forbidden on `:memory:` (callers
/// should simply open a fresh in-memory engine instead). The caller is
/// responsible for calling [`backup_db`] first.
pub fn reset_db(conn: &Connection) -> AgenrResult<()> {
    conn.execute_batch(
        "
        DROP TABLE IF EXISTS signal_watermarks;
        DROP TABLE IF EXISTS review_queue;
        DROP TABLE IF EXISTS entry_sources;
        DROP TABLE IF EXISTS relations;
        DROP TABLE IF EXISTS entries;
        DROP TABLE IF EXISTS _migrations;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    crate::migrations::run_migrations(conn)?;
    tracing::warn!("database reset");
    Ok(())
}
