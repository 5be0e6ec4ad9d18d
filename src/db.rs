use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::queries::{ddl, sounds};

type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Sound catalog seeded by the init command. "alarm.mp3" matches the hard-coded
/// fallback so a freshly seeded registry always resolves the same default.
pub const SEED_SOUNDS: &[(&str, &str, bool)] = &[
    ("alarm.mp3", "Classic Alarm", true),
    ("bell.mp3", "Bell", false),
    ("chime.mp3", "Chime", false),
    ("digital.mp3", "Digital Beep", false),
    ("gong.mp3", "Gong", false),
];

/// Open a file-based connection pool for production use
/// Enables WAL mode and foreign keys, creating the file if needed
pub async fn open_database_pool(db_path: impl AsRef<Path>) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path.as_ref())
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create all tables and indexes if they do not exist yet
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), DynError> {
    let statements = [
        ddl::create_sequences_table(),
        ddl::create_timers_table(),
        ddl::create_timers_order_index(),
        ddl::create_sounds_table(),
        ddl::create_counter_logs_table(),
        ddl::create_counter_logs_sequence_id_index(),
        ddl::create_counter_logs_event_type_index(),
    ];

    for sql in statements {
        sqlx::query(&sql).execute(pool).await?;
    }

    Ok(())
}

/// Insert sound rows, ignoring filenames already present (idempotent)
pub async fn seed_sounds(
    pool: &SqlitePool,
    catalog: &[(&str, &str, bool)],
) -> Result<(), DynError> {
    for (filename, name, is_default) in catalog {
        let sql = sounds::insert_or_ignore(filename, name, *is_default);
        sqlx::query(&sql).execute(pool).await?;
    }

    Ok(())
}

/// Create a schema-initialized pool backed by a temporary file, for tests.
/// The returned TempDir guard keeps the database alive; drop it to clean up.
pub async fn create_test_pool_in_temporary_file(
) -> Result<(SqlitePool, tempfile::TempDir), DynError> {
    let dir = tempfile::tempdir()?;
    let pool = open_database_pool(dir.path().join("timerfreak_test.sqlite")).await?;
    init_database_schema(&pool).await?;
    Ok((pool, dir))
}
