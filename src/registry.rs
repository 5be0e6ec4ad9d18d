use log::warn;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::queries::sounds;

/// One selectable alarm sound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sound {
    pub filename: String,
    pub name: String,
    pub is_default: bool,
}

fn sound_from_row(row: &sqlx::sqlite::SqliteRow) -> Sound {
    Sound {
        filename: row.get("filename"),
        name: row.get("name"),
        is_default: row.get::<i64, _>("is_default") != 0,
    }
}

/// Read-side catalog of alarm sounds
pub struct SoundRegistry {
    pool: SqlitePool,
    fallback_filename: String,
}

impl SoundRegistry {
    pub fn new(pool: SqlitePool, fallback_filename: impl Into<String>) -> Self {
        Self {
            pool,
            fallback_filename: fallback_filename.into(),
        }
    }

    /// All sounds, sorted by display name
    pub async fn list_sounds(&self) -> Result<Vec<Sound>, sqlx::Error> {
        let sql = sounds::select_all_ordered();
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(sound_from_row).collect())
    }

    /// The sound flagged as default, if any. At most one row should carry the
    /// flag; the first match wins if that invariant is ever violated.
    pub async fn default_sound(&self) -> Result<Option<Sound>, sqlx::Error> {
        let sql = sounds::select_default();
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(sound_from_row))
    }

    /// Default sound filename, or the hard-coded fallback when nothing is flagged
    pub async fn default_filename(&self) -> Result<String, sqlx::Error> {
        match self.default_sound().await? {
            Some(sound) => Ok(sound.filename),
            None => {
                warn!(
                    "No sound is flagged as default, falling back to {}",
                    self.fallback_filename
                );
                Ok(self.fallback_filename.clone())
            }
        }
    }
}
