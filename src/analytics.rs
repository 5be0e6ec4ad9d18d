use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::constants::MOST_USED_LIMIT;
use crate::queries::counter_logs;

/// One row of the most-used sequences view
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceUsage {
    pub id: String,
    pub name: Option<String>,
    pub start_count: i64,
    pub timer_count: i64,
    pub total_duration: i64,
}

impl SequenceUsage {
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "Unnamed Sequence".to_string(),
        }
    }

    pub fn total_duration_display(&self) -> String {
        format_duration(self.total_duration)
    }
}

/// Derived usage statistics over the store and the event log
pub struct Analytics {
    pool: SqlitePool,
}

impl Analytics {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Top sequences by recorded start count, most used first.
    ///
    /// Only sequences with at least one start appear; a sequence created moments
    /// ago whose start event has not committed yet is simply absent until it
    /// does. Recomputed on every call, no caching.
    pub async fn most_used_sequences(&self) -> Result<Vec<SequenceUsage>, sqlx::Error> {
        let sql = counter_logs::select_most_used(MOST_USED_LIMIT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| SequenceUsage {
                id: row.get("id"),
                name: row.get("name"),
                start_count: row.get("start_count"),
                timer_count: row.get::<Option<i64>, _>("timer_count").unwrap_or(0),
                total_duration: row.get::<Option<i64>, _>("total_duration").unwrap_or(0),
            })
            .collect())
    }
}

/// Render a duration in whole seconds as e.g. "1h 1m 1s".
///
/// Zero-valued units are omitted, except that a zero total renders as "0s".
pub fn format_duration(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_covers_the_unit_boundaries() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(120), "2m");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(3661), "1h 1m 1s");
        assert_eq!(format_duration(7200), "2h");
        assert_eq!(format_duration(7261), "2h 1m 1s");
    }

    #[test]
    fn display_name_falls_back_when_unnamed() {
        let usage = SequenceUsage {
            id: "abc".to_string(),
            name: None,
            start_count: 1,
            timer_count: 1,
            total_duration: 60,
        };
        assert_eq!(usage.display_name(), "Unnamed Sequence");
        assert_eq!(usage.total_duration_display(), "1m");

        let named = SequenceUsage {
            name: Some("Morning routine".to_string()),
            ..usage
        };
        assert_eq!(named.display_name(), "Morning routine");
    }
}
