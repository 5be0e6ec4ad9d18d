use chrono_tz::Tz;
use log::info;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::queries::counter_logs;
use crate::timestamp::{self, ParsedTimestamp};

/// One row from the append-only event log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub sequence_id: String,
    pub timer_order: Option<i64>,
    pub event_type: String,
    pub timestamp: ParsedTimestamp,
    /// Joined from the timers table by (sequence_id, timer_order) value match;
    /// None for sequence-level events and for stale timer references
    pub timer_name: Option<String>,
}

impl LogEntry {
    /// Presentation timestamp in the display zone. Falls back to the raw stored
    /// text when the value could not be parsed.
    pub fn display_timestamp(&self, zone: Tz) -> String {
        match &self.timestamp {
            ParsedTimestamp::Exact(dt) | ParsedTimestamp::Degraded(dt) => {
                timestamp::to_display_zone(*dt, zone)
                    .format("%Y-%m-%d %H:%M:%S %Z")
                    .to_string()
            }
            ParsedTimestamp::Unparsed(raw) => raw.clone(),
        }
    }
}

/// Append-only lifecycle event log
pub struct EventLog {
    pool: SqlitePool,
}

impl EventLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one event with an insert-time UTC timestamp and return its row id.
    ///
    /// The sequence id and timer order are recorded exactly as given; unknown or
    /// out-of-range references are accepted on purpose so the reporting client is
    /// never blocked by referential integrity.
    pub async fn append_event(
        &self,
        sequence_id: &str,
        timer_order: Option<i64>,
        event_type: &str,
    ) -> Result<i64, sqlx::Error> {
        let sql = counter_logs::insert(
            sequence_id,
            timer_order,
            event_type,
            &timestamp::now_stored(),
        );
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        let log_id = result.last_insert_rowid();
        info!(
            "Activity logged: seq={} timer_order={:?} event={}",
            sequence_id, timer_order, event_type
        );
        Ok(log_id)
    }

    /// All events for one sequence, oldest first, with timer names joined in
    pub async fn entries_for_sequence(
        &self,
        sequence_id: &str,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let sql = counter_logs::select_for_sequence(sequence_id);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| LogEntry {
                id: row.get("id"),
                sequence_id: row.get("sequence_id"),
                timer_order: row.get("timer_order"),
                event_type: row.get("event_type"),
                timestamp: timestamp::parse_stored(&row.get::<String, _>("timestamp")),
                timer_name: row.get("timer_name"),
            })
            .collect())
    }
}
