use log::{info, warn};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use thiserror::Error;

use crate::constants::SEQUENCE_START_EVENT;
use crate::ident;
use crate::queries::{counter_logs, sequences, timers};
use crate::timestamp::{self, ParsedTimestamp};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Parallel input arrays disagree on length
    #[error("inconsistent timer field lengths ({0})")]
    MismatchedFields(String),
    /// A duration component was not a non-negative integer
    #[error("invalid duration component {value:?} for timer {index}")]
    InvalidDuration { index: usize, value: String },
    /// Every submitted timer had a zero duration after parsing
    #[error("no timer with a positive duration was submitted")]
    NoValidTimers,
    /// The generated random identifier collided with an existing sequence
    #[error("sequence identifier collision")]
    IdCollision,
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    /// True for errors caused by the caller's input rather than the store
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            StoreError::MismatchedFields(_)
                | StoreError::InvalidDuration { .. }
                | StoreError::NoValidTimers
        )
    }
}

/// Raw creation input as submitted by the form boundary: parallel arrays,
/// one entry per timer row. Everything arrives as text.
#[derive(Debug, Default, Clone)]
pub struct CreateSequenceInput {
    pub sequence_name: Option<String>,
    pub timer_names: Vec<String>,
    pub hours: Vec<String>,
    pub minutes: Vec<String>,
    pub seconds: Vec<String>,
    pub colors: Vec<String>,
    pub alarm_sounds: Vec<String>,
}

/// One validated timer ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct TimerDraft {
    pub name: Option<String>,
    pub duration: i64,
    pub color: String,
    pub alarm_sound: String,
}

/// One persisted timer, ordered within its sequence
#[derive(Debug, Clone, PartialEq)]
pub struct TimerRecord {
    pub timer_order: i64,
    pub duration: i64,
    pub name: Option<String>,
    pub color: String,
    pub alarm_sound: String,
}

impl TimerRecord {
    /// Display label, falling back to the 1-based position
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Timer {}", self.timer_order + 1),
        }
    }
}

/// A persisted sequence with its timers in order
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub id: String,
    pub name: Option<String>,
    pub created_at: ParsedTimestamp,
    pub timers: Vec<TimerRecord>,
}

/// Immutable-after-creation sequence storage
pub struct SequenceStore {
    pool: SqlitePool,
    default_timer_color: String,
}

fn parse_component(raw: &str, index: usize) -> Result<i64, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map(i64::from)
        .map_err(|_| StoreError::InvalidDuration {
            index,
            value: raw.to_string(),
        })
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validate the parallel arrays and turn them into insertable drafts.
///
/// hours/minutes/seconds/colors/alarm_sounds must agree on length; timer names
/// may be shorter (a missing name means no name). Zero-duration entries are
/// dropped, not rejected; survivors keep their relative order.
pub fn parse_timer_drafts(
    input: &CreateSequenceInput,
    default_color: &str,
    default_alarm_sound: &str,
) -> Result<Vec<TimerDraft>, StoreError> {
    let count = input.hours.len();
    if input.minutes.len() != count
        || input.seconds.len() != count
        || input.colors.len() != count
        || input.alarm_sounds.len() != count
    {
        return Err(StoreError::MismatchedFields(format!(
            "hours={} minutes={} seconds={} colors={} alarm_sounds={}",
            input.hours.len(),
            input.minutes.len(),
            input.seconds.len(),
            input.colors.len(),
            input.alarm_sounds.len(),
        )));
    }

    let mut drafts = Vec::with_capacity(count);
    for i in 0..count {
        let h = parse_component(&input.hours[i], i)?;
        let m = parse_component(&input.minutes[i], i)?;
        let s = parse_component(&input.seconds[i], i)?;
        let duration = h * 3600 + m * 60 + s;

        if duration <= 0 {
            warn!("Timer {} has non-positive duration, dropping it", i + 1);
            continue;
        }

        drafts.push(TimerDraft {
            name: input.timer_names.get(i).and_then(|n| non_blank(n)),
            duration,
            color: non_blank(&input.colors[i]).unwrap_or_else(|| default_color.to_string()),
            alarm_sound: non_blank(&input.alarm_sounds[i])
                .unwrap_or_else(|| default_alarm_sound.to_string()),
        });
    }

    if drafts.is_empty() {
        return Err(StoreError::NoValidTimers);
    }
    Ok(drafts)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl SequenceStore {
    pub fn new(pool: SqlitePool, default_timer_color: impl Into<String>) -> Self {
        Self {
            pool,
            default_timer_color: default_timer_color.into(),
        }
    }

    /// Validate the input, persist one sequence row plus its timers in a single
    /// transaction, then record the initial start event in a second transaction.
    ///
    /// The two transactions are deliberately not atomic: losing the start event
    /// only hides the sequence from the most-used view until its next start, so
    /// a failure there is logged and the creation still succeeds.
    ///
    /// `default_alarm_sound` is the registry's resolved default filename,
    /// applied to any timer submitted without a sound.
    pub async fn create_sequence(
        &self,
        input: &CreateSequenceInput,
        default_alarm_sound: &str,
    ) -> Result<String, StoreError> {
        let drafts = parse_timer_drafts(input, &self.default_timer_color, default_alarm_sound)?;

        let sequence_id = ident::generate_sequence_id();
        let name = input.sequence_name.as_deref().and_then(non_blank);

        let mut tx = self.pool.begin().await?;

        let sql = sequences::insert(&sequence_id, name.as_deref(), &timestamp::now_stored());
        sqlx::query(&sql).execute(&mut *tx).await.map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::IdCollision
            } else {
                StoreError::Storage(e)
            }
        })?;

        for (order, draft) in drafts.iter().enumerate() {
            let sql = timers::insert(
                &sequence_id,
                draft.name.as_deref(),
                draft.duration,
                order as i64,
                &draft.color,
                &draft.alarm_sound,
            );
            sqlx::query(&sql).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        let sql = counter_logs::insert(
            &sequence_id,
            None,
            SEQUENCE_START_EVENT,
            &timestamp::now_stored(),
        );
        if let Err(e) = sqlx::query(&sql).execute(&self.pool).await {
            warn!(
                "Sequence {} created but its start event failed to record: {}",
                sequence_id, e
            );
        }

        info!(
            "Created sequence {} with {} timers",
            sequence_id,
            drafts.len()
        );
        Ok(sequence_id)
    }

    /// Fetch a sequence with its timers ordered by position ascending
    pub async fn get_sequence(
        &self,
        sequence_id: &str,
    ) -> Result<Option<SequenceRecord>, StoreError> {
        let sql = sequences::select_by_id(sequence_id);
        let Some(row) = sqlx::query(&sql).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        let id: String = row.get("id");
        let name: Option<String> = row.get("name");
        let created_raw: String = row.get("created_at");

        let sql = timers::select_for_sequence(sequence_id);
        let timer_rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let timers = timer_rows
            .iter()
            .map(|r| TimerRecord {
                timer_order: r.get("timer_order"),
                duration: r.get("duration"),
                name: r.get("timer_name"),
                color: r.get("color"),
                alarm_sound: r.get("alarm_sound"),
            })
            .collect();

        Ok(Some(SequenceRecord {
            id,
            name,
            created_at: timestamp::parse_stored(&created_raw),
            timers,
        }))
    }
}
