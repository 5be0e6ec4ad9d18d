//! # Event Log Tests
//!
//! Append-only behavior of the counter log: orphan-tolerant inserts, ordering,
//! and the value-based timer-name join used by the log viewer.
//!
//! ## Running the Tests
//!
//! ```bash
//! cargo test --test event_log_test
//! ```

use chrono_tz::Tz;

use timerfreak::constants::{DEFAULT_TIMER_COLOR, FALLBACK_ALARM_SOUND};
use timerfreak::db;
use timerfreak::events::EventLog;
use timerfreak::queries::counter_logs;
use timerfreak::store::{CreateSequenceInput, SequenceStore};
use timerfreak::timestamp::ParsedTimestamp;

fn one_timer_input(name: &str) -> CreateSequenceInput {
    CreateSequenceInput {
        sequence_name: Some(name.to_string()),
        timer_names: vec![name.to_string()],
        hours: vec!["0".into()],
        minutes: vec!["1".into()],
        seconds: vec!["0".into()],
        colors: vec!["#123456".into()],
        alarm_sounds: vec!["bell.mp3".into()],
    }
}

#[tokio::test]
async fn append_accepts_unknown_sequence_ids() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let events = EventLog::new(pool.clone());

    let log_id = events
        .append_event("ghost-sequence", Some(0), "timer_complete")
        .await
        .unwrap();
    assert!(log_id > 0);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM counter_logs WHERE sequence_id = 'ghost-sequence'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn append_stores_naive_utc_text_that_rehydrates_exactly() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let events = EventLog::new(pool.clone());

    events
        .append_event("seq-a", None, "sequence_complete")
        .await
        .unwrap();

    let stored: String =
        sqlx::query_scalar("SELECT timestamp FROM counter_logs WHERE sequence_id = 'seq-a'")
            .fetch_one(&pool)
            .await
            .unwrap();

    // Naive on disk: no offset, no zone designator
    assert!(!stored.contains('+'));
    assert!(!stored.ends_with('Z'));
    assert!(matches!(
        timerfreak::timestamp::parse_stored(&stored),
        ParsedTimestamp::Exact(_)
    ));
}

#[tokio::test]
async fn entries_come_back_ordered_by_timestamp() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let events = EventLog::new(pool.clone());

    // Insert out of order with explicit timestamps
    for (ts, event) in [
        ("2025-05-01 10:00:02.000000", "sequence_complete"),
        ("2025-05-01 10:00:00.000000", "sequence_start"),
        ("2025-05-01 10:00:01.000000", "timer_complete"),
    ] {
        let sql = counter_logs::insert("seq-b", None, event, ts);
        sqlx::query(&sql).execute(&pool).await.unwrap();
    }

    let entries = events.entries_for_sequence("seq-b").await.unwrap();
    let kinds: Vec<&str> = entries.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        kinds,
        vec!["sequence_start", "timer_complete", "sequence_complete"]
    );
}

#[tokio::test]
async fn timer_names_join_by_value_and_tolerate_orphans() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = SequenceStore::new(pool.clone(), DEFAULT_TIMER_COLOR);
    let events = EventLog::new(pool.clone());

    let id = store
        .create_sequence(&one_timer_input("Stretch"), FALLBACK_ALARM_SOUND)
        .await
        .unwrap();

    // Event for the real timer at order 0, and one for a stale order 7
    events.append_event(&id, Some(0), "timer_start").await.unwrap();
    events.append_event(&id, Some(7), "timer_start").await.unwrap();

    let entries = events.entries_for_sequence(&id).await.unwrap();
    // First entry is the creation start event with no timer reference
    assert_eq!(entries[0].event_type, "sequence_start");
    assert_eq!(entries[0].timer_name, None);

    let by_order: Vec<(Option<i64>, Option<&str>)> = entries
        .iter()
        .skip(1)
        .map(|e| (e.timer_order, e.timer_name.as_deref()))
        .collect();
    assert!(by_order.contains(&(Some(0), Some("Stretch"))));
    assert!(by_order.contains(&(Some(7), None)));
}

#[tokio::test]
async fn display_timestamp_converts_without_touching_storage() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let events = EventLog::new(pool.clone());

    let sql = counter_logs::insert("seq-c", None, "sequence_start", "2025-01-15 12:00:00.000000");
    sqlx::query(&sql).execute(&pool).await.unwrap();

    let zone: Tz = "America/Chicago".parse().unwrap();
    let entries = events.entries_for_sequence("seq-c").await.unwrap();
    assert_eq!(
        entries[0].display_timestamp(zone),
        "2025-01-15 06:00:00 CST"
    );

    // Stored text is unchanged by the display conversion
    let stored: String =
        sqlx::query_scalar("SELECT timestamp FROM counter_logs WHERE sequence_id = 'seq-c'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, "2025-01-15 12:00:00.000000");
}

#[tokio::test]
async fn unparseable_timestamp_passes_through_raw() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let events = EventLog::new(pool.clone());

    let sql = counter_logs::insert("seq-d", None, "sequence_start", "garbage-timestamp");
    sqlx::query(&sql).execute(&pool).await.unwrap();

    let zone: Tz = "America/Chicago".parse().unwrap();
    let entries = events.entries_for_sequence("seq-d").await.unwrap();
    assert_eq!(
        entries[0].timestamp,
        ParsedTimestamp::Unparsed("garbage-timestamp".to_string())
    );
    assert_eq!(entries[0].display_timestamp(zone), "garbage-timestamp");
}
