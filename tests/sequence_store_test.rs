//! # Sequence Store Tests
//!
//! Creation/read behavior of the sequence store against a real SQLite file:
//! ordering, zero-duration filtering, input rejection, and default fallbacks.
//!
//! ## Running the Tests
//!
//! ```bash
//! cargo test --test sequence_store_test
//! ```

use sqlx::SqlitePool;

use timerfreak::constants::{DEFAULT_TIMER_COLOR, FALLBACK_ALARM_SOUND, SEQUENCE_START_EVENT};
use timerfreak::db;
use timerfreak::store::{CreateSequenceInput, SequenceStore, StoreError};

fn store_for(pool: &SqlitePool) -> SequenceStore {
    SequenceStore::new(pool.clone(), DEFAULT_TIMER_COLOR)
}

fn three_timer_input() -> CreateSequenceInput {
    CreateSequenceInput {
        sequence_name: Some("Intervals".to_string()),
        timer_names: vec!["Warmup".into(), "Work".into(), "Cooldown".into()],
        hours: vec!["0".into(), "0".into(), "0".into()],
        minutes: vec!["5".into(), "25".into(), "3".into()],
        seconds: vec!["0".into(), "0".into(), "30".into()],
        colors: vec!["#111111".into(), "#222222".into(), "#333333".into()],
        alarm_sounds: vec!["bell.mp3".into(), "gong.mp3".into(), "chime.mp3".into()],
    }
}

async fn row_counts(pool: &SqlitePool) -> (i64, i64) {
    let sequences: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sequences")
        .fetch_one(pool)
        .await
        .unwrap();
    let timers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM timers")
        .fetch_one(pool)
        .await
        .unwrap();
    (sequences, timers)
}

#[tokio::test]
async fn create_then_get_preserves_input_order() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let id = store
        .create_sequence(&three_timer_input(), FALLBACK_ALARM_SOUND)
        .await
        .unwrap();
    assert_eq!(id.len(), 11);

    let sequence = store.get_sequence(&id).await.unwrap().unwrap();
    assert_eq!(sequence.name.as_deref(), Some("Intervals"));
    assert!(sequence.created_at.instant().is_some());

    let orders: Vec<i64> = sequence.timers.iter().map(|t| t.timer_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let durations: Vec<i64> = sequence.timers.iter().map(|t| t.duration).collect();
    assert_eq!(durations, vec![300, 1500, 210]);

    let names: Vec<String> = sequence.timers.iter().map(|t| t.display_name()).collect();
    assert_eq!(names, vec!["Warmup", "Work", "Cooldown"]);
}

#[tokio::test]
async fn zero_duration_timers_are_dropped_and_survivors_renumbered() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let mut input = three_timer_input();
    // Middle timer collapses to zero seconds
    input.minutes[1] = "0".into();
    input.seconds[1] = "".into();

    let id = store
        .create_sequence(&input, FALLBACK_ALARM_SOUND)
        .await
        .unwrap();
    let sequence = store.get_sequence(&id).await.unwrap().unwrap();

    assert_eq!(sequence.timers.len(), 2);
    assert_eq!(sequence.timers[0].timer_order, 0);
    assert_eq!(sequence.timers[0].name.as_deref(), Some("Warmup"));
    assert_eq!(sequence.timers[1].timer_order, 1);
    assert_eq!(sequence.timers[1].name.as_deref(), Some("Cooldown"));
}

#[tokio::test]
async fn mismatched_array_lengths_leave_no_rows_behind() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let mut input = three_timer_input();
    input.colors.pop();

    let err = store
        .create_sequence(&input, FALLBACK_ALARM_SOUND)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MismatchedFields(_)));
    assert!(err.is_input_error());
    assert_eq!(row_counts(&pool).await, (0, 0));
}

#[tokio::test]
async fn non_integer_duration_leaves_no_rows_behind() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let mut input = three_timer_input();
    input.minutes[2] = "twenty".into();

    let err = store
        .create_sequence(&input, FALLBACK_ALARM_SOUND)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidDuration { index: 2, .. }));
    assert_eq!(row_counts(&pool).await, (0, 0));
}

#[tokio::test]
async fn all_zero_durations_reject_creation() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let mut input = three_timer_input();
    for field in [&mut input.hours, &mut input.minutes, &mut input.seconds] {
        for value in field.iter_mut() {
            *value = "0".into();
        }
    }

    let err = store
        .create_sequence(&input, FALLBACK_ALARM_SOUND)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NoValidTimers));
    assert_eq!(row_counts(&pool).await, (0, 0));
}

#[tokio::test]
async fn blank_color_and_sound_fall_back_to_defaults() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    db::seed_sounds(&pool, db::SEED_SOUNDS).await.unwrap();
    let store = store_for(&pool);

    let input = CreateSequenceInput {
        sequence_name: None,
        timer_names: vec!["".into()],
        hours: vec!["".into()],
        minutes: vec!["10".into()],
        seconds: vec!["".into()],
        colors: vec!["".into()],
        alarm_sounds: vec!["".into()],
    };

    // The handler resolves the registry default before calling the store
    let registry =
        timerfreak::registry::SoundRegistry::new(pool.clone(), FALLBACK_ALARM_SOUND);
    let default_sound = registry.default_filename().await.unwrap();
    assert_eq!(default_sound, "alarm.mp3");

    let id = store.create_sequence(&input, &default_sound).await.unwrap();
    let sequence = store.get_sequence(&id).await.unwrap().unwrap();

    assert_eq!(sequence.name, None);
    assert_eq!(sequence.timers[0].color, DEFAULT_TIMER_COLOR);
    assert_eq!(sequence.timers[0].alarm_sound, "alarm.mp3");
    assert_eq!(sequence.timers[0].display_name(), "Timer 1");
}

#[tokio::test]
async fn creation_records_a_start_event_in_a_second_transaction() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let id = store
        .create_sequence(&three_timer_input(), FALLBACK_ALARM_SOUND)
        .await
        .unwrap();

    let (event_type, timer_order): (String, Option<i64>) = sqlx::query_as(&format!(
        "SELECT event_type, timer_order FROM counter_logs WHERE sequence_id = '{}'",
        id
    ))
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(event_type, SEQUENCE_START_EVENT);
    assert_eq!(timer_order, None);
}

#[tokio::test]
async fn unknown_sequence_returns_none() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    assert!(store.get_sequence("does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_sequence_cascades_to_its_timers() {
    let (pool, _guard) = db::create_test_pool_in_temporary_file().await.unwrap();
    let store = store_for(&pool);

    let id = store
        .create_sequence(&three_timer_input(), FALLBACK_ALARM_SOUND)
        .await
        .unwrap();
    assert_eq!(row_counts(&pool).await, (1, 3));

    sqlx::query(&format!("DELETE FROM sequences WHERE id = '{}'", id))
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(row_counts(&pool).await, (0, 0));
}
