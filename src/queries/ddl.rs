use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, SqliteQueryBuilder, Table,
};

use crate::schema::{CounterLogs, Sequences, Sounds, Timers};

/// CREATE TABLE IF NOT EXISTS sequences (
///     id TEXT PRIMARY KEY,
///     name TEXT,
///     created_at TEXT NOT NULL
/// )
pub fn create_sequences_table() -> String {
    Table::create()
        .table(Sequences::Table)
        .if_not_exists()
        .col(ColumnDef::new(Sequences::Id).string().primary_key())
        .col(ColumnDef::new(Sequences::Name).string())
        .col(ColumnDef::new(Sequences::CreatedAt).string().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS timers (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     sequence_id TEXT NOT NULL REFERENCES sequences(id) ON DELETE CASCADE,
///     timer_name TEXT,
///     duration INTEGER NOT NULL,
///     timer_order INTEGER NOT NULL,
///     color TEXT NOT NULL,
///     alarm_sound TEXT NOT NULL
/// )
pub fn create_timers_table() -> String {
    Table::create()
        .table(Timers::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Timers::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(Timers::SequenceId).string().not_null())
        .col(ColumnDef::new(Timers::TimerName).string())
        .col(ColumnDef::new(Timers::Duration).integer().not_null())
        .col(ColumnDef::new(Timers::TimerOrder).integer().not_null())
        .col(ColumnDef::new(Timers::Color).string().not_null())
        .col(ColumnDef::new(Timers::AlarmSound).string().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Timers::Table, Timers::SequenceId)
                .to(Sequences::Table, Sequences::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE UNIQUE INDEX IF NOT EXISTS idx_timers_sequence_order ON timers(sequence_id, timer_order)
pub fn create_timers_order_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_timers_sequence_order")
        .table(Timers::Table)
        .col(Timers::SequenceId)
        .col(Timers::TimerOrder)
        .unique()
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS sounds (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     filename TEXT NOT NULL UNIQUE,
///     name TEXT NOT NULL,
///     is_default INTEGER NOT NULL DEFAULT 0
/// )
pub fn create_sounds_table() -> String {
    Table::create()
        .table(Sounds::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Sounds::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(
            ColumnDef::new(Sounds::Filename)
                .string()
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Sounds::Name).string().not_null())
        .col(
            ColumnDef::new(Sounds::IsDefault)
                .integer()
                .not_null()
                .default(0),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS counter_logs (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     sequence_id TEXT NOT NULL,
///     timer_order INTEGER,
///     event_type TEXT NOT NULL,
///     timestamp TEXT NOT NULL
/// )
///
/// No foreign key to sequences or timers: log rows reference them by value only.
pub fn create_counter_logs_table() -> String {
    Table::create()
        .table(CounterLogs::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(CounterLogs::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(CounterLogs::SequenceId).string().not_null())
        .col(ColumnDef::new(CounterLogs::TimerOrder).integer())
        .col(ColumnDef::new(CounterLogs::EventType).string().not_null())
        .col(ColumnDef::new(CounterLogs::Timestamp).string().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_counter_logs_sequence_id ON counter_logs(sequence_id)
pub fn create_counter_logs_sequence_id_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_counter_logs_sequence_id")
        .table(CounterLogs::Table)
        .col(CounterLogs::SequenceId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_counter_logs_event_type ON counter_logs(event_type, sequence_id)
///
/// Covers the start-count aggregation behind the most-used sequences view.
pub fn create_counter_logs_event_type_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_counter_logs_event_type")
        .table(CounterLogs::Table)
        .col(CounterLogs::EventType)
        .col(CounterLogs::SequenceId)
        .to_string(SqliteQueryBuilder)
}
