use sea_query::Iden;

/// Sequences table - one shareable countdown sequence per row
#[derive(Iden)]
pub enum Sequences {
    Table,
    Id,
    Name,
    CreatedAt,
}

/// Timers table - ordered countdown steps owned by a sequence
#[derive(Iden)]
pub enum Timers {
    Table,
    Id,
    SequenceId,
    TimerName,
    Duration,
    TimerOrder,
    Color,
    AlarmSound,
}

/// Sounds table - catalog of selectable alarm sounds
#[derive(Iden)]
pub enum Sounds {
    Table,
    Id,
    Filename,
    Name,
    IsDefault,
}

/// Counter logs table - append-only lifecycle events
///
/// Deliberately carries no foreign keys: the log accepts events for unknown
/// or stale references so a late client report is never turned away.
#[derive(Iden)]
pub enum CounterLogs {
    Table,
    Id,
    SequenceId,
    TimerOrder,
    EventType,
    Timestamp,
}
