use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::Timers;

/// INSERT INTO timers (sequence_id, timer_name, duration, timer_order, color, alarm_sound)
/// VALUES (?, ?, ?, ?, ?, ?)
pub fn insert(
    sequence_id: &str,
    timer_name: Option<&str>,
    duration: i64,
    timer_order: i64,
    color: &str,
    alarm_sound: &str,
) -> String {
    Query::insert()
        .into_table(Timers::Table)
        .columns([
            Timers::SequenceId,
            Timers::TimerName,
            Timers::Duration,
            Timers::TimerOrder,
            Timers::Color,
            Timers::AlarmSound,
        ])
        .values_panic([
            sequence_id.into(),
            timer_name.map(str::to_string).into(),
            duration.into(),
            timer_order.into(),
            color.into(),
            alarm_sound.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT timer_order, timer_name, duration, color, alarm_sound
/// FROM timers WHERE sequence_id = ? ORDER BY timer_order
pub fn select_for_sequence(sequence_id: &str) -> String {
    Query::select()
        .columns([
            Timers::TimerOrder,
            Timers::TimerName,
            Timers::Duration,
            Timers::Color,
            Timers::AlarmSound,
        ])
        .from(Timers::Table)
        .and_where(Expr::col(Timers::SequenceId).eq(sequence_id))
        .order_by(Timers::TimerOrder, Order::Asc)
        .to_string(SqliteQueryBuilder)
}
