use sea_query::{
    Alias, Condition, Expr, Func, JoinType, Order, Query, SqliteQueryBuilder,
};

use crate::constants::SEQUENCE_START_EVENT;
use crate::schema::{CounterLogs, Sequences, Timers};

/// INSERT INTO counter_logs (sequence_id, timer_order, event_type, timestamp)
/// VALUES (?, ?, ?, ?)
pub fn insert(
    sequence_id: &str,
    timer_order: Option<i64>,
    event_type: &str,
    timestamp: &str,
) -> String {
    Query::insert()
        .into_table(CounterLogs::Table)
        .columns([
            CounterLogs::SequenceId,
            CounterLogs::TimerOrder,
            CounterLogs::EventType,
            CounterLogs::Timestamp,
        ])
        .values_panic([
            sequence_id.into(),
            timer_order.into(),
            event_type.into(),
            timestamp.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT cl.id, cl.sequence_id, cl.timer_order, cl.event_type, cl.timestamp, t.timer_name
/// FROM counter_logs cl
/// LEFT JOIN timers t ON cl.sequence_id = t.sequence_id AND cl.timer_order = t.timer_order
/// WHERE cl.sequence_id = ?
/// ORDER BY cl.timestamp
///
/// The join matches by value, not by key: a log row whose timer_order no longer
/// resolves to a timer simply yields a NULL name.
pub fn select_for_sequence(sequence_id: &str) -> String {
    Query::select()
        .column((CounterLogs::Table, CounterLogs::Id))
        .column((CounterLogs::Table, CounterLogs::SequenceId))
        .column((CounterLogs::Table, CounterLogs::TimerOrder))
        .column((CounterLogs::Table, CounterLogs::EventType))
        .column((CounterLogs::Table, CounterLogs::Timestamp))
        .column((Timers::Table, Timers::TimerName))
        .from(CounterLogs::Table)
        .join(
            JoinType::LeftJoin,
            Timers::Table,
            Condition::all()
                .add(
                    Expr::col((CounterLogs::Table, CounterLogs::SequenceId))
                        .equals((Timers::Table, Timers::SequenceId)),
                )
                .add(
                    Expr::col((CounterLogs::Table, CounterLogs::TimerOrder))
                        .equals((Timers::Table, Timers::TimerOrder)),
                ),
        )
        .and_where(Expr::col((CounterLogs::Table, CounterLogs::SequenceId)).eq(sequence_id))
        .order_by((CounterLogs::Table, CounterLogs::Timestamp), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT s.id, s.name, starts.start_count, totals.timer_count, totals.total_duration
/// FROM sequences s
/// INNER JOIN (SELECT sequence_id, COUNT(id) AS start_count FROM counter_logs
///             WHERE event_type = 'sequence_start' GROUP BY sequence_id) starts
///     ON starts.sequence_id = s.id
/// LEFT JOIN (SELECT sequence_id, COUNT(id) AS timer_count, SUM(duration) AS total_duration
///            FROM timers GROUP BY sequence_id) totals
///     ON totals.sequence_id = s.id
/// ORDER BY start_count DESC
/// LIMIT ?
///
/// The inner join keeps only sequences with at least one recorded start; joining
/// against real sequences also drops log rows for identifiers that never existed.
pub fn select_most_used(limit: u64) -> String {
    let starts = Query::select()
        .column(CounterLogs::SequenceId)
        .expr_as(
            Func::count(Expr::col(CounterLogs::Id)),
            Alias::new("start_count"),
        )
        .from(CounterLogs::Table)
        .and_where(Expr::col(CounterLogs::EventType).eq(SEQUENCE_START_EVENT))
        .group_by_col(CounterLogs::SequenceId)
        .to_owned();

    let totals = Query::select()
        .column(Timers::SequenceId)
        .expr_as(Func::count(Expr::col(Timers::Id)), Alias::new("timer_count"))
        .expr_as(
            Func::sum(Expr::col(Timers::Duration)),
            Alias::new("total_duration"),
        )
        .from(Timers::Table)
        .group_by_col(Timers::SequenceId)
        .to_owned();

    Query::select()
        .column((Sequences::Table, Sequences::Id))
        .column((Sequences::Table, Sequences::Name))
        .column((Alias::new("starts"), Alias::new("start_count")))
        .column((Alias::new("totals"), Alias::new("timer_count")))
        .column((Alias::new("totals"), Alias::new("total_duration")))
        .from(Sequences::Table)
        .join_subquery(
            JoinType::InnerJoin,
            starts,
            Alias::new("starts"),
            Expr::col((Alias::new("starts"), CounterLogs::SequenceId))
                .equals((Sequences::Table, Sequences::Id)),
        )
        .join_subquery(
            JoinType::LeftJoin,
            totals,
            Alias::new("totals"),
            Expr::col((Alias::new("totals"), Timers::SequenceId))
                .equals((Sequences::Table, Sequences::Id)),
        )
        .order_by(Alias::new("start_count"), Order::Desc)
        .limit(limit)
        .to_string(SqliteQueryBuilder)
}
