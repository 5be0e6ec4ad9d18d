use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};

use crate::schema::Sounds;

/// INSERT OR IGNORE INTO sounds (filename, name, is_default) VALUES (?, ?, ?)
///
/// Conflicts on filename are ignored so seeding stays idempotent.
pub fn insert_or_ignore(filename: &str, name: &str, is_default: bool) -> String {
    Query::insert()
        .into_table(Sounds::Table)
        .columns([Sounds::Filename, Sounds::Name, Sounds::IsDefault])
        .values_panic([
            filename.into(),
            name.into(),
            (is_default as i32).into(),
        ])
        .on_conflict(OnConflict::new().do_nothing().to_owned())
        .to_string(SqliteQueryBuilder)
}

/// SELECT filename, name, is_default FROM sounds ORDER BY name
pub fn select_all_ordered() -> String {
    Query::select()
        .columns([Sounds::Filename, Sounds::Name, Sounds::IsDefault])
        .from(Sounds::Table)
        .order_by(Sounds::Name, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT filename, name, is_default FROM sounds WHERE is_default = 1 ORDER BY id LIMIT 1
///
/// Nothing at the database level prevents two rows from carrying the flag;
/// the first match wins if that ever happens.
pub fn select_default() -> String {
    Query::select()
        .columns([Sounds::Filename, Sounds::Name, Sounds::IsDefault])
        .from(Sounds::Table)
        .and_where(Expr::col(Sounds::IsDefault).eq(1))
        .order_by(Sounds::Id, Order::Asc)
        .limit(1)
        .to_string(SqliteQueryBuilder)
}
