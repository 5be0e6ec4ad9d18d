use sea_query::{Expr, Query, SqliteQueryBuilder};

use crate::schema::Sequences;

/// INSERT INTO sequences (id, name, created_at) VALUES (?, ?, ?)
pub fn insert(id: &str, name: Option<&str>, created_at: &str) -> String {
    Query::insert()
        .into_table(Sequences::Table)
        .columns([Sequences::Id, Sequences::Name, Sequences::CreatedAt])
        .values_panic([
            id.into(),
            name.map(str::to_string).into(),
            created_at.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name, created_at FROM sequences WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns([Sequences::Id, Sequences::Name, Sequences::CreatedAt])
        .from(Sequences::Table)
        .and_where(Expr::col(Sequences::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}
