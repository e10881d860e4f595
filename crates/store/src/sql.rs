//! Execute sea-query statements on rusqlite.

use std::str::FromStr;

use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{Connection, Row, params_from_iter};
use sea_query::Value;
use sitework_api::db::Built;

fn bind(value: Value) -> SqlValue {
    match value {
        Value::Bool(v) => v.map_or(SqlValue::Null, |b| SqlValue::Integer(i64::from(b))),
        Value::TinyInt(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::SmallInt(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::Int(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::BigInt(v) => v.map_or(SqlValue::Null, SqlValue::Integer),
        Value::TinyUnsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::SmallUnsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::Unsigned(v) => v.map_or(SqlValue::Null, |n| SqlValue::Integer(n.into())),
        Value::BigUnsigned(v) => v.map_or(SqlValue::Null, |n| {
            i64::try_from(n).map_or(SqlValue::Real(n as f64), SqlValue::Integer)
        }),
        Value::Float(v) => v.map_or(SqlValue::Null, |n| SqlValue::Real(n.into())),
        Value::Double(v) => v.map_or(SqlValue::Null, SqlValue::Real),
        Value::String(v) => v.map_or(SqlValue::Null, |s| SqlValue::Text(*s)),
        Value::Char(v) => v.map_or(SqlValue::Null, |c| SqlValue::Text(c.to_string())),
        Value::Bytes(v) => v.map_or(SqlValue::Null, |b| SqlValue::Blob(*b)),
        #[allow(unreachable_patterns)]
        _ => SqlValue::Null,
    }
}

fn params(values: sea_query::Values) -> impl rusqlite::Params {
    params_from_iter(values.0.into_iter().map(bind))
}

pub(crate) fn sq_execute(conn: &Connection, (sql, values): Built) -> rusqlite::Result<usize> {
    conn.execute(&sql, params(values))
}

pub(crate) fn sq_query_row<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<T>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    conn.query_row(&sql, params(values), f)
}

pub(crate) fn sq_query_map<T, F>(
    conn: &Connection,
    (sql, values): Built,
    f: F,
) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params(values), f)?;
    rows.collect()
}

/// Run a `COUNT(*)` statement.
pub(crate) fn sq_count(conn: &Connection, built: Built) -> rusqlite::Result<usize> {
    let n: i64 = sq_query_row(conn, built, |row| row.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

/// Read a TEXT column through `FromStr` (wire enums, dates).
pub(crate) fn parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Optional variant of [`parse_col`].
pub(crate) fn parse_opt_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
