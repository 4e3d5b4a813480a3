//! Positional bind parameters for composed statements.

use rusqlite::types::{ToSql, ToSqlOutput};

/// A value bound to a `?N` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
  Text(String),
  Integer(i64),
}

impl ToSql for BindValue {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    match self {
      Self::Text(s) => s.to_sql(),
      Self::Integer(i) => i.to_sql(),
    }
  }
}

/// Append a text parameter and return its 1-based placeholder index.
pub(super) fn push_text(binds: &mut Vec<BindValue>, value: String) -> usize {
  binds.push(BindValue::Text(value));
  binds.len()
}

pub(super) fn push_integer(binds: &mut Vec<BindValue>, value: i64) -> usize {
  binds.push(BindValue::Integer(value));
  binds.len()
}

/// Append one parameter per value and return the placeholder list for an `IN`
/// clause, e.g. `?3, ?4`. Callers handle the empty case themselves.
pub(super) fn push_in_list<I>(binds: &mut Vec<BindValue>, values: I) -> String
where
  I: IntoIterator<Item = BindValue>,
{
  values
    .into_iter()
    .map(|value| {
      binds.push(value);
      format!("?{}", binds.len())
    })
    .collect::<Vec<_>>()
    .join(", ")
}
