//! Scalar SQL functions registered on every connection.

use rusqlite::functions::FunctionFlags;

/// `fold_case(text)`: Unicode lowercase, matching `str::to_lowercase`. The
/// built-in `lower()` only folds ASCII. `NULL` stays `NULL`.
pub const FOLD_CASE: &str = "fold_case";

pub fn register(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    FOLD_CASE,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let value: Option<String> = ctx.get(0)?;
      Ok(value.map(|s| s.to_lowercase()))
    },
  )
}
