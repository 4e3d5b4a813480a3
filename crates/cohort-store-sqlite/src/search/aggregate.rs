//! The result aggregator: raw rows in, one result per enrollee out.

use std::collections::HashSet;

use cohort_core::search::EnrolleeSearchResult;

use crate::{Result, encode::RawSearchRow};

/// Decode `rows` into search results, keeping the first row seen for each
/// enrollee and the statement's ordering.
///
/// The composed statement already yields one row per enrollee; a repeated
/// enrollee id means a join fanned out and is dropped with a warning.
pub fn aggregate(rows: Vec<RawSearchRow>) -> Result<Vec<EnrolleeSearchResult>> {
  let mut seen = HashSet::with_capacity(rows.len());
  let mut results = Vec::with_capacity(rows.len());

  for row in rows {
    let result = row.into_result()?;
    if seen.insert(result.enrollee.id) {
      results.push(result);
    } else {
      tracing::warn!(
        enrollee_id = %result.enrollee.id,
        "dropping duplicate search row"
      );
    }
  }

  Ok(results)
}
