use cohort_core::{
  Result,
  facet::{FacetGenerator, FacetValue, FacetValueKind},
};

use super::{
  super::bind::{push_integer, push_text},
  FacetSqlGenerator, Join, MATCH_ALL, PredicateContext, mismatch, unknown_field,
};
use crate::encode::encode_date;

/// Range match on age in whole years, computed from `p.birth_date` as of the
/// context date. Rows without a birth date have no age and fail any bounded
/// range.
pub(super) struct ProfileAgeFacetSqlGenerator;

impl FacetSqlGenerator for ProfileAgeFacetSqlGenerator {
  fn kind(&self) -> FacetGenerator { FacetGenerator::ProfileAge }

  fn required_joins(&self) -> &'static [Join] { &[Join::Profile] }

  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String> {
    let FacetValue::IntRange(range) = value else {
      return Err(mismatch(self.kind(), FacetValueKind::IntRange, value));
    };
    if range.key != "age" {
      return Err(unknown_field(self.kind(), &range.key));
    }
    if range.is_unbounded() {
      return Ok(MATCH_ALL.to_owned());
    }

    let as_of = push_text(&mut cx.binds, encode_date(cx.as_of));
    // Year difference, minus one if the birthday has not come round yet.
    let age = format!(
      "(CAST(strftime('%Y', ?{as_of}) AS INTEGER) \
        - CAST(strftime('%Y', p.birth_date) AS INTEGER) \
        - (strftime('%m-%d', ?{as_of}) < strftime('%m-%d', p.birth_date)))"
    );

    let mut bounds = Vec::with_capacity(2);
    if let Some(min) = range.min {
      let idx = push_integer(&mut cx.binds, min);
      bounds.push(format!("{age} >= ?{idx}"));
    }
    if let Some(max) = range.max {
      let idx = push_integer(&mut cx.binds, max);
      bounds.push(format!("{age} <= ?{idx}"));
    }
    Ok(bounds.join(" AND "))
  }
}
