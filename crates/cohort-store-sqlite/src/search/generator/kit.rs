use cohort_core::{
  Error, Result,
  facet::{FacetGenerator, FacetValue},
};

use super::{
  super::bind::BindValue, FacetSqlGenerator, Join, PredicateContext, column_in,
  expect_strings, unknown_field,
};
use crate::encode::{encode_kit_status, parse_kit_status};

/// Exact-set match on the status of the newest kit request. Enrollees without
/// any kit request never match.
pub(super) struct KitStatusFacetSqlGenerator;

impl FacetSqlGenerator for KitStatusFacetSqlGenerator {
  fn kind(&self) -> FacetGenerator { FacetGenerator::KitStatus }

  fn required_joins(&self) -> &'static [Join] { &[Join::LatestKitRequest] }

  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String> {
    let value = expect_strings(self.kind(), value)?;
    if value.key != "status" {
      return Err(unknown_field(self.kind(), &value.key));
    }
    let statuses = value
      .values
      .iter()
      .map(|v| {
        parse_kit_status(v)
          .map(|s| BindValue::Text(encode_kit_status(s).to_owned()))
          .ok_or_else(|| Error::InvalidFacetValue {
            field: value.key.clone(),
            value: v.clone(),
          })
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(column_in("latest_kit.status", statuses, &mut cx.binds))
  }
}
