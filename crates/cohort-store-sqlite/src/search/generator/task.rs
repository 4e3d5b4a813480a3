use cohort_core::{
  Result,
  facet::{FacetGenerator, FacetValue, FacetValueKind, StableIdStatusFacetValue},
};

use super::{
  super::bind::{BindValue, push_text},
  FacetSqlGenerator, Join, MATCH_ALL, MATCH_NONE, PredicateContext, column_in,
  mismatch, unknown_field,
};
use crate::encode::encode_task_status;

/// Per-stable-id task status requirements.
///
/// Each requirement becomes its own `EXISTS` check correlated to the enrollee,
/// and the checks are ANDed. A single task row therefore can never satisfy two
/// requirements, and joining tasks directly (which would duplicate enrollee
/// rows) is never needed.
pub(super) struct ParticipantTaskFacetSqlGenerator;

impl FacetSqlGenerator for ParticipantTaskFacetSqlGenerator {
  fn kind(&self) -> FacetGenerator { FacetGenerator::ParticipantTask }

  fn required_joins(&self) -> &'static [Join] { &[] }

  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String> {
    let FacetValue::CombinedStableId(combined) = value else {
      return Err(mismatch(self.kind(), FacetValueKind::CombinedStableId, value));
    };
    if combined.key != "status" {
      return Err(unknown_field(self.kind(), &combined.key));
    }
    if combined.values.is_empty() {
      return Ok(MATCH_ALL.to_owned());
    }

    let checks = combined
      .values
      .iter()
      .map(|requirement| task_exists(requirement, cx))
      .collect::<Vec<_>>();
    Ok(checks.join(" AND "))
  }
}

fn task_exists(requirement: &StableIdStatusFacetValue, cx: &mut PredicateContext) -> String {
  if requirement.statuses.is_empty() {
    return MATCH_NONE.to_owned();
  }
  let stable_id = push_text(&mut cx.binds, requirement.stable_id.clone());
  let statuses = requirement
    .statuses
    .iter()
    .map(|s| BindValue::Text(encode_task_status(*s).to_owned()))
    .collect();
  let status_check = column_in("pt.status", statuses, &mut cx.binds);
  format!(
    "EXISTS (SELECT 1 FROM participant_tasks pt \
     WHERE pt.enrollee_id = e.id AND pt.target_stable_id = ?{stable_id} AND {status_check})"
  )
}
