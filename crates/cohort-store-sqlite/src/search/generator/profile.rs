use cohort_core::{Result, facet::{FacetGenerator, FacetValue}};

use super::{
  FacetSqlGenerator, Join, PredicateContext, expect_strings, text_in, unknown_field,
};

/// Exact-set match on a profile column.
pub(super) struct ProfileFacetSqlGenerator;

fn column(key: &str) -> Option<&'static str> {
  match key {
    "sexAtBirth" => Some("p.sex_at_birth"),
    "givenName" => Some("p.given_name"),
    "familyName" => Some("p.family_name"),
    "contactEmail" => Some("p.contact_email"),
    "phoneNumber" => Some("p.phone_number"),
    _ => None,
  }
}

impl FacetSqlGenerator for ProfileFacetSqlGenerator {
  fn kind(&self) -> FacetGenerator { FacetGenerator::Profile }

  fn required_joins(&self) -> &'static [Join] { &[Join::Profile] }

  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String> {
    let value = expect_strings(self.kind(), value)?;
    let column = column(&value.key).ok_or_else(|| unknown_field(self.kind(), &value.key))?;
    Ok(text_in(column, &value.values, &mut cx.binds))
  }
}
