use cohort_core::{
  Error, Result,
  facet::{FacetGenerator, FacetValue},
};

use super::{
  super::bind::BindValue, FacetSqlGenerator, Join, PredicateContext, column_in,
  expect_strings, text_in, unknown_field,
};

/// Exact-set match on an enrollee column.
pub(super) struct EnrolleeFacetSqlGenerator;

impl FacetSqlGenerator for EnrolleeFacetSqlGenerator {
  fn kind(&self) -> FacetGenerator { FacetGenerator::Enrollee }

  fn required_joins(&self) -> &'static [Join] { &[] }

  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String> {
    let value = expect_strings(self.kind(), value)?;
    match value.key.as_str() {
      "shortcode" => Ok(text_in("e.shortcode", &value.values, &mut cx.binds)),
      "consented" => {
        let flags = value
          .values
          .iter()
          .map(|v| match v.as_str() {
            "true" => Ok(BindValue::Integer(1)),
            "false" => Ok(BindValue::Integer(0)),
            other => Err(Error::InvalidFacetValue {
              field: value.key.clone(),
              value: other.to_owned(),
            }),
          })
          .collect::<Result<Vec<_>>>()?;
        Ok(column_in("e.consented", flags, &mut cx.binds))
      }
      other => Err(unknown_field(self.kind(), other)),
    }
  }
}
