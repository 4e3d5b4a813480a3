use cohort_core::{
  Result,
  facet::{FacetGenerator, FacetValue, FacetValueKind},
};

use super::{
  super::bind::push_text, FacetSqlGenerator, Join, MATCH_ALL, PredicateContext,
  mismatch,
};
use crate::functions::FOLD_CASE;

/// Columns a keyword is matched against.
const KEYWORD_COLUMNS: [&str; 4] =
  ["p.given_name", "p.family_name", "p.contact_email", "e.shortcode"];

/// Case-insensitive substring match over names, email and shortcode. Both the
/// term and each column are folded with Unicode lowercase rules; the term is
/// bound once and referenced by every column check.
pub(super) struct KeywordFacetSqlGenerator;

impl FacetSqlGenerator for KeywordFacetSqlGenerator {
  fn kind(&self) -> FacetGenerator { FacetGenerator::Keyword }

  fn required_joins(&self) -> &'static [Join] { &[Join::Profile] }

  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String> {
    let FacetValue::Keyword(keyword) = value else {
      return Err(mismatch(self.kind(), FacetValueKind::Keyword, value));
    };
    let term = keyword.term.trim();
    if term.is_empty() {
      return Ok(MATCH_ALL.to_owned());
    }

    let pattern = format!("%{}%", escape_like_pattern(&term.to_lowercase()));
    let idx = push_text(&mut cx.binds, pattern);
    let checks = KEYWORD_COLUMNS
      .iter()
      .map(|column| format!("{FOLD_CASE}({column}) LIKE ?{idx} ESCAPE '\\'"))
      .collect::<Vec<_>>();
    Ok(checks.join(" OR "))
  }
}

/// Escape LIKE meta-characters so the term is matched literally.
fn escape_like_pattern(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
