use aggrules_core::CharCase;
use regex::{Regex, RegexBuilder};

use super::{full_match, literal};
use crate::engine::{CompiledPattern, Matcher};
use crate::error::RuleError;

/// Compile a basename extraction pattern.
///
/// The pattern must contain exactly one capturing group. It is matched
/// against the whole basis string and ignores case, so that `FK_(.*)`
/// extracts from `fk_store_id` as well as from `FK_STORE_ID`.
pub fn compile_basename(pattern: &str) -> Result<Regex, RuleError> {
    let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .map_err(|e| RuleError::InvalidRegex(format!("basename '{pattern}': {e}")))?;

    // `captures_len` counts the implicit whole-match group.
    match regex.captures_len() - 1 {
        1 => Ok(regex),
        n => Err(RuleError::InvalidRegex(format!(
            "basename '{pattern}' must have exactly one capturing group, found {n}"
        ))),
    }
}

/// Extract the derived literal from `basis`.
///
/// Without a basename pattern the basis is used verbatim. With one, the text
/// of its capturing group is used; `None` means the basis did not match.
pub fn derive_literal<'a>(basis: &'a str, basename: Option<&Regex>) -> Option<&'a str> {
    match basename {
        None => Some(basis),
        Some(regex) => regex
            .captures(basis)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str()),
    }
}

/// Build the matcher for a table or foreign-key rule.
///
/// The final pattern is `pretemplate + folded(derived) + posttemplate`.
/// Only the derived literal is folded and escaped; the pre and post
/// templates are author regex text. A basis that does not match the
/// basename pattern yields a matcher that rejects everything.
pub fn derive_matcher(
    id: &str,
    basis: &str,
    basename: Option<&Regex>,
    pretemplate: &str,
    posttemplate: &str,
    case: CharCase,
) -> Result<Matcher, RuleError> {
    let Some(derived) = derive_literal(basis, basename) else {
        tracing::debug!(rule = id, basis, "basis does not match basename pattern");
        return Ok(Matcher::never());
    };

    let pattern = format!("{pretemplate}{}{posttemplate}", literal(derived, case));
    let regex = full_match(&pattern, case)?;
    Ok(Matcher::new(vec![CompiledPattern::new(id, regex)]))
}
