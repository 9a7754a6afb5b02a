use aggrules_core::CharCase;

use super::{full_match, literal};
use crate::engine::CompiledPattern;
use crate::error::RuleError;
use crate::ir::template::RegexTemplate;

/// One piece of a parsed `${name}` template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart<'a> {
    /// Author text, used verbatim as regex syntax.
    Literal(&'a str),
    /// A `${name}` placeholder, holding `name`.
    Placeholder(&'a str),
}

/// Split a template into literal text and `${name}` placeholders.
///
/// A `$` that is not followed by `{` is ordinary text (usually a regex
/// anchor). Names must be non-empty and made of ASCII letters, digits and
/// underscores.
pub fn parse_template(input: &str) -> Result<Vec<TemplatePart<'_>>, RuleError> {
    let mut parts = Vec::new();
    let mut remaining = input;

    while let Some(start) = remaining.find("${") {
        if start > 0 {
            parts.push(TemplatePart::Literal(&remaining[..start]));
        }

        let after_open = &remaining[start + 2..];
        let end = after_open.find('}').ok_or_else(|| {
            RuleError::Template(format!("unclosed placeholder in '{input}': missing '}}'"))
        })?;

        let name = &after_open[..end];
        if name.is_empty() {
            return Err(RuleError::Template(format!(
                "empty placeholder '${{}}' in '{input}'"
            )));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RuleError::Template(format!(
                "malformed placeholder '${{{name}}}' in '{input}'"
            )));
        }
        parts.push(TemplatePart::Placeholder(name));

        remaining = &after_open[end + 1..];
    }

    if !remaining.is_empty() {
        parts.push(TemplatePart::Literal(remaining));
    }

    Ok(parts)
}

/// Substitute `values` into `template`, producing pattern text.
///
/// Each value has its spaces and dots replaced by the template's markers,
/// is folded by the effective case policy and is regex-escaped. The
/// template's own text is left exactly as written.
pub fn render_template(
    template: &RegexTemplate,
    inherited: CharCase,
    values: &[(&str, &str)],
) -> Result<String, RuleError> {
    let case = template.effective_case(inherited);
    let mut out = String::with_capacity(template.template.len());

    for part in parse_template(&template.template)? {
        match part {
            TemplatePart::Literal(text) => out.push_str(text),
            TemplatePart::Placeholder(name) => {
                let value = values
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| {
                        RuleError::Template(format!(
                            "no value supplied for '${{{name}}}' in template '{}'",
                            template.id
                        ))
                    })?;
                let value = value
                    .replace(' ', template.space())
                    .replace('.', template.dot());
                out.push_str(&literal(&value, case));
            }
        }
    }

    Ok(out)
}

/// Render and compile `template` into a whole-string pattern.
pub fn compile_template(
    template: &RegexTemplate,
    inherited: CharCase,
    values: &[(&str, &str)],
) -> Result<CompiledPattern, RuleError> {
    let text = render_template(template, inherited, values)?;
    let regex = full_match(&text, template.effective_case(inherited))?;
    Ok(CompiledPattern::new(template.id.clone(), regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_text() {
        let parts = parse_template("fact_count").unwrap();
        assert_eq!(parts, vec![TemplatePart::Literal("fact_count")]);
    }

    #[test]
    fn parse_mixed() {
        let parts = parse_template("${hierarchy_name}_${level_name}").unwrap();
        assert_eq!(
            parts,
            vec![
                TemplatePart::Placeholder("hierarchy_name"),
                TemplatePart::Literal("_"),
                TemplatePart::Placeholder("level_name"),
            ]
        );
    }

    #[test]
    fn dollar_without_brace_is_literal() {
        let parts = parse_template("^x$").unwrap();
        assert_eq!(parts, vec![TemplatePart::Literal("^x$")]);
    }

    #[test]
    fn parse_errors() {
        assert!(parse_template("${level_name").is_err());
        assert!(parse_template("${}").is_err());
        assert!(parse_template("${level name}").is_err());
    }

    #[test]
    fn level_template_lower_case() {
        let tpl = RegexTemplate::new("logical", "${hierarchy_name}_${level_name}")
            .with_char_case(CharCase::Lower);
        let values = [("hierarchy_name", "Time"), ("level_name", "Day in Year")];

        assert_eq!(
            render_template(&tpl, CharCase::Ignore, &values).unwrap(),
            "time_day_in_year"
        );

        let pattern = compile_template(&tpl, CharCase::Ignore, &values).unwrap();
        assert!(pattern.is_match("time_day_in_year"));
        assert!(!pattern.is_match("TIME_DAY_IN_YEAR"));
        assert_eq!(pattern.id(), "logical");
    }

    #[test]
    fn dots_use_configured_marker() {
        let tpl = RegexTemplate::new("h", "${hierarchy_name}").with_dot("_dot_");
        let values = [("hierarchy_name", "Time.Period")];
        let pattern = compile_template(&tpl, CharCase::Exact, &values).unwrap();
        assert!(pattern.is_match("Time_dot_Period"));
        assert!(!pattern.is_match("Time.Period"));
    }

    #[test]
    fn default_markers_are_underscore() {
        let tpl = RegexTemplate::new("h", "${hierarchy_name}");
        let values = [("hierarchy_name", "Time.Fiscal Period")];
        let pattern = compile_template(&tpl, CharCase::Exact, &values).unwrap();
        assert!(pattern.is_match("Time_Fiscal_Period"));
        assert!(!pattern.is_match("TimeXFiscal_Period"));
    }

    #[test]
    fn empty_marker_deletes() {
        let tpl = RegexTemplate::new("m", "${measure_name}").with_space("");
        let values = [("measure_name", "Unit Sales")];
        let pattern = compile_template(&tpl, CharCase::Exact, &values).unwrap();
        assert!(pattern.is_match("UnitSales"));
    }

    #[test]
    fn values_are_escaped_but_template_text_is_not() {
        let tpl = RegexTemplate::new("m", "${measure_name}_(sum|avg)");
        let values = [("measure_name", "a+b")];
        let pattern = compile_template(&tpl, CharCase::Exact, &values).unwrap();
        assert!(pattern.is_match("a+b_sum"));
        assert!(pattern.is_match("a+b_avg"));
        assert!(!pattern.is_match("aab_sum"));
    }

    #[test]
    fn upper_policy_folds_only_values() {
        let tpl = RegexTemplate::new("m", "agg_${measure_name}").with_char_case(CharCase::Upper);
        let values = [("measure_name", "sales")];
        let pattern = compile_template(&tpl, CharCase::Ignore, &values).unwrap();
        assert!(pattern.is_match("agg_SALES"));
        assert!(!pattern.is_match("AGG_SALES"));
    }

    #[test]
    fn missing_value_is_template_error() {
        let tpl = RegexTemplate::new("m", "${measure_name}");
        let err = compile_template(&tpl, CharCase::Exact, &[]).unwrap_err();
        assert!(matches!(err, RuleError::Template(_)));
    }
}
