use std::collections::HashSet;
use std::marker::PhantomData;

use aggrules_core::{CharCase, Recorder};

use super::RuleObject;
use super::template::RegexTemplate;
use crate::compile::{TemplatePart, compile_template, parse_template};
use crate::engine::Matcher;
use crate::error::RuleError;

/// Value substituted for every placeholder when a template is test-compiled
/// during validation.
const PROBE_VALUE: &str = "x";

/// The contract a mapper type places on its templates: which `${name}`
/// placeholders are legal.
pub trait MapperKind {
    /// Kind name used in diagnostics.
    const KIND: &'static str;
    /// Legal placeholder names.
    const PLACEHOLDERS: &'static [&'static str];
    /// Whether a mapper with no templates is suspicious.
    const WARN_WHEN_EMPTY: bool = true;
}

/// Placeholders for level columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelNames;

impl MapperKind for LevelNames {
    const KIND: &'static str = "LevelMap";
    const PLACEHOLDERS: &'static [&'static str] = &[
        "usage_prefix",
        "hierarchy_name",
        "level_name",
        "level_column_name",
    ];
}

/// Placeholders for measure columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureNames;

impl MapperKind for MeasureNames {
    const KIND: &'static str = "MeasureMap";
    const PLACEHOLDERS: &'static [&'static str] =
        &["measure_name", "measure_column_name", "aggregate_name"];
}

/// Ignored columns: templates are raw column patterns with no placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreNames;

impl MapperKind for IgnoreNames {
    const KIND: &'static str = "IgnoreMap";
    const PLACEHOLDERS: &'static [&'static str] = &[];
    // Skipping nothing is the usual case.
    const WARN_WHEN_EMPTY: bool = false;
}

/// An ordered list of [`RegexTemplate`]s whose legal placeholders are fixed
/// by `K`. The templates are alternatives: the first to match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMapper<K> {
    /// Identity.
    pub id: String,
    /// Whether the mapper is switched on.
    pub enabled: bool,
    /// Default case policy for templates that do not set their own.
    pub char_case: Option<CharCase>,
    /// Alternatives in declaration order.
    pub templates: Vec<RegexTemplate>,
    kind: PhantomData<fn() -> K>,
}

/// Recognizes aggregate columns that hold a dimension level.
pub type LevelMap = TemplateMapper<LevelNames>;

/// Recognizes aggregate columns that hold a measure.
pub type MeasureMap = TemplateMapper<MeasureNames>;

/// Recognizes aggregate columns that recognition should skip.
pub type IgnoreMap = TemplateMapper<IgnoreNames>;

impl<K: MapperKind> TemplateMapper<K> {
    /// Create an enabled mapper with no templates.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            char_case: None,
            templates: Vec::new(),
            kind: PhantomData,
        }
    }

    /// Append a template.
    #[must_use]
    pub fn with_template(mut self, template: RegexTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Set the default case policy.
    #[must_use]
    pub fn with_char_case(mut self, char_case: CharCase) -> Self {
        self.char_case = Some(char_case);
        self
    }

    /// Set the enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The default case policy in force for this mapper's templates.
    #[must_use]
    pub fn char_case(&self) -> CharCase {
        self.char_case.unwrap_or_default()
    }

    /// Compile every enabled template against `values`, in order.
    pub fn matcher_with(&self, values: &[(&str, &str)]) -> Result<Matcher, RuleError> {
        let inherited = self.char_case();
        let patterns = self
            .templates
            .iter()
            .filter(|t| t.enabled)
            .map(|t| compile_template(t, inherited, values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Matcher::new(patterns))
    }
}

impl LevelMap {
    /// Matcher for the aggregate column holding one level.
    ///
    /// `usage_prefix` is the dimension usage's column prefix, if any.
    pub fn matcher(
        &self,
        usage_prefix: Option<&str>,
        hierarchy_name: &str,
        level_name: &str,
        level_column_name: &str,
    ) -> Result<Matcher, RuleError> {
        self.matcher_with(&[
            ("usage_prefix", usage_prefix.unwrap_or_default()),
            ("hierarchy_name", hierarchy_name),
            ("level_name", level_name),
            ("level_column_name", level_column_name),
        ])
    }
}

impl MeasureMap {
    /// Matcher for the aggregate column holding one measure.
    pub fn matcher(
        &self,
        measure_name: &str,
        measure_column_name: &str,
        aggregate_name: &str,
    ) -> Result<Matcher, RuleError> {
        self.matcher_with(&[
            ("measure_name", measure_name),
            ("measure_column_name", measure_column_name),
            ("aggregate_name", aggregate_name),
        ])
    }
}

impl IgnoreMap {
    /// Matcher for columns that should be skipped.
    pub fn matcher(&self) -> Result<Matcher, RuleError> {
        self.matcher_with(&[])
    }
}

impl<K: MapperKind> RuleObject for TemplateMapper<K> {
    const KIND: &'static str = K::KIND;

    fn id(&self) -> &str {
        &self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn validate<R: Recorder>(&self, recorder: &mut R) -> bool {
        if K::WARN_WHEN_EMPTY && self.templates.is_empty() {
            recorder.warn("no templates; this map matches nothing");
        }

        let mut ok = true;
        let mut seen = HashSet::new();
        for template in &self.templates {
            if !seen.insert(template.id.as_str()) {
                recorder.warn(&format!("duplicate template id '{}'", template.id));
            }
            let context = format!("Regex[{}]", template.id);
            ok &= recorder.scoped(&context, |rec| {
                validate_template::<K, R>(template, self.char_case(), rec)
            });
        }
        ok
    }
}

fn validate_template<K: MapperKind, R: Recorder>(
    template: &RegexTemplate,
    inherited: CharCase,
    recorder: &mut R,
) -> bool {
    let parts = match parse_template(&template.template) {
        Ok(parts) => parts,
        Err(e) => {
            recorder.error(&e.to_string());
            return false;
        }
    };

    let mut ok = true;
    for part in &parts {
        if let TemplatePart::Placeholder(name) = part
            && !K::PLACEHOLDERS.iter().any(|legal| legal == name)
        {
            let message = if K::PLACEHOLDERS.is_empty() {
                format!("illegal template name '{name}': {} templates take no names", K::KIND)
            } else {
                format!(
                    "illegal template name '{name}': legal names are {}",
                    K::PLACEHOLDERS.join(", ")
                )
            };
            recorder.error(&message);
            ok = false;
        }
    }
    if !ok {
        return false;
    }

    let probe: Vec<(&str, &str)> = K::PLACEHOLDERS.iter().map(|n| (*n, PROBE_VALUE)).collect();
    if let Err(e) = compile_template(template, inherited, &probe) {
        recorder.error(&format!("template does not compile: {e}"));
        return false;
    }

    if template.template.is_empty() {
        recorder.warn("template is empty; it only matches an empty name");
    }
    true
}

#[cfg(test)]
mod tests {
    use aggrules_core::{Level, ListRecorder};

    use super::*;

    fn default_level_map() -> LevelMap {
        LevelMap::new("lxx")
            .with_template(RegexTemplate::new("logical", "${hierarchy_name}_${level_name}"))
            .with_template(RegexTemplate::new("mixed", "${hierarchy_name}_${level_column_name}"))
            .with_template(RegexTemplate::new("usage", "${usage_prefix}${level_column_name}"))
            .with_template(RegexTemplate::new("physical", "${level_column_name}"))
    }

    #[test]
    fn level_map_matches_in_order() {
        let map = default_level_map();
        let m = map
            .matcher(Some("store_"), "Time", "Day in Year", "day_of_year")
            .unwrap();
        assert_eq!(m.first_match("time_day_in_year"), Some("logical"));
        assert_eq!(m.first_match("Time_day_of_year"), Some("mixed"));
        assert_eq!(m.first_match("store_day_of_year"), Some("usage"));
        assert_eq!(m.first_match("DAY_OF_YEAR"), Some("physical"));
        assert_eq!(m.first_match("week_of_year"), None);
    }

    #[test]
    fn lower_case_level_template() {
        let map = LevelMap::new("l").with_char_case(CharCase::Lower).with_template(
            RegexTemplate::new("logical", "${hierarchy_name}_${level_name}"),
        );
        let m = map.matcher(None, "Time", "Day in Year", "day").unwrap();
        assert!(m.matches("time_day_in_year"));
        assert!(!m.matches("TIME_DAY_IN_YEAR"));
    }

    #[test]
    fn measure_map_matches() {
        let map = MeasureMap::new("mxx")
            .with_template(RegexTemplate::new("one", "${measure_name}"))
            .with_template(RegexTemplate::new("two", "${measure_column_name}"))
            .with_template(RegexTemplate::new(
                "three",
                "${measure_column_name}_${aggregate_name}",
            ));
        let m = map.matcher("Unit Sales", "unit_sales", "sum").unwrap();
        assert_eq!(m.first_match("unit_sales"), Some("one"));
        assert_eq!(m.first_match("UNIT_SALES_SUM"), Some("three"));
        assert!(!m.matches("store_sales"));
    }

    #[test]
    fn ordered_or_uses_later_template() {
        let map = MeasureMap::new("m")
            .with_template(RegexTemplate::new("a", "never_${measure_name}"))
            .with_template(RegexTemplate::new("b", "${measure_column_name}"));
        let m = map.matcher("Sales", "store_sales", "sum").unwrap();
        assert!(m.matches("store_sales"));
        assert_eq!(m.first_match("store_sales"), Some("b"));
    }

    #[test]
    fn empty_mapper_matches_nothing() {
        let map = MeasureMap::new("m");
        let m = map.matcher("Sales", "sales", "sum").unwrap();
        assert!(m.is_never());
        assert!(!m.matches("sales"));
    }

    #[test]
    fn disabled_templates_are_skipped() {
        let map = MeasureMap::new("m")
            .with_template(RegexTemplate::new("a", "${measure_name}").with_enabled(false));
        let m = map.matcher("Sales", "sales", "sum").unwrap();
        assert!(!m.matches("Sales"));
    }

    #[test]
    fn ignore_map_uses_raw_patterns() {
        let map = IgnoreMap::new("ixx").with_template(RegexTemplate::new("audit", "audit_.*"));
        let m = map.matcher().unwrap();
        assert!(m.matches("AUDIT_TS"));
        assert!(!m.matches("sales"));
    }

    #[test]
    fn validate_accepts_default_level_map() {
        let mut rec = ListRecorder::new();
        assert!(default_level_map().validate(&mut rec));
        assert!(rec.diagnostics().is_empty());
    }

    #[test]
    fn validate_rejects_illegal_placeholder() {
        let map = MeasureMap::new("m")
            .with_template(RegexTemplate::new("bad", "${level_name}_${measure_name}"));
        let mut rec = ListRecorder::new();
        assert!(!map.validate(&mut rec));
        let errors: Vec<_> = rec.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context, "Regex[bad]");
        assert!(errors[0].message.contains("'level_name'"));
    }

    #[test]
    fn validate_rejects_placeholders_in_ignore_map() {
        let map = IgnoreMap::new("i").with_template(RegexTemplate::new("bad", "${level_name}"));
        let mut rec = ListRecorder::new();
        assert!(!map.validate(&mut rec));
        assert!(rec.errors().next().unwrap().message.contains("take no names"));
    }

    #[test]
    fn validate_rejects_broken_regex_text() {
        let map = MeasureMap::new("m").with_template(RegexTemplate::new("bad", "${measure_name}("));
        let mut rec = ListRecorder::new();
        assert!(!map.validate(&mut rec));
        assert!(rec.errors().next().unwrap().message.starts_with("template does not compile"));
    }

    #[test]
    fn validate_warns_on_empty_and_duplicates() {
        let mut rec = ListRecorder::new();
        assert!(MeasureMap::new("m").validate(&mut rec));
        assert_eq!(rec.count(Level::Warn), 1);

        let map = MeasureMap::new("m")
            .with_template(RegexTemplate::new("a", "${measure_name}"))
            .with_template(RegexTemplate::new("a", "${measure_column_name}"));
        let mut rec = ListRecorder::new();
        assert!(map.validate(&mut rec));
        assert_eq!(rec.count(Level::Warn), 1);
        assert!(!rec.has_errors());
    }

    #[test]
    fn empty_ignore_map_is_quiet() {
        let mut rec = ListRecorder::new();
        assert!(IgnoreMap::new("i").validate(&mut rec));
        assert!(rec.diagnostics().is_empty());
    }
}
