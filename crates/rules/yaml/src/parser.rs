use serde::Deserialize;

/// Returns the default value `true` for serde.
const fn default_true() -> bool {
    true
}

/// Top-level YAML rule document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlRuleDocument {
    /// Document name. Defaults to `default`.
    pub tag: Option<String>,
    /// Shared fact-count rules.
    #[serde(default)]
    pub fact_count_matches: Vec<YamlFactCountMatch>,
    /// Shared foreign-key rules.
    #[serde(default)]
    pub foreign_key_matches: Vec<YamlNameMatch>,
    /// Shared table rules.
    #[serde(default)]
    pub table_matches: Vec<YamlNameMatch>,
    /// Shared level mappers.
    #[serde(default)]
    pub level_maps: Vec<YamlMapper>,
    /// Shared measure mappers.
    #[serde(default)]
    pub measure_maps: Vec<YamlMapper>,
    /// Shared ignore mappers.
    #[serde(default)]
    pub ignore_maps: Vec<YamlMapper>,
    /// The aggregate rules, in declaration order.
    #[serde(default)]
    pub rules: Vec<YamlAggRule>,
}

/// A fact-count rule.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlFactCountMatch {
    /// Identity. Required in pools.
    #[serde(default)]
    pub id: String,
    /// Whether the rule is active. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `ignore`, `exact`, `upper` or `lower`.
    pub char_case: Option<String>,
    /// Expected column name. Defaults to `fact_count`.
    pub fact_count_name: Option<String>,
}

/// A table or foreign-key rule.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlNameMatch {
    /// Identity. Required in pools.
    #[serde(default)]
    pub id: String,
    /// Whether the rule is active. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `ignore`, `exact`, `upper` or `lower`.
    pub char_case: Option<String>,
    /// Pattern with one capturing group.
    pub basename: Option<String>,
    /// Regex text placed before the derived name.
    pub pretemplate: Option<String>,
    /// Regex text placed after the derived name.
    pub posttemplate: Option<String>,
}

/// A level, measure or ignore mapper.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlMapper {
    /// Identity. Required in pools.
    #[serde(default)]
    pub id: String,
    /// Whether the mapper is active. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Default case policy for the templates.
    pub char_case: Option<String>,
    /// Ordered alternatives.
    #[serde(default)]
    pub templates: Vec<YamlTemplate>,
}

/// A single `${name}` template.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlTemplate {
    /// Identity within the mapper.
    pub id: String,
    /// Whether the template is active. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Case policy; inherits the mapper's when absent.
    pub char_case: Option<String>,
    /// Regex text with placeholders.
    pub template: String,
    /// Replacement for spaces in substituted values.
    pub space: Option<String>,
    /// Replacement for dots in substituted values.
    pub dot: Option<String>,
}

/// A reference to a pooled object: either a bare id or `{ ref, enabled }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum YamlRef {
    /// Bare id; the reference is enabled.
    Id(String),
    /// Full form.
    Full {
        /// Id of the pooled object.
        #[serde(rename = "ref")]
        ref_id: String,
        /// Whether the reference is active. Defaults to `true`.
        #[serde(default = "default_true")]
        enabled: bool,
    },
}

/// An aggregate rule.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlAggRule {
    /// Rule tag.
    pub tag: String,
    /// Whether this is the default rule.
    #[serde(default)]
    pub default: bool,
    /// Whether the rule is active. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Overrides the fact-count column name.
    pub count_column: Option<String>,
    /// Inline ignore mapper.
    pub ignore_map: Option<YamlMapper>,
    /// Reference to a pooled ignore mapper.
    pub ignore_map_ref: Option<YamlRef>,
    /// Inline fact-count rule.
    pub fact_count_match: Option<YamlFactCountMatch>,
    /// Reference to a pooled fact-count rule.
    pub fact_count_match_ref: Option<YamlRef>,
    /// Inline foreign-key rule.
    pub foreign_key_match: Option<YamlNameMatch>,
    /// Reference to a pooled foreign-key rule.
    pub foreign_key_match_ref: Option<YamlRef>,
    /// Inline table rule.
    pub table_match: Option<YamlNameMatch>,
    /// Reference to a pooled table rule.
    pub table_match_ref: Option<YamlRef>,
    /// Inline level mapper.
    pub level_map: Option<YamlMapper>,
    /// Reference to a pooled level mapper.
    pub level_map_ref: Option<YamlRef>,
    /// Inline measure mapper.
    pub measure_map: Option<YamlMapper>,
    /// Reference to a pooled measure mapper.
    pub measure_map_ref: Option<YamlRef>,
}
