use std::path::Path;

use aggrules_core::CharCase;
use aggrules_rules::{
    AggRule, AggRules, FactCountMatch, NameMatch, Pooled, RegexTemplate, RuleError, RuleFrontend,
    RuleObject, RuleRef, Slot, TemplateMapper,
};
use aggrules_rules::ir::mapper::{IgnoreNames, LevelNames, MapperKind, MeasureNames};
use aggrules_rules::ir::name::{ForeignKeyNames, NameKind, TableNames};

use crate::parser::{
    YamlAggRule, YamlFactCountMatch, YamlMapper, YamlNameMatch, YamlRef, YamlRuleDocument,
    YamlTemplate,
};

/// Tag given to a document that does not name itself.
const DEFAULT_TAG: &str = "default";

/// A [`RuleFrontend`] implementation that parses
/// YAML rule documents into an unvalidated [`AggRules`] registry.
pub struct YamlFrontend;

impl RuleFrontend for YamlFrontend {
    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(&self, content: &str) -> Result<AggRules, RuleError> {
        let document: YamlRuleDocument = serde_yaml_ng::from_str(content)
            .map_err(|e| RuleError::Parse(format!("YAML parse error: {e}")))?;
        compile_document(document)
    }

    fn parse_file(&self, path: &Path) -> Result<AggRules, RuleError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Parse(format!("cannot read {}: {e}", path.display())))?;

        let document: YamlRuleDocument = serde_yaml_ng::from_str(&content).map_err(|e| {
            RuleError::Parse(format!("YAML parse error in {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), "parsed rule document");
        compile_document(document)
    }
}

/// Compile a parsed document into the registry.
fn compile_document(document: YamlRuleDocument) -> Result<AggRules, RuleError> {
    let tag = document.tag.unwrap_or_else(|| DEFAULT_TAG.to_owned());
    let mut rules = AggRules::new(tag);

    for fact_count in document.fact_count_matches {
        register(&mut rules, compile_fact_count(fact_count)?)?;
    }
    for foreign_key in document.foreign_key_matches {
        register(&mut rules, compile_name_match::<ForeignKeyNames>(foreign_key)?)?;
    }
    for table in document.table_matches {
        register(&mut rules, compile_name_match::<TableNames>(table)?)?;
    }
    for level_map in document.level_maps {
        register(&mut rules, compile_mapper::<LevelNames>(level_map)?)?;
    }
    for measure_map in document.measure_maps {
        register(&mut rules, compile_mapper::<MeasureNames>(measure_map)?)?;
    }
    for ignore_map in document.ignore_maps {
        register(&mut rules, compile_mapper::<IgnoreNames>(ignore_map)?)?;
    }
    for rule in document.rules {
        rules.push_rule(compile_rule(rule)?);
    }

    tracing::debug!(tag = %rules.tag(), rules = rules.rules().len(), "compiled rule document");
    Ok(rules)
}

/// Register a pooled object; a duplicate id is a syntax error of the document.
fn register<T: Pooled>(rules: &mut AggRules, object: T) -> Result<(), RuleError> {
    rules.register(object).map_err(|e| match e {
        RuleError::DuplicateId { .. } => RuleError::Parse(e.to_string()),
        other => other,
    })
}

fn parse_char_case(value: Option<&str>) -> Result<Option<CharCase>, RuleError> {
    value
        .map(|v| v.parse::<CharCase>().map_err(|e| RuleError::Parse(e.to_string())))
        .transpose()
}

fn compile_fact_count(yaml: YamlFactCountMatch) -> Result<FactCountMatch, RuleError> {
    let mut rule = FactCountMatch::new(yaml.id).with_enabled(yaml.enabled);
    if let Some(char_case) = parse_char_case(yaml.char_case.as_deref())? {
        rule = rule.with_char_case(char_case);
    }
    if let Some(name) = yaml.fact_count_name {
        rule = rule.with_fact_count_name(name);
    }
    Ok(rule)
}

fn compile_name_match<K: NameKind>(yaml: YamlNameMatch) -> Result<NameMatch<K>, RuleError> {
    let mut rule = NameMatch::<K>::new(yaml.id).with_enabled(yaml.enabled);
    if let Some(char_case) = parse_char_case(yaml.char_case.as_deref())? {
        rule = rule.with_char_case(char_case);
    }
    rule.basename = yaml.basename;
    rule.pretemplate = yaml.pretemplate;
    rule.posttemplate = yaml.posttemplate;
    Ok(rule)
}

fn compile_mapper<K: MapperKind>(yaml: YamlMapper) -> Result<TemplateMapper<K>, RuleError> {
    let mut mapper = TemplateMapper::<K>::new(yaml.id).with_enabled(yaml.enabled);
    mapper.char_case = parse_char_case(yaml.char_case.as_deref())?;
    for template in yaml.templates {
        mapper = mapper.with_template(compile_template(template)?);
    }
    Ok(mapper)
}

fn compile_template(yaml: YamlTemplate) -> Result<RegexTemplate, RuleError> {
    let mut template = RegexTemplate::new(yaml.id, yaml.template).with_enabled(yaml.enabled);
    template.char_case = parse_char_case(yaml.char_case.as_deref())?;
    template.space = yaml.space;
    template.dot = yaml.dot;
    Ok(template)
}

fn compile_ref(yaml: YamlRef) -> RuleRef {
    match yaml {
        YamlRef::Id(id) => RuleRef::new(id),
        YamlRef::Full { ref_id, enabled } => RuleRef::new(ref_id).with_enabled(enabled),
    }
}

/// Build a slot from its inline and reference halves. Either, both or
/// neither may be present; validation judges the combination.
fn compile_slot<T: RuleObject, Y>(
    inline: Option<Y>,
    reference: Option<YamlRef>,
    compile: impl FnOnce(Y) -> Result<T, RuleError>,
) -> Result<Slot<T>, RuleError> {
    let mut slot = Slot::empty();
    if let Some(inline) = inline {
        slot = slot.with_inline(compile(inline)?);
    }
    if let Some(reference) = reference {
        slot = slot.with_reference(compile_ref(reference));
    }
    Ok(slot)
}

fn compile_rule(yaml: YamlAggRule) -> Result<AggRule, RuleError> {
    let mut rule = AggRule::new(yaml.tag)
        .with_default(yaml.default)
        .with_enabled(yaml.enabled)
        .with_ignore_map(compile_slot(yaml.ignore_map, yaml.ignore_map_ref, compile_mapper)?)
        .with_fact_count_match(compile_slot(
            yaml.fact_count_match,
            yaml.fact_count_match_ref,
            compile_fact_count,
        )?)
        .with_foreign_key_match(compile_slot(
            yaml.foreign_key_match,
            yaml.foreign_key_match_ref,
            compile_name_match,
        )?)
        .with_table_match(compile_slot(
            yaml.table_match,
            yaml.table_match_ref,
            compile_name_match,
        )?)
        .with_level_map(compile_slot(yaml.level_map, yaml.level_map_ref, compile_mapper)?)
        .with_measure_map(compile_slot(
            yaml.measure_map,
            yaml.measure_map_ref,
            compile_mapper,
        )?);
    rule.count_column = yaml.count_column;
    Ok(rule)
}
