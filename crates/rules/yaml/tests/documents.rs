use aggrules_core::{Level, ListRecorder};
use aggrules_rules::{RuleError, RuleFrontend};
use aggrules_yaml::{YamlFrontend, default_rules};

#[test]
fn default_rules_validate_cleanly() {
    let rules = default_rules().unwrap();
    let mut rec = ListRecorder::new();
    assert!(rules.validate(&mut rec));
    assert!(rec.diagnostics().is_empty(), "{:?}", rec.diagnostics());
}

#[test]
fn default_rules_recognize_aggregate_names() {
    let rules = default_rules().unwrap().into_validated().unwrap();
    let rule = rules.rule(None).unwrap();
    assert_eq!(rule.tag.as_str(), "default");

    let tables = rule.table_matcher("sales_fact_1997").unwrap();
    assert!(tables.matches("agg_c_10_sales_fact_1997"));
    assert!(tables.matches("AGG_L_05_SALES_FACT_1997"));
    assert!(!tables.matches("sales_fact_1997"));

    assert!(rule.fact_count_matcher().unwrap().matches("FACT_COUNT"));
    assert!(rule.foreign_key_matcher("store_id").unwrap().matches("store_id"));

    let levels = rule
        .level_matcher(Some("store_"), "Time", "Day in Year", "day_of_year")
        .unwrap();
    assert_eq!(levels.first_match("time_day_in_year"), Some("logical"));
    assert_eq!(levels.first_match("time_day_of_year"), Some("mixed"));
    assert_eq!(levels.first_match("store_day_of_year"), Some("usage"));
    assert_eq!(levels.first_match("DAY_OF_YEAR"), Some("physical"));
    assert_eq!(levels.first_match("month_of_year"), None);

    let measures = rule.measure_matcher("Unit Sales", "unit_sales", "sum").unwrap();
    assert_eq!(measures.first_match("unit_sales"), Some("one"));
    assert_eq!(measures.first_match("unit_sales_sum"), Some("three"));

    assert!(!rule.ignore_matcher().unwrap().matches("unit_sales"));
}

#[test]
fn custom_document_with_inline_slots() {
    let yaml = r#"
tag: warehouse
rules:
  - tag: upper
    default: true
    count_column: ROW_COUNT
    fact_count_match:
      char_case: upper
    foreign_key_match:
      basename: "FK_(.*)"
      posttemplate: "_FK"
      char_case: upper
    table_match:
      pretemplate: "AGG_.+_"
      basename: "RF_(.*)_TABLE"
    level_map:
      char_case: lower
      templates:
        - id: logical
          template: "${hierarchy_name}_${level_name}"
    measure_map:
      templates:
        - id: one
          template: "${measure_name}"
    ignore_map:
      templates:
        - id: audit
          template: "audit_.*"
"#;
    let rules = YamlFrontend.parse(yaml).unwrap().into_validated().unwrap();
    let rule = rules.rule(Some("upper")).unwrap();

    let fk = rule.foreign_key_matcher("fk_ham_n_eggs").unwrap();
    assert!(fk.matches("HAM_N_EGGS_FK"));
    assert!(!fk.matches("ham_n_eggs_fk"));
    assert!(!fk.matches("ham_n_eggs"));

    let tables = rule.table_matcher("RF_WAREHOUSE_TABLE").unwrap();
    assert!(tables.matches("AGG_10_WAREHOUSE"));
    assert!(tables.matches("agg_this_is_ok_WAREHOUSE"));
    assert!(!tables.matches("RF_WAREHOUSE_TABLE"));
    assert!(!tables.matches("AGG_10_OTHER"));

    let levels = rule.level_matcher(None, "Time", "Day in Year", "d").unwrap();
    assert!(levels.matches("time_day_in_year"));
    assert!(!levels.matches("TIME_DAY_IN_YEAR"));

    let count = rule.fact_count_matcher().unwrap();
    assert!(count.matches("ROW_COUNT"));
    assert!(!count.matches("row_count"));

    let ignore = rule.ignore_matcher().unwrap();
    assert!(ignore.matches("AUDIT_USER"));
    assert!(!ignore.matches("unit_sales"));
}

#[test]
fn broken_document_reports_every_problem() {
    let yaml = r#"
tag: broken
level_maps:
  - id: lxx
    templates:
      - id: bad
        template: "${measure_name}"
rules:
  - tag: first
    default: true
    level_map_ref: lxx
    table_match_ref: missing
  - tag: second
    default: true
"#;
    let rules = YamlFrontend.parse(yaml).unwrap();
    let mut rec = ListRecorder::new();
    assert!(!rules.validate(&mut rec));

    let errors: Vec<String> = rec.errors().map(ToString::to_string).collect();
    let has = |needle: &str| errors.iter().any(|e| e.contains(needle));

    assert!(has("AggRules[broken] > LevelMap[lxx] > Regex[bad]: illegal template name 'measure_name'"));
    assert!(has("AggRules[broken]: 2 AggRules are flagged default: first, second"));
    assert!(has("AggRules[broken] > AggRule[first] > TableMatch: TableMatch 'missing' not found"));
    assert!(has("AggRules[broken] > AggRule[second] > MeasureMap: neither base nor baseref is ok"));
    assert_eq!(rec.count(Level::Warn), 0);

    let Err(RuleError::Invalid(diagnostics)) = rules.into_validated() else {
        panic!("expected invalid document");
    };
    assert_eq!(diagnostics.len(), errors.len());
}

#[test]
fn parse_file_reads_documents() {
    let dir = std::env::temp_dir().join(format!("aggrules-yaml-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.yaml");
    std::fs::write(&path, aggrules_yaml::DEFAULT_RULES_YAML).unwrap();

    let rules = YamlFrontend.parse_file(&path).unwrap();
    assert_eq!(rules.tag().as_str(), "default");
    assert_eq!(rules.rules().len(), 1);

    std::fs::remove_dir_all(&dir).unwrap();
}
