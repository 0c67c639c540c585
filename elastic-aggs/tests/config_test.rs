//! Tests for loading aggregation definition files

use elastic_aggs::{
    AggError, Aggregation, AggregationsConfig, AvgAggregation, Script, StatsAggregation,
};
use serde_json::{json, Map};
use tempfile::tempdir;

#[test]
fn test_load_from_file_matches_builder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aggs.toml");
    std::fs::write(
        &path,
        r#"
size = 0

[aggregations.grades_stats]
type = "stats"
field = "grade"
script = { source = "_value * params.factor", params = { factor = 2 } }
format = "0.0"

[aggregations.grades_stats.aggregations.avg_bonus]
type = "avg"
field = "bonus"
"#,
    )
    .unwrap();

    let config = AggregationsConfig::load(&path).unwrap();
    let from_file = config.build().unwrap().source().unwrap();

    let mut params = Map::new();
    params.insert("factor".to_string(), json!(2));
    let built = StatsAggregation::new()
        .field("grade")
        .script(Script::new("_value * params.factor").params(params))
        .format("0.0")
        .sub_aggregation("avg_bonus", AvgAggregation::new().field("bonus"));

    assert_eq!(from_file["size"], json!(0));
    assert_eq!(
        from_file["aggregations"]["grades_stats"],
        built.source().unwrap()
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = AggregationsConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, AggError::Io(_)));
}

#[test]
fn test_load_invalid_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[aggregations.x\ntype = ").unwrap();
    let err = AggregationsConfig::load(&path).unwrap_err();
    assert!(matches!(err, AggError::Toml(_)));
}

#[test]
fn test_nested_empty_name_rejected_on_build() {
    let config = AggregationsConfig::from_toml_str(
        "[aggregations.outer]\ntype = \"stats\"\n\n[aggregations.outer.aggregations.\"\"]\ntype = \"avg\"\n",
    )
    .unwrap();
    assert!(matches!(config.build(), Err(AggError::Config(_))));
}

#[test]
fn test_stored_script_in_config() {
    let config = AggregationsConfig::from_toml_str(
        r#"
[aggregations.s]
type = "stats"
script = { source = "grade_calc", type = "id" }
"#,
    )
    .unwrap();
    let body = config.build().unwrap().source().unwrap();
    assert_eq!(
        body,
        json!({"aggregations": {"s": {"stats": {"script": {"id": "grade_calc"}}}}})
    );
}

#[test]
fn test_whitespace_name_accepted() {
    let config = AggregationsConfig::from_toml_str("[aggregations.\" \"]\ntype = \"stats\"\n").unwrap();
    let body = config.build().unwrap().source().unwrap();
    assert_eq!(body, json!({"aggregations": {" ": {"stats": {}}}}));
}

#[test]
fn test_misspelt_script_key_rejected() {
    let err = AggregationsConfig::from_toml_str(
        r#"
[aggregations.s]
type = "stats"
script = { source = "x", lnag = "painless" }
"#,
    )
    .unwrap_err();
    assert!(matches!(err, AggError::Toml(_)));
}
