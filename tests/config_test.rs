use std::io::Write;
use aiee_lib::brain::exploration::ExplorationPolicy;
use aiee_lib::catalog::Catalog;
use aiee_lib::config::{planner, PlannerConfig};
use tempfile::NamedTempFile;

#[test]
fn test_config_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[selection]
weakness_bias = 1.5

[exploration]
probability = 0.0
policy = "reach_task"

[sequencing]
enabled = true

[insight]
model = "llama3.1:8b"
timeout_secs = 5
"#
    ).unwrap();

    let config = PlannerConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.selection.weakness_bias, 1.5);
    assert_eq!(config.selection.prerequisite_threshold, 0.7);
    assert_eq!(config.exploration.probability, 0.0);
    assert_eq!(config.exploration.policy, ExplorationPolicy::ReachTask);
    assert!(config.sequencing.enabled);
    assert_eq!(config.insight.model, "llama3.1:8b");
    assert_eq!(config.insight.endpoint, "http://localhost:11434");
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PlannerConfig::load_from_path(&dir.path().join("planner.toml")).unwrap_err();
    assert_eq!(err.stage, "io");
    assert!(err.context.unwrap().contains("planner.toml"));
}

#[test]
fn test_negative_bias_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[selection]\nweakness_bias = -1.0").unwrap();
    let err = PlannerConfig::load_from_path(file.path()).unwrap_err();
    assert_eq!(err.stage, "config_validate");
}

#[test]
fn test_unknown_policy_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[exploration]\npolicy = \"bandit\"").unwrap();
    let err = PlannerConfig::load_from_path(file.path()).unwrap_err();
    assert_eq!(err.stage, "config_parse");
}

// AIEE_CONFIG is process-wide, so every scenario that sets it lives in this one test.
#[test]
fn test_load_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var("AIEE_CONFIG", dir.path().join("absent.toml"));
    assert_eq!(planner::config_path(), dir.path().join("absent.toml"));
    assert_eq!(planner::load(), PlannerConfig::default());

    let mut malformed = NamedTempFile::new().unwrap();
    writeln!(malformed, "[selection\nweakness_bias = ").unwrap();
    std::env::set_var("AIEE_CONFIG", malformed.path());
    assert_eq!(planner::load(), PlannerConfig::default());

    let mut out_of_range = NamedTempFile::new().unwrap();
    writeln!(out_of_range, "[exploration]\nprobability = 2.0").unwrap();
    std::env::set_var("AIEE_CONFIG", out_of_range.path());
    assert_eq!(planner::load(), PlannerConfig::default());

    let mut valid = NamedTempFile::new().unwrap();
    writeln!(valid, "[selection]\nweakness_bias = 0.5").unwrap();
    std::env::set_var("AIEE_CONFIG", valid.path());
    assert_eq!(planner::load().selection.weakness_bias, 0.5);

    std::env::remove_var("AIEE_CONFIG");
}

#[test]
fn test_catalog_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&Catalog::builtin()).unwrap()).unwrap();

    let catalog = Catalog::load_from_path(file.path()).unwrap();
    assert_eq!(catalog, Catalog::builtin());
    assert_eq!(catalog.task("t4").map(|t| t.skill_id.as_str()), Some("w1"));
}

#[test]
fn test_unreadable_catalog_reports_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"skills\": [").unwrap();
    let err = Catalog::load_from_path(file.path()).unwrap_err();
    assert_eq!(err.stage, "json_parse");
    assert!(err.context.unwrap().contains("path"));

    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::load_from_path(&dir.path().join("catalog.json")).unwrap_err();
    assert_eq!(err.stage, "io");
}
