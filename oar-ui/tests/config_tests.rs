//! Unit tests for configuration resolution and rubric loading
//!
//! Tests cover:
//! - Priority order: CLI argument, environment variable, config file, default
//! - Rubric file precedence over preset name within one tier
//! - Graceful degradation when the default config file is absent
//! - Fatal errors for explicitly named but unusable config files
//! - Custom rubric schemas loaded from TOML
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate OAR_* variables are marked with #[serial] to
//! ensure they run sequentially, not in parallel.

use clap::Parser;
use oar_ui::config::{Args, Config, RubricSource, TomlConfig, DEFAULT_HOST, DEFAULT_PORT};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Test helper: write a temp file and keep it alive for the test's duration
fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn clear_oar_env() {
    env::remove_var("OAR_HOST");
    env::remove_var("OAR_PORT");
    env::remove_var("OAR_RUBRIC");
    env::remove_var("OAR_RUBRIC_FILE");
    env::remove_var("OAR_CONFIG");
}

// =============================================================================
// Priority Order Tests
// =============================================================================

#[test]
#[serial]
fn test_defaults_with_no_overrides() {
    clear_oar_env();

    let args = Args::parse_from(["oar-ui"]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.rubric, RubricSource::Preset("quality".to_string()));
    assert_eq!(config.bind_addr(), "127.0.0.1:8000");
}

#[test]
#[serial]
fn test_cli_arguments_override_defaults() {
    clear_oar_env();

    let args = Args::parse_from([
        "oar-ui", "--host", "0.0.0.0", "--port", "9100", "--rubric", "pairwise",
    ]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9100);
    assert_eq!(config.rubric, RubricSource::Preset("pairwise".to_string()));
}

#[test]
#[serial]
fn test_env_variables_override_config_file() {
    clear_oar_env();
    env::set_var("OAR_PORT", "9200");
    env::set_var("OAR_RUBRIC", "graded");

    let file = temp_file("port = 1234\nrubric = \"pairwise\"\n");
    let args = Args::parse_from(["oar-ui", "--config", file.path().to_str().unwrap()]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.port, 9200);
    assert_eq!(config.rubric, RubricSource::Preset("graded".to_string()));

    clear_oar_env();
}

#[test]
#[serial]
fn test_cli_arguments_override_env_variables() {
    clear_oar_env();
    env::set_var("OAR_PORT", "9200");

    let args = Args::parse_from(["oar-ui", "--port", "9400"]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.port, 9400);

    clear_oar_env();
}

#[test]
#[serial]
fn test_config_file_overrides_defaults() {
    clear_oar_env();

    let file = temp_file("host = \"192.168.1.5\"\nport = 8100\nrubric = \"graded\"\n");
    let args = Args::parse_from(["oar-ui", "--config", file.path().to_str().unwrap()]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.host, "192.168.1.5");
    assert_eq!(config.port, 8100);
    assert_eq!(config.rubric, RubricSource::Preset("graded".to_string()));
}

#[test]
#[serial]
fn test_cli_arguments_override_config_file() {
    clear_oar_env();

    let file = temp_file("port = 8100\n");
    let args = Args::parse_from([
        "oar-ui", "--config", file.path().to_str().unwrap(), "--port", "9300",
    ]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.port, 9300);
}

#[test]
#[serial]
fn test_partial_config_file_keeps_other_defaults() {
    clear_oar_env();

    let file = temp_file("port = 8100\n");
    let args = Args::parse_from(["oar-ui", "--config", file.path().to_str().unwrap()]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, 8100);
    assert_eq!(config.rubric, RubricSource::Preset("quality".to_string()));
}

// =============================================================================
// Rubric Source Precedence Tests
// =============================================================================

#[test]
#[serial]
fn test_rubric_file_beats_preset_within_one_tier() {
    clear_oar_env();

    let args = Args::parse_from([
        "oar-ui", "--rubric", "graded", "--rubric-file", "/tmp/custom-rubric.toml",
    ]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(
        config.rubric,
        RubricSource::File(PathBuf::from("/tmp/custom-rubric.toml"))
    );
}

#[test]
#[serial]
fn test_cli_preset_beats_config_file_rubric_file() {
    clear_oar_env();

    let file = temp_file("rubric_file = \"/tmp/from-config.toml\"\n");
    let args = Args::parse_from([
        "oar-ui", "--config", file.path().to_str().unwrap(), "--rubric", "pairwise",
    ]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.rubric, RubricSource::Preset("pairwise".to_string()));
}

#[test]
#[serial]
fn test_config_file_rubric_file_beats_its_preset() {
    clear_oar_env();

    let file = temp_file("rubric = \"graded\"\nrubric_file = \"/tmp/from-config.toml\"\n");
    let args = Args::parse_from(["oar-ui", "--config", file.path().to_str().unwrap()]);
    let config = Config::resolve(&args).unwrap();

    assert_eq!(
        config.rubric,
        RubricSource::File(PathBuf::from("/tmp/from-config.toml"))
    );
}

// =============================================================================
// Config File Error Handling Tests
// =============================================================================

#[test]
#[serial]
fn test_explicitly_named_missing_config_is_fatal() {
    clear_oar_env();

    let args = Args::parse_from(["oar-ui", "--config", "/nonexistent/oar-test-config.toml"]);
    let result = Config::resolve(&args);

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("failed to read config file"));
}

#[test]
#[serial]
fn test_explicitly_named_invalid_config_is_fatal() {
    clear_oar_env();

    let file = temp_file("port = \"not a number\"\n");
    let args = Args::parse_from(["oar-ui", "--config", file.path().to_str().unwrap()]);
    let result = Config::resolve(&args);

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("failed to parse config file"));
}

#[test]
fn test_toml_config_all_fields_optional() {
    let config: TomlConfig = toml::from_str("").unwrap();

    assert_eq!(config.host, None);
    assert_eq!(config.port, None);
    assert_eq!(config.rubric, None);
    assert_eq!(config.rubric_file, None);
}

// =============================================================================
// Rubric Loading Tests
// =============================================================================

#[test]
fn test_preset_rubric_loads_and_validates() {
    let schema = RubricSource::Preset("pairwise".to_string()).load().unwrap();

    assert_eq!(schema.name, "pairwise");
    assert_eq!(schema.answer_columns.len(), 2);
}

#[test]
fn test_unknown_preset_names_the_alternatives() {
    let result = RubricSource::Preset("speed".to_string()).load();

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("unknown rubric preset 'speed'"));
    assert!(message.contains("quality, graded, pairwise"));
}

#[test]
fn test_custom_rubric_file_loads() {
    let file = temp_file(
        r#"
name = "support"
question_column = "Ticket"
answer_columns = ["Reply"]
comment = "global"
issue_subjects = ["Reply"]

[[criteria]]
key = "Accuracy"
label = "Accuracy"
description = "Is the reply factually right?"
kind = "rating"
options = [
    { value = "Right", label = "Right" },
    { value = "Partial", label = "Partially right" },
    { value = "Wrong", label = "Wrong" },
]

[[criteria]]
key = "Tone"
label = "Tone"
kind = "rating"
options = [
    { value = "Warm", label = "Warm" },
    { value = "Cold", label = "Cold" },
]

[[issue_flags]]
key = "Off_Topic"
label = "Reply does not address the ticket"
"#,
    );

    let schema = RubricSource::File(file.path().to_path_buf()).load().unwrap();

    assert_eq!(schema.name, "support");
    assert_eq!(schema.required_columns(), vec!["Ticket", "Reply"]);
    assert_eq!(schema.criteria.len(), 2);
    assert_eq!(schema.criteria[0].description, "Is the reply factually right?");
    assert_eq!(schema.criteria[1].description, "");
    assert_eq!(schema.flag_keys(), vec!["Reply_Off_Topic"]);
    assert_eq!(
        schema.judgment_columns(),
        vec!["Accuracy_rating", "Tone_rating", "Reply_Off_Topic", "Comments"]
    );
}

#[test]
fn test_custom_pairwise_rubric_file_loads() {
    let file = temp_file(
        r#"
name = "versus"
question_column = "Prompt"
answer_columns = ["A", "B"]

[[criteria]]
key = "Preference"
label = "Which is better?"
kind = "pairwise"
"#,
    );

    let schema = RubricSource::File(file.path().to_path_buf()).load().unwrap();

    assert_eq!(schema.judgment_columns(), vec!["Preference_winner"]);
}

#[test]
fn test_missing_rubric_file_is_fatal() {
    let result = RubricSource::File(PathBuf::from("/nonexistent/rubric.toml")).load();

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("failed to read rubric file"));
}

#[test]
fn test_structurally_invalid_rubric_file_is_rejected() {
    // Pairwise criterion on a single-answer rubric fails validation.
    let file = temp_file(
        r#"
name = "broken"
question_column = "Prompt"
answer_columns = ["A"]

[[criteria]]
key = "Preference"
label = "Which is better?"
kind = "pairwise"
"#,
    );

    let result = RubricSource::File(file.path().to_path_buf()).load();

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("rubric schema rejected"));
}

#[test]
fn test_unparseable_rubric_file_is_rejected() {
    let file = temp_file("name = \"broken\"\ncriteria = 7\n");

    let result = RubricSource::File(file.path().to_path_buf()).load();

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("failed to parse rubric file"));
}
