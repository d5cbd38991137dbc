//! Integration tests for the CLI command handlers
//!
//! Each test writes a configuration file to a temporary directory and runs
//! the handler the binary would dispatch to.

use genmon_core::{load, GENMON_SECTION};
use genmonctl::cli::{
    handle_check, handle_detect, handle_export, handle_get, handle_show, OutputFormat,
};
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = r#"
[GenMon]
sitename = Cabin
port = /dev/ttyAMA0
incoming_mail_folder = Generator
processed_mail_folder = Generator/Processed
server_port = 9082
address = 9d
loglocation = /var/log/
# keep the web interface on plain HTTP
usehttps = False

[Extra]
Colour = blue
"#;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genmon.conf");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_check_reports_valid_configuration() {
    let (_dir, path) = write_config(CONFIG);
    let output = handle_check(&path, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["settings"]["site_name"], "Cabin");
    assert_eq!(json["settings"]["address"], 0x9d);
    assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_table_output() {
    let (_dir, path) = write_config(CONFIG);
    let output = handle_check(&path, OutputFormat::Table).unwrap();
    assert!(output.contains("Configuration valid"));
    assert!(output.contains("Cabin"));
}

#[test]
fn test_check_fails_on_missing_required_key() {
    let (_dir, path) = write_config(&CONFIG.replace("address = 9d\n", ""));
    let err = handle_check(&path, OutputFormat::Table).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("address"), "unexpected error: {}", message);
}

#[test]
fn test_check_fails_on_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.conf");
    assert!(handle_check(&path, OutputFormat::Table).is_err());
}

#[test]
fn test_show_single_section() {
    let (_dir, path) = write_config(CONFIG);
    let output = handle_show(&path, Some("Extra"), OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["Extra"]["colour"], "blue");
    assert!(json.get("GenMon").is_none());
}

#[test]
fn test_show_unknown_section_fails() {
    let (_dir, path) = write_config(CONFIG);
    assert!(handle_show(&path, Some("Missing"), OutputFormat::Table).is_err());
}

#[test]
fn test_get_resolves_defaults() {
    let (_dir, path) = write_config(CONFIG);
    let output = handle_get(&path, GENMON_SECTION, "HTTP_PORT", OutputFormat::Table).unwrap();
    assert_eq!(output, "8000");

    let output = handle_get(&path, GENMON_SECTION, "useselfsignedcert", OutputFormat::Table).unwrap();
    assert_eq!(output, "True");
}

#[test]
fn test_get_unknown_key_fails() {
    let (_dir, path) = write_config(CONFIG);
    let err = handle_get(&path, GENMON_SECTION, "nosuchkey", OutputFormat::Table).unwrap_err();
    assert!(err.to_string().contains("nosuchkey"));
}

#[test]
fn test_export_reloads_to_same_snapshot() {
    let (_dir, path) = write_config(CONFIG);
    let exported = handle_export(&path).unwrap();
    assert!(!exported.contains('#'));

    let (_dir2, exported_path) = write_config(&exported);
    assert_eq!(load(&path).unwrap(), load(&exported_path).unwrap());
}

#[test]
fn test_detect_without_write_leaves_file_untouched() {
    let (_dir, path) = write_config(CONFIG);
    let output = handle_detect(&path, 0x0c, false, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["facts"]["family"], "Evolution");
    assert_eq!(json["profile"]["fuel_type"], "Diesel");
    assert_eq!(json["profile"]["model"], "Generic Liquid Cooled");
    assert!(json["written_to"].is_null());

    assert_eq!(std::fs::read_to_string(&path).unwrap(), CONFIG);
}

#[test]
fn test_detect_write_persists_profile() {
    let (_dir, path) = write_config(CONFIG);
    handle_detect(&path, 0x03, true, OutputFormat::Table).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("# keep the web interface on plain HTTP"));

    let snapshot = load(&path).unwrap();
    assert_eq!(snapshot.get_str(GENMON_SECTION, "model"), Some("Generic Air Cooled"));
    assert_eq!(snapshot.get_str(GENMON_SECTION, "fueltype"), Some("Natural Gas"));
    assert_eq!(snapshot.get_int(GENMON_SECTION, "nominalrpm"), Some(3600));
    assert_eq!(snapshot.get_str("Extra", "colour"), Some("blue"));

    let output = handle_check(&path, OutputFormat::Json).unwrap();
    assert!(output.contains("\"valid\": true"));
}

#[test]
fn test_detect_reports_nexus_legacy_override() {
    let (_dir, path) = write_config(CONFIG);
    let output = handle_detect(&path, 0x06, false, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["overrides"][0]["rule"], "nexus_forces_legacy_exercise");
    assert_eq!(json["overrides"][0]["value"], true);
}
