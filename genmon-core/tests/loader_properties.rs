//! End-to-end loading behaviour against configuration files on disk

use genmon_core::config::{ConfigLoader, ConfigValue};
use genmon_core::{
    apply_detected_overrides, load, ConfigError, DetectionFacts, DeviceProfile, GENMON_SECTION,
};
use std::path::PathBuf;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r#"
# Generator monitor configuration
[GenMon]
# name of the site, used in email
sitename = SiteName
# serial port connected to the controller
port = /dev/serial0
incoming_mail_folder = Generator
processed_mail_folder = Generator/Processed
server_port = 9082
# modbus slave address, should not need to change from 9d
address = 9d
loglocation = /var/log/
displayoutput = False
displaymonitor = False
displayregisters = False
displaystatus = False
displaymaintenance = False
enabledebug = False
displayunknown = False
uselegacysetexercise = False
disableoutagecheck = False
petroleumfuel = False
syncdst = False
synctime = False
enhancedexercise = False
usehttps = False
useselfsignedcert = True
outagelog = /home/pi/genmon/outage.txt
kwlog = /home/pi/genmon/kwlog.txt
kwlogmax = 15
keyfile =
certfile =
http_user =
http_pass =
http_port = 8000
favicon =
"#;

fn write_config(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), content).unwrap();
    file
}

#[test]
fn test_full_config_loads_coerced_values() {
    let file = write_config(FULL_CONFIG);
    let snapshot = load(file.path()).unwrap();

    assert_eq!(snapshot.get_str(GENMON_SECTION, "sitename"), Some("SiteName"));
    assert_eq!(
        snapshot.get(GENMON_SECTION, "port"),
        Some(&ConfigValue::Path(PathBuf::from("/dev/serial0")))
    );
    assert_eq!(snapshot.get_int(GENMON_SECTION, "server_port"), Some(9082));
    assert_eq!(snapshot.get_hex(GENMON_SECTION, "address"), Some(0x9d));
    assert_eq!(snapshot.get_bool(GENMON_SECTION, "displayoutput"), Some(false));
    assert_eq!(snapshot.get_bool(GENMON_SECTION, "useselfsignedcert"), Some(true));
    assert_eq!(
        snapshot.get_path(GENMON_SECTION, "kwlog"),
        Some(std::path::Path::new("/home/pi/genmon/kwlog.txt"))
    );
    assert!(snapshot.warnings().is_empty());
}

#[test]
fn test_missing_sitename() {
    let file = write_config(&FULL_CONFIG.replace("sitename = SiteName\n", ""));
    match load(file.path()).unwrap_err() {
        ConfigError::MissingRequiredKey { section, key } => {
            assert_eq!(section, "GenMon");
            assert_eq!(key, "sitename");
        }
        other => panic!("Expected MissingRequiredKey, got {:?}", other),
    }
}

#[test]
fn test_server_port_out_of_range() {
    let file = write_config(&FULL_CONFIG.replace("server_port = 9082", "server_port = 99999"));
    assert!(matches!(
        load(file.path()).unwrap_err(),
        ConfigError::OutOfRange { .. }
    ));
}

#[test]
fn test_invalid_boolean() {
    let file = write_config(&FULL_CONFIG.replace("displayoutput = False", "displayoutput = Maybe"));
    match load(file.path()).unwrap_err() {
        ConfigError::InvalidBoolean { section, key, raw } => {
            assert_eq!(section, "GenMon");
            assert_eq!(key, "displayoutput");
            assert_eq!(raw, "Maybe");
        }
        other => panic!("Expected InvalidBoolean, got {:?}", other),
    }
}

#[test]
fn test_invalid_address() {
    let file = write_config(&FULL_CONFIG.replace("address = 9d", "address = 9"));
    assert!(matches!(
        load(file.path()).unwrap_err(),
        ConfigError::InvalidFormat { .. }
    ));
}

#[test]
fn test_self_signed_disabled_without_key_files() {
    let file = write_config(
        &FULL_CONFIG.replace("useselfsignedcert = True", "useselfsignedcert = False"),
    );
    match load(file.path()).unwrap_err() {
        ConfigError::ConstraintViolation { rule, .. } => {
            assert_eq!(rule, "self_signed_cert_or_key_pair");
        }
        other => panic!("Expected ConstraintViolation, got {:?}", other),
    }
}

#[test]
fn test_credentials_without_https_only_warn() {
    let file = write_config(&FULL_CONFIG.replace("http_user =", "http_user = admin"));
    let snapshot = load(file.path()).unwrap();
    assert_eq!(snapshot.warnings().len(), 1);
    assert_eq!(snapshot.warnings()[0].rule, "http_credentials_require_https");
}

#[test]
fn test_loading_twice_is_idempotent() {
    let file = write_config(FULL_CONFIG);
    let first = load(file.path()).unwrap();
    let second = load(file.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_http_port_defaults_to_8000() {
    let file = write_config(&FULL_CONFIG.replace("http_port = 8000\n", ""));
    let snapshot = load(file.path()).unwrap();
    assert_eq!(snapshot.get_int(GENMON_SECTION, "http_port"), Some(8000));
}

#[test]
fn test_round_trip_through_ini() {
    let source = FULL_CONFIG
        .replace("displaystatus = False", "displaystatus = yes")
        .replace("address = 9d", "address = 0X9D")
        + "liquidcooled = 1\nnominalkw = 7.5\nfutureoption = keep me\n\n[Extra]\nname = value\n";
    let original = ConfigLoader::new().load_str(&source).unwrap();

    let rendered = original.to_ini();
    assert!(rendered.contains("displaystatus = True"));
    assert!(rendered.contains("address = 9d"));

    let reloaded = ConfigLoader::new().load_str(&rendered).unwrap();
    assert_eq!(original, reloaded);
}

#[test]
fn test_detection_and_write_back_cycle() {
    let file = write_config(FULL_CONFIG);
    let snapshot = load(file.path()).unwrap();

    let facts = DetectionFacts::detect(0x03, &snapshot);
    let effective = apply_detected_overrides(&snapshot, &facts);
    assert_eq!(
        effective.get_bool(GENMON_SECTION, "uselegacysetexercise"),
        Some(true)
    );
    assert_eq!(
        snapshot.get_bool(GENMON_SECTION, "uselegacysetexercise"),
        Some(false)
    );

    let profile = DeviceProfile::from_snapshot(&snapshot).complete(&facts, "9.9.9");
    profile.persist(file.path()).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    assert!(content.contains("# modbus slave address, should not need to change from 9d"));

    let reloaded = load(file.path()).unwrap();
    assert_eq!(reloaded.get_str(GENMON_SECTION, "model"), Some("Generic Air Cooled"));
    assert_eq!(reloaded.get_int(GENMON_SECTION, "nominalrpm"), Some(3600));
    assert_eq!(reloaded.get_str(GENMON_SECTION, "version"), Some("9.9.9"));

    let again = DeviceProfile::from_snapshot(&reloaded).complete(&facts, "9.9.9");
    assert!(!again.new_install);
    assert_eq!(again, DeviceProfile { new_install: false, ..profile });
}
