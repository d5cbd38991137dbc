//! Cross-field validation rules
//!
//! Rules run in a fixed order over the resolved snapshot. The first failing
//! rule aborts loading; warnings are collected and never block startup.

use serde::Serialize;
use std::fmt;
use tracing::warn;

use super::schema::GENMON_SECTION;
use super::snapshot::ConfigSnapshot;
use crate::error::{ConfigError, Result};

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Warn(String),
    Fail(String),
}

/// Named predicate over a resolved snapshot
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&ConfigSnapshot) -> RuleOutcome,
}

impl Rule {
    pub const fn new(name: &'static str, check: fn(&ConfigSnapshot) -> RuleOutcome) -> Self {
        Self { name, check }
    }
}

/// Non-fatal condition found while loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigWarning {
    pub rule: String,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

fn flag(snapshot: &ConfigSnapshot, key: &str) -> bool {
    snapshot.get_bool(GENMON_SECTION, key).unwrap_or(false)
}

fn is_set(snapshot: &ConfigSnapshot, key: &str) -> bool {
    snapshot
        .get(GENMON_SECTION, key)
        .is_some_and(|value| !value.is_empty())
}

fn self_signed_cert_or_key_pair(snapshot: &ConfigSnapshot) -> RuleOutcome {
    if snapshot
        .get_bool(GENMON_SECTION, "useselfsignedcert")
        .unwrap_or(true)
    {
        return RuleOutcome::Pass;
    }
    let missing: Vec<&str> = ["keyfile", "certfile"]
        .into_iter()
        .filter(|key| !is_set(snapshot, key))
        .collect();
    if missing.is_empty() {
        RuleOutcome::Pass
    } else {
        RuleOutcome::Fail(format!(
            "useselfsignedcert is False but {} not set",
            missing.join(" and ")
        ))
    }
}

fn http_credentials_require_https(snapshot: &ConfigSnapshot) -> RuleOutcome {
    if flag(snapshot, "usehttps") {
        return RuleOutcome::Pass;
    }
    if is_set(snapshot, "http_user") || is_set(snapshot, "http_pass") {
        RuleOutcome::Warn("http_user/http_pass are ignored because usehttps is False".to_string())
    } else {
        RuleOutcome::Pass
    }
}

fn http_credentials_paired(snapshot: &ConfigSnapshot) -> RuleOutcome {
    if !flag(snapshot, "usehttps") {
        return RuleOutcome::Pass;
    }
    match (is_set(snapshot, "http_user"), is_set(snapshot, "http_pass")) {
        (true, false) => {
            RuleOutcome::Warn("http_user is set without http_pass; login is disabled".to_string())
        }
        (false, true) => {
            RuleOutcome::Warn("http_pass is set without http_user; login is disabled".to_string())
        }
        _ => RuleOutcome::Pass,
    }
}

fn cert_files_unused_with_self_signed(snapshot: &ConfigSnapshot) -> RuleOutcome {
    let self_signed = snapshot
        .get_bool(GENMON_SECTION, "useselfsignedcert")
        .unwrap_or(true);
    if self_signed && (is_set(snapshot, "keyfile") || is_set(snapshot, "certfile")) {
        RuleOutcome::Warn(
            "keyfile/certfile are ignored because useselfsignedcert is True".to_string(),
        )
    } else {
        RuleOutcome::Pass
    }
}

/// Built-in rules, in evaluation order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("self_signed_cert_or_key_pair", self_signed_cert_or_key_pair),
        Rule::new(
            "http_credentials_require_https",
            http_credentials_require_https,
        ),
        Rule::new("http_credentials_paired", http_credentials_paired),
        Rule::new(
            "cert_files_unused_with_self_signed",
            cert_files_unused_with_self_signed,
        ),
    ]
}

/// Evaluate rules in order, stopping at the first failure.
pub(crate) fn evaluate(rules: &[Rule], snapshot: &ConfigSnapshot) -> Result<Vec<ConfigWarning>> {
    let mut warnings = Vec::new();
    for rule in rules {
        match (rule.check)(snapshot) {
            RuleOutcome::Pass => {}
            RuleOutcome::Warn(message) => {
                warn!("{}: {}", rule.name, message);
                warnings.push(ConfigWarning {
                    rule: rule.name.to_string(),
                    message,
                });
            }
            RuleOutcome::Fail(message) => {
                return Err(ConfigError::ConstraintViolation {
                    rule: rule.name.to_string(),
                    message,
                });
            }
        }
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;
    use std::path::PathBuf;

    fn snapshot(values: &[(&str, ConfigValue)]) -> ConfigSnapshot {
        let mut snapshot = ConfigSnapshot::default();
        for (key, value) in values {
            snapshot = snapshot.with_value(GENMON_SECTION, key, value.clone());
        }
        snapshot
    }

    #[test]
    fn test_self_signed_false_requires_both_files() {
        let snap = snapshot(&[
            ("useselfsignedcert", ConfigValue::Bool(false)),
            ("keyfile", ConfigValue::Path(PathBuf::from("/etc/ssl/key.pem"))),
            ("certfile", ConfigValue::Path(PathBuf::new())),
        ]);
        match self_signed_cert_or_key_pair(&snap) {
            RuleOutcome::Fail(message) => assert!(message.contains("certfile")),
            other => panic!("Expected failure, got {:?}", other),
        }

        let snap = snapshot(&[
            ("useselfsignedcert", ConfigValue::Bool(false)),
            ("keyfile", ConfigValue::Path(PathBuf::from("/etc/ssl/key.pem"))),
            ("certfile", ConfigValue::Path(PathBuf::from("/etc/ssl/cert.pem"))),
        ]);
        assert_eq!(self_signed_cert_or_key_pair(&snap), RuleOutcome::Pass);
    }

    #[test]
    fn test_credentials_without_https_warn() {
        let snap = snapshot(&[
            ("usehttps", ConfigValue::Bool(false)),
            ("http_user", ConfigValue::Str("admin".to_string())),
        ]);
        assert!(matches!(
            http_credentials_require_https(&snap),
            RuleOutcome::Warn(_)
        ));
    }

    #[test]
    fn test_unpaired_credentials_warn() {
        let snap = snapshot(&[
            ("usehttps", ConfigValue::Bool(true)),
            ("http_pass", ConfigValue::Str("secret".to_string())),
        ]);
        assert!(matches!(http_credentials_paired(&snap), RuleOutcome::Warn(_)));
    }

    #[test]
    fn test_evaluate_stops_at_first_failure() {
        fn fail(_: &ConfigSnapshot) -> RuleOutcome {
            RuleOutcome::Fail("first".to_string())
        }
        fn never(_: &ConfigSnapshot) -> RuleOutcome {
            panic!("rule after a failure must not run")
        }
        let rules = [Rule::new("fail", fail), Rule::new("never", never)];
        let err = evaluate(&rules, &ConfigSnapshot::default()).unwrap_err();
        match err {
            ConfigError::ConstraintViolation { rule, message } => {
                assert_eq!(rule, "fail");
                assert_eq!(message, "first");
            }
            other => panic!("Expected ConstraintViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_collects_warnings() {
        let snap = snapshot(&[
            ("usehttps", ConfigValue::Bool(false)),
            ("http_user", ConfigValue::Str("admin".to_string())),
            ("keyfile", ConfigValue::Path(PathBuf::from("/etc/ssl/key.pem"))),
        ]);
        let warnings = evaluate(&default_rules(), &snap).unwrap();
        let rules: Vec<&str> = warnings.iter().map(|w| w.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "http_credentials_require_https",
                "cert_files_unused_with_self_signed"
            ]
        );
    }
}
