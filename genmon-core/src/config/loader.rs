//! Configuration loading
//!
//! Loading is a one-shot, synchronous operation: read the source, coerce every
//! declared entry, run the cross-field rules and freeze the result. Any error
//! is fatal to startup.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::ini::{self, RawIni};
use super::rules::{self, default_rules, ConfigWarning, Rule};
use super::schema::{genmon_schema, ConfigEntry, DefaultValue};
use super::snapshot::ConfigSnapshot;
use super::value::{Constraint, ConfigValue};
use crate::error::{ConfigError, Result};

/// Literal treated as "not detected yet" for auto-detect entries
const UNKNOWN_LITERAL: &str = "unknown";

/// Loads and validates configuration sources against a schema.
///
/// # Example
///
/// ```
/// use genmon_core::config::{ConfigLoader, Constraint};
///
/// let loader = ConfigLoader::new().with_constraint(
///     "GenMon",
///     "kwlogmax",
///     Constraint::IntRange { min: 1, max: Some(100) },
/// );
/// let err = loader
///     .load_str("[GenMon]\nsitename = Home\nport = /dev/serial0\n\
///                incoming_mail_folder = In\nprocessed_mail_folder = Done\n\
///                server_port = 9082\naddress = 9d\nloglocation = /var/log/\n\
///                kwlogmax = 500\n")
///     .unwrap_err();
/// assert!(err.to_string().contains("kwlogmax"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    entries: Vec<ConfigEntry>,
    rules: Vec<Rule>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            entries: genmon_schema(),
            rules: default_rules(),
        }
    }
}

impl ConfigLoader {
    /// Loader for the `[GenMon]` schema with the built-in rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any existing entry for the same section/key.
    pub fn with_entry(mut self, entry: ConfigEntry) -> Self {
        match self
            .entries
            .iter_mut()
            .find(|e| e.section == entry.section && e.key == entry.key)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Replace the constraint of a declared entry.
    ///
    /// Unknown section/key pairs are ignored.
    pub fn with_constraint(mut self, section: &str, key: &str, constraint: Constraint) -> Self {
        let key = key.to_ascii_lowercase();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.section == section && e.key == key)
        {
            entry.constraint = Some(constraint);
        }
        self
    }

    /// Append a cross-field rule; it runs after the existing ones.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Declared entries, in validation order
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Load and validate a configuration file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ConfigSnapshot> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let source =
            std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableSource {
                path: path.to_path_buf(),
                source,
            })?;

        self.load_str(&source)
    }

    /// Load and validate configuration text.
    pub fn load_str(&self, source: &str) -> Result<ConfigSnapshot> {
        let raw = ini::parse(source)?;
        let mut sections: BTreeMap<String, BTreeMap<String, ConfigValue>> = BTreeMap::new();

        for entry in &self.entries {
            if let Some(value) = self.resolve(entry, &raw)? {
                sections
                    .entry(entry.section.clone())
                    .or_default()
                    .insert(entry.key.clone(), value);
            }
        }

        // Unknown sections and keys are kept verbatim for forward compatibility
        for (section, keys) in &raw.sections {
            let resolved = sections.entry(section.clone()).or_default();
            for (key, value) in keys {
                if !self.is_declared(section, key) {
                    debug!("[{}] passing through undeclared key '{}'", section, key);
                    resolved.insert(key.clone(), ConfigValue::Str(value.clone()));
                }
            }
        }

        let duplicate_warnings = raw.duplicates.iter().map(|dup| ConfigWarning {
            rule: "duplicate_key".to_string(),
            message: format!(
                "[{}] {} assigned more than once; line {} wins",
                dup.section, dup.key, dup.line
            ),
        });
        let mut snapshot = ConfigSnapshot::new(sections, duplicate_warnings.collect());

        let warnings = rules::evaluate(&self.rules, &snapshot)?;
        snapshot.push_warnings(warnings);

        info!(
            "Configuration loaded: {} section(s), {} warning(s)",
            snapshot.sections().count(),
            snapshot.warnings().len()
        );
        Ok(snapshot)
    }

    fn is_declared(&self, section: &str, key: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.section == section && e.key == key)
    }

    /// Resolve one declared entry to its value, or `None` when it stays unset.
    fn resolve(&self, entry: &ConfigEntry, raw: &RawIni) -> Result<Option<ConfigValue>> {
        let section = entry.section.as_str();
        let key = entry.key.as_str();

        let value: String = match (raw.get(section, key), entry.default) {
            (Some(v), DefaultValue::Unset) if v.eq_ignore_ascii_case(UNKNOWN_LITERAL) => {
                debug!("[{}] {} is '{}', leaving unset", section, key, v);
                return Ok(None);
            }
            (Some(v), _) => v.to_string(),
            (None, DefaultValue::Required) => {
                return Err(ConfigError::MissingRequiredKey {
                    section: section.to_string(),
                    key: key.to_string(),
                });
            }
            (None, DefaultValue::Literal(default)) => {
                debug!("[{}] {} not set, using default '{}'", section, key, default);
                default.to_string()
            }
            (None, DefaultValue::Derived(derive)) => {
                let default = derive();
                debug!("[{}] {} not set, using derived '{}'", section, key, default);
                default
            }
            (None, DefaultValue::Unset) => return Ok(None),
        };

        let coerced = entry
            .kind
            .coerce(section, key, &value)
            .map_err(|err| match (err, entry.constraint) {
                // Report the declared bound rather than the integer width
                (ConfigError::OutOfRange { section, key, raw, .. }, Some(constraint)) => {
                    ConfigError::OutOfRange {
                        section,
                        key,
                        raw,
                        constraint: constraint.to_string(),
                    }
                }
                (err, _) => err,
            })?;
        if let Some(constraint) = &entry.constraint {
            constraint.check(section, key, &value, &coerced)?;
        }
        Ok(Some(coerced))
    }
}

/// Load a configuration file with the default schema and rules.
pub fn load(path: impl AsRef<Path>) -> Result<ConfigSnapshot> {
    ConfigLoader::new().load(path)
}
