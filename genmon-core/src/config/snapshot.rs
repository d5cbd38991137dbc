//! Immutable, fully-resolved configuration

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::rules::ConfigWarning;
use super::settings::GenMonSettings;
use super::value::ConfigValue;
use crate::error::Result;

/// Resolved configuration: section -> key -> typed value.
///
/// Built by [`ConfigLoader`](super::ConfigLoader) and never mutated
/// afterwards. Derived snapshots (e.g. after detection overrides) are new
/// values; the original stays untouched, so a snapshot can be shared freely
/// across threads behind an `Arc`.
///
/// Equality compares resolved values only; load-time warnings describe the
/// source text, not the configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSnapshot {
    #[serde(flatten)]
    sections: BTreeMap<String, BTreeMap<String, ConfigValue>>,
    #[serde(skip)]
    warnings: Vec<ConfigWarning>,
}

impl PartialEq for ConfigSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}

impl ConfigSnapshot {
    pub(crate) fn new(
        sections: BTreeMap<String, BTreeMap<String, ConfigValue>>,
        warnings: Vec<ConfigWarning>,
    ) -> Self {
        Self { sections, warnings }
    }

    pub(crate) fn push_warnings(&mut self, warnings: impl IntoIterator<Item = ConfigWarning>) {
        self.warnings.extend(warnings);
    }

    /// Copy of this snapshot with one value replaced.
    pub(crate) fn with_value(&self, section: &str, key: &str, value: ConfigValue) -> Self {
        let mut next = self.clone();
        next.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_ascii_lowercase(), value);
        next
    }

    /// Typed value of a key. Keys are matched case-insensitively.
    pub fn get(&self, section: &str, key: &str) -> Option<&ConfigValue> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(&key.to_ascii_lowercase()))
    }

    /// Whether a key resolved to a value (defaults included)
    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        match self.get(section, key)? {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        match self.get(section, key)? {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, section: &str, key: &str) -> Option<i64> {
        match self.get(section, key)? {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value; integers are widened.
    pub fn get_float(&self, section: &str, key: &str) -> Option<f64> {
        match self.get(section, key)? {
            ConfigValue::Float(v) => Some(*v),
            ConfigValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_path(&self, section: &str, key: &str) -> Option<&Path> {
        match self.get(section, key)? {
            ConfigValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn get_hex(&self, section: &str, key: &str) -> Option<u8> {
        match self.get(section, key)? {
            ConfigValue::HexByte(v) => Some(*v),
            _ => None,
        }
    }

    /// Section names in sorted order
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Key/value pairs of a section in sorted key order
    pub fn entries<'a>(
        &'a self,
        section: &str,
    ) -> impl Iterator<Item = (&'a str, &'a ConfigValue)> + 'a {
        self.sections
            .get(section)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Non-fatal conditions reported while loading
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Typed view over the `[GenMon]` section
    pub fn genmon(&self) -> Result<GenMonSettings> {
        GenMonSettings::from_snapshot(self)
    }

    /// Render the snapshot as canonical INI text.
    ///
    /// Loading the output yields a snapshot equal to this one.
    pub fn to_ini(&self) -> String {
        let mut out = String::new();
        for (idx, (section, entries)) in self.sections.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section));
            for (key, value) in entries {
                out.push_str(&format!("{} = {}\n", key, value.to_ini_literal()));
            }
        }
        out
    }
}
