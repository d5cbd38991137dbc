//! Device profile derived from hardware detection
//!
//! The profile is owned by the monitor subsystem. It is seeded from values a
//! previous run persisted in the configuration file, completed from
//! [`DetectionFacts`], and may be written back so the next start skips the
//! lookups.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use super::detection::{ControllerFamily, Cooling, DetectionFacts};
use crate::config::{persist_entries, ConfigSnapshot, GENMON_SECTION};
use crate::error::Result;

const DEFAULT_FREQUENCY_HZ: u32 = 60;
const GENERIC_LIQUID_MODEL: &str = "Generic Liquid Cooled";
const GENERIC_AIR_MODEL: &str = "Generic Air Cooled";
const GENERIC_LIQUID_KW: f64 = 60.0;
const GENERIC_AIR_KW: f64 = 22.0;
const DIESEL: &str = "Diesel";
const NATURAL_GAS: &str = "Natural Gas";

/// Hardware-derived values written by the monitor subsystem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub controller: Option<ControllerFamily>,
    pub cooling: Option<Cooling>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub nominal_frequency: Option<u32>,
    pub nominal_rpm: Option<u32>,
    pub nominal_kw: Option<f64>,
    /// Software version that last wrote the profile
    pub version: Option<String>,
    /// Set when the running software differs from the recorded version
    pub new_install: bool,
}

fn known_string(snapshot: &ConfigSnapshot, key: &str) -> Option<String> {
    snapshot
        .get_str(GENMON_SECTION, key)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn known_u32(snapshot: &ConfigSnapshot, key: &str) -> Option<u32> {
    snapshot
        .get_int(GENMON_SECTION, key)
        .and_then(|v| u32::try_from(v).ok())
}

impl DeviceProfile {
    /// Seed the profile from values persisted in the configuration.
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        Self {
            controller: None,
            cooling: None,
            model: known_string(snapshot, "model"),
            fuel_type: known_string(snapshot, "fueltype"),
            nominal_frequency: known_u32(snapshot, "nominalfrequency"),
            nominal_rpm: known_u32(snapshot, "nominalrpm"),
            nominal_kw: snapshot.get_float(GENMON_SECTION, "nominalkw"),
            version: known_string(snapshot, "version"),
            new_install: false,
        }
    }

    /// Fill every unknown value from detection facts.
    pub fn complete(mut self, facts: &DetectionFacts, software_version: &str) -> Self {
        self.controller = Some(facts.family);
        self.cooling = Some(facts.cooling);
        let liquid = facts.cooling == Cooling::Liquid;

        if self.version.as_deref() != Some(software_version) {
            info!(
                "New version detected: old = {}, new = {}",
                self.version.as_deref().unwrap_or("none"),
                software_version
            );
            self.new_install = true;
            self.version = Some(software_version.to_string());
        }

        let frequency = *self.nominal_frequency.get_or_insert(DEFAULT_FREQUENCY_HZ);

        if self.nominal_rpm.is_none() {
            let rpm = match (liquid, frequency == 50) {
                (true, true) => 1500,
                (true, false) => 1800,
                (false, true) => 3000,
                (false, false) => 3600,
            };
            debug!("Nominal RPM unknown, using {}", rpm);
            self.nominal_rpm = Some(rpm);
        }

        if self.model.is_none() {
            let model = if liquid {
                GENERIC_LIQUID_MODEL
            } else {
                GENERIC_AIR_MODEL
            };
            debug!("Model unknown, using '{}'", model);
            self.model = Some(model.to_string());
        }

        if self.nominal_kw.is_none() {
            self.nominal_kw = Some(if liquid {
                GENERIC_LIQUID_KW
            } else {
                GENERIC_AIR_KW
            });
        }

        if self.fuel_type.is_none() {
            let fuel = self.default_fuel_type(facts);
            debug!("Fuel type unknown, using '{}'", fuel);
            self.fuel_type = Some(fuel.to_string());
        }

        self
    }

    fn default_fuel_type(&self, facts: &DetectionFacts) -> &'static str {
        let model = self.model.as_deref().unwrap_or_default();
        if model.starts_with("RD") {
            DIESEL
        } else if model.starts_with("RG") || model.starts_with("QT") {
            NATURAL_GAS
        } else if facts.cooling == Cooling::Liquid && facts.family == ControllerFamily::Evolution {
            DIESEL
        } else {
            NATURAL_GAS
        }
    }

    /// Key/value pairs to persist in the `[GenMon]` section.
    pub fn config_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(model) = &self.model {
            entries.push(("model", model.clone()));
        }
        if let Some(fuel) = &self.fuel_type {
            entries.push(("fueltype", fuel.clone()));
        }
        if let Some(freq) = self.nominal_frequency {
            entries.push(("nominalfrequency", freq.to_string()));
        }
        if let Some(rpm) = self.nominal_rpm {
            entries.push(("nominalrpm", rpm.to_string()));
        }
        if let Some(kw) = self.nominal_kw {
            entries.push(("nominalkw", kw.to_string()));
        }
        if let Some(version) = &self.version {
            entries.push(("version", version.clone()));
        }
        entries
    }

    /// Write the profile back to the configuration file.
    pub fn persist(&self, path: &Path) -> Result<()> {
        persist_entries(path, GENMON_SECTION, &self.config_entries())
    }
}
