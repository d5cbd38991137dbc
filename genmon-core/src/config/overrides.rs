//! Post-load overrides driven by hardware detection
//!
//! Some settings depend on facts only known once the controller has been
//! queried. Rather than mutating the loaded snapshot, the monitor derives a new
//! one through [`apply_detected_overrides`].

use tracing::info;

use super::schema::GENMON_SECTION;
use super::snapshot::ConfigSnapshot;
use super::value::ConfigValue;
use crate::device::{ControllerFamily, DetectionFacts};

/// A setting changed by a detection override
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedOverride {
    pub rule: &'static str,
    pub section: &'static str,
    pub key: &'static str,
    pub value: ConfigValue,
}

type OverrideFn = fn(&ConfigSnapshot, &DetectionFacts) -> Option<AppliedOverride>;

fn nexus_forces_legacy_exercise(
    snapshot: &ConfigSnapshot,
    facts: &DetectionFacts,
) -> Option<AppliedOverride> {
    if facts.family != ControllerFamily::Nexus {
        return None;
    }
    if snapshot.get_bool(GENMON_SECTION, "uselegacysetexercise") == Some(true) {
        return None;
    }
    Some(AppliedOverride {
        rule: "nexus_forces_legacy_exercise",
        section: GENMON_SECTION,
        key: "uselegacysetexercise",
        value: ConfigValue::Bool(true),
    })
}

const OVERRIDES: &[OverrideFn] = &[nexus_forces_legacy_exercise];

/// Overrides that detection would apply, in order, without applying them.
pub fn detected_overrides(snapshot: &ConfigSnapshot, facts: &DetectionFacts) -> Vec<AppliedOverride> {
    OVERRIDES
        .iter()
        .filter_map(|rule| rule(snapshot, facts))
        .collect()
}

/// Derive the effective snapshot after hardware detection.
///
/// The input snapshot is left unchanged.
pub fn apply_detected_overrides(snapshot: &ConfigSnapshot, facts: &DetectionFacts) -> ConfigSnapshot {
    detected_overrides(snapshot, facts)
        .into_iter()
        .fold(snapshot.clone(), |acc, applied| {
            info!(
                "{}: forcing [{}] {} = {}",
                applied.rule, applied.section, applied.key, applied.value
            );
            acc.with_value(applied.section, applied.key, applied.value)
        })
}
