//! Configuration types for the generator monitor
//!
//! # Architecture
//!
//! - [`ConfigLoader`] - parses the INI source, coerces and validates every
//!   declared [`ConfigEntry`] and runs the cross-field [`Rule`]s
//! - [`ConfigSnapshot`] - the immutable result, shared read-only by consumers
//! - [`GenMonSettings`] - typed view over the `[GenMon]` section
//! - [`apply_detected_overrides`] - derives a new snapshot once hardware
//!   detection has run
//! - [`persist_entries`] - writes detected values back to the file

mod ini;
mod loader;
mod overrides;
mod paths;
mod rules;
mod schema;
mod settings;
mod snapshot;
mod value;
mod writeback;

pub use loader::{load, ConfigLoader};
pub use overrides::{apply_detected_overrides, detected_overrides, AppliedOverride};
pub use paths::{
    default_config_path, default_data_dir, default_kw_log, default_outage_log, SYSTEM_CONFIG_PATH,
};
pub use rules::{default_rules, ConfigWarning, Rule, RuleOutcome};
pub use schema::{genmon_schema, ConfigEntry, DefaultValue, GENMON_SECTION};
pub use settings::{DisplayOptions, ExerciseOptions, GenMonSettings, LogOptions, WebOptions};
pub use snapshot::ConfigSnapshot;
pub use value::{parse_bool, ConfigValue, Constraint, ValueKind, FALSE_LITERALS, TRUE_LITERALS};
pub use writeback::persist_entries;
