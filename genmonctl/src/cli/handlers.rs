//! Command execution handlers
//!
//! Handlers return the rendered output so `main` decides where it goes.

use anyhow::{anyhow, Context, Result};
use clap::CommandFactory;
use genmon_core::config::detected_overrides;
use genmon_core::{load, ConfigSnapshot, DetectionFacts, DeviceProfile, SOFTWARE_VERSION};
use std::path::Path;
use tracing::debug;

use crate::format::{
    format_check, format_detection, format_snapshot, format_value, CheckReport, DetectionReport,
    OverrideView,
};

use super::commands::*;

fn load_snapshot(path: &Path) -> Result<ConfigSnapshot> {
    debug!("Loading configuration from {}", path.display());
    load(path).with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Handle check command
pub fn handle_check(path: &Path, format: OutputFormat) -> Result<String> {
    let snapshot = load_snapshot(path)?;
    let settings = snapshot.genmon()?;
    let report = CheckReport {
        path,
        valid: true,
        warnings: snapshot.warnings(),
        settings: &settings,
    };
    format_check(&report, format.into())
}

/// Handle show command
pub fn handle_show(path: &Path, section: Option<&str>, format: OutputFormat) -> Result<String> {
    let snapshot = load_snapshot(path)?;
    if let Some(wanted) = section {
        if !snapshot.sections().any(|name| name == wanted) {
            return Err(anyhow!("Section [{}] not found in {}", wanted, path.display()));
        }
    }
    format_snapshot(&snapshot, section, format.into())
}

/// Handle get command
pub fn handle_get(path: &Path, section: &str, key: &str, format: OutputFormat) -> Result<String> {
    let snapshot = load_snapshot(path)?;
    let key = key.to_lowercase();
    let value = snapshot
        .get(section, &key)
        .ok_or_else(|| anyhow!("Key '{}' not found in section [{}]", key, section))?;
    format_value(section, &key, value, format.into())
}

/// Handle export command
pub fn handle_export(path: &Path) -> Result<String> {
    let snapshot = load_snapshot(path)?;
    Ok(snapshot.to_ini().trim_end().to_string())
}

/// Handle detect command
pub fn handle_detect(
    path: &Path,
    product_code: u16,
    write: bool,
    format: OutputFormat,
) -> Result<String> {
    let snapshot = load_snapshot(path)?;
    let facts = DetectionFacts::detect(product_code, &snapshot);
    debug!("Detected {}", facts.description());

    let overrides = detected_overrides(&snapshot, &facts)
        .iter()
        .map(OverrideView::from)
        .collect();
    let profile = DeviceProfile::from_snapshot(&snapshot).complete(&facts, SOFTWARE_VERSION);

    if write {
        profile
            .persist(path)
            .with_context(|| format!("Failed to write device profile to {}", path.display()))?;
    }

    let report = DetectionReport {
        facts: &facts,
        overrides,
        profile: &profile,
        written_to: write.then_some(path),
    };
    format_detection(&report, format.into())
}

/// Generate shell completion scripts
pub fn generate_completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
