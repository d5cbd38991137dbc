//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use genmon_core::config::AppliedOverride;
use genmon_core::{ConfigSnapshot, ConfigValue, ConfigWarning, DetectionFacts, DeviceProfile};
use serde::Serialize;
use std::path::Path;

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Keys whose values are never printed
const SECRET_KEYS: [&str; 1] = ["http_pass"];

fn display_value(key: &str, value: &ConfigValue) -> String {
    if SECRET_KEYS.contains(&key) && !value.is_empty() {
        return "********".dimmed().to_string();
    }
    match value {
        ConfigValue::Bool(true) => "True".green().to_string(),
        ConfigValue::Bool(false) => "False".dimmed().to_string(),
        ConfigValue::HexByte(v) => format!("{:02x}", v).cyan().to_string(),
        other if other.is_empty() => "(empty)".dimmed().to_string(),
        other => other.to_ini_literal(),
    }
}

fn format_warning_lines(warnings: &[ConfigWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("{} {}", "!".yellow().bold(), w))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary printed by `check`
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub path: &'a Path,
    pub valid: bool,
    pub warnings: &'a [ConfigWarning],
    pub settings: &'a genmon_core::GenMonSettings,
}

/// Format a successful validation
pub fn format_check(report: &CheckReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let settings = report.settings;
            let mut output = format_success(&format!(
                "Configuration valid: {}",
                report.path.display()
            ));
            output.push('\n');
            output.push_str(&format!("Site: {}", settings.site_name.cyan()));
            output.push('\n');
            output.push_str(&format!(
                "Serial port: {}",
                settings.serial_port.display().to_string().cyan()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Modbus address: {}",
                format!("0x{:02x}", settings.address).cyan()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Server port: {}",
                settings.server_port.to_string().yellow()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Web interface: {} on port {}",
                if settings.web.use_https {
                    "HTTPS".green()
                } else {
                    "HTTP".yellow()
                },
                settings.web.http_port.to_string().yellow()
            ));

            if !report.warnings.is_empty() {
                output.push('\n');
                output.push_str(&format!("{}\n", "Warnings:".bold()));
                output.push_str(&format_warning_lines(report.warnings));
            }
            Ok(output)
        }
    }
}

/// Format resolved values, optionally limited to one section
pub fn format_snapshot(
    snapshot: &ConfigSnapshot,
    section: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let sections: Vec<&str> = snapshot
        .sections()
        .filter(|name| section.map_or(true, |wanted| *name == wanted))
        .collect();

    match format {
        OutputFormat::Json => {
            let mut map = serde_json::Map::new();
            for name in &sections {
                let mut entries = serde_json::Map::new();
                for (key, value) in snapshot.entries(name) {
                    if SECRET_KEYS.contains(&key) {
                        continue;
                    }
                    entries.insert(key.to_string(), serde_json::to_value(value)?);
                }
                map.insert(name.to_string(), serde_json::Value::Object(entries));
            }
            Ok(serde_json::to_string_pretty(&map)?)
        }
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct EntryRow {
                #[tabled(rename = "Section")]
                section: String,
                #[tabled(rename = "Key")]
                key: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows: Vec<EntryRow> = sections
                .iter()
                .flat_map(|name| {
                    snapshot.entries(name).map(move |(key, value)| EntryRow {
                        section: name.to_string(),
                        key: key.cyan().to_string(),
                        value: display_value(key, value),
                    })
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            let mut output = format!("{}\n{}", "Configuration:".bold(), table);
            if !snapshot.warnings().is_empty() {
                output.push('\n');
                output.push_str(&format_warning_lines(snapshot.warnings()));
            }
            Ok(output)
        }
    }
}

/// Format a single value
pub fn format_value(
    section: &str,
    key: &str,
    value: &ConfigValue,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "section": section,
                "key": key,
                "value": value,
            });
            Ok(serde_json::to_string_pretty(&response)?)
        }
        OutputFormat::Table => Ok(value.to_ini_literal()),
    }
}

/// Everything `detect` derives from a product code
#[derive(Debug, Serialize)]
pub struct DetectionReport<'a> {
    pub facts: &'a DetectionFacts,
    pub overrides: Vec<OverrideView>,
    pub profile: &'a DeviceProfile,
    pub written_to: Option<&'a Path>,
}

/// Serializable form of an applied override
#[derive(Debug, Serialize)]
pub struct OverrideView {
    pub rule: &'static str,
    pub key: &'static str,
    pub value: ConfigValue,
}

impl From<&AppliedOverride> for OverrideView {
    fn from(applied: &AppliedOverride) -> Self {
        Self {
            rule: applied.rule,
            key: applied.key,
            value: applied.value.clone(),
        }
    }
}

fn or_unknown<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Unknown".dimmed().to_string())
}

/// Format detection facts, overrides and the derived device profile
pub fn format_detection(report: &DetectionReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct FieldRow {
                #[tabled(rename = "Field")]
                field: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let facts = report.facts;
            let profile = report.profile;
            let mut controller = facts.description().cyan().to_string();
            if !facts.verified {
                controller.push_str(&format!(" {}", "(unverified)".yellow()));
            }
            if facts.family_overridden || facts.cooling_overridden {
                controller.push_str(&format!(
                    " {}",
                    format!("(register: {})", facts.product_description()).dimmed()
                ));
            }

            let rows = vec![
                FieldRow {
                    field: "Product code".to_string(),
                    value: format!("0x{:04x}", facts.product_code),
                },
                FieldRow {
                    field: "Controller".to_string(),
                    value: controller,
                },
                FieldRow {
                    field: "Model".to_string(),
                    value: or_unknown(&profile.model),
                },
                FieldRow {
                    field: "Fuel type".to_string(),
                    value: or_unknown(&profile.fuel_type),
                },
                FieldRow {
                    field: "Nominal frequency (Hz)".to_string(),
                    value: or_unknown(&profile.nominal_frequency),
                },
                FieldRow {
                    field: "Nominal RPM".to_string(),
                    value: or_unknown(&profile.nominal_rpm),
                },
                FieldRow {
                    field: "Nominal kW".to_string(),
                    value: or_unknown(&profile.nominal_kw),
                },
                FieldRow {
                    field: "Version".to_string(),
                    value: format!(
                        "{}{}",
                        or_unknown(&profile.version),
                        if profile.new_install {
                            format!(" {}", "(new install)".yellow())
                        } else {
                            String::new()
                        }
                    ),
                },
            ];

            let table = Table::new(rows).with(Style::rounded()).to_string();
            let mut output = format!("{}\n{}", "Detected Device:".bold(), table);

            for applied in &report.overrides {
                output.push('\n');
                output.push_str(&format!(
                    "{} {}: {} = {}",
                    "→".cyan().bold(),
                    applied.rule,
                    applied.key,
                    applied.value
                ));
            }

            if let Some(path) = report.written_to {
                output.push('\n');
                output.push_str(&format_success(&format!(
                    "Profile written to {}",
                    path.display()
                )));
            }
            Ok(output)
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
