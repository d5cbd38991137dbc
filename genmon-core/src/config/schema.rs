//! Declarative description of the recognised configuration keys

use super::paths::{default_kw_log, default_outage_log};
use super::value::{Constraint, ValueKind};

/// Section holding the monitor settings
pub const GENMON_SECTION: &str = "GenMon";

/// Default value policy for an entry
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    /// Loading fails when the key is absent
    Required,
    /// Raw literal, coerced exactly like a value read from the file
    Literal(&'static str),
    /// Raw literal computed at load time (e.g. a path under the data directory)
    Derived(fn() -> String),
    /// Key stays absent from the snapshot; consumers treat it as auto-detect
    Unset,
}

/// Descriptor for one configuration key
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub section: String,
    pub key: String,
    pub kind: ValueKind,
    pub default: DefaultValue,
    pub constraint: Option<Constraint>,
    /// One-line operator-facing description
    pub description: &'static str,
}

impl ConfigEntry {
    /// Create an optional entry with no default and no constraint.
    pub fn new(section: &str, key: &str, kind: ValueKind) -> Self {
        Self {
            section: section.to_string(),
            key: key.to_ascii_lowercase(),
            kind,
            default: DefaultValue::Unset,
            constraint: None,
            description: "",
        }
    }

    /// Mark the entry as required
    pub fn required(mut self) -> Self {
        self.default = DefaultValue::Required;
        self
    }

    /// Set the raw default literal
    pub fn default_literal(mut self, raw: &'static str) -> Self {
        self.default = DefaultValue::Literal(raw);
        self
    }

    /// Set a default computed at load time
    pub fn default_derived(mut self, f: fn() -> String) -> Self {
        self.default = DefaultValue::Derived(f);
        self
    }

    /// Set the validation constraint
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Set the description
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Whether the key must be present
    pub fn is_required(&self) -> bool {
        matches!(self.default, DefaultValue::Required)
    }
}

fn genmon(key: &str, kind: ValueKind) -> ConfigEntry {
    ConfigEntry::new(GENMON_SECTION, key, kind)
}

fn flag(key: &str, default: &'static str, description: &'static str) -> ConfigEntry {
    genmon(key, ValueKind::Boolean)
        .default_literal(default)
        .describe(description)
}

/// The keys recognised in the `[GenMon]` section, in validation order.
pub fn genmon_schema() -> Vec<ConfigEntry> {
    vec![
        genmon("sitename", ValueKind::String)
            .required()
            .constraint(Constraint::NonEmpty)
            .describe("Name of the site, used in notifications"),
        genmon("port", ValueKind::Path)
            .required()
            .constraint(Constraint::NonEmpty)
            .describe("Serial device connected to the controller"),
        genmon("incoming_mail_folder", ValueKind::String)
            .required()
            .constraint(Constraint::NonEmpty)
            .describe("IMAP folder polled for commands"),
        genmon("processed_mail_folder", ValueKind::String)
            .required()
            .constraint(Constraint::NonEmpty)
            .describe("IMAP folder that receives processed commands"),
        genmon("server_port", ValueKind::Integer)
            .required()
            .constraint(Constraint::PORT)
            .describe("TCP port of the command/status socket"),
        genmon("address", ValueKind::HexByte)
            .required()
            .constraint(Constraint::HexDigits(2))
            .describe("Modbus slave address of the controller"),
        genmon("loglocation", ValueKind::Path)
            .required()
            .constraint(Constraint::NonEmpty)
            .describe("Directory for log files"),
        flag("displayoutput", "False", "Print output to the console"),
        flag("displaymonitor", "False", "Print communication statistics"),
        flag("displayregisters", "False", "Print register values"),
        flag("displaystatus", "False", "Print generator status"),
        flag("displaymaintenance", "False", "Print maintenance information"),
        flag("enabledebug", "False", "Enable debug output"),
        flag("displayunknown", "False", "Show sensors of unknown meaning"),
        flag(
            "uselegacysetexercise",
            "False",
            "Write exercise time with the legacy method",
        ),
        flag("disableoutagecheck", "False", "Do not track utility outages"),
        flag("petroleumfuel", "False", "Generator runs on petroleum fuel"),
        flag("syncdst", "False", "Sync controller time on DST changes"),
        flag("synctime", "False", "Keep controller time in sync with the host"),
        flag(
            "enhancedexercise",
            "False",
            "Controller supports biweekly and monthly exercise",
        ),
        flag("usehttps", "False", "Serve the web interface over HTTPS"),
        flag(
            "useselfsignedcert",
            "True",
            "Generate a self-signed certificate for HTTPS",
        ),
        flag("autofeedback", "False", "Send feedback about unknown models"),
        genmon("liquidcooled", ValueKind::Boolean).describe("Override liquid/air cooling detection"),
        genmon("evolutioncontroller", ValueKind::Boolean)
            .describe("Override Evolution/Nexus controller detection"),
        genmon("outagelog", ValueKind::Path)
            .default_derived(default_outage_log)
            .describe("Outage log file"),
        genmon("kwlog", ValueKind::Path)
            .default_derived(default_kw_log)
            .describe("Power log file"),
        genmon("kwlogmax", ValueKind::Integer)
            .default_literal("15")
            .constraint(Constraint::POSITIVE)
            .describe("Maximum power log size in MB"),
        genmon("keyfile", ValueKind::Path)
            .default_literal("")
            .describe("TLS private key, when not self-signed"),
        genmon("certfile", ValueKind::Path)
            .default_literal("")
            .describe("TLS certificate, when not self-signed"),
        genmon("http_user", ValueKind::String)
            .default_literal("")
            .describe("Web interface user name (HTTPS only)"),
        genmon("http_pass", ValueKind::String)
            .default_literal("")
            .describe("Web interface password (HTTPS only)"),
        genmon("http_port", ValueKind::Integer)
            .default_literal("8000")
            .constraint(Constraint::PORT)
            .describe("Web interface port"),
        genmon("favicon", ValueKind::String)
            .default_literal("")
            .describe("Custom favicon URL or path"),
        genmon("model", ValueKind::String).describe("Detected generator model"),
        genmon("fueltype", ValueKind::String).describe("Detected fuel type"),
        genmon("nominalfrequency", ValueKind::Integer)
            .constraint(Constraint::POSITIVE)
            .describe("Nominal output frequency in Hz"),
        genmon("nominalrpm", ValueKind::Integer)
            .constraint(Constraint::POSITIVE)
            .describe("Nominal engine speed"),
        genmon("nominalkw", ValueKind::Float).describe("Nominal power rating in kW"),
        genmon("version", ValueKind::String).describe("Software version that last wrote the file"),
    ]
}
