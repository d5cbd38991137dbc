//! Typed view over the `[GenMon]` section
//!
//! External subsystems (monitor loop, web server, mail client) consume these
//! structs rather than looking keys up by name.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::schema::GENMON_SECTION;
use super::snapshot::ConfigSnapshot;
use crate::error::{ConfigError, Result};

/// Console and diagnostic output switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayOptions {
    pub output: bool,
    pub monitor: bool,
    pub registers: bool,
    pub status: bool,
    pub maintenance: bool,
    pub unknown_sensors: bool,
    pub debug: bool,
}

/// Log file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogOptions {
    pub location: PathBuf,
    pub outage_log: PathBuf,
    pub kw_log: PathBuf,
    /// Maximum size of the power log in MB
    pub kw_log_max_mb: u64,
}

/// Exercise scheduling and clock synchronisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseOptions {
    pub use_legacy_set_exercise: bool,
    pub enhanced_exercise: bool,
    pub sync_dst: bool,
    pub sync_time: bool,
}

/// Web interface security settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebOptions {
    pub use_https: bool,
    pub use_self_signed_cert: bool,
    pub key_file: PathBuf,
    pub cert_file: PathBuf,
    pub http_user: String,
    #[serde(skip_serializing)]
    pub http_pass: String,
    pub http_port: u16,
    pub favicon: String,
}

impl WebOptions {
    /// Login credentials, only when HTTPS is enabled and both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.use_https && !self.http_user.is_empty() && !self.http_pass.is_empty() {
            Some((&self.http_user, &self.http_pass))
        } else {
            None
        }
    }

    /// TLS key and certificate supplied by the operator, when not self-signed.
    pub fn tls_files(&self) -> Option<(&Path, &Path)> {
        if self.use_https && !self.use_self_signed_cert {
            Some((&self.key_file, &self.cert_file))
        } else {
            None
        }
    }
}

/// Settings of the `[GenMon]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenMonSettings {
    pub site_name: String,
    /// Serial device of the controller
    pub serial_port: PathBuf,
    pub incoming_mail_folder: String,
    pub processed_mail_folder: String,
    /// Command/status socket port
    pub server_port: u16,
    /// Modbus slave address
    pub address: u8,
    pub display: DisplayOptions,
    pub logs: LogOptions,
    pub exercise: ExerciseOptions,
    pub web: WebOptions,
    pub disable_outage_check: bool,
    pub petroleum_fuel: bool,
    pub auto_feedback: bool,
    /// `None` means auto-detect
    pub evolution_controller: Option<bool>,
    /// `None` means auto-detect
    pub liquid_cooled: Option<bool>,
}

struct Reader<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl Reader<'_> {
    fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingRequiredKey {
            section: GENMON_SECTION.to_string(),
            key: key.to_string(),
        }
    }

    fn string(&self, key: &str) -> Result<String> {
        self.snapshot
            .get_str(GENMON_SECTION, key)
            .map(str::to_string)
            .ok_or_else(|| self.missing(key))
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        self.snapshot
            .get_path(GENMON_SECTION, key)
            .map(Path::to_path_buf)
            .ok_or_else(|| self.missing(key))
    }

    fn flag(&self, key: &str) -> Result<bool> {
        self.snapshot
            .get_bool(GENMON_SECTION, key)
            .ok_or_else(|| self.missing(key))
    }

    fn port(&self, key: &str) -> Result<u16> {
        let value = self
            .snapshot
            .get_int(GENMON_SECTION, key)
            .ok_or_else(|| self.missing(key))?;
        u16::try_from(value).map_err(|_| ConfigError::OutOfRange {
            section: GENMON_SECTION.to_string(),
            key: key.to_string(),
            raw: value.to_string(),
            constraint: "between 1 and 65535".to_string(),
        })
    }
}

impl GenMonSettings {
    /// Build the typed view from a loaded snapshot.
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Result<Self> {
        let r = Reader { snapshot };

        let kw_log_max = snapshot
            .get_int(GENMON_SECTION, "kwlogmax")
            .ok_or_else(|| r.missing("kwlogmax"))?;
        let kw_log_max_mb = u64::try_from(kw_log_max).map_err(|_| ConfigError::OutOfRange {
            section: GENMON_SECTION.to_string(),
            key: "kwlogmax".to_string(),
            raw: kw_log_max.to_string(),
            constraint: "at least 0".to_string(),
        })?;
        let address = snapshot
            .get_hex(GENMON_SECTION, "address")
            .ok_or_else(|| r.missing("address"))?;

        Ok(Self {
            site_name: r.string("sitename")?,
            serial_port: r.path("port")?,
            incoming_mail_folder: r.string("incoming_mail_folder")?,
            processed_mail_folder: r.string("processed_mail_folder")?,
            server_port: r.port("server_port")?,
            address,
            display: DisplayOptions {
                output: r.flag("displayoutput")?,
                monitor: r.flag("displaymonitor")?,
                registers: r.flag("displayregisters")?,
                status: r.flag("displaystatus")?,
                maintenance: r.flag("displaymaintenance")?,
                unknown_sensors: r.flag("displayunknown")?,
                debug: r.flag("enabledebug")?,
            },
            logs: LogOptions {
                location: r.path("loglocation")?,
                outage_log: r.path("outagelog")?,
                kw_log: r.path("kwlog")?,
                kw_log_max_mb,
            },
            exercise: ExerciseOptions {
                use_legacy_set_exercise: r.flag("uselegacysetexercise")?,
                enhanced_exercise: r.flag("enhancedexercise")?,
                sync_dst: r.flag("syncdst")?,
                sync_time: r.flag("synctime")?,
            },
            web: WebOptions {
                use_https: r.flag("usehttps")?,
                use_self_signed_cert: r.flag("useselfsignedcert")?,
                key_file: r.path("keyfile")?,
                cert_file: r.path("certfile")?,
                http_user: r.string("http_user")?,
                http_pass: r.string("http_pass")?,
                http_port: r.port("http_port")?,
                favicon: r.string("favicon")?,
            },
            disable_outage_check: r.flag("disableoutagecheck")?,
            petroleum_fuel: r.flag("petroleumfuel")?,
            auto_feedback: r.flag("autofeedback")?,
            evolution_controller: snapshot.get_bool(GENMON_SECTION, "evolutioncontroller"),
            liquid_cooled: snapshot.get_bool(GENMON_SECTION, "liquidcooled"),
        })
    }
}
