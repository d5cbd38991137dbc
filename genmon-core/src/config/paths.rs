//! Default path resolution for configuration and log files
//!
//! Uses XDG Base Directory specification when available, with sensible fallbacks.

use std::path::{Path, PathBuf};

/// System-wide configuration file read by the monitor service
pub const SYSTEM_CONFIG_PATH: &str = "/etc/genmon.conf";

/// Returns the default path for the configuration file.
///
/// - `/etc/genmon.conf` when it exists
/// - otherwise the XDG config directory: `~/.config/genmon/genmon.conf`
/// - fallback: `/etc/genmon.conf`
pub fn default_config_path() -> PathBuf {
    let system = Path::new(SYSTEM_CONFIG_PATH);
    if system.exists() {
        return system.to_path_buf();
    }
    dirs::config_dir()
        .map(|dir| dir.join("genmon").join("genmon.conf"))
        .unwrap_or_else(|| system.to_path_buf())
}

/// Returns the default data directory for log files.
///
/// Uses XDG data directory if available:
/// - Linux/macOS: `~/.local/share/genmon`
/// - Fallback: `/var/lib/genmon`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/var/lib"))
        .join("genmon")
}

/// Default outage log location
pub fn default_outage_log() -> String {
    default_data_dir().join("outage.txt").display().to_string()
}

/// Default power log location
pub fn default_kw_log() -> String {
    default_data_dir().join("kwlog.txt").display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_file_name() {
        let path = default_config_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("genmon.conf")
        );
    }

    #[test]
    fn test_default_data_dir_ends_with_genmon() {
        assert!(default_data_dir().ends_with("genmon"));
    }

    #[test]
    fn test_derived_log_paths() {
        assert!(default_outage_log().ends_with("outage.txt"));
        assert!(default_kw_log().ends_with("kwlog.txt"));
        assert!(Path::new(&default_kw_log()).starts_with(default_data_dir()));
    }
}
