//! Generator Monitor Core Library
//!
//! Typed configuration loading and validation for the generator monitor,
//! plus the device profile the monitor derives from hardware detection.
//! This crate is used by the service and by the `genmonctl` tool.

pub mod config;
pub mod device;
pub mod error;

// Re-export commonly used types
pub use config::{
    apply_detected_overrides, default_config_path, load, ConfigLoader, ConfigSnapshot,
    ConfigValue, ConfigWarning, GenMonSettings, GENMON_SECTION,
};
pub use device::{ControllerFamily, Cooling, DetectionFacts, DeviceProfile};
pub use error::*;

/// Version of the running software, recorded in the device profile
pub const SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");
