//! Hardware detection and the writable device profile
//!
//! Everything here is owned by the monitor subsystem and kept apart from the
//! immutable [`ConfigSnapshot`](crate::config::ConfigSnapshot).

mod detection;
mod profile;
mod store;

pub use detection::{ControllerFamily, Cooling, DetectionFacts};
pub use profile::DeviceProfile;
pub use store::{profile_store, ProfileReader, ProfileWriter};
