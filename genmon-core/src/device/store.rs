//! Shared access to the current device profile
//!
//! Detection can run while the web interface is reading the profile, so the
//! profile is published as whole `Arc` snapshots: one [`ProfileWriter`]
//! (not `Clone`) replaces it, any number of [`ProfileReader`]s observe it.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use super::profile::DeviceProfile;

type Shared = Arc<RwLock<Arc<DeviceProfile>>>;

/// Create a store holding `initial`, returning its only writer and a reader.
pub fn profile_store(initial: DeviceProfile) -> (ProfileWriter, ProfileReader) {
    let shared: Shared = Arc::new(RwLock::new(Arc::new(initial)));
    (
        ProfileWriter {
            shared: shared.clone(),
        },
        ProfileReader { shared },
    )
}

/// Exclusive write handle
#[derive(Debug)]
pub struct ProfileWriter {
    shared: Shared,
}

impl ProfileWriter {
    /// Replace the published profile.
    pub fn publish(&self, profile: DeviceProfile) -> Arc<DeviceProfile> {
        let profile = Arc::new(profile);
        let mut guard = self.shared.write().unwrap_or_else(PoisonError::into_inner);
        *guard = profile.clone();
        debug!("Published device profile: {:?}", profile.model);
        profile
    }

    /// Derive a new profile from the current one and publish it.
    pub fn update(&self, f: impl FnOnce(&DeviceProfile) -> DeviceProfile) -> Arc<DeviceProfile> {
        let next = f(&self.current());
        self.publish(next)
    }

    /// Currently published profile
    pub fn current(&self) -> Arc<DeviceProfile> {
        read(&self.shared)
    }

    /// Another reader of this store
    pub fn reader(&self) -> ProfileReader {
        ProfileReader {
            shared: self.shared.clone(),
        }
    }
}

/// Shared read handle
#[derive(Debug, Clone)]
pub struct ProfileReader {
    shared: Shared,
}

impl ProfileReader {
    /// Currently published profile; stays valid after later publishes.
    pub fn current(&self) -> Arc<DeviceProfile> {
        read(&self.shared)
    }
}

fn read(shared: &Shared) -> Arc<DeviceProfile> {
    shared
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
