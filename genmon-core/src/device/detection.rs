//! Controller detection from the product-model register
//!
//! Register `0x0000` of the controller holds a product code identifying the
//! controller family and cooling type. Operators can pin either fact in the
//! configuration (`evolutioncontroller`, `liquidcooled`), which takes
//! precedence over what the register reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::config::{ConfigSnapshot, GENMON_SECTION};

/// Controller family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerFamily {
    Nexus,
    Evolution,
}

impl fmt::Display for ControllerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerFamily::Nexus => f.write_str("Nexus"),
            ControllerFamily::Evolution => f.write_str("Evolution"),
        }
    }
}

/// Engine cooling type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cooling {
    Air,
    Liquid,
}

impl fmt::Display for Cooling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cooling::Air => f.write_str("Air Cooled"),
            Cooling::Liquid => f.write_str("Liquid Cooled"),
        }
    }
}

/// Known product codes and what they identify
const KNOWN_PRODUCTS: [(u16, ControllerFamily, Cooling); 4] = [
    (0x03, ControllerFamily::Nexus, Cooling::Air),
    (0x06, ControllerFamily::Nexus, Cooling::Liquid),
    (0x09, ControllerFamily::Evolution, Cooling::Air),
    (0x0c, ControllerFamily::Evolution, Cooling::Liquid),
];

/// Highest product code still assumed to be a Nexus controller
const LAST_NEXUS_CODE: u16 = 0x06;

/// Facts established by hardware detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionFacts {
    /// Raw value of the product-model register
    pub product_code: u16,
    pub family: ControllerFamily,
    pub cooling: Cooling,
    /// Whether the product code is one of the known values
    pub verified: bool,
    /// Family was pinned by `evolutioncontroller`
    pub family_overridden: bool,
    /// Cooling was pinned by `liquidcooled`
    pub cooling_overridden: bool,
}

impl DetectionFacts {
    /// Decode the product-model register.
    ///
    /// Unknown codes fall back to Nexus for codes up to `0x06`, Evolution
    /// above, and air cooling; they are flagged as unverified.
    pub fn from_product_code(code: u16) -> Self {
        match KNOWN_PRODUCTS.iter().find(|(known, _, _)| *known == code) {
            Some(&(_, family, cooling)) => Self {
                product_code: code,
                family,
                cooling,
                verified: true,
                family_overridden: false,
                cooling_overridden: false,
            },
            None => {
                let family = if code <= LAST_NEXUS_CODE {
                    ControllerFamily::Nexus
                } else {
                    ControllerFamily::Evolution
                };
                warn!(
                    "Unverified value detected in model register ({:04x}); assuming {}, {}",
                    code,
                    family,
                    Cooling::Air
                );
                Self {
                    product_code: code,
                    family,
                    cooling: Cooling::Air,
                    verified: false,
                    family_overridden: false,
                    cooling_overridden: false,
                }
            }
        }
    }

    /// Apply operator-pinned values from the configuration.
    pub fn with_config_overrides(mut self, snapshot: &ConfigSnapshot) -> Self {
        if let Some(evolution) = snapshot.get_bool(GENMON_SECTION, "evolutioncontroller") {
            self.family = if evolution {
                ControllerFamily::Evolution
            } else {
                ControllerFamily::Nexus
            };
            self.family_overridden = true;
            info!("Controller auto-detect override: {}", self.family);
        }
        if let Some(liquid) = snapshot.get_bool(GENMON_SECTION, "liquidcooled") {
            self.cooling = if liquid { Cooling::Liquid } else { Cooling::Air };
            self.cooling_overridden = true;
            info!("Cooling auto-detect override: {}", self.cooling);
        }
        self
    }

    /// Decode the register and apply configuration overrides.
    pub fn detect(code: u16, snapshot: &ConfigSnapshot) -> Self {
        Self::from_product_code(code).with_config_overrides(snapshot)
    }

    /// Human-readable controller description
    pub fn description(&self) -> String {
        format!("{}, {}", self.family, self.cooling)
    }

    /// Description of the raw register value alone, ignoring overrides
    pub fn product_description(&self) -> String {
        KNOWN_PRODUCTS
            .iter()
            .find(|(known, _, _)| *known == self.product_code)
            .map(|(_, family, cooling)| format!("{}, {}", family, cooling))
            .unwrap_or_else(|| format!("Unknown 0x{:02X}", self.product_code))
    }
}
