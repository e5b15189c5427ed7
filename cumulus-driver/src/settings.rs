//! Per-driver settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, Result};
use crate::nclu::ranges;

/// VLANs set aside for layer 3 VNIs unless configured otherwise.
pub const DEFAULT_DYNAMIC_VLANS: &str = "4000-4095";

/// 802.1Q ids a VLAN can actually use; 0 and 4095 are reserved.
const USABLE_VLANS: std::ops::RangeInclusive<u16> = 1..=4094;

/// Tunables an operator sets per device or per deployment.
///
/// # Example
///
/// ```rust
/// use cumulus_driver::settings::DriverSettings;
///
/// let settings: DriverSettings = serde_json::from_str(r#"{"bridge": "br0"}"#).unwrap();
/// assert_eq!(settings.dynamic_vlans, "4000-4095");
/// assert!(settings.dynamic_vlan_pool().unwrap().contains(&4001));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// VLAN glob reserved for dynamic allocation, e.g. `4000-4095`.
    pub dynamic_vlans: String,

    /// Primary bridge name; detected from the device when unset.
    pub bridge: Option<String>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            dynamic_vlans: DEFAULT_DYNAMIC_VLANS.to_string(),
            bridge: None,
        }
    }
}

impl DriverSettings {
    /// Expand the dynamic VLAN glob.
    ///
    /// Reserved ids (0 and 4095) are dropped, so the default pool hands
    /// out 4000 to 4094.
    pub fn dynamic_vlan_pool(&self) -> Result<BTreeSet<u16>> {
        let ids = ranges::expand_glob(&self.dynamic_vlans).map_err(|e| DriverError::InvalidConfig {
            message: format!("dynamic_vlans: {e}"),
        })?;
        Ok(ids.into_iter().filter(|id| USABLE_VLANS.contains(id)).collect())
    }
}
