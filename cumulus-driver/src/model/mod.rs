//! Vendor-neutral object model exchanged with the orchestrator.
//!
//! These are plain values. The driver reads them from the device and
//! turns requested values into NCLU commands; it never keeps them.

mod auto;
mod esi;
mod interface;
mod vxlan;

pub use auto::AutoValue;
pub use esi::Esi;
pub use interface::{
    AddressFamily, BridgeAttributes, Duplex, Interface, InterfaceAddress, InterfaceMode,
    RouteAttributes, VirtualType,
};
pub use vxlan::{Vxlan, VxlanBinding};

use serde::{Deserialize, Serialize};

/// A VLAN on the primary bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    #[serde(default = "enabled")]
    pub admin_enabled: bool,
}

impl Vlan {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            admin_enabled: true,
        }
    }
}

/// A VRF.
///
/// The device does not report per-family state, so both families read
/// back as enabled. Targets and RD are carried for symmetry only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vrf {
    pub name: String,
    #[serde(default = "enabled")]
    pub ipv4: bool,
    #[serde(default = "enabled")]
    pub ipv6: bool,
    #[serde(default)]
    pub import_targets: Vec<String>,
    #[serde(default)]
    pub export_targets: Vec<String>,
    #[serde(default)]
    pub route_distinguisher: Option<String>,
}

impl Vrf {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ipv4: true,
            ipv6: true,
            import_targets: Vec::new(),
            export_targets: Vec::new(),
            route_distinguisher: None,
        }
    }
}

/// An 802.3ad bond, optionally multihomed via EVPN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lag {
    pub name: String,
    /// Member ports, in device order.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub evpn_esi: Option<String>,
}

fn enabled() -> bool {
    true
}

/// Result of a keyed or unkeyed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// A key was given and matched exactly one object.
    One(T),
    /// Everything else: no key, or a key that matched zero objects.
    Many(Vec<T>),
}

impl<T> Lookup<T> {
    /// Build from a read that may have been filtered by key.
    pub fn from_results(keyed: bool, mut items: Vec<T>) -> Self {
        if keyed && items.len() == 1 {
            if let Some(item) = items.pop() {
                return Lookup::One(item);
            }
        }
        Lookup::Many(items)
    }

    /// The single object, if exactly one matched.
    pub fn one(self) -> Option<T> {
        match self {
            Lookup::One(item) => Some(item),
            Lookup::Many(_) => None,
        }
    }

    /// All objects.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Lookup::One(item) => vec![item],
            Lookup::Many(items) => items,
        }
    }
}
