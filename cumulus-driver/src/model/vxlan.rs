//! VXLAN tunnels bound to EVPN.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::AutoValue;

/// What a VNI is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VxlanBinding {
    /// Layer 2 VNI stretching a VLAN.
    Layer2 { vlan: u16 },
    /// Layer 3 VNI carrying a tenant VRF.
    Layer3 { vrf: String },
}

/// A VXLAN tunnel and its EVPN parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vxlan {
    /// VNI.
    pub id: u32,
    /// Local tunnel address; `auto` is the device loopback.
    #[serde(default)]
    pub source_address: AutoValue<IpAddr>,
    pub binding: VxlanBinding,
    /// `auto` is `<router-id>:<vlan>` for layer 2.
    #[serde(default)]
    pub route_distinguisher: AutoValue<String>,
    /// `auto` entries are `<asn>:<vni>`.
    #[serde(default)]
    pub import_targets: Vec<AutoValue<String>>,
    #[serde(default)]
    pub export_targets: Vec<AutoValue<String>>,
}

impl Vxlan {
    /// 2 or 3.
    pub fn layer(&self) -> u8 {
        match self.binding {
            VxlanBinding::Layer2 { .. } => 2,
            VxlanBinding::Layer3 { .. } => 3,
        }
    }

    /// Name of the VXLAN interface NCLU creates for this VNI.
    pub fn interface_name(&self) -> String {
        format!("vxlan{}", self.id)
    }
}
