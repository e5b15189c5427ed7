//! Interfaces and their mode-specific attributes.

use std::fmt;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

/// Link duplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    Full,
    Half,
}

/// Address family of an [`InterfaceAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("ipv4"),
            AddressFamily::V6 => f.write_str("ipv6"),
        }
    }
}

/// Kind of virtual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualType {
    /// EVPN anycast gateway, shared by every VTEP serving the subnet.
    Anycast,
}

/// An address assigned to a routed interface.
///
/// Host bits are kept: `198.18.0.1/24` stays `198.18.0.1/24`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub address: IpNetwork,
    #[serde(default, rename = "virtual")]
    pub virtual_address: bool,
    #[serde(default)]
    pub virtual_type: Option<VirtualType>,
}

impl InterfaceAddress {
    /// A plain (non-virtual) address.
    pub fn new(address: IpNetwork) -> Self {
        Self {
            address,
            virtual_address: false,
            virtual_type: None,
        }
    }

    /// An EVPN anycast gateway address.
    pub fn anycast(address: IpNetwork) -> Self {
        Self {
            address,
            virtual_address: true,
            virtual_type: Some(VirtualType::Anycast),
        }
    }

    /// Family, derived from the address.
    pub fn family(&self) -> AddressFamily {
        match self.address {
            IpNetwork::V4(_) => AddressFamily::V4,
            IpNetwork::V6(_) => AddressFamily::V6,
        }
    }

    /// Check if this is an anycast gateway address.
    pub fn is_anycast(&self) -> bool {
        self.virtual_address && self.virtual_type == Some(VirtualType::Anycast)
    }
}

/// Layer 3 attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAttributes {
    #[serde(default)]
    pub addresses: Vec<InterfaceAddress>,
    #[serde(default)]
    pub vrf: Option<String>,
    /// MAC paired with anycast addresses, any common notation.
    #[serde(default)]
    pub evpn_anycast_mac: Option<String>,
}

/// Layer 2 attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeAttributes {
    /// Trunk (802.1Q) when set, access port otherwise.
    #[serde(default)]
    pub dot1q_enabled: bool,
    #[serde(default)]
    pub dot1q_pvid: Option<u16>,
    #[serde(default)]
    pub dot1q_vids: Vec<u16>,
}

/// Forwarding mode, carrying the attributes that belong to it.
///
/// `None` attributes mean "not specified" and are only meaningful in
/// merge updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "attributes", rename_all = "lowercase")]
pub enum InterfaceMode {
    Routed(Option<RouteAttributes>),
    Bridged(Option<BridgeAttributes>),
    /// Member of a bond; see [`Interface::parent`].
    Aggregated,
}

impl InterfaceMode {
    /// Mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceMode::Routed(_) => "routed",
            InterfaceMode::Bridged(_) => "bridged",
            InterfaceMode::Aggregated => "aggregated",
        }
    }

    /// Check if two modes are the same, ignoring attributes.
    pub fn same_mode(&self, other: &InterfaceMode) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Check if attributes were supplied.
    pub fn has_attributes(&self) -> bool {
        match self {
            InterfaceMode::Routed(attrs) => attrs.is_some(),
            InterfaceMode::Bridged(attrs) => attrs.is_some(),
            InterfaceMode::Aggregated => false,
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A network interface: physical port, SVI or bond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(flatten)]
    pub mode: InterfaceMode,
    #[serde(default)]
    pub admin_enabled: Option<bool>,
    /// Uppercase, dash-separated, e.g. `0C-33-0E-25-52-01`.
    #[serde(default)]
    pub physical_address: Option<String>,
    /// Mbps.
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub duplex: Option<Duplex>,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    /// Aggregating bond, by name.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, rename = "virtual")]
    pub virtual_interface: bool,
}

impl Interface {
    /// Create an interface with only a name and mode set.
    pub fn new(name: impl Into<String>, mode: InterfaceMode) -> Self {
        let name = name.into();
        let virtual_interface = !name.starts_with("swp");
        Self {
            name,
            mode,
            admin_enabled: None,
            physical_address: None,
            speed: None,
            duplex: None,
            mtu: None,
            description: None,
            parent: None,
            virtual_interface,
        }
    }

    /// Routed attributes, if any.
    pub fn route_attributes(&self) -> Option<&RouteAttributes> {
        match &self.mode {
            InterfaceMode::Routed(attrs) => attrs.as_ref(),
            _ => None,
        }
    }

    /// Bridge attributes, if any.
    pub fn bridge_attributes(&self) -> Option<&BridgeAttributes> {
        match &self.mode {
            InterfaceMode::Bridged(attrs) => attrs.as_ref(),
            _ => None,
        }
    }

    /// Overlay `request` on top of `self`.
    ///
    /// Fields set on the request win. Attributes are taken from the request
    /// when supplied, otherwise kept if the mode is unchanged.
    pub fn merged(&self, request: &Interface) -> Interface {
        let mode = if request.mode.has_attributes() || !request.mode.same_mode(&self.mode) {
            request.mode.clone()
        } else {
            self.mode.clone()
        };
        let parent = match mode {
            InterfaceMode::Aggregated => request.parent.clone().or_else(|| self.parent.clone()),
            _ => None,
        };

        Interface {
            name: request.name.clone(),
            mode,
            admin_enabled: request.admin_enabled.or(self.admin_enabled),
            physical_address: request
                .physical_address
                .clone()
                .or_else(|| self.physical_address.clone()),
            speed: request.speed.or(self.speed),
            duplex: request.duplex.or(self.duplex),
            mtu: request.mtu.or(self.mtu),
            description: request
                .description
                .clone()
                .or_else(|| self.description.clone()),
            parent,
            virtual_interface: self.virtual_interface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routed(addresses: &[&str]) -> InterfaceMode {
        InterfaceMode::Routed(Some(RouteAttributes {
            addresses: addresses
                .iter()
                .map(|a| InterfaceAddress::new(a.parse().unwrap()))
                .collect(),
            ..Default::default()
        }))
    }

    #[test]
    fn test_address_keeps_host_bits() {
        let address = InterfaceAddress::new("198.18.0.1/24".parse().unwrap());
        assert_eq!(address.address.to_string(), "198.18.0.1/24");
        assert_eq!(address.family(), AddressFamily::V4);

        let v6 = InterfaceAddress::anycast("ea0e:a6b2:68d4:7b21::1/64".parse().unwrap());
        assert_eq!(v6.family(), AddressFamily::V6);
        assert!(v6.is_anycast());
    }

    #[test]
    fn test_virtual_flag_from_name() {
        assert!(!Interface::new("swp1", InterfaceMode::Routed(None)).virtual_interface);
        assert!(Interface::new("vlan50", InterfaceMode::Routed(None)).virtual_interface);
    }

    #[test]
    fn test_merged_keeps_current_attributes_when_unset() {
        let mut current = Interface::new("vlan50", routed(&["10.0.0.1/24"]));
        current.mtu = Some(9216);
        current.description = Some("old".to_string());

        let mut request = Interface::new("vlan50", InterfaceMode::Routed(None));
        request.description = Some("new".to_string());

        let merged = current.merged(&request);
        assert_eq!(merged.mode, current.mode);
        assert_eq!(merged.mtu, Some(9216));
        assert_eq!(merged.description.as_deref(), Some("new"));
    }

    #[test]
    fn test_merged_takes_new_mode() {
        let current = Interface::new("swp5", routed(&["10.0.0.1/31"]));
        let request = Interface::new("swp5", InterfaceMode::Bridged(None));

        let merged = current.merged(&request);
        assert_eq!(merged.mode, InterfaceMode::Bridged(None));
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{
            "name": "vlan50",
            "mode": "routed",
            "attributes": {"addresses": [{"address": "198.18.0.1/24"}]},
            "admin_enabled": true
        }"#;
        let interface: Interface = serde_json::from_str(json).unwrap();
        assert_eq!(interface.mode, routed(&["198.18.0.1/24"]));
        assert_eq!(interface.admin_enabled, Some(true));
    }
}
