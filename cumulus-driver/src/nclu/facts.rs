//! Device facts the generators depend on: OS release and platform, BGP
//! identity, loopback address, and the primary bridge.

use std::net::IpAddr;

use indexmap::IndexMap;
use ipnetwork::IpNetwork;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::interface::InterfaceTable;

static SYSTEM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<key>[^.\n]+?)\.+\s+(?P<value>.*?)\s*$")
        .expect("system pattern is a valid regex")
});

static RELEASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<major>\d+)\.(?P<minor>\d+)(?:\.(?P<patch>\d+))?")
        .expect("release pattern is a valid regex")
});

/// First release with EVPN multihoming.
const EVPN_MH_RELEASE: OsVersion = OsVersion {
    major: 4,
    minor: 2,
    patch: 0,
};

/// Cumulus Linux release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// `net show system`, a dotted key/value listing.
#[derive(Debug, Clone, Default)]
pub struct SystemInfo {
    pub fields: IndexMap<String, String>,
}

impl SystemInfo {
    fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.field("Hostname")
    }

    pub fn model(&self) -> Option<&str> {
        self.field("Model")
    }

    pub fn asic(&self) -> Option<&str> {
        self.field("ASIC")
    }

    /// Release parsed from the `Build` line.
    pub fn version(&self) -> Option<OsVersion> {
        let caps = RELEASE.captures(self.field("Build")?)?;
        Some(OsVersion {
            major: caps["major"].parse().ok()?,
            minor: caps["minor"].parse().ok()?,
            patch: caps
                .name("patch")
                .and_then(|p| p.as_str().parse().ok())
                .unwrap_or(0),
        })
    }

    /// Check if the device can configure EVPN multihoming.
    ///
    /// Needs release 4.2 or later on a Spectrum ASIC, or the VX virtual
    /// platform.
    pub fn supports_evpn_mh(&self) -> bool {
        let release_ok = self.version().is_some_and(|v| v >= EVPN_MH_RELEASE);
        let platform_ok = self.asic().is_some_and(|a| a.contains("Spectrum"))
            || self.model().is_some_and(|m| m.contains("VX"));
        release_ok && platform_ok
    }
}

pub fn parse_system(output: &str) -> SystemInfo {
    let fields = SYSTEM_LINE
        .captures_iter(output)
        .map(|caps| (caps["key"].trim().to_string(), caps["value"].to_string()))
        .collect();
    SystemInfo { fields }
}

/// Per-family block of `net show bgp summary json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BgpFamilySummary {
    #[serde(default, rename = "routerId")]
    pub router_id: String,
    #[serde(default, rename = "as")]
    pub asn: u32,
}

/// `net show bgp summary json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BgpSummary {
    #[serde(default, rename = "ipv4Unicast")]
    pub ipv4_unicast: Option<BgpFamilySummary>,
    #[serde(default, rename = "ipv6Unicast")]
    pub ipv6_unicast: Option<BgpFamilySummary>,
    #[serde(default, rename = "l2VpnEvpn")]
    pub l2vpn_evpn: Option<BgpFamilySummary>,
}

/// Local BGP identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpFacts {
    pub asn: u32,
    pub router_id: String,
}

/// BGP identity from the first address family that reports one.
pub fn parse_bgp_summary(summary: &BgpSummary) -> Option<BgpFacts> {
    [&summary.ipv4_unicast, &summary.ipv6_unicast, &summary.l2vpn_evpn]
        .into_iter()
        .flatten()
        .find(|family| family.asn != 0 && !family.router_id.is_empty())
        .map(|family| BgpFacts {
            asn: family.asn,
            router_id: family.router_id.clone(),
        })
}

/// First IPv4 address on `lo` outside 127/8; the usual VTEP source.
pub fn loopback_address(table: &InterfaceTable) -> Option<IpAddr> {
    table
        .get("lo")?
        .iface_obj
        .ip_address
        .allentries
        .iter()
        .filter_map(|entry| entry.parse::<IpNetwork>().ok())
        .map(|network| network.ip())
        .find(|ip| matches!(ip, IpAddr::V4(v4) if !v4.is_loopback()))
}

/// The bridge VLANs live on: `configured` if set, else the first
/// `Bridge/L2` link.
pub fn detect_bridge(table: &InterfaceTable, configured: Option<&str>) -> Option<String> {
    if let Some(bridge) = configured {
        return Some(bridge.to_string());
    }
    table
        .iter()
        .find(|(_, record)| record.mode == "Bridge/L2")
        .map(|(name, _)| name.clone())
}

/// Check if SVI `vlan<id>` exists and routes, i.e. has an address of its
/// own or an anycast address on its `-v0` macvlan.
pub fn svi_has_address(table: &InterfaceTable, vlan: u16) -> bool {
    let name = format!("vlan{vlan}");
    [name.clone(), format!("{name}-v0")]
        .iter()
        .filter_map(|n| table.get(n))
        .any(|record| !record.iface_obj.ip_address.allentries.is_empty())
}
