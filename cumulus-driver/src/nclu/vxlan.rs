//! VXLAN/EVPN state assembled from several show commands, and the
//! commands that build and tear down VNIs.
//!
//! No single NCLU command describes a VNI. The EVPN VNI table gives its
//! type, interface and tenant VRF; the BGP EVPN VNI table gives source,
//! RD and route targets; the bridge VLAN table gives the access VLAN of
//! the VXLAN interface.

use std::collections::BTreeMap;
use std::net::IpAddr;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::decode;
use super::facts::BgpFacts;
use super::vlan::{BridgeVlanTable, port_vlan};
use crate::command::CommandResult;
use crate::error::{DriverError, ParseError, Result};
use crate::model::{AutoValue, Vxlan, VxlanBinding};

/// VNI-keyed table.
pub type VniTable<T> = BTreeMap<u32, T>;

/// One VNI from `net show evpn vni json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvpnVniRecord {
    #[serde(default, rename = "type")]
    pub vni_type: String,
    #[serde(default, rename = "vxlanIf")]
    pub vxlan_if: String,
    #[serde(default, rename = "tenantVrf")]
    pub tenant_vrf: Option<String>,
}

/// One VNI from `net show bgp l2vpn evpn vni json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BgpVniRecord {
    #[serde(default)]
    pub rd: String,
    #[serde(default, rename = "originatorIp")]
    pub originator_ip: String,
    #[serde(default, rename = "importRTs")]
    pub import_rts: Vec<String>,
    #[serde(default, rename = "exportRTs")]
    pub export_rts: Vec<String>,
}

/// A VNI as configured on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VxlanRecord {
    pub vxlan_interface: String,
    /// Access VLAN of a layer 3 VNI, taken from the dynamic pool at create.
    pub l3_vlan: Option<u16>,
    pub vxlan: Vxlan,
}

/// Decode a VNI-keyed JSON object.
///
/// Keys that are not VNIs (the BGP table mixes in summary fields like
/// `numVnis`) are skipped.
pub fn decode_vni_table<T: DeserializeOwned>(result: &CommandResult) -> Result<VniTable<T>> {
    let raw: IndexMap<String, serde_json::Value> = decode(result)?;
    let mut table = VniTable::new();
    for (key, value) in raw {
        let Ok(vni) = key.parse::<u32>() else {
            continue;
        };
        let record = T::deserialize(&value).map_err(|source| ParseError::Json {
            command: result.command.clone(),
            source,
        })?;
        table.insert(vni, record);
    }
    Ok(table)
}

/// Join the three tables into per-VNI records.
///
/// VNIs that are not fully configured (unknown type, no BGP detail, no
/// bridge binding, no originator IP) are logged and skipped.
pub fn parse_vxlan_data(
    evpn_vnis: &VniTable<EvpnVniRecord>,
    bgp_vnis: &VniTable<BgpVniRecord>,
    bridge_vlans: &BridgeVlanTable,
) -> Result<VniTable<VxlanRecord>> {
    let mut records = VniTable::new();

    for (&vni, evpn) in evpn_vnis {
        let access_vlan = port_vlan(bridge_vlans, &evpn.vxlan_if);
        let (binding, l3_vlan) = match (evpn.vni_type.as_str(), access_vlan, &evpn.tenant_vrf) {
            ("L2", Some(vlan), _) => (VxlanBinding::Layer2 { vlan }, None),
            ("L3", _, Some(vrf)) => (VxlanBinding::Layer3 { vrf: vrf.clone() }, access_vlan),
            ("L2" | "L3", _, _) => {
                warn!("VNI {vni} ({}) has no bridge or VRF binding, skipping", evpn.vxlan_if);
                continue;
            }
            (other, _, _) => {
                debug!("VNI {vni} has type '{other}', skipping");
                continue;
            }
        };

        let Some(bgp) = bgp_vnis.get(&vni) else {
            warn!("VNI {vni} has no BGP EVPN configuration, skipping");
            continue;
        };
        let Ok(source) = bgp.originator_ip.parse::<IpAddr>() else {
            warn!(
                "VNI {vni} has no usable originator IP ('{}'), skipping",
                bgp.originator_ip
            );
            continue;
        };

        records.insert(
            vni,
            VxlanRecord {
                vxlan_interface: evpn.vxlan_if.clone(),
                l3_vlan,
                vxlan: Vxlan {
                    id: vni,
                    source_address: AutoValue::Explicit(source),
                    binding,
                    route_distinguisher: AutoValue::Explicit(bgp.rd.clone()),
                    import_targets: explicit(&bgp.import_rts),
                    export_targets: explicit(&bgp.export_rts),
                },
            },
        );
    }
    Ok(records)
}

fn explicit(values: &[String]) -> Vec<AutoValue<String>> {
    values.iter().cloned().map(AutoValue::Explicit).collect()
}

/// VXLANs from parsed records, optionally only VNI `filter`.
pub fn parse_vxlans(records: &VniTable<VxlanRecord>, filter: Option<u32>) -> Vec<Vxlan> {
    match filter {
        Some(vni) => records.get(&vni).map(|r| r.vxlan.clone()).into_iter().collect(),
        None => records.values().map(|r| r.vxlan.clone()).collect(),
    }
}

/// Overlay `request` on `current`, unioning route targets.
pub fn merged(current: &Vxlan, request: &Vxlan) -> Vxlan {
    let union = |a: &[AutoValue<String>], b: &[AutoValue<String>]| {
        let mut out = a.to_vec();
        for target in b {
            if !out.contains(target) {
                out.push(target.clone());
            }
        }
        out
    };
    Vxlan {
        import_targets: union(&current.import_targets, &request.import_targets),
        export_targets: union(&current.export_targets, &request.export_targets),
        ..request.clone()
    }
}

/// Route target commands; `auto` is `<asn>:<vni>`.
pub fn generate_route_target_commands(vxlan: &Vxlan, asn: u32) -> Vec<String> {
    let auto_rt = format!("{asn}:{}", vxlan.id);
    let prefix = match &vxlan.binding {
        VxlanBinding::Layer2 { .. } => format!("add bgp l2vpn evpn vni {}", vxlan.id),
        VxlanBinding::Layer3 { vrf } => format!("add bgp vrf {vrf} evpn"),
    };

    [("import", &vxlan.import_targets), ("export", &vxlan.export_targets)]
        .into_iter()
        .flat_map(|(direction, targets)| {
            targets.iter().map(move |rt| (direction, rt))
        })
        .map(|(direction, rt)| {
            let rt = rt.resolve(|| auto_rt.clone());
            format!("{prefix} route-target {direction} {rt}")
        })
        .collect()
}

fn layer2_commands(vxlan: &Vxlan, vlan: u16, bgp: &BgpFacts, ip_forward: bool) -> Vec<String> {
    let rd = vxlan
        .route_distinguisher
        .resolve(|| format!("{}:{vlan}", bgp.router_id));
    let mut commands = vec![
        format!("add vxlan {} bridge access {vlan}", vxlan.interface_name()),
        format!("add bgp l2vpn evpn vni {} rd {rd}", vxlan.id),
    ];
    if !ip_forward {
        commands.push(format!("add vlan {vlan} ip forward off"));
    }
    commands
}

fn layer3_commands(vxlan: &Vxlan, vrf: &str, bgp: &BgpFacts, dynamic_vlan: u16) -> Vec<String> {
    let mut commands = vec![
        format!("add vxlan {} bridge access {dynamic_vlan}", vxlan.interface_name()),
        format!("add vlan {dynamic_vlan} vrf {vrf}"),
        format!("add bgp vrf {vrf} autonomous-system {}", bgp.asn),
    ];
    for family in ["ipv4", "ipv6"] {
        for source in ["connected", "static"] {
            commands.push(format!("add bgp vrf {vrf} {family} unicast redistribute {source}"));
        }
    }
    for family in ["ipv4", "ipv6"] {
        commands.push(format!("add bgp vrf {vrf} l2vpn evpn advertise {family} unicast"));
    }
    commands.push(format!("add vrf {vrf} vni {}", vxlan.id));
    commands
}

/// Commands to create a VNI.
///
/// `auto_source` replaces an `auto` source address. Layer 3 VNIs need a
/// `dynamic_vlan` to carry them across the bridge. Layer 2 VNIs turn off
/// IP forwarding on their VLAN unless `ip_forward` says an SVI routes it.
pub fn generate_create_commands(
    vxlan: &Vxlan,
    auto_source: IpAddr,
    bgp: &BgpFacts,
    dynamic_vlan: Option<u16>,
    ip_forward: bool,
) -> Result<Vec<String>> {
    let interface = vxlan.interface_name();
    let source = vxlan.source_address.resolve(|| auto_source);

    let mut commands = vec![
        format!("add vxlan {interface} vxlan id {}", vxlan.id),
        format!("add vxlan {interface} vxlan local-tunnelip {source}"),
        format!("add vxlan {interface} bridge learning off"),
        format!("add vxlan {interface} bridge arp-nd-suppress on"),
    ];
    match &vxlan.binding {
        VxlanBinding::Layer2 { vlan } => {
            commands.extend(layer2_commands(vxlan, *vlan, bgp, ip_forward));
        }
        VxlanBinding::Layer3 { vrf } => {
            let dynamic_vlan = dynamic_vlan.ok_or_else(|| DriverError::Internal {
                message: format!("layer 3 VNI {} needs a dynamic VLAN", vxlan.id),
            })?;
            commands.extend(layer3_commands(vxlan, vrf, bgp, dynamic_vlan));
        }
    }
    commands.extend(generate_route_target_commands(vxlan, bgp.asn));
    Ok(commands)
}

/// Commands to tear down a VNI.
pub fn generate_delete_commands(vni: u32, records: &VniTable<VxlanRecord>) -> Result<Vec<String>> {
    let record = records.get(&vni).ok_or_else(|| DriverError::NotFound {
        entity: "vxlan",
        key: vni.to_string(),
    })?;
    let vxlan = &record.vxlan;

    let mut commands = Vec::new();
    match &vxlan.binding {
        VxlanBinding::Layer2 { .. } => {
            commands.push(format!("del bgp l2vpn evpn vni {vni}"));
            commands.push(format!("del vxlan {}", record.vxlan_interface));
        }
        VxlanBinding::Layer3 { vrf } => {
            commands.push(format!("del bgp vrf {vrf} l2vpn evpn vni {vni}"));
            commands.push(format!("del bgp vrf {vrf} l2vpn evpn advertise ipv4 unicast"));
            commands.push(format!("del bgp vrf {vrf} l2vpn evpn advertise ipv6 unicast"));
            commands.push(format!(
                "del bgp vrf {vrf} l2vpn evpn rd {}",
                vxlan.route_distinguisher
            ));
            for (direction, targets) in [("import", &vxlan.import_targets), ("export", &vxlan.export_targets)] {
                for rt in targets {
                    commands.push(format!("del bgp vrf {vrf} l2vpn evpn route-target {direction} {rt}"));
                }
            }
            commands.push(format!("del vxlan {}", record.vxlan_interface));
            if let Some(vlan) = record.l3_vlan {
                commands.push(format!("del vlan {vlan}"));
            }
        }
    }
    Ok(commands)
}
