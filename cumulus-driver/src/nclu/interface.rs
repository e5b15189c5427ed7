//! `net show interface` parsing and interface command generation.

use indexmap::IndexMap;
use ipnetwork::IpNetwork;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{Action, device_mac, loose_number, normalize_mac, ranges};
use crate::error::{DriverError, ParseError, Result};
use crate::model::{
    BridgeAttributes, Duplex, Interface, InterfaceAddress, InterfaceMode, RouteAttributes,
};

/// `Master: <name>(<state>)` at the start of an interface summary.
static MASTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Master: (?P<int_name>[\w-]*)\((?P<state>\w*)\)")
        .expect("master pattern is a valid regex")
});

/// Suffix of the macvlan NCLU creates for an SVI's anycast addresses.
const ANYCAST_SUFFIX: &str = "-v0";

/// Output of `net show interface json`, keyed by interface name.
pub type InterfaceTable = IndexMap<String, InterfaceRecord>;

/// One interface from `net show interface json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceRecord {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub linkstate: String,
    #[serde(default)]
    pub speed: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub iface_obj: IfaceObject,
}

/// The `iface_obj` detail block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IfaceObject {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default, deserialize_with = "loose_number")]
    pub mtu: Option<u32>,
    #[serde(default, deserialize_with = "loose_number")]
    pub native_vlan: Option<u16>,
    #[serde(default)]
    pub vlan_filtering: bool,
    #[serde(default)]
    pub vlan_list: VlanList,
    #[serde(default)]
    pub ip_address: IpAddressEntries,
    /// Bond members; only the keys are meaningful.
    #[serde(default)]
    pub members: IndexMap<String, serde_json::Value>,
}

/// `ip_address.allentries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpAddressEntries {
    #[serde(default)]
    pub allentries: Vec<String>,
}

/// `vlan_list` is a glob string on bridge ports and `[]` everywhere else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VlanList {
    Glob(String),
    List(Vec<serde_json::Value>),
}

impl Default for VlanList {
    fn default() -> Self {
        VlanList::List(Vec::new())
    }
}

impl VlanList {
    /// Check if the list holds no VLANs.
    pub fn is_empty(&self) -> bool {
        match self {
            VlanList::Glob(glob) => glob.trim().is_empty(),
            VlanList::List(items) => items.is_empty(),
        }
    }

    /// Expand to VLAN ids.
    pub fn ids(&self) -> std::result::Result<Vec<u16>, ParseError> {
        match self {
            VlanList::Glob(glob) => ranges::expand_glob(glob),
            VlanList::List(items) => {
                let glob = items
                    .iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                ranges::expand_glob(&glob)
            }
        }
    }
}

/// NCLU object type an interface is configured through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Physical,
    Vlan,
    Bond,
    Vrf,
    Loopback,
    Bridge,
    Vxlan,
}

impl InterfaceKind {
    /// Token used after `add`/`del`.
    pub fn token(&self) -> &'static str {
        match self {
            InterfaceKind::Physical => "interface",
            InterfaceKind::Vlan => "vlan",
            InterfaceKind::Bond => "bond",
            InterfaceKind::Vrf => "vrf",
            InterfaceKind::Loopback => "loopback",
            InterfaceKind::Bridge => "bridge",
            InterfaceKind::Vxlan => "vxlan",
        }
    }
}

/// Classify an interface.
///
/// Name prefixes win over the reported mode. `NotConfigured` means the
/// interface does not exist. Anything left over is assumed to be a VXLAN
/// interface, since NCLU reports those with generic modes; a wrong guess
/// only produces commands the device rejects at commit.
pub fn classify_interface(name: &str, record: &InterfaceRecord) -> Option<InterfaceKind> {
    if name.starts_with("swp") {
        return Some(InterfaceKind::Physical);
    }
    if name.starts_with("vlan") {
        return Some(InterfaceKind::Vlan);
    }
    match record.mode.as_str() {
        "802.3ad" => Some(InterfaceKind::Bond),
        "VRF" => Some(InterfaceKind::Vrf),
        "Loopback" => Some(InterfaceKind::Loopback),
        "Bridge/L2" => Some(InterfaceKind::Bridge),
        "NotConfigured" => None,
        _ => Some(InterfaceKind::Vxlan),
    }
}

/// VLAN id of an SVI name, e.g. `vlan88` is 88.
pub fn svi_vlan_id(name: &str) -> Result<u16> {
    name.strip_prefix("vlan")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| {
            DriverError::InvalidRequest {
                message: format!("'{name}' is not an SVI name"),
            }
            .into()
        })
}

/// Parse a speed token: `1G` is 1000 Mbps full duplex, `N/A` is unknown.
pub fn parse_speed(speed: &str) -> (Option<u32>, Option<Duplex>) {
    let speed = speed.trim();
    let mbps = if let Some(gbps) = speed.strip_suffix('G') {
        gbps.parse::<u32>().ok().map(|g| g * 1000)
    } else if let Some(mbps) = speed.strip_suffix('M') {
        mbps.parse::<u32>().ok()
    } else {
        None
    };
    match mbps {
        Some(mbps) => (Some(mbps), Some(Duplex::Full)),
        None => (None, None),
    }
}

/// Master device and its state from an interface summary.
pub fn parse_summary(summary: &str) -> Option<(String, String)> {
    MASTER_PATTERN
        .captures(summary)
        .map(|caps| (caps["int_name"].to_string(), caps["state"].to_string()))
}

/// Names of every VRF in the table.
pub fn vrf_names(table: &InterfaceTable) -> Vec<String> {
    table
        .iter()
        .filter(|(_, record)| record.mode == "VRF")
        .map(|(name, _)| name.clone())
        .collect()
}

fn parse_addresses(
    entries: &[String],
    anycast: bool,
) -> std::result::Result<Vec<InterfaceAddress>, ParseError> {
    entries
        .iter()
        .map(|entry| {
            let address: IpNetwork = entry.trim().parse().map_err(|_| ParseError::InvalidValue {
                field: "ip address",
                value: entry.clone(),
            })?;
            Ok(if anycast {
                InterfaceAddress::anycast(address)
            } else {
                InterfaceAddress::new(address)
            })
        })
        .collect()
}

/// Build routed attributes, folding in anycast addresses from the paired
/// `-v0` record when there is one.
pub fn route_attributes(
    record: &InterfaceRecord,
    vrf_names: &[String],
    subinterface: Option<&InterfaceRecord>,
) -> std::result::Result<RouteAttributes, ParseError> {
    let vrf = parse_summary(&record.summary)
        .map(|(master, _)| master)
        .filter(|master| vrf_names.contains(master));

    let mut addresses = parse_addresses(&record.iface_obj.ip_address.allentries, false)?;
    let mut evpn_anycast_mac = None;
    if let Some(sub) = subinterface {
        addresses.extend(parse_addresses(&sub.iface_obj.ip_address.allentries, true)?);
        evpn_anycast_mac = normalize_mac(&sub.iface_obj.mac);
    }

    Ok(RouteAttributes {
        addresses,
        vrf,
        evpn_anycast_mac,
    })
}

/// Build bridge attributes.
pub fn bridge_attributes(record: &InterfaceRecord) -> std::result::Result<BridgeAttributes, ParseError> {
    Ok(BridgeAttributes {
        dot1q_enabled: record.iface_obj.vlan_filtering,
        dot1q_pvid: record.iface_obj.native_vlan,
        dot1q_vids: record.iface_obj.vlan_list.ids()?,
    })
}

/// Parse one interface.
///
/// Mode comes from the data: a VLAN list means bridged, `BondMember`
/// means aggregated, anything else is routed.
pub fn parse_interface(
    name: &str,
    record: &InterfaceRecord,
    subinterface: Option<&InterfaceRecord>,
    vrf_names: &[String],
) -> Result<Interface> {
    let mut parent = None;
    let mode = if !record.iface_obj.vlan_list.is_empty() {
        InterfaceMode::Bridged(Some(bridge_attributes(record)?))
    } else if record.mode == "BondMember" {
        parent = parse_summary(&record.summary).map(|(master, _)| master);
        InterfaceMode::Aggregated
    } else {
        InterfaceMode::Routed(Some(route_attributes(record, vrf_names, subinterface)?))
    };

    let (speed, duplex) = parse_speed(&record.speed);
    let description = Some(record.iface_obj.description.clone()).filter(|d| !d.is_empty());

    Ok(Interface {
        name: name.to_string(),
        mode,
        admin_enabled: Some(record.linkstate != "ADMDN"),
        physical_address: normalize_mac(&record.iface_obj.mac),
        speed,
        duplex,
        mtu: record.iface_obj.mtu,
        description,
        parent,
        virtual_interface: !name.starts_with("swp"),
    })
}

/// Parse every physical port, bond and SVI, optionally only `filter`.
///
/// `-v0` anycast macvlans are folded into their SVI and not listed.
pub fn parse_interfaces(table: &InterfaceTable, filter: Option<&str>) -> Result<Vec<Interface>> {
    let vrfs = vrf_names(table);
    let mut interfaces = Vec::new();

    for (name, record) in table {
        if filter.is_some_and(|f| f != name.as_str()) {
            continue;
        }
        match classify_interface(name, record) {
            Some(InterfaceKind::Physical | InterfaceKind::Bond) => {
                interfaces.push(parse_interface(name, record, None, &vrfs)?);
            }
            Some(InterfaceKind::Vlan) => {
                if name.ends_with(ANYCAST_SUFFIX) {
                    continue;
                }
                let sub = table.get(&format!("{name}{ANYCAST_SUFFIX}"));
                interfaces.push(parse_interface(name, record, sub, &vrfs)?);
            }
            _ => {}
        }
    }
    Ok(interfaces)
}

/// `<action> <kind> <name>`; SVIs are addressed by VLAN id.
pub fn base_command(name: &str, kind: InterfaceKind, action: Action) -> Result<String> {
    match kind {
        InterfaceKind::Vlan => Ok(format!("{action} vlan {}", svi_vlan_id(name)?)),
        _ => Ok(format!("{action} {} {name}", kind.token())),
    }
}

fn bridge_commands(attrs: &BridgeAttributes, add: &str, del: &str) -> Vec<String> {
    let mut commands = Vec::new();
    if attrs.dot1q_enabled {
        commands.push(format!("{del} bridge access"));
        if let Some(pvid) = attrs.dot1q_pvid {
            commands.push(format!("{add} bridge pvid {pvid}"));
        }
        if !attrs.dot1q_vids.is_empty() {
            commands.push(format!(
                "{add} bridge trunk vlans {}",
                ranges::to_glob(&attrs.dot1q_vids)
            ));
        }
    } else {
        commands.push(format!("{del} bridge trunk"));
        commands.push(format!("{del} bridge pvid"));
        if let Some(pvid) = attrs.dot1q_pvid {
            commands.push(format!("{add} bridge access {pvid}"));
        }
    }
    commands
}

fn route_commands(attrs: &RouteAttributes, add: &str) -> Result<Vec<String>> {
    let mut commands = Vec::new();
    if let Some(vrf) = &attrs.vrf {
        commands.push(format!("{add} vrf {vrf}"));
    }
    for address in &attrs.addresses {
        let family = match address.family() {
            crate::model::AddressFamily::V4 => "ip",
            crate::model::AddressFamily::V6 => "ipv6",
        };
        if address.is_anycast() {
            let mac = attrs.evpn_anycast_mac.as_deref().ok_or_else(|| {
                DriverError::InvalidRequest {
                    message: format!("anycast address {} needs evpn_anycast_mac", address.address),
                }
            })?;
            commands.push(format!(
                "{add} {family} address-virtual {} {}",
                device_mac(mac),
                address.address
            ));
        } else {
            commands.push(format!("{add} {family} address {}", address.address));
        }
    }
    Ok(commands)
}

/// Base, admin state, MTU and speed. With `explicit_enable` an admin
/// state of `Some(true)` clears `link down`; on a fresh object there is
/// nothing to clear.
fn basic_commands(
    interface: &Interface,
    kind: InterfaceKind,
    add: &str,
    del: &str,
    explicit_enable: bool,
) -> Vec<String> {
    let mut commands = vec![add.to_string()];
    match interface.admin_enabled {
        Some(false) => commands.push(format!("{add} link down")),
        Some(true) if explicit_enable => commands.push(format!("{del} link down")),
        _ => {}
    }
    if let Some(mtu) = interface.mtu {
        commands.push(format!("{add} mtu {mtu}"));
    }
    if kind == InterfaceKind::Physical {
        if let Some(speed) = interface.speed {
            commands.push(format!("{add} link speed {speed}"));
        }
    }
    commands
}

fn mode_commands(interface: &Interface, add: &str, del: &str) -> Result<Vec<String>> {
    match &interface.mode {
        InterfaceMode::Routed(Some(attrs)) => route_commands(attrs, add),
        InterfaceMode::Bridged(Some(attrs)) => Ok(bridge_commands(attrs, add, del)),
        _ => Ok(Vec::new()),
    }
}

fn alias_command(interface: &Interface, add: &str) -> Option<String> {
    interface
        .description
        .as_ref()
        .map(|description| format!("{add} alias \"{description}\""))
}

fn interface_commands(
    interface: &Interface,
    kind: InterfaceKind,
    explicit_enable: bool,
) -> Result<Vec<String>> {
    let add = base_command(&interface.name, kind, Action::Add)?;
    let del = base_command(&interface.name, kind, Action::Del)?;

    let mut commands = basic_commands(interface, kind, &add, &del, explicit_enable);
    commands.extend(mode_commands(interface, &add, &del)?);
    commands.extend(alias_command(interface, &add));
    Ok(commands)
}

/// Commands to create an interface from scratch.
///
/// Only SVIs can be created; other kinds produce nothing.
pub fn generate_create_commands(interface: &Interface, kind: InterfaceKind) -> Result<Vec<String>> {
    match kind {
        InterfaceKind::Vlan => interface_commands(interface, kind, false),
        _ => Ok(Vec::new()),
    }
}

/// Commands to update an existing SVI, port or bond.
///
/// With `in_place` only fields present on `interface` are touched.
/// Otherwise the interface is deleted and rebuilt; bonds skip the delete
/// so their membership survives.
pub fn generate_update_commands(
    interface: &Interface,
    kind: InterfaceKind,
    in_place: bool,
) -> Result<Vec<String>> {
    if !matches!(
        kind,
        InterfaceKind::Vlan | InterfaceKind::Physical | InterfaceKind::Bond
    ) {
        return Ok(Vec::new());
    }
    if in_place {
        return interface_commands(interface, kind, true);
    }

    let mut commands = Vec::new();
    if kind != InterfaceKind::Bond {
        commands.push(base_command(&interface.name, kind, Action::Del)?);
    }
    commands.extend(interface_commands(interface, kind, false)?);
    Ok(commands)
}

/// Commands to delete (or reset, for ports) an interface.
pub fn generate_delete_commands(name: &str, kind: InterfaceKind) -> Result<Vec<String>> {
    Ok(vec![base_command(name, kind, Action::Del)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddressFamily, VirtualType};
    use crate::testing::fixtures;

    fn table() -> InterfaceTable {
        serde_json::from_str(fixtures::SHOW_INTERFACE).unwrap()
    }

    fn address(a: &str) -> InterfaceAddress {
        InterfaceAddress::new(a.parse().unwrap())
    }

    fn anycast(a: &str) -> InterfaceAddress {
        InterfaceAddress::anycast(a.parse().unwrap())
    }

    fn svi(addresses: Vec<InterfaceAddress>, vrf: Option<&str>, mac: Option<&str>) -> Interface {
        Interface::new(
            "vlan50",
            InterfaceMode::Routed(Some(RouteAttributes {
                addresses,
                vrf: vrf.map(String::from),
                evpn_anycast_mac: mac.map(String::from),
            })),
        )
    }

    #[test]
    fn test_classify_name_rules_win() {
        let bond_mode = InterfaceRecord {
            mode: "802.3ad".to_string(),
            ..Default::default()
        };
        assert_eq!(classify_interface("swp1", &bond_mode), Some(InterfaceKind::Physical));
        assert_eq!(classify_interface("vlan100", &bond_mode), Some(InterfaceKind::Vlan));
        assert_eq!(classify_interface("bond20", &bond_mode), Some(InterfaceKind::Bond));
    }

    #[test]
    fn test_classify_by_mode() {
        let t = table();
        assert_eq!(classify_interface("green", &t["green"]), Some(InterfaceKind::Vrf));
        assert_eq!(classify_interface("lo", &t["lo"]), Some(InterfaceKind::Loopback));
        assert_eq!(classify_interface("bridge", &t["bridge"]), Some(InterfaceKind::Bridge));

        let unconfigured = InterfaceRecord {
            mode: "NotConfigured".to_string(),
            ..Default::default()
        };
        assert_eq!(classify_interface("bond88", &unconfigured), None);
    }

    #[test]
    fn test_classify_falls_back_to_vxlan() {
        let t = table();
        assert_eq!(classify_interface("vxlan70001", &t["vxlan70001"]), Some(InterfaceKind::Vxlan));
        // Management port reports "Mgmt", which no rule claims
        assert_eq!(classify_interface("eth0", &t["eth0"]), Some(InterfaceKind::Vxlan));
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("100M"), (Some(100), Some(Duplex::Full)));
        assert_eq!(parse_speed("1G"), (Some(1000), Some(Duplex::Full)));
        assert_eq!(parse_speed("25G"), (Some(25000), Some(Duplex::Full)));
        assert_eq!(parse_speed("100G"), (Some(100000), Some(Duplex::Full)));
        assert_eq!(parse_speed("N/A"), (None, None));
    }

    #[test]
    fn test_parse_summary() {
        assert_eq!(
            parse_summary("Master: TestCust1-Prod(UP)"),
            Some(("TestCust1-Prod".to_string(), "UP".to_string()))
        );
        assert_eq!(
            parse_summary("Master: vrf-red(UP)\nIP: 10.0.0.1/24"),
            Some(("vrf-red".to_string(), "UP".to_string()))
        );
        assert_eq!(parse_summary("IP: 127.0.0.1/8, 192.168.0.106/32, ::1/128"), None);
        assert_eq!(parse_summary(""), None);
    }

    #[test]
    fn test_svi_vlan_id() {
        assert_eq!(svi_vlan_id("vlan88").unwrap(), 88);
        assert_eq!(svi_vlan_id("vlan4042").unwrap(), 4042);
        assert!(svi_vlan_id("swp1").is_err());
    }

    #[test]
    fn test_vrf_names() {
        assert_eq!(vrf_names(&table()), vec!["TestCust1-Prod", "connmgmt", "green", "mgmt", "vrf-red"]);
    }

    #[test]
    fn test_parse_routed_port_in_vrf() {
        let t = table();
        let swp1 = parse_interface("swp1", &t["swp1"], None, &vrf_names(&t)).unwrap();

        assert_eq!(
            swp1.route_attributes(),
            Some(&RouteAttributes {
                addresses: vec![address("10.0.1.0/31")],
                vrf: Some("TestCust1-Prod".to_string()),
                evpn_anycast_mac: None,
            })
        );
        assert_eq!(swp1.physical_address.as_deref(), Some("0C-33-0E-25-52-01"));
        assert_eq!((swp1.speed, swp1.duplex), (Some(1000), Some(Duplex::Full)));
        assert_eq!(swp1.mtu, Some(9216));
        assert_eq!(swp1.description.as_deref(), Some("[an]"));
        assert_eq!(swp1.admin_enabled, Some(true));
        assert!(!swp1.virtual_interface);
    }

    #[test]
    fn test_parse_bridged_port() {
        let t = table();
        let swp2 = parse_interface("swp2", &t["swp2"], None, &vrf_names(&t)).unwrap();

        assert_eq!(
            swp2.bridge_attributes(),
            Some(&BridgeAttributes {
                dot1q_enabled: true,
                dot1q_pvid: Some(100),
                dot1q_vids: vec![71, 72, 100],
            })
        );
        assert_eq!(swp2.mtu, Some(1500));
        assert_eq!(swp2.description, None);
    }

    #[test]
    fn test_parse_bond_member() {
        let t = table();
        let swp3 = parse_interface("swp3", &t["swp3"], None, &vrf_names(&t)).unwrap();

        assert_eq!(swp3.mode, InterfaceMode::Aggregated);
        assert_eq!(swp3.parent.as_deref(), Some("bond20"));
    }

    #[test]
    fn test_parse_svi_with_anycast() {
        let t = table();
        let vlan72 = parse_interface("vlan72", &t["vlan72"], t.get("vlan72-v0"), &vrf_names(&t))
            .unwrap();

        let attrs = vlan72.route_attributes().unwrap();
        assert_eq!(attrs.vrf.as_deref(), Some("TestCust1-Prod"));
        assert_eq!(
            attrs.addresses,
            vec![anycast("10.1.0.1/24"), anycast("2607:f148:f:72::1/64")]
        );
        assert_eq!(attrs.addresses[1].family(), AddressFamily::V6);
        assert_eq!(attrs.addresses[0].virtual_type, Some(VirtualType::Anycast));
        assert_eq!(attrs.evpn_anycast_mac.as_deref(), Some("F2-69-81-6E-3A-3D"));
        assert_eq!((vlan72.speed, vlan72.duplex), (None, None));
        assert!(vlan72.virtual_interface);
    }

    #[test]
    fn test_parse_admin_down() {
        let mut t = table();
        if let Some(record) = t.get_mut("swp7") {
            record.linkstate = "ADMDN".to_string();
        }
        let swp7 = parse_interface("swp7", &t["swp7"], None, &[]).unwrap();
        assert_eq!(swp7.admin_enabled, Some(false));
    }

    #[test]
    fn test_parse_interfaces_lists_ports_bonds_and_svis() {
        let interfaces = parse_interfaces(&table(), None).unwrap();
        let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "bond20", "swp1", "swp2", "swp3", "swp5", "swp6", "swp7", "vlan100", "vlan250",
                "vlan4001", "vlan4074", "vlan4086", "vlan71", "vlan72"
            ]
        );
    }

    #[test]
    fn test_parse_interfaces_filter_folds_anycast() {
        let interfaces = parse_interfaces(&table(), Some("vlan100")).unwrap();
        assert_eq!(interfaces.len(), 1);

        let attrs = interfaces[0].route_attributes().unwrap();
        assert_eq!(attrs.vrf.as_deref(), Some("vrf-red"));
        assert_eq!(attrs.addresses, vec![anycast("10.0.0.1/24")]);

        assert!(parse_interfaces(&table(), Some("swp88")).unwrap().is_empty());
        assert!(parse_interfaces(&table(), Some("vlan100-v0")).unwrap().is_empty());
    }

    #[test]
    fn test_base_command() {
        assert_eq!(
            base_command("vlan50", InterfaceKind::Vlan, Action::Add).unwrap(),
            "add vlan 50"
        );
        assert_eq!(
            base_command("swp7", InterfaceKind::Physical, Action::Del).unwrap(),
            "del interface swp7"
        );
        assert_eq!(
            base_command("bond20", InterfaceKind::Bond, Action::Add).unwrap(),
            "add bond bond20"
        );
    }

    #[test]
    fn test_create_svi_in_default_vrf() {
        let mut interface = svi(
            vec![address("198.18.0.1/24"), address("ea0e:a6b2:68d4:7b21::1/64")],
            None,
            None,
        );
        interface.description = Some("test in default".to_string());
        interface.admin_enabled = Some(true);

        assert_eq!(
            generate_create_commands(&interface, InterfaceKind::Vlan).unwrap(),
            vec![
                "add vlan 50",
                "add vlan 50 ip address 198.18.0.1/24",
                "add vlan 50 ipv6 address ea0e:a6b2:68d4:7b21::1/64",
                "add vlan 50 alias \"test in default\"",
            ]
        );
    }

    #[test]
    fn test_create_svi_with_anycast_in_vrf() {
        let mut interface = svi(
            vec![
                address("198.18.0.254/24"),
                anycast("198.18.0.1/24"),
                anycast("ea0e:a6b2:68d4:7b21::1/64"),
            ],
            Some("green"),
            Some("20-00-00-AA-BB-CC"),
        );
        interface.description = Some("test in green".to_string());
        interface.admin_enabled = Some(false);

        assert_eq!(
            generate_create_commands(&interface, InterfaceKind::Vlan).unwrap(),
            vec![
                "add vlan 50",
                "add vlan 50 link down",
                "add vlan 50 vrf green",
                "add vlan 50 ip address 198.18.0.254/24",
                "add vlan 50 ip address-virtual 20:00:00:aa:bb:cc 198.18.0.1/24",
                "add vlan 50 ipv6 address-virtual 20:00:00:aa:bb:cc ea0e:a6b2:68d4:7b21::1/64",
                "add vlan 50 alias \"test in green\"",
            ]
        );
    }

    #[test]
    fn test_create_anycast_without_mac_is_rejected() {
        let interface = svi(vec![anycast("198.18.0.1/24")], None, None);
        assert!(generate_create_commands(&interface, InterfaceKind::Vlan).is_err());
    }

    #[test]
    fn test_create_non_svi_is_empty() {
        let interface = Interface::new(
            "swp7",
            InterfaceMode::Bridged(Some(BridgeAttributes {
                dot1q_enabled: false,
                dot1q_pvid: Some(100),
                dot1q_vids: vec![],
            })),
        );
        assert!(generate_create_commands(&interface, InterfaceKind::Physical)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_update_replace_port() {
        let mut interface = Interface::new(
            "swp5",
            InterfaceMode::Bridged(Some(BridgeAttributes {
                dot1q_enabled: true,
                dot1q_pvid: Some(71),
                dot1q_vids: vec![71, 72, 100],
            })),
        );
        interface.mtu = Some(9216);
        interface.speed = Some(1000);

        assert_eq!(
            generate_update_commands(&interface, InterfaceKind::Physical, false).unwrap(),
            vec![
                "del interface swp5",
                "add interface swp5",
                "add interface swp5 mtu 9216",
                "add interface swp5 link speed 1000",
                "del interface swp5 bridge access",
                "add interface swp5 bridge pvid 71",
                "add interface swp5 bridge trunk vlans 71-72,100",
            ]
        );
    }

    #[test]
    fn test_update_replace_bond_skips_delete() {
        let interface = Interface::new(
            "bond20",
            InterfaceMode::Bridged(Some(BridgeAttributes {
                dot1q_enabled: false,
                dot1q_pvid: Some(100),
                dot1q_vids: vec![],
            })),
        );

        assert_eq!(
            generate_update_commands(&interface, InterfaceKind::Bond, false).unwrap(),
            vec![
                "add bond bond20",
                "del bond bond20 bridge trunk",
                "del bond bond20 bridge pvid",
                "add bond bond20 bridge access 100",
            ]
        );
    }

    #[test]
    fn test_update_in_place_only_present_fields() {
        let mut interface = Interface::new("swp7", InterfaceMode::Routed(None));
        interface.admin_enabled = Some(true);
        interface.description = Some("uplink".to_string());

        assert_eq!(
            generate_update_commands(&interface, InterfaceKind::Physical, true).unwrap(),
            vec![
                "add interface swp7",
                "del interface swp7 link down",
                "add interface swp7 alias \"uplink\"",
            ]
        );
    }

    #[test]
    fn test_update_unsupported_kind_is_empty() {
        let interface = Interface::new("green", InterfaceMode::Routed(None));
        assert!(generate_update_commands(&interface, InterfaceKind::Vrf, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            generate_delete_commands("vlan50", InterfaceKind::Vlan).unwrap(),
            vec!["del vlan 50"]
        );
        assert_eq!(
            generate_delete_commands("swp1", InterfaceKind::Physical).unwrap(),
            vec!["del interface swp1"]
        );
    }

    #[test]
    fn test_parsed_svi_regenerates_its_own_config() {
        let t = table();
        let mut vlan4074 = parse_interface("vlan4074", &t["vlan4074"], None, &vrf_names(&t)).unwrap();
        vlan4074.mtu = None;

        assert_eq!(
            generate_create_commands(&vlan4074, InterfaceKind::Vlan).unwrap(),
            vec!["add vlan 4074", "add vlan 4074 vrf green"]
        );
    }

    #[test]
    fn test_parsed_anycast_svi_regenerates_its_own_config() {
        let t = table();
        let mut vlan72 = parse_interface("vlan72", &t["vlan72"], t.get("vlan72-v0"), &vrf_names(&t))
            .unwrap();
        vlan72.mtu = None;
        vlan72.description = None;
        vlan72.admin_enabled = Some(true);

        assert_eq!(
            generate_create_commands(&vlan72, InterfaceKind::Vlan).unwrap(),
            vec![
                "add vlan 72",
                "add vlan 72 vrf TestCust1-Prod",
                "add vlan 72 ip address-virtual f2:69:81:6e:3a:3d 10.1.0.1/24",
                "add vlan 72 ipv6 address-virtual f2:69:81:6e:3a:3d 2607:f148:f:72::1/64",
            ]
        );
    }
}
