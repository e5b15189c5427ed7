//! `net show bridge vlan` parsing and bridge VLAN commands.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::model::Vlan;

/// One entry of the bridge VLAN table. `vlan_end` marks a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BridgeVlanEntry {
    pub vlan: u16,
    #[serde(default, rename = "vlanEnd")]
    pub vlan_end: Option<u16>,
    #[serde(default)]
    pub vni: Option<u32>,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl BridgeVlanEntry {
    /// Every VLAN id this entry covers.
    pub fn ids(&self) -> RangeInclusive<u16> {
        self.vlan..=self.vlan_end.unwrap_or(self.vlan).max(self.vlan)
    }
}

/// Output of `net show bridge vlan json`, keyed by port.
pub type BridgeVlanTable = BTreeMap<String, Vec<BridgeVlanEntry>>;

/// Every VLAN id configured on `bridge`.
pub fn used_vlan_ids(table: &BridgeVlanTable, bridge: &str) -> BTreeSet<u16> {
    table
        .get(bridge)
        .into_iter()
        .flatten()
        .flat_map(BridgeVlanEntry::ids)
        .collect()
}

/// First VLAN id bound to `port`, e.g. the access VLAN of a VXLAN interface.
pub fn port_vlan(table: &BridgeVlanTable, port: &str) -> Option<u16> {
    table.get(port).and_then(|entries| entries.first()).map(|e| e.vlan)
}

/// List VLANs on `bridge`.
///
/// Ids in `dynamic_pool` are hidden unless `include_dynamic` is set.
/// With `filter`, only that id is returned.
pub fn parse_vlans(
    table: &BridgeVlanTable,
    bridge: &str,
    dynamic_pool: &BTreeSet<u16>,
    filter: Option<u16>,
    include_dynamic: bool,
) -> Vec<Vlan> {
    used_vlan_ids(table, bridge)
        .into_iter()
        .filter(|id| include_dynamic || !dynamic_pool.contains(id))
        .filter(|id| filter.is_none_or(|f| f == *id))
        .map(Vlan::new)
        .collect()
}

/// Commands to add a VLAN to the bridge.
pub fn generate_create_commands(vlan: &Vlan, bridge: &str) -> Vec<String> {
    vec![format!("add bridge {bridge} vids {}", vlan.id)]
}

/// Commands to remove a VLAN from the bridge.
pub fn generate_delete_commands(vlan_id: u16, bridge: &str) -> Vec<String> {
    vec![format!("del bridge {bridge} vids {vlan_id}")]
}
