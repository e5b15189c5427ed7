//! `ip -o link show type vrf` parsing and VRF commands.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Vrf;

/// Raw command listing VRF devices, one per line.
pub const SHOW_VRF_COMMAND: &str = "ip -o link show type vrf";

static VRF_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<ifidx>\d*): (?P<ifname>\S*):").expect("vrf pattern is a valid regex")
});

/// Parse VRFs, optionally only `filter`.
pub fn parse_vrfs(output: &str, filter: Option<&str>) -> Vec<Vrf> {
    output
        .lines()
        .filter_map(|line| VRF_LINE.captures(line.trim_start()))
        .map(|caps| caps["ifname"].to_string())
        .filter(|name| filter.is_none_or(|f| f == name.as_str()))
        .map(Vrf::new)
        .collect()
}

pub fn generate_create_commands(vrf: &Vrf) -> Vec<String> {
    vec![format!("add vrf {}", vrf.name)]
}

pub fn generate_delete_commands(name: &str) -> Vec<String> {
    vec![format!("del vrf {name}")]
}
