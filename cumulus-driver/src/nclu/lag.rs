//! Bond parsing and 802.3ad / EVPN multihoming commands.

use std::collections::HashMap;

use serde::Deserialize;

use super::interface::InterfaceTable;
use crate::error::{DriverError, Result};
use crate::model::{Esi, Lag};

/// One Ethernet Segment from `net show evpn es json`.
///
/// Segments learned only from remote VTEPs have no access port.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvpnEsRecord {
    pub esi: String,
    #[serde(default, rename = "accessPort")]
    pub access_port: Option<String>,
}

/// Output of `net show evpn es json`.
pub type EvpnEsTable = Vec<EvpnEsRecord>;

/// Map local access ports to their ESI.
pub fn evpn_es_map(es_table: &[EvpnEsRecord]) -> HashMap<String, String> {
    es_table
        .iter()
        .filter_map(|es| es.access_port.clone().map(|port| (port, es.esi.clone())))
        .collect()
}

/// Parse bonds from `net show interface bonds json`, joining in their ESI.
pub fn parse_lags(
    bonds: &InterfaceTable,
    es_map: &HashMap<String, String>,
    filter: Option<&str>,
) -> Vec<Lag> {
    bonds
        .iter()
        .filter(|(name, _)| filter.is_none_or(|f| f == name.as_str()))
        .map(|(name, record)| Lag {
            name: name.clone(),
            members: record.iface_obj.members.keys().cloned().collect(),
            evpn_esi: es_map.get(name).cloned(),
        })
        .collect()
}

fn parse_type3_esi(esi: &str) -> Result<Esi> {
    let parsed: Esi = esi.parse()?;
    if parsed.esi_type() != 3 {
        return Err(DriverError::Internal {
            message: format!("ESI {esi} is type {}, only type 3 can be configured", parsed.esi_type()),
        }
        .into());
    }
    Ok(parsed)
}

fn mode_command(name: &str) -> String {
    format!("add bond {name} bond mode 802.3ad")
}

fn enslave_command(name: &str, member: &str) -> String {
    format!("add bond {name} bond slaves {member}")
}

/// Reset a port to a bare interface so no stale config follows it into the bond.
fn flush_commands(member: &str) -> [String; 2] {
    [format!("del interface {member}"), format!("add interface {member}")]
}

fn esi_commands(lag: &Lag) -> Result<Vec<String>> {
    let Some(esi) = &lag.evpn_esi else {
        return Ok(Vec::new());
    };
    let esi = parse_type3_esi(esi)?;
    Ok(vec![
        format!("add bond {} evpn mh es-id {}", lag.name, esi.local_discriminator()),
        format!("add bond {} evpn mh es-sys-mac {}", lag.name, esi.system_mac()),
    ])
}

/// Commands to create a bond with its members and ESI.
pub fn generate_create_commands(lag: &Lag) -> Result<Vec<String>> {
    let mut commands = vec![mode_command(&lag.name)];
    for member in &lag.members {
        commands.extend(flush_commands(member));
        commands.push(enslave_command(&lag.name, member));
    }
    commands.extend(esi_commands(lag)?);
    Ok(commands)
}

/// Commands to move `current` to `lag`.
///
/// Members kept in the bond are only re-declared as slaves. New members
/// are flushed before being enslaved. Without `merge`, members no longer
/// requested are released and reset, and a missing ESI is cleared.
pub fn generate_update_commands(lag: &Lag, current: &Lag, merge: bool) -> Result<Vec<String>> {
    let mut commands = vec![mode_command(&lag.name)];
    for member in &lag.members {
        if !current.members.contains(member) {
            commands.extend(flush_commands(member));
        }
        commands.push(enslave_command(&lag.name, member));
    }

    if !merge {
        for member in current.members.iter().filter(|m| !lag.members.contains(m)) {
            commands.push(format!("del bond {} bond slaves {member}", lag.name));
            commands.push(format!("del interface {member}"));
        }
    }

    if lag.evpn_esi.is_some() {
        commands.extend(esi_commands(lag)?);
    } else if !merge {
        commands.push(format!("del bond {} evpn mh es-id", lag.name));
        commands.push(format!("del bond {} evpn mh es-sys-mac", lag.name));
    }
    Ok(commands)
}

pub fn generate_delete_commands(name: &str) -> Vec<String> {
    vec![format!("del bond {name}")]
}
