//! NCLU parsers and command generators.
//!
//! Everything here is pure: parsers take decoded command output and
//! return model objects, generators take model objects and device facts
//! and return ordered command lists. Neither touches the transport.

pub mod facts;
pub mod interface;
pub mod lag;
pub mod ranges;
pub mod vlan;
pub mod vrf;
pub mod vxlan;

use std::fmt;

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::command::CommandResult;
use crate::error::{ParseError, Result};

/// Leading verb of a configuration command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Del,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add => f.write_str("add"),
            Action::Del => f.write_str("del"),
        }
    }
}

/// Decode the JSON of a command result into a typed table.
///
/// Output that was not JSON reads as an empty table. JSON of the wrong
/// shape is a [`ParseError::Json`].
pub fn decode<T: DeserializeOwned + Default>(result: &CommandResult) -> Result<T> {
    match &result.json {
        None => {
            warn!("'{}' returned no JSON, treating as empty", result.command);
            Ok(T::default())
        }
        Some(value) => T::deserialize(value).map_err(|source| {
            ParseError::Json {
                command: result.command.clone(),
                source,
            }
            .into()
        }),
    }
}

/// A number NCLU sometimes reports as a string, or as `""` when unset.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Value(T),
    Text(String),
}

pub(crate) fn loose_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + std::str::FromStr,
{
    Ok(match Option::<Loose<T>>::deserialize(deserializer)? {
        Some(Loose::Value(value)) => Some(value),
        Some(Loose::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Normalize a MAC to uppercase, dash-separated form. Empty is `None`.
pub fn normalize_mac(mac: &str) -> Option<String> {
    let mac = mac.trim();
    if mac.is_empty() {
        return None;
    }
    Some(mac.to_ascii_uppercase().replace([':', '.'], "-"))
}

/// Format a MAC the way NCLU expects it: lowercase, colon-separated.
pub fn device_mac(mac: &str) -> String {
    mac.trim().to_ascii_lowercase().replace('-', ":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "loose_number")]
        mtu: Option<u32>,
    }

    #[test]
    fn test_loose_number() {
        let parse = |v| serde_json::from_value::<Record>(v).unwrap().mtu;
        assert_eq!(parse(json!({"mtu": 9216})), Some(9216));
        assert_eq!(parse(json!({"mtu": "1500"})), Some(1500));
        assert_eq!(parse(json!({"mtu": ""})), None);
        assert_eq!(parse(json!({"mtu": null})), None);
        assert_eq!(parse(json!({})), None);
    }

    #[test]
    fn test_decode_without_json_is_empty() {
        let result = CommandResult::new("net show interface json", "show interface");
        let table: indexmap::IndexMap<String, u32> = decode(&result).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_decode_wrong_shape() {
        let mut result = CommandResult::new("net show interface json", "show interface");
        result.json = Some(json!(["not", "a", "map"]));
        let err = decode::<indexmap::IndexMap<String, u32>>(&result).unwrap_err();
        assert!(err.to_string().contains("net show interface json"));
    }

    #[test]
    fn test_mac_forms() {
        assert_eq!(normalize_mac("0c:33:0e:25:52:03").as_deref(), Some("0C-33-0E-25-52-03"));
        assert_eq!(normalize_mac(""), None);
        assert_eq!(device_mac("20-00-00-AA-BB-CC"), "20:00:00:aa:bb:cc");
    }
}
