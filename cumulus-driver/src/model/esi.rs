//! EVPN Ethernet Segment Identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

const ESI_LEN: usize = 10;

/// A 10-octet Ethernet Segment Identifier, e.g. `03:be:e9:af:17:3f:60:00:00:14`.
///
/// Type 3 ESIs (RFC 7432 §5) carry a 6-octet system MAC followed by a
/// 3-octet local discriminator; those are the only ones NCLU can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Esi([u8; ESI_LEN]);

impl Esi {
    /// Type byte.
    pub fn esi_type(&self) -> u8 {
        self.0[0]
    }

    /// System MAC of a type 3 ESI, lowercase and colon-separated.
    pub fn system_mac(&self) -> String {
        self.0[1..7]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Local discriminator of a type 3 ESI.
    pub fn local_discriminator(&self) -> u32 {
        u32::from_be_bytes([0, self.0[7], self.0[8], self.0[9]])
    }
}

impl FromStr for Esi {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidValue {
            field: "esi",
            value: s.to_string(),
        };

        let mut octets = [0u8; ESI_LEN];
        let mut parts = s.trim().split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Esi(octets))
    }
}

impl fmt::Display for Esi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Esi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Esi {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type3_fields() {
        let esi: Esi = "03:be:e9:af:17:3f:60:00:00:14".parse().unwrap();
        assert_eq!(esi.esi_type(), 3);
        assert_eq!(esi.system_mac(), "be:e9:af:17:3f:60");
        assert_eq!(esi.local_discriminator(), 20);
        assert_eq!(esi.to_string(), "03:be:e9:af:17:3f:60:00:00:14");
    }

    #[test]
    fn test_uppercase_input_normalizes() {
        let esi: Esi = "03:BE:E9:AF:17:3F:60:01:00:0A".parse().unwrap();
        assert_eq!(esi.local_discriminator(), 0x01000a);
        assert_eq!(esi.to_string(), "03:be:e9:af:17:3f:60:01:00:0a");
    }

    #[test]
    fn test_invalid() {
        assert!("03:be:e9".parse::<Esi>().is_err());
        assert!("03:be:e9:af:17:3f:60:00:00:14:ff".parse::<Esi>().is_err());
        assert!("03:be:e9:af:17:3f:60:00:00:zz".parse::<Esi>().is_err());
        assert!("".parse::<Esi>().is_err());
    }
}
