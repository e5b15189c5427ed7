//! The driver façade: read, create, update and delete per entity.
//!
//! Every operation takes `&mut self` and runs its commands one at a time,
//! so a driver is never shared between concurrent callers. Reads go
//! through the session cache; mutations re-read the device uncached both
//! before generating commands and after committing them.

mod builder;
mod interface;
mod lag;
mod vlan;
mod vrf;
mod vxlan;

pub use builder::DriverBuilder;

use std::collections::BTreeSet;

use log::debug;

use crate::command::{CommandResultSet, CommandRunner};
use crate::error::{DriverError, Result};
use crate::model::Lookup;
use crate::nclu::facts::{self, BgpFacts, BgpSummary, SystemInfo};
use crate::nclu::interface::InterfaceTable;
use crate::nclu::vlan::BridgeVlanTable;
use crate::nclu::{decode, vrf as nclu_vrf};
use crate::settings::DriverSettings;
use crate::transport::{Shell, SshShell};

const SHOW_INTERFACE: &str = "show interface";
const SHOW_BONDS: &str = "show interface bonds";
const SHOW_BRIDGE_VLAN: &str = "show bridge vlan";
const SHOW_EVPN_ES: &str = "show evpn es";
const SHOW_EVPN_VNI: &str = "show evpn vni";
const SHOW_BGP_EVPN_VNI: &str = "show bgp l2vpn evpn vni";
const SHOW_BGP_SUMMARY: &str = "show bgp summary";
const SHOW_SYSTEM: &str = "show system";

/// NCLU driver for one Cumulus Linux device.
///
/// # Example
///
/// ```rust,no_run
/// use cumulus_driver::DriverBuilder;
///
/// # async fn example() -> Result<(), cumulus_driver::Error> {
/// let mut driver = DriverBuilder::new("leaf01.lab")
///     .username("cumulus")
///     .password("CumulusLinux!")
///     .build()?;
///
/// driver.open().await?;
/// for vlan in driver.vlan_read(None).await?.into_vec() {
///     println!("vlan {}", vlan.id);
/// }
/// driver.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct CumulusDriver<S> {
    runner: CommandRunner<S>,
    settings: DriverSettings,
    dynamic_pool: BTreeSet<u16>,
}

impl<S: Shell> CumulusDriver<S> {
    /// Create a driver over an already-constructed shell.
    pub fn new(shell: S, settings: DriverSettings) -> Result<Self> {
        let dynamic_pool = settings.dynamic_vlan_pool()?;
        Ok(Self {
            runner: CommandRunner::new(shell),
            settings,
            dynamic_pool,
        })
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// VLAN ids reserved for layer 3 VNIs.
    pub fn dynamic_pool(&self) -> &BTreeSet<u16> {
        &self.dynamic_pool
    }

    /// The command runner, for access to the session cache.
    pub fn runner(&self) -> &CommandRunner<S> {
        &self.runner
    }

    /// Apply `commands` as one transaction.
    async fn apply(&mut self, operation: String, commands: Vec<String>) -> Result<CommandResultSet> {
        debug!("{}: applying {} commands", operation, commands.len());
        self.runner.apply_config(&operation, &commands).await
    }

    async fn json_table<T>(&mut self, command: &str, cache: bool) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let result = self.runner.execute_one(command, true, cache).await?;
        decode(&result)
    }

    pub(crate) async fn interface_table(&mut self, cache: bool) -> Result<InterfaceTable> {
        self.json_table(SHOW_INTERFACE, cache).await
    }

    pub(crate) async fn bonds_table(&mut self, cache: bool) -> Result<InterfaceTable> {
        self.json_table(SHOW_BONDS, cache).await
    }

    pub(crate) async fn bridge_vlan_table(&mut self, cache: bool) -> Result<BridgeVlanTable> {
        self.json_table(SHOW_BRIDGE_VLAN, cache).await
    }

    pub(crate) async fn vrf_listing(&mut self, cache: bool) -> Result<String> {
        let result = self
            .runner
            .execute_raw(nclu_vrf::SHOW_VRF_COMMAND, cache)
            .await?;
        Ok(result.stdout)
    }

    /// `show system` facts.
    pub async fn system_info(&mut self) -> Result<SystemInfo> {
        let result = self.runner.execute_one(SHOW_SYSTEM, false, true).await?;
        Ok(facts::parse_system(&result.stdout))
    }

    /// ASN and router id of the default BGP instance.
    pub async fn bgp_facts(&mut self) -> Result<BgpFacts> {
        let summary: BgpSummary = self.json_table(SHOW_BGP_SUMMARY, true).await?;
        facts::parse_bgp_summary(&summary).ok_or_else(|| {
            DriverError::Unsupported {
                operation: "evpn".to_string(),
                reason: "BGP is not configured on the device".to_string(),
            }
            .into()
        })
    }

    /// Name of the bridge VLANs are configured on.
    pub async fn bridge(&mut self) -> Result<String> {
        if let Some(bridge) = &self.settings.bridge {
            return Ok(bridge.clone());
        }
        let table = self.interface_table(true).await?;
        facts::detect_bridge(&table, None).ok_or_else(|| {
            DriverError::NotFound {
                entity: "bridge",
                key: "Bridge/L2".to_string(),
            }
            .into()
        })
    }
}

impl CumulusDriver<SshShell> {
    /// Connect to the device.
    pub async fn open(&mut self) -> Result<()> {
        self.runner.shell_mut().open().await
    }

    /// Disconnect. The session cache is kept until the driver is dropped.
    pub async fn close(&mut self) -> Result<()> {
        self.runner.shell_mut().close().await
    }

    pub fn is_open(&self) -> bool {
        self.runner.shell().is_open()
    }
}

/// The single object a keyed re-read returned after a mutation.
fn reread<T>(items: Vec<T>, entity: &'static str, key: String) -> Result<T> {
    Lookup::from_results(true, items)
        .one()
        .ok_or_else(|| DriverError::NotFound { entity, key }.into())
}

fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> crate::error::Error {
    DriverError::Unsupported {
        operation: operation.into(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testing::{MockShell, fixtures};

    /// A shell primed with the fixture device's show output.
    pub(crate) fn device() -> MockShell {
        MockShell::new()
            .respond("net show interface json", fixtures::SHOW_INTERFACE)
            .respond("net show interface bonds json", fixtures::BONDS)
            .respond("net show bridge vlan json", fixtures::BRIDGE_VLAN)
            .respond("net show evpn es json", fixtures::EVPN_ES)
            .respond("net show evpn vni json", fixtures::EVPN_VNI)
            .respond("net show bgp l2vpn evpn vni json", fixtures::BGP_EVPN_VNI)
            .respond("net show bgp summary json", fixtures::BGP_SUMMARY)
            .respond("net show system", fixtures::SHOW_SYSTEM)
            .respond("ip -o link show type vrf", fixtures::IP_VRF)
    }

    /// `fixture` with one more top-level entry, as a device shows it
    /// after a change.
    pub(crate) fn with_entry(fixture: &str, key: &str, entry: serde_json::Value) -> String {
        let mut table: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(fixture).unwrap();
        table.insert(key.to_string(), entry);
        serde_json::Value::Object(table).to_string()
    }

    pub(crate) fn driver(shell: MockShell) -> CumulusDriver<MockShell> {
        CumulusDriver::new(shell, DriverSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_facts() {
        let mut driver = driver(device());

        assert_eq!(driver.bridge().await.unwrap(), "bridge");
        assert_eq!(driver.bgp_facts().await.unwrap().asn, 65002);
        assert!(driver.system_info().await.unwrap().supports_evpn_mh());

        driver.bgp_facts().await.unwrap();
        let issued = driver.runner().shell().issued();
        assert_eq!(issued.iter().filter(|c| *c == "net show bgp summary json").count(), 1);
    }

    #[tokio::test]
    async fn test_bridge_override() {
        let settings = DriverSettings {
            bridge: Some("br0".to_string()),
            ..DriverSettings::default()
        };
        let mut driver = CumulusDriver::new(MockShell::new(), settings).unwrap();
        assert_eq!(driver.bridge().await.unwrap(), "br0");
    }

    #[tokio::test]
    async fn test_missing_bgp_is_unsupported() {
        let mut driver = driver(MockShell::new().respond("net show bgp summary json", "{}"));
        let err = driver.bgp_facts().await.unwrap_err();
        assert!(matches!(err, crate::Error::Driver(DriverError::Unsupported { .. })));
    }

    #[test]
    fn test_invalid_pool_is_rejected() {
        let settings = DriverSettings {
            dynamic_vlans: "lots".to_string(),
            bridge: None,
        };
        assert!(CumulusDriver::new(MockShell::new(), settings).is_err());
    }
}
