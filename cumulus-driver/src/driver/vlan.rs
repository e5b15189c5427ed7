use log::info;

use super::{CumulusDriver, reread, unsupported};
use crate::error::{DriverError, Result};
use crate::model::{Lookup, Vlan};
use crate::nclu::vlan as nclu_vlan;
use crate::transport::Shell;

impl<S: Shell> CumulusDriver<S> {
    /// Read VLANs on the primary bridge, without those reserved for
    /// layer 3 VNIs.
    pub async fn vlan_read(&mut self, id: Option<u16>) -> Result<Lookup<Vlan>> {
        let vlans = self.read_vlans(id, true).await?;
        Ok(Lookup::from_results(id.is_some(), vlans))
    }

    pub async fn vlan_create(&mut self, vlan: &Vlan) -> Result<Vlan> {
        let operation = format!("vlan create {}", vlan.id);
        self.check_static_vlan(&operation, vlan.id)?;

        let bridge = self.bridge().await?;
        self.apply(operation, nclu_vlan::generate_create_commands(vlan, &bridge))
            .await?;
        info!("created vlan {} on {}", vlan.id, bridge);
        self.reread_vlan(vlan.id).await
    }

    /// VLANs carry nothing NCLU can change; this only checks existence.
    pub async fn vlan_update(&mut self, vlan: &Vlan, _merge: bool) -> Result<Vlan> {
        self.check_static_vlan(&format!("vlan update {}", vlan.id), vlan.id)?;
        self.reread_vlan(vlan.id).await
    }

    pub async fn vlan_delete(&mut self, id: u16) -> Result<()> {
        let operation = format!("vlan delete {id}");
        self.check_static_vlan(&operation, id)?;
        if self.read_vlans(Some(id), false).await?.is_empty() {
            return Err(DriverError::NotFound {
                entity: "vlan",
                key: id.to_string(),
            }
            .into());
        }

        let bridge = self.bridge().await?;
        self.apply(operation, nclu_vlan::generate_delete_commands(id, &bridge))
            .await?;
        info!("deleted vlan {id} from {bridge}");
        Ok(())
    }

    fn check_static_vlan(&self, operation: &str, id: u16) -> Result<()> {
        if !(1..=4094).contains(&id) {
            return Err(DriverError::InvalidRequest {
                message: format!("VLAN id {id} is out of range"),
            }
            .into());
        }
        if self.dynamic_pool.contains(&id) {
            return Err(unsupported(
                operation,
                format!("VLAN {id} is reserved for layer 3 VNIs ({})", self.settings.dynamic_vlans),
            ));
        }
        Ok(())
    }

    async fn read_vlans(&mut self, filter: Option<u16>, cache: bool) -> Result<Vec<Vlan>> {
        let bridge = self.bridge().await?;
        let table = self.bridge_vlan_table(cache).await?;
        Ok(nclu_vlan::parse_vlans(
            &table,
            &bridge,
            &self.dynamic_pool,
            filter,
            false,
        ))
    }

    async fn reread_vlan(&mut self, id: u16) -> Result<Vlan> {
        let vlans = self.read_vlans(Some(id), false).await?;
        reread(vlans, "vlan", id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::tests::{device, driver};
    use crate::error::{DriverError, Error};
    use crate::model::Vlan;

    #[tokio::test]
    async fn test_read_hides_dynamic_vlans() {
        let mut driver = driver(device());

        let ids: Vec<u16> = driver
            .vlan_read(None)
            .await
            .unwrap()
            .into_vec()
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![71, 72, 88, 100, 250]);

        assert_eq!(driver.vlan_read(Some(88)).await.unwrap().one(), Some(Vlan::new(88)));
        assert!(driver.vlan_read(Some(4001)).await.unwrap().into_vec().is_empty());
    }

    #[tokio::test]
    async fn test_create() {
        let mut driver = driver(device());

        let created = driver.vlan_create(&Vlan::new(100)).await.unwrap();
        assert_eq!(created.id, 100);
        assert_eq!(
            driver.runner().shell().config_commands(),
            vec!["net add bridge bridge vids 100", "net commit"]
        );
    }

    #[tokio::test]
    async fn test_dynamic_pool_is_rejected_before_any_command() {
        let mut driver = driver(device());

        let err = driver.vlan_create(&Vlan::new(4001)).await.unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::Unsupported { .. })));
        assert!(driver.vlan_delete(4095).await.is_err());
        assert!(driver.vlan_create(&Vlan::new(0)).await.is_err());

        assert!(driver.runner().shell().issued().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_vlan() {
        let mut driver = driver(device());
        let err = driver.vlan_update(&Vlan::new(300), true).await.unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::NotFound { entity: "vlan", .. })));
        assert!(driver.runner().shell().config_commands().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let mut driver = driver(device());
        driver.vlan_delete(88).await.unwrap();
        assert_eq!(
            driver.runner().shell().config_commands(),
            vec!["net del bridge bridge vids 88", "net commit"]
        );
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let mut driver = driver(device());
        let err = driver.vlan_delete(300).await.unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::NotFound { entity: "vlan", .. })));
        assert!(driver.runner().shell().config_commands().is_empty());
    }
}
