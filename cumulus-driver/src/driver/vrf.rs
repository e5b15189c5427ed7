use log::info;

use super::{CumulusDriver, reread};
use crate::error::{DriverError, Result};
use crate::model::{Lookup, Vrf};
use crate::nclu::vrf as nclu_vrf;
use crate::transport::Shell;

impl<S: Shell> CumulusDriver<S> {
    pub async fn vrf_read(&mut self, name: Option<&str>) -> Result<Lookup<Vrf>> {
        let listing = self.vrf_listing(true).await?;
        Ok(Lookup::from_results(
            name.is_some(),
            nclu_vrf::parse_vrfs(&listing, name),
        ))
    }

    pub async fn vrf_create(&mut self, vrf: &Vrf) -> Result<Vrf> {
        let listing = self.vrf_listing(false).await?;
        if !nclu_vrf::parse_vrfs(&listing, Some(&vrf.name)).is_empty() {
            return Err(DriverError::AlreadyExists {
                entity: "vrf",
                key: vrf.name.clone(),
            }
            .into());
        }

        self.apply(
            format!("vrf create {}", vrf.name),
            nclu_vrf::generate_create_commands(vrf),
        )
        .await?;
        info!("created vrf {}", vrf.name);
        self.reread_vrf(&vrf.name).await
    }

    /// Address families, targets and RD are not managed through NCLU VRFs,
    /// so there is nothing to change; this only checks existence.
    pub async fn vrf_update(&mut self, vrf: &Vrf, _merge: bool) -> Result<Vrf> {
        self.reread_vrf(&vrf.name).await
    }

    pub async fn vrf_delete(&mut self, name: &str) -> Result<()> {
        let listing = self.vrf_listing(false).await?;
        if nclu_vrf::parse_vrfs(&listing, Some(name)).is_empty() {
            return Err(DriverError::NotFound {
                entity: "vrf",
                key: name.to_string(),
            }
            .into());
        }

        self.apply(
            format!("vrf delete {name}"),
            nclu_vrf::generate_delete_commands(name),
        )
        .await?;
        info!("deleted vrf {name}");
        Ok(())
    }

    async fn reread_vrf(&mut self, name: &str) -> Result<Vrf> {
        let listing = self.vrf_listing(false).await?;
        reread(nclu_vrf::parse_vrfs(&listing, Some(name)), "vrf", name.to_string())
    }
}
