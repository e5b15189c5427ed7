use log::info;

use super::{CumulusDriver, SHOW_EVPN_ES, reread, unsupported};
use crate::error::{DriverError, Result};
use crate::model::{Esi, Lag, Lookup};
use crate::nclu::lag::{self as nclu_lag, EvpnEsTable};
use crate::transport::Shell;

impl<S: Shell> CumulusDriver<S> {
    /// Read bonds with their members and Ethernet Segment.
    pub async fn lag_read(&mut self, name: Option<&str>) -> Result<Lookup<Lag>> {
        let lags = self.read_lags(name, true).await?;
        Ok(Lookup::from_results(name.is_some(), lags))
    }

    pub async fn lag_create(&mut self, lag: &Lag) -> Result<Lag> {
        let operation = format!("lag create {}", lag.name);
        self.check_esi(&operation, lag).await?;
        if !self.read_lags(Some(&lag.name), false).await?.is_empty() {
            return Err(DriverError::AlreadyExists {
                entity: "lag",
                key: lag.name.clone(),
            }
            .into());
        }

        self.apply(operation, nclu_lag::generate_create_commands(lag)?)
            .await?;
        info!("created lag {} with {} members", lag.name, lag.members.len());
        self.current_lag(&lag.name).await
    }

    /// Update membership and ESI.
    ///
    /// `merge` only adds members and leaves an unset ESI alone; a replace
    /// releases members that are no longer listed and clears the ESI.
    pub async fn lag_update(&mut self, lag: &Lag, merge: bool) -> Result<Lag> {
        let operation = format!("lag update {}", lag.name);
        self.check_esi(&operation, lag).await?;
        let current = self.current_lag(&lag.name).await?;

        let commands = nclu_lag::generate_update_commands(lag, &current, merge)?;
        self.apply(operation, commands).await?;
        self.current_lag(&lag.name).await
    }

    pub async fn lag_delete(&mut self, name: &str) -> Result<()> {
        self.current_lag(name).await?;
        self.apply(format!("lag delete {name}"), nclu_lag::generate_delete_commands(name))
            .await?;
        info!("deleted lag {name}");
        Ok(())
    }

    /// Reject an ESI the device cannot take.
    async fn check_esi(&mut self, operation: &str, lag: &Lag) -> Result<()> {
        let Some(esi) = &lag.evpn_esi else {
            return Ok(());
        };
        let parsed: Esi = esi.parse().map_err(|_| DriverError::InvalidRequest {
            message: format!("'{esi}' is not a 10-octet ESI"),
        })?;
        if parsed.esi_type() != 3 {
            return Err(unsupported(
                operation,
                format!("ESI type {} is not supported, only type 3", parsed.esi_type()),
            ));
        }
        if !self.system_info().await?.supports_evpn_mh() {
            return Err(unsupported(
                operation,
                "EVPN multihoming needs Cumulus Linux 4.2 or later on a Spectrum ASIC",
            ));
        }
        Ok(())
    }

    async fn read_lags(&mut self, filter: Option<&str>, cache: bool) -> Result<Vec<Lag>> {
        let bonds = self.bonds_table(cache).await?;
        let es_table: EvpnEsTable = self.json_table(SHOW_EVPN_ES, cache).await?;
        Ok(nclu_lag::parse_lags(&bonds, &nclu_lag::evpn_es_map(&es_table), filter))
    }

    async fn current_lag(&mut self, name: &str) -> Result<Lag> {
        let lags = self.read_lags(Some(name), false).await?;
        reread(lags, "lag", name.to_string())
    }
}
