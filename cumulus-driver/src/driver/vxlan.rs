use std::collections::BTreeSet;
use std::net::IpAddr;

use log::{debug, info};
use rand::seq::IteratorRandom;

use super::{CumulusDriver, SHOW_BGP_EVPN_VNI, SHOW_EVPN_VNI, reread, unsupported};
use crate::error::{DriverError, Result};
use crate::model::{Lookup, Vxlan, VxlanBinding};
use crate::nclu::facts;
use crate::nclu::vlan::used_vlan_ids;
use crate::nclu::vxlan::{
    self as nclu_vxlan, BgpVniRecord, EvpnVniRecord, VniTable, VxlanRecord, decode_vni_table,
};
use crate::transport::Shell;

impl<S: Shell> CumulusDriver<S> {
    /// Read VNIs with their EVPN parameters.
    pub async fn vxlan_read(&mut self, vni: Option<u32>) -> Result<Lookup<Vxlan>> {
        let records = self.vxlan_records(true).await?;
        Ok(Lookup::from_results(
            vni.is_some(),
            nclu_vxlan::parse_vxlans(&records, vni),
        ))
    }

    /// Create a VNI.
    ///
    /// A layer 3 VNI is carried on a VLAN picked at random from the unused
    /// part of the dynamic pool. Nothing reserves that VLAN between the
    /// read and the commit, so callers must not create VNIs on the same
    /// device concurrently, even through separate drivers. A collision
    /// fails the commit and is rolled back.
    pub async fn vxlan_create(&mut self, vxlan: &Vxlan) -> Result<Vxlan> {
        let records = self.vxlan_records(false).await?;
        if records.contains_key(&vxlan.id) {
            return Err(DriverError::AlreadyExists {
                entity: "vxlan",
                key: vxlan.id.to_string(),
            }
            .into());
        }

        let commands = self.vxlan_create_commands(vxlan, None).await?;
        self.apply(format!("vxlan create {}", vxlan.id), commands)
            .await?;
        info!("created vni {} (layer {})", vxlan.id, vxlan.layer());
        self.reread_vxlan(vxlan.id).await
    }

    /// Rebuild a VNI: the old one is torn down and the new one created in
    /// the same transaction. A layer 3 VNI keeps its VLAN. With `merge`,
    /// route targets are added to the current ones instead of replacing
    /// them.
    pub async fn vxlan_update(&mut self, vxlan: &Vxlan, merge: bool) -> Result<Vxlan> {
        let records = self.vxlan_records(false).await?;
        let current = records.get(&vxlan.id).ok_or_else(|| DriverError::NotFound {
            entity: "vxlan",
            key: vxlan.id.to_string(),
        })?;

        let request = if merge {
            nclu_vxlan::merged(&current.vxlan, vxlan)
        } else {
            vxlan.clone()
        };
        let keep_vlan = match request.binding {
            VxlanBinding::Layer3 { .. } => current.l3_vlan,
            VxlanBinding::Layer2 { .. } => None,
        };

        let mut commands = nclu_vxlan::generate_delete_commands(vxlan.id, &records)?;
        commands.extend(self.vxlan_create_commands(&request, keep_vlan).await?);
        self.apply(format!("vxlan update {}", vxlan.id), commands)
            .await?;
        self.reread_vxlan(vxlan.id).await
    }

    pub async fn vxlan_delete(&mut self, vni: u32) -> Result<()> {
        let records = self.vxlan_records(false).await?;
        let commands = nclu_vxlan::generate_delete_commands(vni, &records)?;
        self.apply(format!("vxlan delete {vni}"), commands).await?;
        info!("deleted vni {vni}");
        Ok(())
    }

    /// Resolve everything `auto` and generate the create commands.
    ///
    /// `l3_vlan` skips the dynamic pool for a layer 3 VNI that already has
    /// its VLAN.
    async fn vxlan_create_commands(
        &mut self,
        vxlan: &Vxlan,
        l3_vlan: Option<u16>,
    ) -> Result<Vec<String>> {
        let operation = format!("vxlan create {}", vxlan.id);
        let bgp = self.bgp_facts().await?;
        let interfaces = self.interface_table(false).await?;

        let auto_source = match vxlan.source_address.explicit() {
            Some(source) => *source,
            None => loopback_source(&interfaces)?,
        };

        let (dynamic_vlan, ip_forward) = match &vxlan.binding {
            VxlanBinding::Layer3 { .. } => {
                let vlan = match l3_vlan {
                    Some(vlan) => vlan,
                    None => self.allocate_dynamic_vlan(&operation).await?,
                };
                (Some(vlan), false)
            }
            VxlanBinding::Layer2 { vlan } => (None, facts::svi_has_address(&interfaces, *vlan)),
        };

        nclu_vxlan::generate_create_commands(vxlan, auto_source, &bgp, dynamic_vlan, ip_forward)
    }

    async fn allocate_dynamic_vlan(&mut self, operation: &str) -> Result<u16> {
        let bridge = self.bridge().await?;
        let table = self.bridge_vlan_table(false).await?;
        let used = used_vlan_ids(&table, &bridge);

        let vlan = choose_dynamic_vlan(&self.dynamic_pool, &used).ok_or_else(|| {
            unsupported(
                operation,
                format!("no free VLAN left in {}", self.settings.dynamic_vlans),
            )
        })?;
        debug!("{operation}: using dynamic vlan {vlan}");
        Ok(vlan)
    }

    async fn vxlan_records(&mut self, cache: bool) -> Result<VniTable<VxlanRecord>> {
        let evpn = self.runner.execute_one(SHOW_EVPN_VNI, true, cache).await?;
        let evpn: VniTable<EvpnVniRecord> = decode_vni_table(&evpn)?;
        let bgp = self
            .runner
            .execute_one(SHOW_BGP_EVPN_VNI, true, cache)
            .await?;
        let bgp: VniTable<BgpVniRecord> = decode_vni_table(&bgp)?;
        let bridge_vlans = self.bridge_vlan_table(cache).await?;
        nclu_vxlan::parse_vxlan_data(&evpn, &bgp, &bridge_vlans)
    }

    async fn reread_vxlan(&mut self, vni: u32) -> Result<Vxlan> {
        let records = self.vxlan_records(false).await?;
        reread(nclu_vxlan::parse_vxlans(&records, Some(vni)), "vxlan", vni.to_string())
    }
}

fn loopback_source(interfaces: &crate::nclu::interface::InterfaceTable) -> Result<IpAddr> {
    facts::loopback_address(interfaces).ok_or_else(|| {
        DriverError::InvalidRequest {
            message: "source address is auto but lo has no routable IPv4 address".to_string(),
        }
        .into()
    })
}

/// Pick a random id from `pool` that is not in `used`.
fn choose_dynamic_vlan(pool: &BTreeSet<u16>, used: &BTreeSet<u16>) -> Option<u16> {
    pool.difference(used)
        .copied()
        .choose(&mut rand::thread_rng())
}
