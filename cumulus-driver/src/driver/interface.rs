use log::{debug, info};

use super::{CumulusDriver, reread, unsupported};
use crate::error::{DriverError, Result};
use crate::model::{Interface, InterfaceMode, Lookup};
use crate::nclu::interface::{
    self as nclu_interface, InterfaceKind, InterfaceTable, classify_interface, parse_interfaces,
};
use crate::transport::Shell;

impl<S: Shell> CumulusDriver<S> {
    /// Read physical ports, bonds and SVIs.
    pub async fn interface_read(&mut self, name: Option<&str>) -> Result<Lookup<Interface>> {
        let table = self.interface_table(true).await?;
        Ok(Lookup::from_results(name.is_some(), parse_interfaces(&table, name)?))
    }

    /// Create an SVI.
    ///
    /// Only routed `vlan<id>` interfaces can be created. When the SVI
    /// already exists as a forwarding-disabled stub left by a layer 2 VNI,
    /// forwarding is turned back on first.
    pub async fn interface_create(&mut self, request: &Interface) -> Result<Interface> {
        let operation = format!("interface create {}", request.name);
        if !request.name.starts_with("vlan") {
            return Err(unsupported(operation, "only SVIs (vlan<id>) can be created"));
        }
        if matches!(request.mode, InterfaceMode::Bridged(_)) {
            return Err(unsupported(operation, "bridged SVIs are not supported"));
        }

        let table = self.interface_table(false).await?;
        let mut commands = Vec::new();
        if table.contains_key(&request.name) {
            let vlan = nclu_interface::svi_vlan_id(&request.name)?;
            commands.push(format!("del vlan {vlan} ip forward off"));
        }
        commands.extend(nclu_interface::generate_create_commands(request, InterfaceKind::Vlan)?);

        self.apply(operation, commands).await?;
        info!("created interface {}", request.name);
        self.reread_interface(&request.name).await
    }

    /// Update an interface.
    ///
    /// A mode change removes the interface and rebuilds it from the
    /// current state overlaid with the request. Otherwise `merge` touches
    /// only the fields the request sets, and a replace rebuilds the
    /// interface from the request alone.
    pub async fn interface_update(&mut self, request: &Interface, merge: bool) -> Result<Interface> {
        let operation = format!("interface update {}", request.name);
        let table = self.interface_table(false).await?;
        let (current, kind) = current_interface(&table, &request.name)?;

        let commands = if !current.mode.same_mode(&request.mode) {
            debug!(
                "{}: mode change {} -> {}, rebuilding",
                request.name, current.mode, request.mode
            );
            let mut commands = nclu_interface::generate_delete_commands(&request.name, kind)?;
            commands.extend(nclu_interface::generate_update_commands(
                &current.merged(request),
                kind,
                true,
            )?);
            commands
        } else {
            nclu_interface::generate_update_commands(request, kind, merge)?
        };

        if commands.is_empty() {
            return Err(unsupported(operation, format!("{} interfaces cannot be updated", kind.token())));
        }
        self.apply(operation, commands).await?;
        self.reread_interface(&request.name).await
    }

    /// Delete an SVI or bond, or reset a physical port.
    pub async fn interface_delete(&mut self, name: &str) -> Result<()> {
        let table = self.interface_table(false).await?;
        let (_, kind) = current_interface(&table, name)?;
        let commands = nclu_interface::generate_delete_commands(name, kind)?;
        self.apply(format!("interface delete {name}"), commands).await?;
        info!("deleted interface {name}");
        Ok(())
    }

    async fn reread_interface(&mut self, name: &str) -> Result<Interface> {
        let table = self.interface_table(false).await?;
        reread(parse_interfaces(&table, Some(name))?, "interface", name.to_string())
    }
}

fn current_interface(table: &InterfaceTable, name: &str) -> Result<(Interface, InterfaceKind)> {
    let not_found = || DriverError::NotFound {
        entity: "interface",
        key: name.to_string(),
    };
    let record = table.get(name).ok_or_else(not_found)?;
    let kind = classify_interface(name, record).ok_or_else(not_found)?;
    let current = parse_interfaces(table, Some(name))?
        .pop()
        .ok_or_else(not_found)?;
    Ok((current, kind))
}
