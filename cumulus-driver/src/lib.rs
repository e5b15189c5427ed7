//! # cumulus-driver
//!
//! Async NCLU driver for Cumulus Linux switches.
//!
//! The driver reads interfaces, VLANs, VRFs, bonds and VXLAN/EVPN tunnels
//! from `net show` output into a vendor-neutral model, and turns requested
//! objects into ordered `net add`/`net del` sequences that are committed as
//! one NCLU transaction, or aborted if the commit fails.
//!
//! ## Features
//!
//! - Async SSH transport via russh, one PTY exec channel per command
//! - Per-session result cache for show commands
//! - Commit/abort transaction guard
//! - Merge and replace updates, with delete-and-rebuild where NCLU cannot
//!   change things in place
//! - EVPN multihoming for bonds and dynamic VLAN allocation for layer 3 VNIs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cumulus_driver::{DriverBuilder, Vlan};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cumulus_driver::Error> {
//!     let mut driver = DriverBuilder::new("leaf01.lab")
//!         .username("cumulus")
//!         .password("CumulusLinux!")
//!         .build()?;
//!
//!     driver.open().await?;
//!
//!     let vlan = driver.vlan_create(&Vlan::new(50)).await?;
//!     println!("created vlan {}", vlan.id);
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod driver;
pub mod error;
pub mod model;
pub mod nclu;
pub mod settings;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use driver::{CumulusDriver, DriverBuilder};
pub use error::{Error, Result};
pub use model::{
    AutoValue, Interface, InterfaceAddress, InterfaceMode, Lag, Lookup, Vlan, Vrf, Vxlan,
    VxlanBinding,
};
pub use settings::DriverSettings;
pub use transport::{AuthMethod, HostKeyVerification, Shell, ShellOutput, SshConfig, SshShell};
