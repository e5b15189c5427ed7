//! Builder for SSH-backed drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::CumulusDriver;
use crate::error::{DriverError, Result};
use crate::settings::DriverSettings;
use crate::transport::SshShell;
use crate::transport::config::{
    AuthMethod, DEFAULT_PORT, DEFAULT_TERMINAL_HEIGHT, DEFAULT_TERMINAL_WIDTH, DEFAULT_TIMEOUT,
    HostKeyVerification, SshConfig,
};

/// Builder for a [`CumulusDriver`] talking SSH.
///
/// # Example
///
/// ```rust,no_run
/// use cumulus_driver::DriverBuilder;
///
/// # async fn example() -> Result<(), cumulus_driver::Error> {
/// let mut driver = DriverBuilder::new("192.168.121.10")
///     .username("cumulus")
///     .private_key("~/.ssh/id_ed25519")
///     .dynamic_vlans("3900-3999")
///     .build()?;
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    timeout: Duration,
    terminal_width: u32,
    terminal_height: u32,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    settings: DriverSettings,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            auth: AuthMethod::None,
            timeout: DEFAULT_TIMEOUT,
            terminal_width: DEFAULT_TERMINAL_WIDTH,
            terminal_height: DEFAULT_TERMINAL_HEIGHT,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            settings: DriverSettings::default(),
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the connection and inactivity timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set the host key verification mode (default: accept new).
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Replace all driver settings.
    pub fn settings(mut self, settings: DriverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// VLAN glob reserved for layer 3 VNIs.
    pub fn dynamic_vlans(mut self, glob: impl Into<String>) -> Self {
        self.settings.dynamic_vlans = glob.into();
        self
    }

    /// Bridge to configure VLANs on, instead of detecting it.
    pub fn bridge(mut self, bridge: impl Into<String>) -> Self {
        self.settings.bridge = Some(bridge.into());
        self
    }

    /// Build the driver.
    ///
    /// This validates the settings but does not connect. Call `open()` on
    /// the returned driver to establish the connection.
    pub fn build(self) -> Result<CumulusDriver<SshShell>> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "username is required".to_string(),
        })?;

        let ssh_config = SshConfig {
            port: self.port,
            auth: self.auth,
            timeout: self.timeout,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
            ..SshConfig::new(self.host, username)
        };

        CumulusDriver::new(SshShell::new(ssh_config), self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_username() {
        let result = DriverBuilder::new("leaf01").password("secret").build();
        assert!(matches!(
            result,
            Err(crate::Error::Driver(DriverError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn test_build_applies_settings() {
        let driver = DriverBuilder::new("leaf01")
            .port(2222)
            .username("cumulus")
            .password("CumulusLinux!")
            .host_key_verification(HostKeyVerification::Disabled)
            .dynamic_vlans("3000-3001")
            .bridge("br0")
            .build()
            .unwrap();

        assert!(!driver.is_open());
        assert_eq!(driver.runner().shell().config().socket_addr(), "leaf01:2222");
        assert_eq!(driver.settings().bridge.as_deref(), Some("br0"));
        assert_eq!(driver.dynamic_pool().len(), 2);
    }

    #[test]
    fn test_build_rejects_bad_pool() {
        let result = DriverBuilder::new("leaf01")
            .username("cumulus")
            .dynamic_vlans("4000-")
            .build();
        assert!(result.is_err());
    }
}
