//! Connection settings for reaching a switch's NCLU shell over SSH.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// PTY width; `net show` tables wrap at the terminal width.
pub const DEFAULT_TERMINAL_WIDTH: u32 = 511;
pub const DEFAULT_TERMINAL_HEIGHT: u32 = 24;

/// How the switch's host key is checked, like OpenSSH's
/// `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Only switches already in known_hosts are reachable.
    Strict,

    /// Learn a switch's key on first contact; reject it if it later changes.
    #[default]
    AcceptNew,

    /// No checking. Lab and freshly re-imaged switches only.
    Disabled,
}

/// Everything needed to open the SSH session a driver runs over.
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Switch hostname or management address.
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: AuthMethod,

    /// Connect timeout, also used as the session inactivity timeout.
    pub timeout: Duration,

    pub terminal_width: u32,
    pub terminal_height: u32,

    pub host_key_verification: HostKeyVerification,

    /// known_hosts to check and learn into; `~/.ssh/known_hosts` when unset.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Settings for `username@host` with default port, timeout and PTY
    /// size, no credentials and [`HostKeyVerification::AcceptNew`].
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            auth: AuthMethod::None,
            timeout: DEFAULT_TIMEOUT,
            terminal_width: DEFAULT_TERMINAL_WIDTH,
            terminal_height: DEFAULT_TERMINAL_HEIGHT,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// `host:port`, as used for connecting and in known_hosts errors.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credentials for the switch account.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// `none` authentication; some lab images accept it.
    None,

    Password(SecretString),

    /// Private key file, with a passphrase if it is encrypted.
    PrivateKey {
        path: PathBuf,
        passphrase: Option<SecretString>,
    },
}
