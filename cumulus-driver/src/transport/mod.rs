//! Shell transport.
//!
//! The driver only needs one capability from the device: run a command
//! string and hand back what it printed. [`Shell`] is that seam;
//! [`SshShell`] implements it over russh.

pub mod config;
mod ssh;

use std::future::Future;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::SshShell;

use crate::error::Result;

/// Raw output of one shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Everything written to stdout. With a PTY this usually includes stderr too.
    pub stdout: String,

    /// Everything written to stderr.
    pub stderr: String,

    /// Exit status reported by the remote side, if any.
    pub exit_status: Option<u32>,
}

impl ShellOutput {
    /// Output with only stdout populated and a zero exit status.
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_status: Some(0),
        }
    }
}

/// Something that can run a command on the device.
pub trait Shell: Send {
    /// Run `command` and wait for it to finish.
    fn run(&mut self, command: &str) -> impl Future<Output = Result<ShellOutput>> + Send;
}
