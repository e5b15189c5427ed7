//! Scripted shell and device output for unit tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

use crate::error::{Result, TransportError};
use crate::transport::{Shell, ShellOutput};

/// Trimmed output captured from a Cumulus VX leaf.
pub mod fixtures {
    pub const SHOW_INTERFACE: &str = include_str!("../testdata/show_interface.json");
    pub const BONDS: &str = include_str!("../testdata/bonds.json");
    pub const BRIDGE_VLAN: &str = include_str!("../testdata/bridge_vlan.json");
    pub const IP_VRF: &str = include_str!("../testdata/ip_vrf.txt");
    pub const EVPN_ES: &str = include_str!("../testdata/evpn_es.json");
    pub const EVPN_VNI: &str = include_str!("../testdata/evpn_vni.json");
    pub const BGP_EVPN_VNI: &str = include_str!("../testdata/bgp_evpn_vni.json");
    pub const BGP_SUMMARY: &str = include_str!("../testdata/bgp_summary.json");
    pub const SHOW_SYSTEM: &str = include_str!("../testdata/show_system.txt");
}

/// A [`Shell`] that replays canned output and records what it was asked.
///
/// Responses registered for the same command are served in order; the
/// last one repeats. Unknown commands print nothing and succeed.
#[derive(Debug, Default)]
pub struct MockShell {
    responses: HashMap<String, Vec<ShellOutput>>,
    calls: HashMap<String, usize>,
    failing: HashSet<String>,
    issued: Vec<String>,
}

impl MockShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue stdout for `command`.
    pub fn respond(self, command: &str, stdout: &str) -> Self {
        self.respond_with(command, ShellOutput::stdout(stdout))
    }

    /// Queue a full output for `command`.
    pub fn respond_with(mut self, command: &str, output: ShellOutput) -> Self {
        self.responses
            .entry(command.to_string())
            .or_default()
            .push(output);
        self
    }

    /// Make `command` fail as if the session had timed out.
    pub fn fail_on(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    /// Every command run so far, in order.
    pub fn issued(&self) -> Vec<String> {
        self.issued.clone()
    }

    /// Commands run so far that change configuration.
    pub fn config_commands(&self) -> Vec<String> {
        self.issued
            .iter()
            .filter(|c| !c.starts_with("net show") && !c.starts_with("ip "))
            .cloned()
            .collect()
    }

    fn next_output(&mut self, command: &str) -> ShellOutput {
        let count = self.calls.entry(command.to_string()).or_insert(0);
        let output = self
            .responses
            .get(command)
            .and_then(|queue| queue.get((*count).min(queue.len().saturating_sub(1))))
            .cloned()
            .unwrap_or_else(|| ShellOutput::stdout(""));
        *count += 1;
        output
    }
}

impl Shell for MockShell {
    fn run(&mut self, command: &str) -> impl Future<Output = Result<ShellOutput>> + Send {
        self.issued.push(command.to_string());
        let output: Result<ShellOutput> = if self.failing.contains(command) {
            Err(TransportError::Timeout(Duration::from_secs(30)).into())
        } else {
            Ok(self.next_output(command))
        };
        async move { output }
    }
}
