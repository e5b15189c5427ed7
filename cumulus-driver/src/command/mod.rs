//! NCLU command execution.
//!
//! [`CommandRunner`] turns abstract commands like `show interface` into
//! `net show interface json`, runs them over a [`Shell`], and keeps every
//! result in a session cache so read commands are issued at most once
//! unless the caller asks for fresh output.

mod result;
pub mod transaction;

pub use result::{CommandResult, CommandResultSet};
pub use transaction::ConfigTransaction;

use log::{debug, error, warn};

use crate::error::Result;
use crate::transport::Shell;

/// NCLU namespace token every command is issued under.
const NET_PREFIX: &str = "net ";

/// Suffix that asks NCLU for JSON output.
const JSON_SUFFIX: &str = " json";

/// Format a command for NCLU.
///
/// Prefixes `net ` if missing and appends ` json` when `json` is set and
/// the command does not already request it.
pub fn format_command(command: &str, json: bool) -> String {
    let mut formatted = if command.starts_with(NET_PREFIX) {
        command.to_string()
    } else {
        format!("{NET_PREFIX}{command}")
    };
    if json && !formatted.ends_with(JSON_SUFFIX) {
        formatted.push_str(JSON_SUFFIX);
    }
    formatted
}

/// Runs commands against a device and caches their results.
///
/// The cache lives as long as the runner and is never evicted.
pub struct CommandRunner<S> {
    shell: S,
    cache: CommandResultSet,
}

impl<S: Shell> CommandRunner<S> {
    /// Create a runner with an empty cache.
    pub fn new(shell: S) -> Self {
        Self {
            shell,
            cache: CommandResultSet::new(),
        }
    }

    /// Get the underlying shell.
    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Get a mutable reference to the underlying shell.
    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    /// Every result seen in this session.
    pub fn cache(&self) -> &CommandResultSet {
        &self.cache
    }

    /// Execute NCLU commands in order.
    ///
    /// With `cache` set, a command whose original text is already in the
    /// session cache is not re-issued. With `json` set, stdout is parsed as
    /// JSON; invalid JSON leaves [`CommandResult::json`] empty.
    pub async fn execute(
        &mut self,
        commands: &[&str],
        json: bool,
        cache: bool,
    ) -> Result<CommandResultSet> {
        let mut results = CommandResultSet::new();
        for &command in commands {
            if cache {
                if let Some(cached) = self.cache.get(command) {
                    debug!("cache hit: {}", command);
                    results.push(cached.clone());
                    continue;
                }
            }

            let formatted = format_command(command, json);
            let mut result = self.run(formatted, command).await?;
            if json {
                match serde_json::from_str(&result.stdout) {
                    Ok(value) => result.json = Some(value),
                    Err(e) => debug!("'{}' did not return JSON: {}", result.command, e),
                }
            }

            self.cache.push(result.clone());
            results.push(result);
        }
        Ok(results)
    }

    /// Execute one NCLU command and return its result.
    pub async fn execute_one(
        &mut self,
        command: &str,
        json: bool,
        cache: bool,
    ) -> Result<CommandResult> {
        let results = self.execute(&[command], json, cache).await?;
        Ok(results
            .into_iter()
            .next()
            .unwrap_or_else(|| CommandResult::new(format_command(command, json), command)))
    }

    /// Execute a plain shell command (not under `net`), with the same
    /// caching rules as [`execute`](Self::execute).
    pub async fn execute_raw(&mut self, command: &str, cache: bool) -> Result<CommandResult> {
        if cache {
            if let Some(cached) = self.cache.get(command) {
                debug!("cache hit: {}", command);
                return Ok(cached.clone());
            }
        }
        let result = self.run(command.to_string(), command).await?;
        self.cache.push(result.clone());
        Ok(result)
    }

    /// Apply configuration commands as one transaction.
    ///
    /// See [`ConfigTransaction`]. `operation` names the logical operation
    /// (entity and key) in errors and logs. If staging fails partway, the
    /// pending buffer is aborted before the error is returned.
    pub async fn apply_config(
        &mut self,
        operation: &str,
        commands: &[String],
    ) -> Result<CommandResultSet> {
        if commands.is_empty() {
            debug!("{}: nothing to apply", operation);
            return Ok(CommandResultSet::new());
        }
        let mut transaction = ConfigTransaction::begin(self, operation);
        if let Err(e) = transaction.send(commands).await {
            error!("{}: staging failed, aborting pending changes: {}", operation, e);
            if let Err(abort_err) = transaction.abort().await {
                warn!("{}: abort after failed staging failed: {}", operation, abort_err);
            }
            return Err(e);
        }
        transaction.commit().await
    }

    async fn run(&mut self, command: String, original: &str) -> Result<CommandResult> {
        debug!("executing: {}", command);
        let output = self.shell.run(&command).await?;
        Ok(CommandResult {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_status: output.exit_status,
            ..CommandResult::new(command, original)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockShell;

    #[test]
    fn test_format_command() {
        assert_eq!(format_command("show interface", true), "net show interface json");
        assert_eq!(format_command("show interface", false), "net show interface");
        assert_eq!(format_command("net show interface", true), "net show interface json");
        assert_eq!(format_command("show interface json", true), "net show interface json");
        assert_eq!(format_command("add vlan 50", false), "net add vlan 50");
    }

    #[tokio::test]
    async fn test_execute_parses_json() {
        let shell = MockShell::new().respond("net show evpn es json", r#"[{"esi": "03:00"}]"#);
        let mut runner = CommandRunner::new(shell);

        let result = runner.execute_one("show evpn es", true, true).await.unwrap();
        assert_eq!(result.command, "net show evpn es json");
        assert_eq!(result.original_command, "show evpn es");
        assert!(result.json.as_ref().is_some_and(|j| j.is_array()));
    }

    #[tokio::test]
    async fn test_execute_tolerates_invalid_json() {
        let shell = MockShell::new().respond("net show system json", "Hostname..... leaf01");
        let mut runner = CommandRunner::new(shell);

        let result = runner.execute_one("show system", true, true).await.unwrap();
        assert!(result.json.is_none());
        assert_eq!(result.stdout, "Hostname..... leaf01");
    }

    #[tokio::test]
    async fn test_cache_reuses_results() {
        let shell = MockShell::new().respond("net show interface json", "{}");
        let mut runner = CommandRunner::new(shell);

        runner.execute(&["show interface"], true, true).await.unwrap();
        runner.execute(&["show interface"], true, true).await.unwrap();
        assert_eq!(runner.shell().issued(), vec!["net show interface json"]);

        runner.execute(&["show interface"], true, false).await.unwrap();
        assert_eq!(runner.shell().issued().len(), 2);
        assert_eq!(runner.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_execute_raw_is_not_prefixed() {
        let shell = MockShell::new().respond("ip -o link show type vrf", "12: green: <MASTER>");
        let mut runner = CommandRunner::new(shell);

        let result = runner
            .execute_raw("ip -o link show type vrf", true)
            .await
            .unwrap();
        assert_eq!(result.command, "ip -o link show type vrf");
        assert!(result.json.is_none());

        runner
            .execute_raw("ip -o link show type vrf", true)
            .await
            .unwrap();
        assert_eq!(runner.shell().issued().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_config_empty_issues_nothing() {
        let mut runner = CommandRunner::new(MockShell::new());
        let results = runner.apply_config("noop", &[]).await.unwrap();
        assert!(results.is_empty());
        assert!(runner.shell().issued().is_empty());
    }
}
