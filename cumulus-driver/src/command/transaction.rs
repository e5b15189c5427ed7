//! NCLU configuration transactions.
//!
//! NCLU stages every `net add`/`net del` in a pending buffer until
//! `net commit` applies it or `net abort` throws it away. The guard here
//! maps that onto ownership:
//! - it holds `&mut CommandRunner`, so nothing else can talk to the device
//!   while changes are pending
//! - `commit()`/`abort()` consume the guard
//! - a failed commit always aborts before the error is returned
//!
//! # Example
//!
//! ```rust,no_run
//! use cumulus_driver::command::{CommandRunner, ConfigTransaction};
//! use cumulus_driver::transport::Shell;
//!
//! # async fn example<S: Shell>(runner: &mut CommandRunner<S>) -> cumulus_driver::error::Result<()> {
//! let mut transaction = ConfigTransaction::begin(runner, "vlan create 50");
//! transaction.send(&["add bridge bridge vids 50".to_string()]).await?;
//! let results = transaction.commit().await?;
//! println!("{}", results.len());
//! # Ok(())
//! # }
//! ```

use log::{debug, error, warn};

use super::{CommandResultSet, CommandRunner};
use crate::error::{DriverError, Result};
use crate::transport::Shell;

const COMMIT: &str = "commit";
const ABORT: &str = "abort";

/// RAII guard for a pending NCLU configuration change.
pub struct ConfigTransaction<'a, S: Shell> {
    runner: &'a mut CommandRunner<S>,
    operation: String,
    commands: Vec<String>,
    results: CommandResultSet,
    consumed: bool,
}

impl<'a, S: Shell> ConfigTransaction<'a, S> {
    /// Start a transaction for a named logical operation.
    pub fn begin(runner: &'a mut CommandRunner<S>, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        debug!("{}: begin transaction", operation);
        Self {
            runner,
            operation,
            commands: Vec::new(),
            results: CommandResultSet::new(),
            consumed: false,
        }
    }

    /// Operation name used in logs and errors.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Stage configuration commands. Issued uncached and without JSON.
    ///
    /// Individual rejections are not checked here; NCLU reports them when
    /// the change is committed.
    pub async fn send(&mut self, commands: &[String]) -> Result<()> {
        let refs: Vec<&str> = commands.iter().map(String::as_str).collect();
        let results = self.runner.execute(&refs, false, false).await?;
        self.commands.extend(commands.iter().cloned());
        self.results.extend(results);
        Ok(())
    }

    /// Commit the staged changes.
    ///
    /// On success returns the staged results followed by the commit result.
    /// On failure issues exactly one `abort` and returns
    /// [`DriverError::ConfigApplyFailed`]. If the commit itself cannot be
    /// run, an abort is still attempted and the transport error returned.
    pub async fn commit(mut self) -> Result<CommandResultSet> {
        self.consumed = true;
        debug!("{}: commit", self.operation);

        let commit = match self.runner.execute_one(COMMIT, false, false).await {
            Ok(commit) => commit,
            Err(e) => {
                error!("{}: commit did not complete, aborting: {}", self.operation, e);
                if let Err(abort_err) = self.runner.execute_one(ABORT, false, false).await {
                    warn!("{}: abort after failed commit failed: {}", self.operation, abort_err);
                }
                return Err(e);
            }
        };
        if commit.failed() {
            error!(
                "{}: commit failed, aborting pending changes; commands={:?} stdout={:?} stderr={:?}",
                self.operation, self.commands, commit.stdout, commit.stderr
            );
            self.runner.execute_one(ABORT, false, false).await?;
            return Err(DriverError::ConfigApplyFailed {
                operation: std::mem::take(&mut self.operation),
                commands: std::mem::take(&mut self.commands),
                stdout: commit.stdout,
                stderr: commit.stderr,
            }
            .into());
        }

        let mut results = std::mem::take(&mut self.results);
        results.push(commit);
        Ok(results)
    }

    /// Discard the staged changes.
    pub async fn abort(mut self) -> Result<()> {
        self.consumed = true;
        debug!("{}: abort", self.operation);
        self.runner.execute_one(ABORT, false, false).await?;
        Ok(())
    }
}

impl<S: Shell> Drop for ConfigTransaction<'_, S> {
    fn drop(&mut self) {
        if !self.consumed {
            warn!(
                "ConfigTransaction '{}' dropped without commit/abort; {} commands left pending",
                self.operation,
                self.commands.len()
            );
        }
    }
}
