//! Command result types.

use serde_json::Value;

/// Marker NCLU prints at the start of stdout when it rejects a command.
const ERROR_MARKER: &str = "ERROR";

/// Result of one command execution.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// The command exactly as sent to the device.
    pub command: String,

    /// The command as requested, before formatting.
    pub original_command: String,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Parsed stdout, when JSON was requested and stdout was valid JSON.
    pub json: Option<Value>,

    /// Exit status reported by the remote side.
    pub exit_status: Option<u32>,
}

impl CommandResult {
    /// Create an empty result for a command.
    pub fn new(command: impl Into<String>, original_command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            original_command: original_command.into(),
            stdout: String::new(),
            stderr: String::new(),
            json: None,
            exit_status: None,
        }
    }

    /// Whether the device rejected the command.
    ///
    /// NCLU reports most errors on stdout prefixed with `ERROR`, so the
    /// exit status is not consulted.
    pub fn failed(&self) -> bool {
        !self.stderr.is_empty() || self.stdout.trim_start().starts_with(ERROR_MARKER)
    }

    /// Check if the result matches a formatted or original command.
    pub fn matches(&self, command: &str) -> bool {
        self.command == command || self.original_command == command
    }
}

/// Ordered collection of [`CommandResult`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandResultSet {
    results: Vec<CommandResult>,
}

impl CommandResultSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the result of `command`, matched on either the formatted or the
    /// original text. The most recent result wins.
    pub fn get(&self, command: &str) -> Option<&CommandResult> {
        self.results.iter().rev().find(|r| r.matches(command))
    }

    /// Append a result.
    pub fn push(&mut self, result: CommandResult) {
        self.results.push(result);
    }

    /// Append every result from another set.
    pub fn extend(&mut self, other: CommandResultSet) {
        self.results.extend(other.results);
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandResult> {
        self.results.iter()
    }

    /// The formatted commands in insertion order.
    pub fn commands(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.command.as_str()).collect()
    }
}

impl IntoIterator for CommandResultSet {
    type Item = CommandResult;
    type IntoIter = std::vec::IntoIter<CommandResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl FromIterator<CommandResult> for CommandResultSet {
    fn from_iter<I: IntoIterator<Item = CommandResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
