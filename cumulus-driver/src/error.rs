//! Error types for cumulus-driver.

use std::io;
use thiserror::Error;

/// Main error type for cumulus-driver operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Device output could not be interpreted
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key not present in known_hosts (strict mode)
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Driver layer errors (request validation, configuration apply).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// The device or this driver cannot perform the request.
    #[error("Unsupported operation '{operation}': {reason}")]
    Unsupported { operation: String, reason: String },

    /// The request itself is malformed.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The addressed object does not exist on the device.
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// The object to be created already exists on the device.
    #[error("{entity} '{key}' already exists")]
    AlreadyExists { entity: &'static str, key: String },

    /// Commit was rejected by the device; pending changes were aborted.
    #[error(
        "Configuration apply failed for '{operation}' ({} commands); pending configuration rollback has been performed",
        .commands.len()
    )]
    ConfigApplyFailed {
        operation: String,
        commands: Vec<String>,
        stdout: String,
        stderr: String,
    },

    /// A programming fault: an invariant the caller should have enforced.
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Invalid configuration in the driver builder or settings
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Errors raised while turning device output into model objects.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON was present but did not have the expected shape.
    #[error("Unexpected output from '{command}': {source}")]
    Json {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field held a value that could not be interpreted.
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type alias using cumulus-driver's Error.
pub type Result<T> = std::result::Result<T, Error>;
