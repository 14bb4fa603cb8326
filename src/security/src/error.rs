//! Error types for the security engine
//!
//! Privilege checks and rule mutation never fail; these errors are only
//! produced by the administrative console, configuration loading and the
//! reserved snapshot entry points.

use thiserror::Error;

/// Security engine errors
#[derive(Debug, Error)]
pub enum SecurityError {
    /// Access type token was neither `allow` nor `deny`
    #[error("Invalid access type '{0}', expected 'allow' or 'deny'")]
    InvalidAccessType(String),

    /// Command name not known to the console
    #[error("No such command {0}.")]
    UnknownCommand(String),

    /// Wrong number of command arguments
    #[error("Argument count mismatch (passed {passed}, wanted {wanted})")]
    ArgumentCount {
        /// Command being invoked
        command: String,
        /// Arguments supplied
        passed: usize,
        /// Arguments expected
        wanted: usize,
    },

    /// The acting scope may not run this command
    #[error("Access denied for command {0}.")]
    AccessDenied(String),

    /// A principal tried to edit rules that target itself
    #[error("Principal {0} is in the current scope and cannot modify its own access rules")]
    SelfModification(String),

    /// Unterminated quote or similar tokenizer failure
    #[error("Malformed command line: {0}")]
    MalformedCommand(String),

    /// Snapshot replication is reserved and not implemented
    #[error("Access control snapshots are not supported")]
    SnapshotUnsupported,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for security operations
pub type Result<T> = std::result::Result<T, SecurityError>;
