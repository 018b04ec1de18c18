// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for inventory operations

use std::fmt;

use thiserror::Error;

/// Error reported by a connection backend.
///
/// Backends are external collaborators, so their failures are carried
/// opaquely and exposed through [`std::error::Error::source`].
pub type PluginError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Resolution exhausted own data, every ancestor group and the defaults
    #[error("Attribute '{key}' not found for {entity}")]
    AttributeNotFound { entity: String, key: String },

    /// Raw group entry was neither a mapping, null, nor a built group
    #[error("Invalid group spec for '{group}': {reason}")]
    InvalidGroupSpec { group: String, reason: String },

    /// Raw host entry was neither a mapping, null, nor a built host
    #[error("Invalid host spec for '{host}': {reason}")]
    InvalidHostSpec { host: String, reason: String },

    /// A group reference names a group that is not in the inventory
    #[error("Unknown group '{group}' referenced by '{referenced_by}'")]
    UnknownGroup { group: String, referenced_by: String },

    /// The parent-group graph contains a cycle
    #[error("Group cycle detected: {}", .path.join(" -> "))]
    GroupCycle { path: Vec<String> },

    /// Parent groups are fixed once an inventory owns the entity
    #[error("Parent groups of '{0}' are fixed once the inventory is built")]
    GroupsFrozen(String),

    /// Attribute may not be written through the generic setter
    #[error("Attribute '{0}' is reserved and cannot be modified")]
    ReservedAttribute(String),

    /// Connection is already open for this host
    #[error("Connection '{connection}' is already open on host '{host}'")]
    ConnectionAlreadyOpen { host: String, connection: String },

    /// Connection is not open for this host
    #[error("Connection '{connection}' is not open on host '{host}'")]
    ConnectionNotOpen { host: String, connection: String },

    /// No backend plugin registered under this name
    #[error("Unknown connection plugin: {0}")]
    UnknownConnectionPlugin(String),

    /// A backend plugin is already registered under this name
    #[error("Connection plugin already registered: {0}")]
    PluginAlreadyRegistered(String),

    /// The `<name>_options` block could not be interpreted
    #[error("Invalid options for connection '{connection}' on host '{host}': {reason}")]
    InvalidConnectionOptions {
        host: String,
        connection: String,
        reason: String,
    },

    /// Backend failed to open the connection
    #[error("Failed to open connection '{connection}' on host '{host}': {source}")]
    ConnectionFailed {
        host: String,
        connection: String,
        #[source]
        source: PluginError,
    },

    /// One or more backends failed to close
    #[error("Failed to close {} connection(s): {}", .failures.len(), describe_failures(.failures))]
    CloseFailed { failures: Vec<CloseFailure> },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// A single backend close failure collected while closing connections.
#[derive(Debug)]
pub struct CloseFailure {
    /// Host owning the connection
    pub host: String,
    /// Connection name
    pub connection: String,
    /// Error reported by the backend
    pub source: PluginError,
}

impl fmt::Display for CloseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.host, self.connection, self.source)
    }
}

fn describe_failures(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl InventoryError {
    /// Whether the error is a recoverable lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::AttributeNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = InventoryError::GroupCycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Group cycle detected: a -> b -> a");
    }

    #[test]
    fn test_close_failed_message_lists_every_failure() {
        let err = InventoryError::CloseFailed {
            failures: vec![
                CloseFailure {
                    host: "h1".into(),
                    connection: "ssh".into(),
                    source: "socket reset".into(),
                },
                CloseFailure {
                    host: "h1".into(),
                    connection: "netconf".into(),
                    source: "timeout".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Failed to close 2 connection(s): h1/ssh: socket reset; h1/netconf: timeout"
        );
    }

    #[test]
    fn test_connection_failed_exposes_backend_source() {
        let err = InventoryError::ConnectionFailed {
            host: "h1".into(),
            connection: "ssh".into(),
            source: "auth rejected".into(),
        };
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("auth rejected"));
    }
}
