// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection Parameters
//!
//! Parameters handed to a backend come from up to three layers, first set
//! wins:
//!
//! ```text
//! explicit arguments (OpenConnection)
//!     ↓
//! "<name>_options" block (resolved like any other attribute)
//!     ↓
//! host base attributes (hostname, username, password, port, platform)
//! ```
//!
//! With `default_to_host_attributes` disabled only the explicit arguments
//! are used and anything not given stays unset.

use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::domain::value::{as_port, kind, Data};

/// Parameters passed to [`super::ConnectionPlugin::open`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionParameters {
    pub hostname: Option<String>,
    #[serde(deserialize_with = "port_field")]
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub platform: Option<String>,
    /// Backend-specific extras
    pub connection_options: Option<Data>,
}

impl ConnectionParameters {
    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: ConnectionParameters) -> Self {
        Self {
            hostname: self.hostname.or(fallback.hostname),
            port: self.port.or(fallback.port),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            platform: self.platform.or(fallback.platform),
            connection_options: self.connection_options.or(fallback.connection_options),
        }
    }
}

/// Ports follow the host attribute rule: integers or numeric strings
fn port_field<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_port(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid port {value}"))),
    }
}

/// Per-connection override block stored under `"<name>_options"`
///
/// ```yaml
/// netconf_options:
///   port: 830
///   plugin: ncclient
///   connection_options:
///     hostkey_verify: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    #[serde(flatten)]
    pub parameters: ConnectionParameters,

    /// Plugin to use instead of the one registered under the connection name
    pub plugin: Option<String>,
}

impl ConnectionOptions {
    /// Attribute key holding the options for `connection`
    pub fn key(connection: &str) -> String {
        format!("{connection}_options")
    }

    /// Interpret a resolved options value
    ///
    /// `null` means no overrides.
    ///
    /// # Errors
    /// Returns the reason when the value is not a mapping of known fields.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
            other => Err(format!("expected a mapping, got {}", kind(&other))),
        }
    }
}

/// Request to open a connection
///
/// ```rust
/// use cim_inventory::connections::OpenConnection;
///
/// let request = OpenConnection::new()
///     .plugin("ssh2")
///     .username("automation")
///     .port(2222);
/// assert!(request.default_to_host_attributes);
/// ```
#[derive(Debug, Clone)]
pub struct OpenConnection {
    /// Plugin override; defaults to the connection name
    pub plugin: Option<String>,

    /// Explicit parameters
    pub parameters: ConnectionParameters,

    /// Configuration handed to the backend
    pub configuration: Option<Arc<Config>>,

    /// Fill unset parameters from the host
    pub default_to_host_attributes: bool,
}

impl Default for OpenConnection {
    fn default() -> Self {
        Self {
            plugin: None,
            parameters: ConnectionParameters::default(),
            configuration: None,
            default_to_host_attributes: true,
        }
    }
}

impl OpenConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.parameters.hostname = Some(hostname.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.parameters.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.parameters.password = Some(password.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.parameters.port = Some(port);
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.parameters.platform = Some(platform.into());
        self
    }

    pub fn connection_options(mut self, options: Data) -> Self {
        self.parameters.connection_options = Some(options);
        self
    }

    pub fn configuration(mut self, configuration: Arc<Config>) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Use only the explicit arguments
    pub fn without_host_defaults(mut self) -> Self {
        self.default_to_host_attributes = false;
        self
    }
}
