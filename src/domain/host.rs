// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Entity
//!
//! A managed device. Besides its attributes a host owns a
//! [`ConnectionRegistry`] holding at most one open handle per connection
//! name.
//!
//! # Attribute Access
//!
//! ```text
//! host.data()            own data only
//! host.resolve("site")   own data → groups → defaults
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cim_inventory::domain::{AttributeContainer, Defaults, Group, Host};
//! use serde_json::json;
//!
//! let bma = Arc::new(Group::new("bma"));
//! bma.set("site", "bma").unwrap();
//!
//! let defaults = Defaults::default();
//! defaults.insert("domain", json!("acme.com"));
//!
//! let host = Host::new("h1")
//!     .with_defaults(defaults)
//!     .with_groups(vec![bma.into()]);
//! host.set("ip", "1.2.3.4").unwrap();
//!
//! assert_eq!(host.resolve("ip").unwrap(), json!("1.2.3.4"));
//! assert_eq!(host.resolve("site").unwrap(), json!("bma"));
//! assert_eq!(host.resolve("domain").unwrap(), json!("acme.com"));
//! assert!(!host.data().contains_key("site"));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::attributes::{AttributeContainer, Attributes, ParentGroup};
use super::defaults::Defaults;
use super::value::Data;
use crate::connections::{
    ConnectionOptions, ConnectionParameters, ConnectionRef, ConnectionRegistry, OpenConnection,
    PluginRegistry,
};
use crate::errors::{InventoryError, InventoryResult};

/// Managed network device
pub struct Host {
    attributes: Attributes,
    connections: Mutex<ConnectionRegistry>,
}

impl Host {
    /// Create a host with no data, private defaults and the global plugin
    /// registry
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(Attributes::new(name, Defaults::default()))
    }

    /// Create a host from raw data
    ///
    /// # Errors
    /// [`InventoryError::InvalidHostSpec`] when the `groups` field is not a
    /// list of group names.
    pub fn from_data(name: impl Into<String>, data: Data) -> InventoryResult<Self> {
        let name = name.into();
        let attributes = Attributes::from_data(name.clone(), data, Defaults::default())
            .map_err(|reason| InventoryError::InvalidHostSpec { host: name, reason })?;
        Ok(Self::with_attributes(attributes))
    }

    fn with_attributes(attributes: Attributes) -> Self {
        let connections = ConnectionRegistry::new(attributes.name(), PluginRegistry::global());
        Self {
            attributes,
            connections: Mutex::new(connections),
        }
    }

    /// Replace the parent groups
    pub fn with_groups(self, groups: Vec<ParentGroup>) -> Self {
        self.attributes.set_parent_groups(groups);
        self
    }

    /// Replace the parent groups of a host not yet owned by an inventory
    ///
    /// Meant for builder transforms; the inventory resolves the new names
    /// right after the transform runs.
    ///
    /// # Errors
    /// [`InventoryError::GroupsFrozen`] once the host belongs to an inventory.
    pub fn set_groups(&self, groups: Vec<ParentGroup>) -> InventoryResult<()> {
        if self.attributes.is_bound() {
            return Err(InventoryError::GroupsFrozen(self.name().to_string()));
        }
        self.attributes.set_parent_groups(groups);
        Ok(())
    }

    /// Share `defaults` with other hosts
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.attributes.replace_defaults(defaults);
        self
    }

    /// Resolve backends from `plugins` instead of the global registry
    pub fn with_plugins(self, plugins: Arc<PluginRegistry>) -> Self {
        self.connections.lock().set_plugins(plugins);
        self
    }

    /// Interpret the `"<name>_options"` attribute
    ///
    /// # Errors
    /// [`InventoryError::InvalidConnectionOptions`] when the value is not a
    /// mapping of known fields.
    pub fn connection_options(&self, connection: &str) -> InventoryResult<ConnectionOptions> {
        let value = self.get_or(&ConnectionOptions::key(connection), Value::Null);
        ConnectionOptions::from_value(value).map_err(|reason| {
            InventoryError::InvalidConnectionOptions {
                host: self.name().to_string(),
                connection: connection.to_string(),
                reason,
            }
        })
    }

    /// Parameters used to open `connection`
    ///
    /// Without a connection name only the host base attributes are used.
    ///
    /// # Errors
    /// [`InventoryError::InvalidConnectionOptions`]
    pub fn connection_parameters(
        &self,
        connection: Option<&str>,
    ) -> InventoryResult<ConnectionParameters> {
        let base = ConnectionParameters {
            hostname: Some(self.hostname()),
            port: self.port(),
            username: Some(self.username()),
            password: Some(self.password()),
            platform: self.platform(),
            connection_options: Some(Data::new()),
        };

        match connection {
            None => Ok(base),
            Some(name) => Ok(self.connection_options(name)?.parameters.or(base)),
        }
    }

    /// Existing handle for `name`, opening one with the host's parameters if
    /// needed
    ///
    /// A `plugin` set in the `"<name>_options"` block overrides the plugin
    /// registered under `name`. The lookup and the open happen under one
    /// lock, so concurrent callers share a single handle.
    ///
    /// # Errors
    /// Any error of [`Host::open_connection`].
    pub fn get_connection(&self, name: &str) -> InventoryResult<ConnectionRef> {
        let mut registry = self.connections.lock();
        if let Some(handle) = registry.get(name) {
            return Ok(handle);
        }

        let options = self.connection_options(name)?;
        let mut request = OpenConnection::new();
        request.plugin = options.plugin;
        self.open_in(&mut registry, name, request)
    }

    /// Open a new connection named `name`
    ///
    /// # Errors
    /// - [`InventoryError::ConnectionAlreadyOpen`]
    /// - [`InventoryError::UnknownConnectionPlugin`]
    /// - [`InventoryError::InvalidConnectionOptions`]
    /// - [`InventoryError::ConnectionFailed`]
    pub fn open_connection(
        &self,
        name: &str,
        request: OpenConnection,
    ) -> InventoryResult<ConnectionRef> {
        let mut registry = self.connections.lock();
        self.open_in(&mut registry, name, request)
    }

    fn open_in(
        &self,
        registry: &mut ConnectionRegistry,
        name: &str,
        request: OpenConnection,
    ) -> InventoryResult<ConnectionRef> {
        let plugin = request.plugin.clone().unwrap_or_else(|| name.to_string());

        registry.open(name, &plugin, || {
            if !request.default_to_host_attributes {
                return Ok((request.parameters, request.configuration));
            }

            let parameters = request.parameters.or(self.connection_parameters(Some(name))?);
            let configuration = request
                .configuration
                .or_else(|| self.inventory().map(|inventory| inventory.config()));
            Ok((parameters, configuration))
        })
    }

    /// Close the connection named `name`
    ///
    /// # Errors
    /// - [`InventoryError::ConnectionNotOpen`]
    /// - [`InventoryError::CloseFailed`]; the handle is discarded anyway
    pub fn close_connection(&self, name: &str) -> InventoryResult<()> {
        self.connections.lock().close(name)
    }

    /// Close every open connection, attempting all of them
    ///
    /// # Errors
    /// [`InventoryError::CloseFailed`] listing every failed close.
    pub fn close_connections(&self) -> InventoryResult<()> {
        self.connections.lock().close_all()
    }

    /// Backend-reported state of `name`
    ///
    /// # Errors
    /// [`InventoryError::ConnectionNotOpen`]
    pub fn connection_state(&self, name: &str) -> InventoryResult<Value> {
        self.connections.lock().state(name)
    }

    pub fn is_connected(&self, name: &str) -> bool {
        self.connections.lock().is_open(name)
    }

    /// Names of the open connections
    pub fn open_connections(&self) -> Vec<String> {
        self.connections.lock().names()
    }
}

impl AttributeContainer for Host {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Host: {}", self.name())
    }
}
