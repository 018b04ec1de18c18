// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection plugin registry.

use std::fmt;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use super::ConnectionPlugin;
use crate::errors::{InventoryError, InventoryResult};

/// Builds a fresh, unopened backend
pub type PluginFactory = Arc<dyn Fn() -> Box<dyn ConnectionPlugin> + Send + Sync>;

static GLOBAL: LazyLock<Arc<PluginRegistry>> = LazyLock::new(|| Arc::new(PluginRegistry::new()));

/// Registry mapping plugin names to backend factories.
///
/// # For Backend Authors
///
/// Register the backend once at startup, usually against
/// [`PluginRegistry::global`]:
///
/// ```
/// # use cim_inventory::config::Config;
/// # use cim_inventory::connections::{ConnectionParameters, ConnectionPlugin, PluginRegistry};
/// # use cim_inventory::errors::PluginError;
/// # use serde_json::Value;
/// #[derive(Default)]
/// struct Netconf;
///
/// # impl ConnectionPlugin for Netconf {
/// #     fn open(&mut self, _: &ConnectionParameters, _: Option<&Config>) -> Result<(), PluginError> { Ok(()) }
/// #     fn close(&mut self) -> Result<(), PluginError> { Ok(()) }
/// #     fn state(&self) -> Value { Value::Null }
/// # }
/// let registry = PluginRegistry::new();
/// registry.register("netconf", Netconf::default).unwrap();
///
/// assert!(registry.contains("netconf"));
/// assert!(registry.register("netconf", Netconf::default).is_err());
/// ```
///
/// # For Consumers
///
/// Hosts resolve the plugin when a connection is opened; an unregistered
/// name fails with [`InventoryError::UnknownConnectionPlugin`].
#[derive(Default)]
pub struct PluginRegistry {
    factories: RwLock<IndexMap<String, PluginFactory>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by hosts built without an explicit one.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Registers a backend factory.
    ///
    /// # Errors
    ///
    /// [`InventoryError::PluginAlreadyRegistered`] if the name is taken.
    pub fn register<F, P>(&self, name: impl Into<String>, factory: F) -> InventoryResult<()>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: ConnectionPlugin,
    {
        let name = name.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            return Err(InventoryError::PluginAlreadyRegistered(name));
        }

        debug!("Registered connection plugin: {}", name);
        factories.insert(
            name,
            Arc::new(move || Box::new(factory()) as Box<dyn ConnectionPlugin>),
        );
        Ok(())
    }

    /// Removes a backend factory.
    ///
    /// # Errors
    ///
    /// [`InventoryError::UnknownConnectionPlugin`] if nothing is registered
    /// under `name`.
    pub fn deregister(&self, name: &str) -> InventoryResult<()> {
        self.factories
            .write()
            .shift_remove(name)
            .map(|_| debug!("Deregistered connection plugin: {}", name))
            .ok_or_else(|| InventoryError::UnknownConnectionPlugin(name.to_string()))
    }

    /// Removes every backend factory.
    pub fn deregister_all(&self) {
        self.factories.write().clear();
    }

    /// Returns the factory registered under `name`.
    ///
    /// # Errors
    ///
    /// [`InventoryError::UnknownConnectionPlugin`] if nothing is registered.
    pub fn lookup(&self, name: &str) -> InventoryResult<PluginFactory> {
        self.factories
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| InventoryError::UnknownConnectionPlugin(name.to_string()))
    }

    /// Checks if a plugin is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Lists registered plugin names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }
}
