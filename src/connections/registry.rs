// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-Host Connection Registry
//!
//! Holds the open handles of one host and drives every open and close
//! through the [`ConnectionState`] machine, so misuse is rejected before any
//! backend is touched.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{info, warn};

use super::{Connection, ConnectionParameters, ConnectionRef, PluginRegistry};
use crate::config::Config;
use crate::errors::{CloseFailure, InventoryError, InventoryResult};
use crate::state_machine::{ConnectionState, LifecycleCommand, StateMachine};

/// Open connections of a single host
pub struct ConnectionRegistry {
    host: String,
    plugins: Arc<PluginRegistry>,
    handles: IndexMap<String, ConnectionRef>,
}

impl ConnectionRegistry {
    /// Empty registry for `host`, resolving backends from `plugins`
    pub fn new(host: impl Into<String>, plugins: Arc<PluginRegistry>) -> Self {
        Self {
            host: host.into(),
            plugins,
            handles: IndexMap::new(),
        }
    }

    pub fn plugins(&self) -> &Arc<PluginRegistry> {
        &self.plugins
    }

    pub(crate) fn set_plugins(&mut self, plugins: Arc<PluginRegistry>) {
        self.plugins = plugins;
    }

    pub fn state_of(&self, name: &str) -> ConnectionState {
        ConnectionState::of(self.handles.contains_key(name))
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.state_of(name) == ConnectionState::Open
    }

    /// Names of the open connections, in opening order
    pub fn names(&self) -> Vec<String> {
        self.handles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Existing handle for `name`
    pub fn get(&self, name: &str) -> Option<ConnectionRef> {
        self.handles.get(name).cloned()
    }

    fn check(&self, name: &str, command: LifecycleCommand) -> InventoryResult<ConnectionState> {
        self.state_of(name)
            .transition(&command)
            .map(|(next, ())| next)
            .map_err(|_| match command {
                LifecycleCommand::Open => InventoryError::ConnectionAlreadyOpen {
                    host: self.host.clone(),
                    connection: name.to_string(),
                },
                LifecycleCommand::Close => InventoryError::ConnectionNotOpen {
                    host: self.host.clone(),
                    connection: name.to_string(),
                },
            })
    }

    /// Open `name` with the backend registered as `plugin`
    ///
    /// `parameters` is only evaluated once the state check and the plugin
    /// lookup have passed. On any failure the registry is left unchanged.
    ///
    /// # Errors
    /// - [`InventoryError::ConnectionAlreadyOpen`]
    /// - [`InventoryError::UnknownConnectionPlugin`]
    /// - whatever `parameters` returns
    /// - [`InventoryError::ConnectionFailed`] when the backend fails to open
    pub fn open<F>(&mut self, name: &str, plugin: &str, parameters: F) -> InventoryResult<ConnectionRef>
    where
        F: FnOnce() -> InventoryResult<(ConnectionParameters, Option<Arc<Config>>)>,
    {
        self.check(name, LifecycleCommand::Open)?;
        let factory = self.plugins.lookup(plugin)?;
        let (parameters, configuration) = parameters()?;

        let mut backend = factory();
        backend
            .open(&parameters, configuration.as_deref())
            .map_err(|source| InventoryError::ConnectionFailed {
                host: self.host.clone(),
                connection: name.to_string(),
                source,
            })?;

        let connection = Connection::new(name, plugin, backend);
        info!(
            "Opened connection {} on {} via {} ({})",
            name,
            self.host,
            plugin,
            connection.id()
        );

        let handle = Arc::new(Mutex::new(connection));
        self.handles.insert(name.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Close `name`
    ///
    /// The handle is discarded even when the backend reports an error.
    ///
    /// # Errors
    /// - [`InventoryError::ConnectionNotOpen`]
    /// - [`InventoryError::CloseFailed`] carrying the backend error
    pub fn close(&mut self, name: &str) -> InventoryResult<()> {
        self.check(name, LifecycleCommand::Close)?;
        let Some(handle) = self.handles.shift_remove(name) else {
            return Err(InventoryError::ConnectionNotOpen {
                host: self.host.clone(),
                connection: name.to_string(),
            });
        };

        let mut connection = handle.lock();
        match connection.close() {
            Ok(()) => {
                info!("Closed connection {} on {} ({})", name, self.host, connection.id());
                Ok(())
            }
            Err(source) => {
                warn!("Connection {} on {} did not close cleanly: {}", name, self.host, source);
                Err(InventoryError::CloseFailed {
                    failures: vec![CloseFailure {
                        host: self.host.clone(),
                        connection: name.to_string(),
                        source,
                    }],
                })
            }
        }
    }

    /// Close every open connection
    ///
    /// Every connection is attempted even when some fail; all failures are
    /// reported together.
    ///
    /// # Errors
    /// [`InventoryError::CloseFailed`] listing each backend that failed.
    pub fn close_all(&mut self) -> InventoryResult<()> {
        let mut failures = Vec::new();

        for name in self.names() {
            match self.close(&name) {
                Ok(()) => {}
                Err(InventoryError::CloseFailed { failures: failed }) => failures.extend(failed),
                Err(other) => warn!("Skipping {} on {}: {}", name, self.host, other),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(InventoryError::CloseFailed { failures })
        }
    }

    /// Backend-reported state of `name`
    ///
    /// # Errors
    /// [`InventoryError::ConnectionNotOpen`]
    pub fn state(&self, name: &str) -> InventoryResult<Value> {
        self.handles
            .get(name)
            .map(|handle| handle.lock().state())
            .ok_or_else(|| InventoryError::ConnectionNotOpen {
                host: self.host.clone(),
                connection: name.to_string(),
            })
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("host", &self.host)
            .field("open", &self.names())
            .finish()
    }
}
