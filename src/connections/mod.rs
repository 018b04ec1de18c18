// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection Management
//!
//! Each host keeps at most one open handle per connection name. Handles are
//! opened through pluggable backends looked up by name in a
//! [`PluginRegistry`]; the backend does the actual network work and this
//! layer enforces the lifecycle around it.
//!
//! # Architecture
//!
//! ```text
//! Host::get_connection("netconf")
//!     ↓
//! ConnectionRegistry (per host)  ── lifecycle FSM: Absent ⇄ Open
//!     ↓
//! PluginRegistry::lookup("netconf") → factory
//!     ↓
//! ConnectionPlugin::open(parameters, configuration)
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_inventory::config::Config;
//! use cim_inventory::connections::{ConnectionParameters, ConnectionPlugin};
//! use cim_inventory::errors::PluginError;
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Telnet {
//!     target: Option<String>,
//! }
//!
//! impl ConnectionPlugin for Telnet {
//!     fn open(
//!         &mut self,
//!         parameters: &ConnectionParameters,
//!         _configuration: Option<&Config>,
//!     ) -> Result<(), PluginError> {
//!         self.target = parameters.hostname.clone();
//!         Ok(())
//!     }
//!
//!     fn close(&mut self) -> Result<(), PluginError> {
//!         self.target = None;
//!         Ok(())
//!     }
//!
//!     fn state(&self) -> Value {
//!         json!({ "target": self.target })
//!     }
//! }
//! ```

pub mod parameters;
pub mod plugins;
pub mod registry;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::PluginError;

pub use parameters::{ConnectionOptions, ConnectionParameters, OpenConnection};
pub use plugins::{PluginFactory, PluginRegistry};
pub use registry::ConnectionRegistry;

/// Type-erased access to a backend's concrete type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Contract every connection backend implements
///
/// A backend instance is created per handle by its registered factory,
/// opened once, and closed once.
///
/// `open` and `close` run while the owning host's connection registry is
/// locked. A backend must not call the connection methods of that host
/// (`is_connected`, `connection_state`, `get_connection`, ...) from inside
/// them; doing so deadlocks.
pub trait ConnectionPlugin: AsAny + Send {
    /// Establish the connection
    fn open(
        &mut self,
        parameters: &ConnectionParameters,
        configuration: Option<&Config>,
    ) -> Result<(), PluginError>;

    /// Tear the connection down
    fn close(&mut self) -> Result<(), PluginError>;

    /// Backend-reported state; opaque to the inventory
    fn state(&self) -> Value;
}

/// Live handle for one (host, connection-name) pair
pub struct Connection {
    name: String,
    plugin: String,
    id: Uuid,
    opened_at: DateTime<Utc>,
    backend: Box<dyn ConnectionPlugin>,
}

/// Shared reference to an open connection
pub type ConnectionRef = Arc<Mutex<Connection>>;

impl Connection {
    pub(crate) fn new(
        name: impl Into<String>,
        plugin: impl Into<String>,
        backend: Box<dyn ConnectionPlugin>,
    ) -> Self {
        Self {
            name: name.into(),
            plugin: plugin.into(),
            id: Uuid::now_v7(),
            opened_at: Utc::now(),
            backend,
        }
    }

    /// Connection name the handle is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plugin that produced the backend
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Time-ordered handle identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Backend-reported state
    pub fn state(&self) -> Value {
        self.backend.state()
    }

    pub fn backend(&self) -> &dyn ConnectionPlugin {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn ConnectionPlugin {
        self.backend.as_mut()
    }

    /// Concrete backend, if it is a `T`
    pub fn downcast_ref<T: ConnectionPlugin>(&self) -> Option<&T> {
        let backend: &dyn ConnectionPlugin = self.backend.as_ref();
        backend.as_any().downcast_ref::<T>()
    }

    /// Concrete backend, mutably, if it is a `T`
    pub fn downcast_mut<T: ConnectionPlugin>(&mut self) -> Option<&mut T> {
        let backend: &mut dyn ConnectionPlugin = self.backend.as_mut();
        backend.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn close(&mut self) -> Result<(), PluginError> {
        self.backend.close()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("plugin", &self.plugin)
            .field("id", &self.id)
            .field("opened_at", &self.opened_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Loopback {
        opened: bool,
    }

    impl ConnectionPlugin for Loopback {
        fn open(&mut self, _: &ConnectionParameters, _: Option<&Config>) -> Result<(), PluginError> {
            self.opened = true;
            Ok(())
        }

        fn close(&mut self) -> Result<(), PluginError> {
            self.opened = false;
            Ok(())
        }

        fn state(&self) -> Value {
            json!({ "opened": self.opened })
        }
    }

    struct Other;

    impl ConnectionPlugin for Other {
        fn open(&mut self, _: &ConnectionParameters, _: Option<&Config>) -> Result<(), PluginError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), PluginError> {
            Ok(())
        }

        fn state(&self) -> Value {
            Value::Null
        }
    }

    #[test]
    fn test_downcast_to_concrete_backend() {
        let mut connection = Connection::new("loop", "loop", Box::new(Loopback { opened: true }));

        assert!(connection.downcast_ref::<Loopback>().is_some());
        assert!(connection.downcast_ref::<Other>().is_none());

        connection.downcast_mut::<Loopback>().unwrap().opened = false;
        assert_eq!(connection.state(), json!({ "opened": false }));
    }

    #[test]
    fn test_handle_ids_are_unique() {
        let a = Connection::new("a", "a", Box::new(Other));
        let b = Connection::new("b", "b", Box::new(Other));
        assert_ne!(a.id(), b.id());
    }
}
