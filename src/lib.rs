// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network device inventory for the Composable Information Machine
//!
//! Models managed devices ([`Host`]), the groups they inherit settings from
//! ([`Group`]) and inventory-wide defaults, and resolves the effective value
//! of any attribute through that hierarchy. Each host also owns its live
//! connection handles, opened through pluggable backends registered in a
//! [`PluginRegistry`].
//!
//! # Modules
//!
//! - [`domain`] - Hosts, groups and attribute resolution
//! - [`inventory`] - Construction, group wiring and filtering
//! - [`connections`] - Backend plugins and per-host connection registries
//! - [`state_machine`] - Connection lifecycle state machine
//! - [`config`] - Settings handed to backends
//! - [`errors`] - Error types
//!
//! # Example
//!
//! ```rust
//! use cim_inventory::{AttributeContainer, Inventory};
//! use serde_json::json;
//!
//! let inventory = Inventory::builder()
//!     .host("h1", json!({"ip": "1.2.3.4", "groups": ["bma"]}))
//!     .group("bma", json!({"site": "bma"}))
//!     .default_value("domain", "acme.com")
//!     .build()?;
//!
//! let h1 = inventory.host("h1").unwrap();
//! assert_eq!(h1.resolve("site")?, json!("bma"));
//! assert_eq!(h1.resolve("domain")?, json!("acme.com"));
//! assert!(h1.resolve("nope").is_err());
//! # Ok::<(), cim_inventory::InventoryError>(())
//! ```

pub mod config;
pub mod connections;
pub mod domain;
pub mod errors;
pub mod inventory;
pub mod state_machine;

// Re-export commonly used types
pub use config::Config;
pub use connections::{
    Connection, ConnectionOptions, ConnectionParameters, ConnectionPlugin, ConnectionRef,
    OpenConnection, PluginRegistry,
};
pub use domain::{AttributeContainer, Data, Defaults, Group, Host, ParentGroup};
pub use errors::{InventoryError, InventoryResult, PluginError};
pub use inventory::{Filter, Inventory, InventoryBuilder, RawInventory};
