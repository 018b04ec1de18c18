// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Builder
//!
//! Collects raw host and group entries and wires them into an
//! [`Inventory`] in one pass:
//!
//! ```text
//! groups ─▶ validate graph ─▶ resolve group parents
//!                                   │
//! hosts ──▶ build ─▶ transform ─▶ resolve host groups ─▶ bind back references
//! ```
//!
//! Entry order never affects the result.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::invariants::validate_group_graph;
use super::raw::{GroupEntry, HostEntry, RawInventory};
use super::Inventory;
use crate::config::Config;
use crate::connections::PluginRegistry;
use crate::domain::{value, AttributeContainer, Data, Defaults, Group, Host};
use crate::errors::{InventoryError, InventoryResult};

type Transform = Box<dyn Fn(&Host) + Send + Sync>;

/// Builder for [`Inventory`]
#[derive(Default)]
pub struct InventoryBuilder {
    hosts: IndexMap<String, HostEntry>,
    groups: IndexMap<String, GroupEntry>,
    defaults: Data,
    config: Option<Arc<Config>>,
    plugins: Option<Arc<PluginRegistry>>,
    transform: Option<Transform>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a deserialised description
    pub fn from_raw(raw: RawInventory) -> Self {
        Self {
            hosts: raw
                .hosts
                .into_iter()
                .map(|(name, data)| (name, HostEntry::Data(data)))
                .collect(),
            groups: raw
                .groups
                .into_iter()
                .map(|(name, data)| (name, GroupEntry::Data(data)))
                .collect(),
            defaults: raw.defaults,
            ..Self::default()
        }
    }

    /// Add or replace a host entry
    pub fn host(mut self, name: impl Into<String>, entry: impl Into<HostEntry>) -> Self {
        self.hosts.insert(name.into(), entry.into());
        self
    }

    /// Add or replace a group entry
    pub fn group(mut self, name: impl Into<String>, entry: impl Into<GroupEntry>) -> Self {
        self.groups.insert(name.into(), entry.into());
        self
    }

    pub fn defaults(mut self, defaults: Data) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set a single default
    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn config(mut self, config: impl Into<Arc<Config>>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Resolve connection backends from `plugins` instead of the global
    /// registry
    pub fn plugins(mut self, plugins: Arc<PluginRegistry>) -> Self {
        self.plugins = Some(plugins);
        self
    }

    /// Run `transform` on every host after it is built, before its groups
    /// are resolved
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Host) + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Build the inventory
    ///
    /// # Errors
    /// - [`InventoryError::InvalidGroupSpec`] for a group entry that is not a
    ///   mapping, null or group object
    /// - [`InventoryError::InvalidHostSpec`] for such a host entry
    /// - [`InventoryError::UnknownGroup`] for a reference to a missing group
    /// - [`InventoryError::GroupCycle`] when groups inherit from themselves
    pub fn build(self) -> InventoryResult<Arc<Inventory>> {
        let groups = build_groups(self.groups)?;
        validate_group_graph(&groups)?;
        for group in groups.values() {
            group.attributes().resolve_parents(&groups)?;
        }

        let defaults = Defaults::new(self.defaults);
        let plugins = self.plugins.unwrap_or_else(PluginRegistry::global);

        let mut hosts = IndexMap::with_capacity(self.hosts.len());
        for (name, entry) in self.hosts {
            let host = build_host(&name, entry, &defaults, &plugins)?;
            if let Some(transform) = &self.transform {
                transform(&host);
            }
            host.attributes().resolve_parents(&groups)?;
            hosts.insert(name, Arc::new(host));
        }

        debug!(
            "Built inventory with {} hosts and {} groups",
            hosts.len(),
            groups.len()
        );

        let inventory = Arc::new(Inventory {
            hosts,
            groups,
            defaults,
            config: self.config.unwrap_or_default(),
            plugins,
        });
        inventory.bind();
        Ok(inventory)
    }
}

fn build_groups(entries: IndexMap<String, GroupEntry>) -> InventoryResult<IndexMap<String, Arc<Group>>> {
    entries
        .into_iter()
        .map(|(name, entry)| {
            let group = match entry {
                GroupEntry::Built(group) => group,
                GroupEntry::Data(Value::Null) => Arc::new(Group::new(name.as_str())),
                GroupEntry::Data(Value::Object(data)) => Arc::new(Group::from_data(name.as_str(), data)?),
                GroupEntry::Data(other) => {
                    return Err(InventoryError::InvalidGroupSpec {
                        group: name,
                        reason: format!("expected a mapping or null, got {}", value::kind(&other)),
                    })
                }
            };
            Ok((name, group))
        })
        .collect()
}

fn build_host(
    name: &str,
    entry: HostEntry,
    defaults: &Defaults,
    plugins: &Arc<PluginRegistry>,
) -> InventoryResult<Host> {
    let host = match entry {
        HostEntry::Built(host) => host,
        HostEntry::Data(Value::Null) => Host::new(name),
        HostEntry::Data(Value::Object(data)) => Host::from_data(name, data)?,
        HostEntry::Data(other) => {
            return Err(InventoryError::InvalidHostSpec {
                host: name.to_string(),
                reason: format!("expected a mapping or null, got {}", value::kind(&other)),
            })
        }
    };

    Ok(host
        .with_defaults(defaults.clone())
        .with_plugins(Arc::clone(plugins)))
}

impl fmt::Debug for InventoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryBuilder")
            .field("hosts", &self.hosts.keys().collect::<Vec<_>>())
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .field("transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}
