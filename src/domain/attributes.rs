// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attribute Containers
//!
//! Hosts and groups share one shape: a name, an own-data mapping, an ordered
//! list of parent groups and a defaults mapping. [`AttributeContainer`] gives
//! both of them the same dict-like read access and typed accessors, built on
//! the resolver in [`super::resolution`].
//!
//! # Resolution Order
//!
//! ```text
//! own data → parent groups (declared order, depth-first) → defaults
//! ```
//!
//! The first match wins; later sources never override earlier ones.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::warn;

use super::defaults::Defaults;
use super::group::Group;
use super::resolution;
use super::value::{self, Data};
use crate::errors::{InventoryError, InventoryResult};
use crate::inventory::Inventory;

/// Own-data key holding the entity name
pub const NAME_KEY: &str = "name";

/// Own-data key holding the declared group names
pub const GROUPS_KEY: &str = "groups";

/// Environment variables consulted, in order, for the current user
const USER_VARIABLES: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

/// Reference to a parent group
///
/// Entities built from raw data start out with [`ParentGroup::Name`]
/// references; the inventory replaces them with [`ParentGroup::Resolved`]
/// references to the live group objects when it is constructed.
#[derive(Clone)]
pub enum ParentGroup {
    /// Not yet resolved against a group table
    Name(String),
    /// Live group object
    Resolved(Arc<Group>),
}

impl ParentGroup {
    /// Name of the referenced group
    pub fn name(&self) -> &str {
        match self {
            ParentGroup::Name(name) => name,
            ParentGroup::Resolved(group) => group.name(),
        }
    }

    /// The live group, if resolved
    pub fn group(&self) -> Option<&Arc<Group>> {
        match self {
            ParentGroup::Name(_) => None,
            ParentGroup::Resolved(group) => Some(group),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ParentGroup::Resolved(_))
    }
}

impl fmt::Debug for ParentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentGroup::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ParentGroup::Resolved(group) => f.debug_tuple("Resolved").field(&group.name()).finish(),
        }
    }
}

impl From<&str> for ParentGroup {
    fn from(name: &str) -> Self {
        ParentGroup::Name(name.to_string())
    }
}

impl From<String> for ParentGroup {
    fn from(name: String) -> Self {
        ParentGroup::Name(name)
    }
}

impl From<Arc<Group>> for ParentGroup {
    fn from(group: Arc<Group>) -> Self {
        ParentGroup::Resolved(group)
    }
}

impl From<&Arc<Group>> for ParentGroup {
    fn from(group: &Arc<Group>) -> Self {
        ParentGroup::Resolved(Arc::clone(group))
    }
}

/// Group to search for in a parent-group closure
///
/// Names compare by name; group references compare by identity.
#[derive(Debug, Clone, Copy)]
pub enum GroupQuery<'a> {
    Name(&'a str),
    Group(&'a Group),
}

impl GroupQuery<'_> {
    pub(crate) fn matches(&self, parent: &ParentGroup) -> bool {
        match (self, parent) {
            (GroupQuery::Name(name), parent) => parent.name() == *name,
            (GroupQuery::Group(wanted), ParentGroup::Resolved(group)) => {
                std::ptr::eq(*wanted, Arc::as_ptr(group))
            }
            (GroupQuery::Group(_), ParentGroup::Name(_)) => false,
        }
    }
}

impl<'a> From<&'a str> for GroupQuery<'a> {
    fn from(name: &'a str) -> Self {
        GroupQuery::Name(name)
    }
}

impl<'a> From<&'a String> for GroupQuery<'a> {
    fn from(name: &'a String) -> Self {
        GroupQuery::Name(name)
    }
}

impl<'a> From<&'a Group> for GroupQuery<'a> {
    fn from(group: &'a Group) -> Self {
        GroupQuery::Group(group)
    }
}

impl<'a> From<&'a Arc<Group>> for GroupQuery<'a> {
    fn from(group: &'a Arc<Group>) -> Self {
        GroupQuery::Group(group)
    }
}

/// State shared by hosts and groups
pub struct Attributes {
    name: String,
    data: RwLock<Data>,
    groups: RwLock<Vec<ParentGroup>>,
    defaults: Defaults,
    inventory: OnceLock<Weak<Inventory>>,
}

impl Attributes {
    /// Create attributes with only the name set
    pub(crate) fn new(name: impl Into<String>, defaults: Defaults) -> Self {
        let name = name.into();
        let mut data = Data::new();
        data.insert(NAME_KEY.to_string(), Value::String(name.clone()));

        Self {
            name,
            data: RwLock::new(data),
            groups: RwLock::new(Vec::new()),
            defaults,
            inventory: OnceLock::new(),
        }
    }

    /// Create attributes from a raw data mapping
    ///
    /// A `groups` field becomes the list of unresolved parent references.
    /// A `name` field that disagrees with `name` is replaced.
    ///
    /// # Errors
    /// Returns the reason when the `groups` field is not a list of names.
    pub(crate) fn from_data(
        name: impl Into<String>,
        mut raw: Data,
        defaults: Defaults,
    ) -> Result<Self, String> {
        let attributes = Self::new(name, defaults);

        if let Some(declared) = raw.shift_remove(NAME_KEY) {
            if declared.as_str() != Some(attributes.name.as_str()) {
                warn!(
                    "Discarding name {} declared in data of '{}'",
                    declared, attributes.name
                );
            }
        }

        let parents = match raw.shift_remove(GROUPS_KEY) {
            Some(groups) => value::group_names(&groups)?,
            None => Vec::new(),
        };
        attributes.set_parent_groups(parents.into_iter().map(ParentGroup::Name).collect());

        attributes.data.write().extend(raw);
        Ok(attributes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub(crate) fn replace_defaults(&mut self, defaults: Defaults) {
        self.defaults = defaults;
    }

    /// Replace the parent-group list, mirroring the names into own data
    pub(crate) fn set_parent_groups(&self, parents: Vec<ParentGroup>) {
        {
            let mut data = self.data.write();
            if parents.is_empty() {
                data.shift_remove(GROUPS_KEY);
            } else {
                let names = parents
                    .iter()
                    .map(|p| Value::String(p.name().to_string()))
                    .collect();
                data.insert(GROUPS_KEY.to_string(), Value::Array(names));
            }
        }
        *self.groups.write() = parents;
    }

    /// Declared parent references, in order
    pub fn parent_groups(&self) -> Vec<ParentGroup> {
        self.groups.read().clone()
    }

    /// Live parent groups, in order; unresolved names are skipped
    pub(crate) fn resolved_parents(&self) -> Vec<Arc<Group>> {
        self.groups
            .read()
            .iter()
            .filter_map(|parent| parent.group().cloned())
            .collect()
    }

    /// Swap every name reference for the group of that name in `table`
    ///
    /// Resolved references pass through unchanged.
    pub(crate) fn resolve_parents(
        &self,
        table: &IndexMap<String, Arc<Group>>,
    ) -> InventoryResult<()> {
        let mut groups = self.groups.write();
        let resolved = groups
            .iter()
            .map(|parent| match parent {
                ParentGroup::Resolved(_) => Ok(parent.clone()),
                ParentGroup::Name(name) => table
                    .get(name)
                    .map(|group| ParentGroup::Resolved(Arc::clone(group)))
                    .ok_or_else(|| InventoryError::UnknownGroup {
                        group: name.clone(),
                        referenced_by: self.name.clone(),
                    }),
            })
            .collect::<InventoryResult<Vec<_>>>()?;
        *groups = resolved;
        Ok(())
    }

    /// Own-data value, without falling back to groups or defaults
    pub(crate) fn own(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    pub(crate) fn data(&self) -> Data {
        self.data.read().clone()
    }

    pub(crate) fn insert(&self, key: String, value: Value) -> InventoryResult<Option<Value>> {
        if key == NAME_KEY {
            return Err(InventoryError::ReservedAttribute(key));
        }
        Ok(self.data.write().insert(key, value))
    }

    pub(crate) fn remove(&self, key: &str) -> InventoryResult<Option<Value>> {
        if key == NAME_KEY {
            return Err(InventoryError::ReservedAttribute(key.to_string()));
        }
        Ok(self.data.write().shift_remove(key))
    }

    /// Record the owning inventory; only the first call has an effect
    pub(crate) fn bind_inventory(&self, inventory: Weak<Inventory>) {
        let _ = self.inventory.set(inventory);
    }

    /// Whether an inventory has taken ownership of this entity
    pub(crate) fn is_bound(&self) -> bool {
        self.inventory.get().is_some()
    }

    pub(crate) fn inventory(&self) -> Option<Arc<Inventory>> {
        self.inventory.get().and_then(Weak::upgrade)
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("name", &self.name)
            .field("data", &*self.data.read())
            .field("groups", &*self.groups.read())
            .finish_non_exhaustive()
    }
}

/// Dict-like access to a host's or group's effective attributes
pub trait AttributeContainer {
    /// Underlying attribute state
    fn attributes(&self) -> &Attributes;

    fn name(&self) -> &str {
        self.attributes().name()
    }

    /// Effective value of `key`
    ///
    /// # Errors
    /// [`InventoryError::AttributeNotFound`] when no source provides `key`.
    fn resolve(&self, key: &str) -> InventoryResult<Value> {
        resolution::lookup(self.attributes(), key).ok_or_else(|| {
            InventoryError::AttributeNotFound {
                entity: self.name().to_string(),
                key: key.to_string(),
            }
        })
    }

    /// Effective value of `key`, if any
    fn get(&self, key: &str) -> Option<Value> {
        resolution::lookup(self.attributes(), key)
    }

    /// Effective value of `key`, or `fallback`
    fn get_or(&self, key: &str, fallback: Value) -> Value {
        self.get(key).unwrap_or(fallback)
    }

    /// Whether any source provides `key`
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All effective attributes, own data first
    fn items(&self) -> Data {
        resolution::flatten(self.attributes())
    }

    fn keys(&self) -> Vec<String> {
        self.items().into_iter().map(|(k, _)| k).collect()
    }

    fn values(&self) -> Vec<Value> {
        self.items().into_iter().map(|(_, v)| v).collect()
    }

    /// Number of effective attributes
    fn len(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the entity's own data only
    fn data(&self) -> Data {
        self.attributes().data()
    }

    /// Write into own data
    ///
    /// # Errors
    /// [`InventoryError::ReservedAttribute`] for the `name` key.
    fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> InventoryResult<Option<Value>>
    where
        Self: Sized,
    {
        self.attributes().insert(key.into(), value.into())
    }

    /// Remove from own data
    ///
    /// # Errors
    /// [`InventoryError::ReservedAttribute`] for the `name` key.
    fn remove(&self, key: &str) -> InventoryResult<Option<Value>> {
        self.attributes().remove(key)
    }

    /// Declared parent references, in order
    fn parent_groups(&self) -> Vec<ParentGroup> {
        self.attributes().parent_groups()
    }

    /// Whether `group` appears anywhere in the parent-group closure
    fn has_parent_group<'a>(&self, group: impl Into<GroupQuery<'a>>) -> bool
    where
        Self: Sized,
    {
        resolution::has_parent(self.attributes(), &group.into())
    }

    /// Inventory-wide defaults seen by this entity
    fn defaults(&self) -> &Defaults {
        self.attributes().defaults()
    }

    /// Owning inventory, if still alive
    fn inventory(&self) -> Option<Arc<Inventory>> {
        self.attributes().inventory()
    }

    /// Address used to connect; falls back to the entity name
    fn hostname(&self) -> String {
        set_value(self.get("hostname"))
            .map_or_else(|| self.name().to_string(), value::as_text)
    }

    /// Login user; falls back to the user running the process
    fn username(&self) -> String {
        set_value(self.get("username"))
            .map_or_else(system_username, value::as_text)
    }

    /// Login password; empty when unset
    fn password(&self) -> String {
        set_value(self.get("password")).map(value::as_text).unwrap_or_default()
    }

    fn port(&self) -> Option<u16> {
        set_value(self.get("port")).as_ref().and_then(value::as_port)
    }

    /// Device operating system, e.g. `"eos"` or `"junos"`
    fn platform(&self) -> Option<String> {
        set_value(self.get("platform")).map(value::as_text)
    }

    fn set_hostname(&self, hostname: impl Into<String>)
    where
        Self: Sized,
    {
        self.attributes()
            .data
            .write()
            .insert("hostname".to_string(), Value::String(hostname.into()));
    }

    fn set_username(&self, username: impl Into<String>)
    where
        Self: Sized,
    {
        self.attributes()
            .data
            .write()
            .insert("username".to_string(), Value::String(username.into()));
    }

    fn set_password(&self, password: impl Into<String>)
    where
        Self: Sized,
    {
        self.attributes()
            .data
            .write()
            .insert("password".to_string(), Value::String(password.into()));
    }

    fn set_port(&self, port: u16) {
        self.attributes()
            .data
            .write()
            .insert("port".to_string(), Value::from(port));
    }

    fn set_platform(&self, platform: impl Into<String>)
    where
        Self: Sized,
    {
        self.attributes()
            .data
            .write()
            .insert("platform".to_string(), Value::String(platform.into()));
    }
}

/// `null` counts as unset for the typed accessors
fn set_value(value: Option<Value>) -> Option<Value> {
    value.filter(|value| !value.is_null())
}

/// User running the process, read from the environment
///
/// Empty when none of `LOGNAME`, `USER`, `LNAME` or `USERNAME` is set.
pub fn system_username() -> String {
    username_from(|var| std::env::var(var).ok())
}

fn username_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    USER_VARIABLES
        .iter()
        .find_map(|var| lookup(var).filter(|user| !user.is_empty()))
        .unwrap_or_default()
}
