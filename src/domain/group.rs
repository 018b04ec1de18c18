// Copyright (c) 2025 - Cowboy AI, Inc.
//! Group Entity
//!
//! A reusable bundle of attributes that hosts and other groups inherit from.
//! Groups do not carry inventory defaults; those apply to hosts only.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::attributes::{AttributeContainer, Attributes, ParentGroup};
use super::defaults::Defaults;
use super::host::Host;
use super::value::Data;
use crate::errors::{InventoryError, InventoryResult};

/// Named group of hosts
pub struct Group {
    attributes: Attributes,
}

impl Group {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attributes: Attributes::new(name, Defaults::default()),
        }
    }

    /// Create a group from raw data
    ///
    /// # Errors
    /// [`InventoryError::InvalidGroupSpec`] when the `groups` field is not a
    /// list of group names.
    pub fn from_data(name: impl Into<String>, data: Data) -> InventoryResult<Self> {
        let name = name.into();
        let attributes = Attributes::from_data(name.clone(), data, Defaults::default())
            .map_err(|reason| InventoryError::InvalidGroupSpec {
                group: name,
                reason,
            })?;
        Ok(Self { attributes })
    }

    /// Replace the parent groups
    pub fn with_groups(self, groups: Vec<ParentGroup>) -> Self {
        self.attributes.set_parent_groups(groups);
        self
    }

    /// Hosts of the owning inventory that belong to this group, directly or
    /// through a parent group
    ///
    /// Empty when the group is not bound to a live inventory.
    pub fn children(&self) -> IndexMap<String, Arc<Host>> {
        self.inventory()
            .map(|inventory| inventory.children(self))
            .unwrap_or_default()
    }
}

impl AttributeContainer for Group {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group: {}", self.name())
    }
}
