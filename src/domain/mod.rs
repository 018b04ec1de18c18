// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Domain Models
//!
//! Hosts and groups, and the rule that decides the effective value of an
//! attribute for either of them.
//!
//! # Entities
//!
//! - [`Host`] - Managed device, owns its open connections
//! - [`Group`] - Reusable attribute bundle, may have parent groups
//!
//! Both implement [`AttributeContainer`].
//!
//! # Value Objects
//!
//! - [`Data`] - Ordered attribute mapping
//! - [`Defaults`] - Inventory-wide defaults, shared by handle
//! - [`ParentGroup`] - Group reference, by name or resolved
//!
//! # Relationships
//!
//! ```text
//! Host ──groups──▶ Group ──groups──▶ Group ...
//!   │
//!   └──defaults──▶ Defaults ◀── Inventory
//! ```

pub mod attributes;
pub mod defaults;
pub mod group;
pub mod host;
mod resolution;
pub mod value;

pub use attributes::{system_username, AttributeContainer, Attributes, GroupQuery, ParentGroup};
pub use defaults::Defaults;
pub use group::Group;
pub use host::Host;
pub use value::{is_truthy, Data};
