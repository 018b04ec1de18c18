// Copyright (c) 2025 - Cowboy AI, Inc.
//! Group Graph Invariants
//!
//! Checks run on the group table before any parent reference is wired:
//!
//! 1. every referenced group name exists in the table
//! 2. the parent graph is acyclic
//!
//! Wiring a cycle would leave groups owning each other through `Arc`, so
//! both checks walk the declared references instead of the resolved ones.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::domain::{AttributeContainer, Group, ParentGroup};
use crate::errors::{InventoryError, InventoryResult};

/// Validate the parent graph of every group in `table`
///
/// # Errors
/// - [`InventoryError::UnknownGroup`] for a name missing from `table`
/// - [`InventoryError::GroupCycle`] with the offending path
pub(crate) fn validate_group_graph(table: &IndexMap<String, Arc<Group>>) -> InventoryResult<()> {
    let mut finished = HashSet::new();
    let mut path = Vec::new();

    for group in table.values() {
        visit(group, table, &mut path, &mut finished)?;
    }
    Ok(())
}

fn visit(
    group: &Arc<Group>,
    table: &IndexMap<String, Arc<Group>>,
    path: &mut Vec<Arc<Group>>,
    finished: &mut HashSet<*const Group>,
) -> InventoryResult<()> {
    if finished.contains(&Arc::as_ptr(group)) {
        return Ok(());
    }

    if let Some(start) = path.iter().position(|seen| Arc::ptr_eq(seen, group)) {
        let mut cycle: Vec<String> = path[start..]
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        cycle.push(group.name().to_string());
        return Err(InventoryError::GroupCycle { path: cycle });
    }

    path.push(Arc::clone(group));
    for parent in group.parent_groups() {
        let next = parent_in(&parent, group, table)?;
        visit(&next, table, path, finished)?;
    }
    path.pop();

    finished.insert(Arc::as_ptr(group));
    Ok(())
}

fn parent_in(
    parent: &ParentGroup,
    child: &Group,
    table: &IndexMap<String, Arc<Group>>,
) -> InventoryResult<Arc<Group>> {
    match parent {
        ParentGroup::Resolved(group) => Ok(Arc::clone(group)),
        ParentGroup::Name(name) => {
            table
                .get(name)
                .cloned()
                .ok_or_else(|| InventoryError::UnknownGroup {
                    group: name.clone(),
                    referenced_by: child.name().to_string(),
                })
        }
    }
}
