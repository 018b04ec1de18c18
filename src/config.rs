// Copyright (c) 2025 - Cowboy AI, Inc.
//! Process-wide configuration
//!
//! The inventory never interprets these settings itself; they are handed
//! unchanged to connection backends on every open.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Data;
use crate::errors::{InventoryError, InventoryResult};

const ENV_NUM_WORKERS: &str = "CIM_INVENTORY_NUM_WORKERS";
const ENV_RAISE_ON_ERROR: &str = "CIM_INVENTORY_RAISE_ON_ERROR";
const ENV_SSH_CONFIG_FILE: &str = "CIM_INVENTORY_SSH_CONFIG_FILE";

/// Configuration shared by every connection backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker count for the execution engine driving the inventory
    pub num_workers: usize,

    /// Whether the execution engine aborts on the first failed host
    pub raise_on_error: bool,

    /// OpenSSH client configuration consulted by SSH-based backends
    pub ssh_config_file: Option<PathBuf>,

    /// Any other settings, passed through untouched
    #[serde(flatten)]
    pub extra: Data,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: default_num_workers(),
            raise_on_error: false,
            ssh_config_file: None,
            extra: Data::new(),
        }
    }
}

fn default_num_workers() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads `CIM_INVENTORY_NUM_WORKERS`, `CIM_INVENTORY_RAISE_ON_ERROR` and
    /// `CIM_INVENTORY_SSH_CONFIG_FILE`; unset variables keep their defaults.
    ///
    /// # Errors
    /// [`InventoryError::Configuration`] when a variable cannot be parsed.
    pub fn from_env() -> InventoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> InventoryResult<Self> {
        let mut config = Self::default();

        if let Some(workers) = lookup(ENV_NUM_WORKERS) {
            config.num_workers = workers.trim().parse().map_err(|_| {
                InventoryError::Configuration(format!(
                    "{ENV_NUM_WORKERS} must be a positive integer, got '{workers}'"
                ))
            })?;
        }

        if let Some(flag) = lookup(ENV_RAISE_ON_ERROR) {
            config.raise_on_error = parse_flag(&flag).ok_or_else(|| {
                InventoryError::Configuration(format!(
                    "{ENV_RAISE_ON_ERROR} must be a boolean, got '{flag}'"
                ))
            })?;
        }

        if let Some(path) = lookup(ENV_SSH_CONFIG_FILE).filter(|p| !p.is_empty()) {
            config.ssh_config_file = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_raise_on_error(mut self, raise_on_error: bool) -> Self {
        self.raise_on_error = raise_on_error;
        self
    }

    pub fn with_ssh_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_config_file = Some(path.into());
        self
    }

    /// Set a pass-through setting
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
