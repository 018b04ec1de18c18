// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-inventory
//!
//! Sample inventories and a recording connection backend. Every test builds
//! its own [`PluginRegistry`] so no state leaks through the global one.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use parking_lot::Mutex;
use serde_json::{json, Value};

use cim_inventory::config::Config;
use cim_inventory::connections::{ConnectionParameters, ConnectionPlugin, PluginRegistry};
use cim_inventory::errors::PluginError;
use cim_inventory::inventory::{Inventory, InventoryBuilder};

static TRACING: Once = Once::new();

/// Install a test subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Call observed by a [`MockPlugin`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open {
        parameters: ConnectionParameters,
        config: Option<Config>,
    },
    Close,
}

/// Shared log of backend calls
pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Backend that records calls instead of touching the network
#[derive(Debug, Default)]
pub struct MockPlugin {
    pub log: CallLog,
    pub fail_open: bool,
    pub fail_close: bool,
    pub open: bool,
}

impl ConnectionPlugin for MockPlugin {
    fn open(
        &mut self,
        parameters: &ConnectionParameters,
        configuration: Option<&Config>,
    ) -> Result<(), PluginError> {
        self.log.lock().push(Call::Open {
            parameters: parameters.clone(),
            config: configuration.cloned(),
        });
        if self.fail_open {
            return Err("connection refused".into());
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PluginError> {
        self.log.lock().push(Call::Close);
        self.open = false;
        if self.fail_close {
            return Err("broken pipe".into());
        }
        Ok(())
    }

    fn state(&self) -> Value {
        json!({ "open": self.open })
    }
}

/// Private registry with `mock`, `refusing` and `sticky` backends sharing
/// one call log
pub fn mock_plugins() -> (Arc<PluginRegistry>, CallLog) {
    let log = CallLog::default();
    let plugins = PluginRegistry::new();

    let shared = Arc::clone(&log);
    plugins
        .register("mock", move || MockPlugin {
            log: Arc::clone(&shared),
            ..Default::default()
        })
        .expect("fresh registry");

    let shared = Arc::clone(&log);
    plugins
        .register("refusing", move || MockPlugin {
            log: Arc::clone(&shared),
            fail_open: true,
            ..Default::default()
        })
        .expect("fresh registry");

    let shared = Arc::clone(&log);
    plugins
        .register("sticky", move || MockPlugin {
            log: Arc::clone(&shared),
            fail_close: true,
            ..Default::default()
        })
        .expect("fresh registry");

    (Arc::new(plugins), log)
}

/// The documented h1/bma/acme.com layout
pub fn acme_builder() -> InventoryBuilder {
    Inventory::builder()
        .host("h1", json!({"ip": "1.2.3.4", "groups": ["bma"]}))
        .group("bma", json!({"site": "bma"}))
        .default_value("domain", "acme.com")
}

/// Three sites, a nested group and a host without groups
pub fn sites_builder() -> InventoryBuilder {
    Inventory::builder()
        .host("h1", json!({"groups": ["bma"], "role": "edge"}))
        .host("h2", json!({"groups": ["cmh"], "role": "core"}))
        .host("h3", json!({"groups": ["bma-edge"]}))
        .host("h4", json!({"site": "lab"}))
        .group("global", json!({"ntp": "10.0.0.1", "platform": "eos"}))
        .group("bma", json!({"site": "bma", "groups": ["global"]}))
        .group("cmh", json!({"site": "cmh", "groups": ["global"]}))
        .group("bma-edge", json!({"groups": ["bma"], "role": "edge"}))
        .default_value("domain", "acme.com")
        .default_value("username", "automation")
}

pub fn sites() -> Arc<Inventory> {
    sites_builder().build().expect("valid fixture inventory")
}
