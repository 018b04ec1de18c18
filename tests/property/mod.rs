// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Attribute resolution precedence and inventory filtering, checked against
//! randomly generated inventories.

mod filter_properties;
mod resolution_properties;
