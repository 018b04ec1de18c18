// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify the resolution and filtering
//! properties that must hold for every inventory shape.

mod property;
