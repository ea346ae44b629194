//! Integration tests for gridprobe
//!
//! These tests drive the engine through the public API only.

pub mod config_tests;
pub mod engine_tests;
pub mod worksheet_tests;
