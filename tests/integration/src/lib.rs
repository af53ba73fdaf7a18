//! Integration test utilities for the consultation server
//!
//! This crate provides helpers for running end-to-end tests against
//! the HTTP API and the presence gateway.

pub mod helpers;

pub use helpers::*;
