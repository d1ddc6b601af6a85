//! Policy service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, configuration, and observability wiring around the
//! `warden-policy` engine for use by the binary and tests.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
