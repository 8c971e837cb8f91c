//! Core domain + relay logic for the topic relay bridge.
//!
//! This crate is intentionally framework-agnostic. The HTTP surface and the
//! Telegram client live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod context;
pub mod domain;
pub mod errors;
pub mod format;
pub mod logging;
pub mod notify;
pub mod port;
pub mod token;

pub use errors::{Error, Result};
