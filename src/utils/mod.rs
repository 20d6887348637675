//! Utility functions shared across genatlas
//!
//! Common helpers that don't fit in specialized modules.

pub mod fs;

pub use fs::{remove_if_exists, write_durable};
