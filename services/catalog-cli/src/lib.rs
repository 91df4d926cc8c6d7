//! Catalog CLI library.
//!
//! Loads a YAML catalog, then answers questions about its coverages and
//! derives series from JSON input. The binary in `main.rs` is a thin
//! wrapper that parses arguments and prints the JSON these commands return.

pub mod commands;
pub mod config;
pub mod config_loader;
