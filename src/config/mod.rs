//! Configuration management for the threat intel pipeline.
//! This module handles loading settings from an optional TOML file
//! and `THREATINTEL_*` environment variables.

mod settings;

pub use settings::{
    Settings, ReputationConfig, RdapConfig, CloudflareConfig, LoggingConfig, DEFAULT_CONFIG_FILE,
};
