//! Configuration for the tokenizer engine
//!
//! Hard limits are generated at build time from `config/<profile>.toml`;
//! user preferences are read from the environment at runtime.

// Generated by build.rs from the selected TOML profile
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{EnginePreferences, LoggingPreferences, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("HIGHLIGHT_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("HIGHLIGHT_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}
