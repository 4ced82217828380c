// modcheck - Minecraft mod version and slug checker/updater
//
// This is the library crate containing the reconciliation engine and data structures.
// The binary crate (main.rs) provides the command-line entry point.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigStore, LoadedConfig, Settings};
pub use models::{DeclaredMod, RegistryProject, RegistryVersion, ServerConfig};
pub use report::{ReportSink, TerminalReporter};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
