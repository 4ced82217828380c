//! Data models for modcheck.
//!
//! - [`ServerConfig`] / [`DeclaredMod`]: the structured view of `server.toml`
//! - [`RegistryProject`] / [`RegistryVersion`]: records fetched from the Modrinth API
//!
//! # Architecture Note
//!
//! The models are data-only. The structured view is used for reading declared state;
//! writes to `server.toml` never serialize these types, they go through the raw-text
//! patcher in [`crate::services::patcher`] so that user formatting survives.

pub mod registry;
pub mod server;

pub use registry::{RegistryProject, RegistryVersion, VersionType};
pub use server::{
    DEFAULT_LOADER, DeclaredMod, JarConfig, REGISTRY_SOURCE_TAG, ServerConfig, SourceType,
};
