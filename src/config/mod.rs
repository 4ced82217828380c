use crate::models::ServerConfig;
use crate::services::patcher::{ConfigPatcher, PatchOutcome};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use thiserror::Error;

pub mod settings;

pub use settings::Settings;

/// Default server configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "server.toml";

/// Errors reading or writing the server configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not find Minecraft version in {0}")]
    MissingGameVersion(Utf8PathBuf),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Loaded server configuration plus the targets every reconciliation pass uses.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub game_version: String,
    pub loader: String,
}

/// Access to `server.toml`: a structured read for declared state, and raw-text
/// rewrites for updates.
///
/// Each rewrite reads the whole file, applies one [`ConfigPatcher`] edit and, only
/// if the edit matched, replaces the file through a temporary sibling and a rename.
/// A failed or unmatched rewrite leaves the file byte-for-byte as it was.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Utf8PathBuf,
    patcher: ConfigPatcher,
}

impl ConfigStore {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            patcher: ConfigPatcher::new(),
        }
    }

    /// Parse the configuration file.
    ///
    /// # Errors
    /// Any error here is fatal for the run: unreadable file, invalid TOML, or a
    /// missing `mc_version`.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let text = self.read_raw()?;

        let server: ServerConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let game_version = server
            .mc_version
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingGameVersion(self.path.clone()))?;
        let loader = server.loader();

        self.warn_duplicates(&server);

        tracing::info!(
            "Loaded {} with {} mod(s) for {} ({})",
            self.path,
            server.mods.len(),
            game_version,
            loader
        );

        Ok(LoadedConfig {
            server,
            game_version,
            loader,
        })
    }

    /// Point the version of the entry declared as `identifier` at `new_version`.
    ///
    /// Returns `Ok(false)` when no such entry/field exists.
    pub fn rewrite_version(
        &self,
        identifier: &str,
        new_version: &str,
    ) -> Result<bool, ConfigError> {
        self.apply(|text| self.patcher.rewrite_version(text, identifier, new_version))
    }

    /// Rename a declared identifier (e.g. project id to slug).
    ///
    /// Returns `Ok(false)` when no such entry exists.
    pub fn rewrite_identifier(
        &self,
        old_identifier: &str,
        new_identifier: &str,
    ) -> Result<bool, ConfigError> {
        self.apply(|text| {
            self.patcher
                .rewrite_identifier(text, old_identifier, new_identifier)
        })
    }

    fn warn_duplicates(&self, server: &ServerConfig) {
        let mut seen = HashSet::new();
        for identifier in server.registry_mods().filter_map(|m| m.identifier()) {
            if !seen.insert(identifier) {
                tracing::warn!(
                    "Mod ID '{}' is declared more than once in {}; updates will only touch the first entry",
                    identifier,
                    self.path
                );
            }
        }
    }

    /// Get the configuration file path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn apply(&self, edit: impl FnOnce(&str) -> PatchOutcome) -> Result<bool, ConfigError> {
        let text = self.read_raw()?;

        match edit(&text) {
            PatchOutcome::Patched(patched) => {
                self.write_raw(&patched)?;
                tracing::info!("Rewrote {}", self.path);
                Ok(true)
            }
            PatchOutcome::NotFound => Ok(false),
        }
    }

    fn read_raw(&self) -> Result<String, ConfigError> {
        fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn write_raw(&self, text: &str) -> Result<(), ConfigError> {
        let write_error = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(text.as_bytes()).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        // Keep the original file's permissions on the replacement
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_error)?;
        }

        temp.persist(&self.path)
            .map_err(|e| write_error(e.error))?;
        Ok(())
    }
}
