use anyhow::{Context, Result, ensure};
use camino::Utf8Path;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const MODRINTH_API: &str = "https://api.modrinth.com/v2";
pub const USER_AGENT: &str = concat!(
    "modcheck/",
    env!("CARGO_PKG_VERSION"),
    " (Minecraft Mod Version Checker)"
);
pub const DEFAULT_CHANGELOG_WIDTH: usize = 70;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable prefix, e.g. `MODCHECK_API_BASE`.
pub const ENV_PREFIX: &str = "MODCHECK";

/// Runtime settings for the tool itself (not the server being checked).
///
/// Layered lowest to highest: built-in defaults, an optional TOML settings file,
/// then `MODCHECK_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base: String,
    pub user_agent: String,
    pub changelog_width: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: MODRINTH_API.to_string(),
            user_agent: USER_AGENT.to_string(),
            changelog_width: DEFAULT_CHANGELOG_WIDTH,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings, reading `settings_file` if it exists.
    pub fn load(settings_file: Option<&Utf8Path>) -> Result<Self> {
        Self::load_with_env(settings_file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(settings_file: Option<&Utf8Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("api_base", defaults.api_base)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("changelog_width", defaults.changelog_width as u64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?;

        if let Some(path) = settings_file {
            builder =
                builder.add_source(File::new(path.as_str(), FileFormat::Toml).required(false));
        }

        let settings: Settings = builder
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Failed to deserialize settings")?;

        ensure!(
            settings.request_timeout_secs > 0,
            "request_timeout_secs must be greater than 0"
        );

        tracing::debug!("Settings: {:?}", settings);
        Ok(settings)
    }

    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}
