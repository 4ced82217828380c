use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Project record from `GET /project/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryProject {
    pub id: String,
    pub slug: String,
    pub title: String,
}

/// Version record from `GET /project/{id}/version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryVersion {
    pub id: String,
    pub version_number: String,

    #[serde(default)]
    pub version_type: VersionType,

    #[serde(default)]
    pub game_versions: Vec<String>,

    #[serde(default)]
    pub loaders: Vec<String>,

    /// ISO-8601 timestamp; compared lexicographically.
    #[serde(rename = "date_published", default)]
    pub published_at: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub changelog: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    #[default]
    Release,
    Beta,
    Alpha,
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionType::Release => "release",
            VersionType::Beta => "beta",
            VersionType::Alpha => "alpha",
        };
        f.write_str(name)
    }
}

impl RegistryVersion {
    /// Date portion of `published_at` (everything before `T`).
    pub fn published_date(&self) -> &str {
        self.published_at
            .split('T')
            .next()
            .unwrap_or(&self.published_at)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
