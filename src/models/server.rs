use serde::{Deserialize, Serialize};

/// Source tag that marks a `[[mods]]` entry as managed by the registry.
pub const REGISTRY_SOURCE_TAG: &str = "modrinth";

/// Loader assumed when the server file has no `[jar] type`.
pub const DEFAULT_LOADER: &str = "fabric";

/// Structured view of `server.toml`.
///
/// Only the keys the reconciler reads are modelled; everything else in the file is
/// ignored here and left untouched on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub mc_version: Option<String>,

    #[serde(default)]
    pub jar: Option<JarConfig>,

    #[serde(default)]
    pub mods: Vec<DeclaredMod>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JarConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One `[[mods]]` entry as declared by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMod {
    #[serde(rename = "type", default)]
    pub source: Option<String>,

    /// Registry id or slug.
    #[serde(rename = "id", default)]
    pub identifier: Option<String>,

    /// Pinned registry version id.
    #[serde(rename = "version", default)]
    pub declared_version_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    RegistryManaged,
    Other,
}

impl DeclaredMod {
    pub fn source_type(&self) -> SourceType {
        match self.source.as_deref() {
            Some(REGISTRY_SOURCE_TAG) => SourceType::RegistryManaged,
            _ => SourceType::Other,
        }
    }

    pub fn is_registry_managed(&self) -> bool {
        self.source_type() == SourceType::RegistryManaged
    }

    /// Identifier, treating an empty string as absent.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|s| !s.is_empty())
    }

    /// Declared version id, treating an empty string as absent.
    pub fn declared_version_id(&self) -> Option<&str> {
        self.declared_version_id.as_deref().filter(|s| !s.is_empty())
    }
}

impl ServerConfig {
    /// Loader the run targets, lower-cased, falling back to [`DEFAULT_LOADER`].
    pub fn loader(&self) -> String {
        self.jar
            .as_ref()
            .and_then(|jar| jar.kind.as_deref())
            .filter(|kind| !kind.is_empty())
            .unwrap_or(DEFAULT_LOADER)
            .to_lowercase()
    }

    pub fn registry_mods(&self) -> impl Iterator<Item = &DeclaredMod> {
        self.mods.iter().filter(|m| m.is_registry_managed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_config() {
        let text = r#"
mc_version = "1.20.1"

[jar]
type = "Fabric"

[[mods]]
type = "modrinth"
id = "fabric-api"
version = "AAA"

[[mods]]
type = "url"
url = "https://example.com/mod.jar"
"#;
        let config: ServerConfig = toml::from_str(text).unwrap();

        assert_eq!(config.mc_version.as_deref(), Some("1.20.1"));
        assert_eq!(config.loader(), "fabric");
        assert_eq!(config.mods.len(), 2);
        assert_eq!(config.mods[0].identifier(), Some("fabric-api"));
        assert_eq!(config.mods[0].declared_version_id(), Some("AAA"));
        assert_eq!(config.mods[1].source_type(), SourceType::Other);
        assert_eq!(config.registry_mods().count(), 1);
    }

    #[test]
    fn test_loader_defaults_to_fabric() {
        let config: ServerConfig = toml::from_str("mc_version = \"1.20.1\"").unwrap();
        assert_eq!(config.loader(), DEFAULT_LOADER);
        assert!(config.mods.is_empty());
    }

    #[test]
    fn test_empty_identifier_is_absent() {
        let declared = DeclaredMod {
            source: Some(REGISTRY_SOURCE_TAG.to_string()),
            identifier: Some(String::new()),
            declared_version_id: None,
        };
        assert!(declared.is_registry_managed());
        assert_eq!(declared.identifier(), None);
        assert_eq!(declared.declared_version_id(), None);
    }
}
