#![allow(dead_code)]

use async_trait::async_trait;
use camino::Utf8PathBuf;
use modcheck::models::VersionType;
use modcheck::services::{
    Confirm, FetchError, Mode, ReconcileSummary, ReconciliationEngine, RegistryClient, Target,
};
use modcheck::{ConfigStore, RegistryProject, RegistryVersion, TerminalReporter};
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

/// In-memory registry. Projects are reachable by both id and slug.
#[derive(Default)]
pub struct FakeRegistry {
    projects: HashMap<String, (RegistryProject, Vec<RegistryVersion>)>,
    failing: Vec<String>,
    lookups: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(
        mut self,
        project: RegistryProject,
        versions: Vec<RegistryVersion>,
    ) -> Self {
        self.projects
            .insert(project.slug.clone(), (project.clone(), versions.clone()));
        self.projects.insert(project.id.clone(), (project, versions));
        self
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.failing.push(id.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    fn find(&self, id: &str) -> Result<&(RegistryProject, Vec<RegistryVersion>), FetchError> {
        self.lookups.lock().unwrap().push(id.to_string());
        if self.failing.iter().any(|f| f == id) {
            return Err(FetchError::Status {
                url: format!("https://api.modrinth.com/v2/project/{id}"),
                status: 500,
            });
        }
        self.projects.get(id).ok_or_else(|| FetchError::Status {
            url: format!("https://api.modrinth.com/v2/project/{id}"),
            status: 404,
        })
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn get_project(&self, id: &str) -> Result<RegistryProject, FetchError> {
        self.find(id).map(|(project, _)| project.clone())
    }

    async fn get_versions(&self, id: &str) -> Result<Vec<RegistryVersion>, FetchError> {
        self.find(id).map(|(_, versions)| versions.clone())
    }
}

pub fn project(id: &str, slug: &str, title: &str) -> RegistryProject {
    RegistryProject {
        id: id.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
    }
}

pub fn version(
    id: &str,
    version_number: &str,
    game_versions: &[&str],
    loaders: &[&str],
    published_at: &str,
) -> RegistryVersion {
    RegistryVersion {
        id: id.to_string(),
        version_number: version_number.to_string(),
        version_type: VersionType::Release,
        game_versions: game_versions.iter().map(|s| s.to_string()).collect(),
        loaders: loaders.iter().map(|s| s.to_string()).collect(),
        published_at: published_at.to_string(),
        changelog: format!("Changes in {version_number}"),
    }
}

/// A `server.toml` in a temporary directory.
pub struct ServerFile {
    _tmp: TempDir,
    pub path: Utf8PathBuf,
}

impl ServerFile {
    pub fn new(contents: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::try_from(tmp.path().join("server.toml")).expect("utf-8 temp path");
        fs::write(&path, contents).expect("write server.toml");
        Self { _tmp: tmp, path }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.path)
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).expect("read server.toml")
    }
}

/// Load the server file and run one pass, returning the summary and the report text.
pub async fn run_pass(
    server: &ServerFile,
    registry: &FakeRegistry,
    prompt: &mut dyn Confirm,
    mode: Mode,
) -> (ReconcileSummary, String) {
    let store = server.store();
    let loaded = store.load().expect("load server.toml");
    let target = Target {
        game_version: loaded.game_version.clone(),
        loader: loaded.loader.clone(),
    };

    let mut reporter = TerminalReporter::new(Vec::new(), false, 70);
    let summary = {
        let mut engine = ReconciliationEngine::new(registry, &store, prompt, &mut reporter, target);
        engine.reconcile(&loaded.server.mods, &mode).await
    };

    let output = String::from_utf8(reporter.into_inner()).expect("utf-8 report");
    (summary, output)
}
