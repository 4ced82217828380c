use crate::config::ConfigStore;
use crate::models::{DeclaredMod, RegistryVersion};
use crate::report::ReportSink;
use crate::services::prompt::Confirm;
use crate::services::registry::RegistryClient;
use crate::services::severity::{self, Severity};
use crate::services::version_filter::filter_and_sort;
use indexmap::IndexSet;

/// What a reconciliation pass does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Report drift only.
    Check,
    /// Offer an update for every outdated mod.
    UpdateAll,
    /// Offer updates only for the listed identifiers.
    UpdateSubset(IndexSet<String>),
    /// Offer to replace identifiers with their registry slugs.
    ReportSlugs,
}

impl Mode {
    pub fn is_update(&self) -> bool {
        matches!(self, Mode::UpdateAll | Mode::UpdateSubset(_))
    }

    fn selects(&self, identifier: &str) -> bool {
        match self {
            Mode::UpdateSubset(ids) => ids.contains(identifier),
            _ => true,
        }
    }
}

/// Game version and loader fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub game_version: String,
    pub loader: String,
}

/// Update decision for one mod against its compatible version list.
#[derive(Debug, Clone, Copy)]
pub struct Assessment<'v> {
    pub latest: &'v RegistryVersion,
    /// The declared version, if it is among the compatible versions.
    pub current: Option<&'v RegistryVersion>,
    pub needs_update: bool,
    pub severity: Severity,
}

/// Decide whether `declared_version_id` is behind the newest compatible version.
///
/// `compatible` must already be filtered and sorted newest-first. Returns `None`
/// when there is no compatible version at all.
pub fn assess<'v>(
    compatible: &'v [RegistryVersion],
    declared_version_id: &str,
) -> Option<Assessment<'v>> {
    let latest = compatible.first()?;
    let current = compatible.iter().find(|v| v.id == declared_version_id);
    let needs_update = current.is_none() || latest.id != declared_version_id;

    let severity = current.map_or(Severity::Patch, |current| {
        severity::classify(&current.version_number, &latest.version_number)
    });

    Some(Assessment {
        latest,
        current,
        needs_update,
        severity,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModOutcome {
    FetchFailed,
    NoCompatibleVersion,
    UpToDate,
    /// Outdated; reported only (check mode).
    UpdateAvailable,
    Updated,
    UpdateDeclined,
    /// Confirmed, but the file could not be patched.
    UpdateFailed,
    SlugMatches,
    SlugApplied,
    SlugDeclined,
    SlugFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub identifier: String,
    pub outcome: ModOutcome,
    pub needs_update: bool,
    /// 0 or 1.
    pub updates_performed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Identifiers with a newer compatible version, in declaration order.
    pub needing_update: IndexSet<String>,
    /// Successful version patches, or identifier rewrites in slug mode.
    pub updates_performed: usize,
    pub results: Vec<ReconciliationResult>,
}

impl ReconcileSummary {
    fn record(&mut self, result: ReconciliationResult) {
        if result.needs_update {
            self.needing_update.insert(result.identifier.clone());
        }
        self.updates_performed += result.updates_performed;
        self.results.push(result);
    }
}

/// Drives one reconciliation pass over the declared mods.
///
/// Mods are processed strictly one at a time: fetch, filter, compare, and (when
/// confirmed) patch, before moving on. A failure for one mod is reported and the
/// pass continues with the next.
pub struct ReconciliationEngine<'a> {
    client: &'a dyn RegistryClient,
    store: &'a ConfigStore,
    confirm: &'a mut dyn Confirm,
    sink: &'a mut dyn ReportSink,
    target: Target,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(
        client: &'a dyn RegistryClient,
        store: &'a ConfigStore,
        confirm: &'a mut dyn Confirm,
        sink: &'a mut dyn ReportSink,
        target: Target,
    ) -> Self {
        Self {
            client,
            store,
            confirm,
            sink,
            target,
        }
    }

    pub async fn reconcile(
        &mut self,
        declared_mods: &[DeclaredMod],
        mode: &Mode,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for declared in declared_mods.iter().filter(|m| m.is_registry_managed()) {
            let Some(identifier) = declared.identifier() else {
                continue;
            };

            let result = if *mode == Mode::ReportSlugs {
                self.normalize_slug(identifier).await
            } else {
                let Some(declared_version_id) = declared.declared_version_id() else {
                    continue;
                };
                if !mode.selects(identifier) {
                    continue;
                }
                self.check_mod(identifier, declared_version_id, mode.is_update())
                    .await
            };

            tracing::debug!("{}: {:?}", result.identifier, result.outcome);
            summary.record(result);
        }

        if let Mode::UpdateSubset(requested) = mode {
            for missing in requested.iter().filter(|id| {
                !declared_mods
                    .iter()
                    .any(|m| m.is_registry_managed() && m.identifier() == Some(id.as_str()))
            }) {
                tracing::warn!(
                    "Requested mod '{}' is not declared in {}",
                    missing,
                    self.store.path()
                );
            }
        }

        summary
    }

    async fn check_mod(
        &mut self,
        identifier: &str,
        declared_version_id: &str,
        update_mode: bool,
    ) -> ReconciliationResult {
        let project = match self.client.get_project(identifier).await {
            Ok(project) => project,
            Err(e) => {
                tracing::error!("Error fetching mod {}: {}", identifier, e);
                self.sink.fetch_failed(identifier, &e);
                return result(identifier, ModOutcome::FetchFailed, false, 0);
            }
        };

        let versions = match self.client.get_versions(identifier).await {
            Ok(versions) => versions,
            Err(e) => {
                tracing::error!("Error fetching versions for mod {}: {}", identifier, e);
                self.sink.fetch_failed(identifier, &e);
                return result(identifier, ModOutcome::FetchFailed, false, 0);
            }
        };

        let compatible = filter_and_sort(versions, &self.target.game_version, &self.target.loader);

        self.sink.mod_header(&project, identifier);

        let Some(assessment) = assess(&compatible, declared_version_id) else {
            self.sink.no_compatible_version();
            self.sink.mod_finished();
            return result(identifier, ModOutcome::NoCompatibleVersion, false, 0);
        };

        self.sink.version_info(&assessment, declared_version_id);

        let outcome = if !assessment.needs_update {
            self.sink.up_to_date();
            ModOutcome::UpToDate
        } else {
            self.sink.update_available(&assessment);
            if update_mode {
                self.offer_update(identifier, &project.title, declared_version_id, &assessment)
            } else {
                ModOutcome::UpdateAvailable
            }
        };

        self.sink.mod_finished();

        let updates = usize::from(outcome == ModOutcome::Updated);
        result(identifier, outcome, assessment.needs_update, updates)
    }

    fn offer_update(
        &mut self,
        identifier: &str,
        title: &str,
        declared_version_id: &str,
        assessment: &Assessment<'_>,
    ) -> ModOutcome {
        let latest = assessment.latest;
        let question = format!(
            "Do you want to update this mod to version {}?",
            latest.version_number
        );

        if !self.confirm.ask_yes_no(&question) {
            self.sink.update_declined();
            return ModOutcome::UpdateDeclined;
        }

        self.sink
            .update_started(declared_version_id, &latest.id, assessment.severity);

        match self.store.rewrite_version(identifier, &latest.id) {
            Ok(true) => {
                tracing::info!("Updated {} to {}", identifier, latest.id);
                self.sink.update_succeeded(title);
                ModOutcome::Updated
            }
            Ok(false) => {
                tracing::warn!(
                    "No version field found for mod '{}' in {}",
                    identifier,
                    self.store.path()
                );
                self.sink
                    .update_failed(title, "entry or version field not found");
                ModOutcome::UpdateFailed
            }
            Err(e) => {
                tracing::error!("Failed to update {}: {}", identifier, e);
                self.sink.update_failed(title, &e.to_string());
                ModOutcome::UpdateFailed
            }
        }
    }

    async fn normalize_slug(&mut self, identifier: &str) -> ReconciliationResult {
        let project = match self.client.get_project(identifier).await {
            Ok(project) => project,
            Err(e) => {
                tracing::error!("Error fetching mod {}: {}", identifier, e);
                self.sink.fetch_failed(identifier, &e);
                return result(identifier, ModOutcome::FetchFailed, false, 0);
            }
        };

        if project.slug.is_empty() || project.slug == identifier {
            return result(identifier, ModOutcome::SlugMatches, false, 0);
        }

        self.sink.slug_candidate(&project, identifier);

        let question = format!(
            "Do you want to use the readable slug '{}' instead of ID '{}'?",
            project.slug, identifier
        );
        if !self.confirm.ask_yes_no(&question) {
            self.sink.slug_declined();
            return result(identifier, ModOutcome::SlugDeclined, false, 0);
        }

        self.sink.slug_started(identifier, &project.slug);

        let outcome = match self.store.rewrite_identifier(identifier, &project.slug) {
            Ok(true) => {
                tracing::info!("Renamed {} to {}", identifier, project.slug);
                ModOutcome::SlugApplied
            }
            Ok(false) => {
                self.sink.slug_failed(identifier, "ID field not found");
                ModOutcome::SlugFailed
            }
            Err(e) => {
                tracing::error!("Failed to rename {}: {}", identifier, e);
                self.sink.slug_failed(identifier, &e.to_string());
                ModOutcome::SlugFailed
            }
        };

        let updates = usize::from(outcome == ModOutcome::SlugApplied);
        result(identifier, outcome, false, updates)
    }
}

fn result(
    identifier: &str,
    outcome: ModOutcome,
    needs_update: bool,
    updates_performed: usize,
) -> ReconciliationResult {
    ReconciliationResult {
        identifier: identifier.to_string(),
        outcome,
        needs_update,
        updates_performed,
    }
}
