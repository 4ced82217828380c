//! Services module - reconciliation logic for declared mods.
//!
//! # Components
//!
//! - [`version_filter`]: narrows a project's versions to the run's game version and
//!   loader, newest first
//! - [`severity`]: major/minor/patch classification of a version jump (display only)
//! - [`patcher`]: raw-text rewrites of `server.toml` that touch a single value
//! - [`registry`]: the [`RegistryClient`] seam and its Modrinth implementation
//! - [`prompt`]: the [`Confirm`] seam and its terminal implementation
//! - [`reconcile`]: [`ReconciliationEngine`], which composes all of the above
//!
//! # Design Philosophy
//!
//! Decisions are pure functions ([`filter_and_sort`], [`assess`],
//! [`severity::classify`]); network access, confirmation and output are injected
//! through traits so the engine can be driven without a terminal or a live registry.
//!
//! # Usage Example
//!
//! ```ignore
//! use modcheck::services::{Mode, ModrinthClient, ReconciliationEngine, StdinPrompt, Target};
//!
//! let client = ModrinthClient::new(&settings)?;
//! let mut prompt = StdinPrompt::stdin();
//! let mut engine = ReconciliationEngine::new(&client, &store, &mut prompt, &mut reporter, target);
//! let summary = engine.reconcile(&loaded.server.mods, &Mode::Check).await;
//! ```

pub mod patcher;
pub mod prompt;
pub mod reconcile;
pub mod registry;
pub mod severity;
pub mod version_filter;

pub use patcher::{ConfigPatcher, PatchOutcome};
pub use prompt::{Confirm, StdinPrompt};
pub use reconcile::{
    Assessment, ModOutcome, Mode, ReconcileSummary, ReconciliationEngine, ReconciliationResult,
    Target, assess,
};
pub use registry::{FetchError, ModrinthClient, RegistryClient};
pub use severity::Severity;
pub use version_filter::filter_and_sort;
