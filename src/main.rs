//! modcheck - Minecraft mod version and slug checker/updater
//!
//! Main entry point for the command-line tool.
//!
//! # Execution Flow
//!
//! 1. Parse arguments and initialize logging (stderr, optional rotating file)
//! 2. Load runtime settings (defaults → settings file → `MODCHECK_*` env)
//! 3. Load `server.toml`; failure here is the only nonzero exit
//! 4. Create a current-thread tokio runtime for the HTTP client
//! 5. Run one reconciliation pass in the selected mode, mod by mod
//! 6. Print the summary
//!
//! Per-mod failures (network errors, unpatchable entries) are reported and skipped;
//! they never change the exit code.

use anyhow::{Context, Result};
use clap::Parser;
use modcheck::cli::Cli;
use modcheck::services::{ModrinthClient, ReconciliationEngine, StdinPrompt, Target};
use modcheck::{APP_NAME, ConfigStore, ReportSink, Settings, TerminalReporter, VERSION};
use std::io::IsTerminal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = modcheck::logging::setup_logging(cli.debug, cli.log_dir.as_deref())?;

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    let settings = Settings::load(cli.settings.as_deref())?;

    let store = ConfigStore::new(&cli.file);
    let loaded = store.load()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let client = ModrinthClient::new(&settings).context("Failed to create registry client")?;

    let mode = cli.mode();
    let color = !cli.no_color && std::io::stdout().is_terminal();
    let mut reporter = TerminalReporter::new(std::io::stdout(), color, settings.changelog_width);
    let mut prompt = StdinPrompt::stdin();

    reporter.run_started(
        &mode,
        store.path(),
        loaded.server.mods.len(),
        &loaded.game_version,
        &loaded.loader,
    );

    let target = Target {
        game_version: loaded.game_version.clone(),
        loader: loaded.loader.clone(),
    };

    let summary = {
        let mut engine =
            ReconciliationEngine::new(&client, &store, &mut prompt, &mut reporter, target);
        runtime.block_on(engine.reconcile(&loaded.server.mods, &mode))
    };

    reporter.summary(&mode, &summary, store.path());

    tracing::debug!(
        "Finished: {} need update, {} change(s) written",
        summary.needing_update.len(),
        summary.updates_performed
    );

    Ok(())
}
