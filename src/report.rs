//! Human-readable output for a reconciliation pass.
//!
//! [`ReportSink`] is what the engine talks to; [`TerminalReporter`] renders to any
//! writer (stdout in the binary, a buffer in tests). Logging goes through `tracing`
//! on stderr, so the report stream stays clean.

use crate::models::RegistryProject;
use crate::services::reconcile::{Assessment, Mode, ReconcileSummary};
use crate::services::registry::FetchError;
use crate::services::severity::Severity;
use camino::Utf8Path;
use std::fmt;
use std::io::Write;

const SEPARATOR_WIDTH: usize = 80;
const CHANGELOG_INDENT: &str = "  ";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Receives per-mod progress from the engine.
pub trait ReportSink {
    fn run_started(
        &mut self,
        mode: &Mode,
        file: &Utf8Path,
        mod_count: usize,
        game_version: &str,
        loader: &str,
    );
    fn mod_header(&mut self, project: &RegistryProject, identifier: &str);
    fn fetch_failed(&mut self, identifier: &str, error: &FetchError);
    fn no_compatible_version(&mut self);
    fn version_info(&mut self, assessment: &Assessment<'_>, declared_version_id: &str);
    fn up_to_date(&mut self);
    fn update_available(&mut self, assessment: &Assessment<'_>);
    fn update_started(&mut self, from: &str, to: &str, severity: Severity);
    fn update_succeeded(&mut self, title: &str);
    fn update_failed(&mut self, title: &str, reason: &str);
    fn update_declined(&mut self);
    fn slug_candidate(&mut self, project: &RegistryProject, identifier: &str);
    fn slug_started(&mut self, identifier: &str, slug: &str);
    fn slug_failed(&mut self, identifier: &str, reason: &str);
    fn slug_declined(&mut self);
    fn mod_finished(&mut self);
    fn summary(&mut self, mode: &Mode, summary: &ReconcileSummary, file: &Utf8Path);
}

/// Plain-text report with optional ANSI tints.
#[derive(Debug)]
pub struct TerminalReporter<W> {
    out: W,
    color: bool,
    changelog_width: usize,
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, color: bool, changelog_width: usize) -> Self {
        Self {
            out,
            color,
            changelog_width,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|()| self.out.write_all(b"\n")) {
            tracing::debug!("Failed to write report line: {}", e);
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Major => RED,
        Severity::Minor => YELLOW,
        Severity::Patch => GREEN,
    }
}

impl<W: Write> ReportSink for TerminalReporter<W> {
    fn run_started(
        &mut self,
        mode: &Mode,
        file: &Utf8Path,
        mod_count: usize,
        game_version: &str,
        loader: &str,
    ) {
        if *mode == Mode::ReportSlugs {
            self.emit(format_args!("Checking mod IDs for slug conversion in {file}..."));
            return;
        }
        self.emit(format_args!(
            "Checking {mod_count} mods for Minecraft {game_version} ({loader})..."
        ));
        self.emit(format_args!("\nMod Status:"));
        self.emit(format_args!("{}", "-".repeat(SEPARATOR_WIDTH)));
    }

    fn mod_header(&mut self, project: &RegistryProject, identifier: &str) {
        self.emit(format_args!("Mod: {} ({})", project.title, identifier));
        if !project.slug.is_empty() && project.slug != identifier {
            let slug = self.paint(CYAN, &project.slug);
            self.emit(format_args!("Slug: {slug}"));
        }
    }

    fn fetch_failed(&mut self, identifier: &str, error: &FetchError) {
        self.emit(format_args!("Mod: {identifier}"));
        self.emit(format_args!("Status: Could not fetch registry data ({error})"));
        self.mod_finished();
    }

    fn no_compatible_version(&mut self) {
        self.emit(format_args!("Status: No compatible version found"));
    }

    fn version_info(&mut self, assessment: &Assessment<'_>, declared_version_id: &str) {
        match assessment.current {
            Some(current) => self.emit(format_args!(
                "Current Version: {} ({})",
                current.version_number, current.version_type
            )),
            None => self.emit(format_args!(
                "Current Version: {declared_version_id} (version info not found)"
            )),
        }
        let latest = assessment.latest;
        self.emit(format_args!(
            "Latest Version: {} ({})",
            latest.version_number, latest.version_type
        ));
    }

    fn up_to_date(&mut self) {
        self.emit(format_args!("Status: Up to date"));
    }

    fn update_available(&mut self, assessment: &Assessment<'_>) {
        let latest = assessment.latest;
        let label = self.paint(severity_color(assessment.severity), "Update Available!");
        self.emit(format_args!(
            "Status: {label} (published {})",
            latest.published_date()
        ));

        let changelog = format_changelog(&latest.changelog, self.changelog_width);
        if !changelog.is_empty() {
            self.emit(format_args!("\nChangelog:"));
            self.emit(format_args!("{changelog}"));
        }
    }

    fn update_started(&mut self, from: &str, to: &str, severity: Severity) {
        let to = self.paint(severity_color(severity), to);
        self.emit(format_args!("Updating version from {from} to {to}"));
    }

    fn update_succeeded(&mut self, title: &str) {
        self.emit(format_args!("Successfully updated {title}!"));
    }

    fn update_failed(&mut self, title: &str, reason: &str) {
        self.emit(format_args!("Failed to update version for {title}: {reason}"));
    }

    fn update_declined(&mut self) {
        self.emit(format_args!("Skipping version update."));
    }

    fn slug_candidate(&mut self, project: &RegistryProject, identifier: &str) {
        let slug = self.paint(CYAN, &project.slug);
        self.emit(format_args!("\nMod: {} ({})", project.title, identifier));
        self.emit(format_args!("Slug: {slug}"));
    }

    fn slug_started(&mut self, identifier: &str, slug: &str) {
        let slug = self.paint(CYAN, slug);
        self.emit(format_args!("Updating ID from {identifier} to {slug}"));
    }

    fn slug_failed(&mut self, identifier: &str, reason: &str) {
        self.emit(format_args!("Failed to update ID {identifier}: {reason}"));
    }

    fn slug_declined(&mut self) {
        self.emit(format_args!("Keeping current mod ID."));
    }

    fn mod_finished(&mut self) {
        self.emit(format_args!("{}", "-".repeat(SEPARATOR_WIDTH)));
    }

    fn summary(&mut self, mode: &Mode, summary: &ReconcileSummary, file: &Utf8Path) {
        let performed = summary.updates_performed;
        match mode {
            Mode::ReportSlugs if performed > 0 => self.emit(format_args!(
                "\nSuccessfully updated {performed} mod ID(s) to readable slugs!"
            )),
            Mode::ReportSlugs => self.emit(format_args!("\nNo mod IDs were updated.")),
            Mode::UpdateAll | Mode::UpdateSubset(_) if performed > 0 => {
                self.emit(format_args!(
                    "\nSuccessfully updated {performed} mod version(s) in {file}!"
                ));
                self.emit(format_args!(
                    "Please restart your server for the changes to take effect."
                ));
            }
            Mode::UpdateAll | Mode::UpdateSubset(_) => self.emit(format_args!(
                "\nNo updates were made to the server configuration."
            )),
            Mode::Check if !summary.needing_update.is_empty() => {
                self.emit(format_args!(
                    "\nFound {} mod(s) that need updating.",
                    summary.needing_update.len()
                ));
                self.emit(format_args!(
                    "Run with --update to update all mods or --update MOD_ID to update specific mods."
                ));
            }
            Mode::Check => self.emit(format_args!("\nAll mods are up to date!")),
        }
    }
}

/// Drops blank lines, word-wraps lines longer than `width`, and indents every line.
pub fn format_changelog(changelog: &str, width: usize) -> String {
    changelog
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| {
            if line.chars().count() > width {
                wrap_line(line, width)
            } else {
                vec![line.to_string()]
            }
        })
        .map(|line| format!("{CHANGELOG_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greedy word wrap. A single word longer than `width` gets a line of its own.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            wrapped.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegistryVersion, VersionType};

    fn reporter() -> TerminalReporter<Vec<u8>> {
        TerminalReporter::new(Vec::new(), false, 70)
    }

    fn output(reporter: TerminalReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_format_changelog_wraps_and_indents() {
        let changelog = "- Fixed crash\n\n   \n- ".to_string() + &"word ".repeat(20);
        let formatted = format_changelog(&changelog, 30);
        let lines: Vec<&str> = formatted.lines().collect();

        assert_eq!(lines[0], "  - Fixed crash");
        assert!(lines.iter().all(|l| l.starts_with("  ")));
        assert!(lines.iter().all(|l| l.len() <= 32));
        assert!(lines.len() > 2);
    }

    #[test]
    fn test_format_changelog_empty() {
        assert_eq!(format_changelog("", 70), "");
        assert_eq!(format_changelog("\n  \n", 70), "");
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(
            wrap_line("a bbbbbbbbbbbb c", 5),
            vec!["a", "bbbbbbbbbbbb", "c"]
        );
    }

    #[test]
    fn test_update_available_shows_date_and_changelog() {
        let latest = RegistryVersion {
            id: "BBB".to_string(),
            version_number: "1.1.0".to_string(),
            version_type: VersionType::Beta,
            game_versions: vec!["1.20.1".to_string()],
            loaders: vec!["fabric".to_string()],
            published_at: "2024-06-02T10:00:00Z".to_string(),
            changelog: "Faster chunk loading".to_string(),
        };
        let assessment = Assessment {
            latest: &latest,
            current: None,
            needs_update: true,
            severity: Severity::Patch,
        };

        let mut reporter = reporter();
        reporter.version_info(&assessment, "AAA");
        reporter.update_available(&assessment);
        let text = output(reporter);

        assert!(text.contains("Current Version: AAA (version info not found)"));
        assert!(text.contains("Latest Version: 1.1.0 (beta)"));
        assert!(text.contains("Status: Update Available! (published 2024-06-02)"));
        assert!(text.contains("Changelog:\n  Faster chunk loading"));
    }

    #[test]
    fn test_colors_only_when_enabled() {
        let project = RegistryProject {
            id: "P7dR8mSH".to_string(),
            slug: "fabric-api".to_string(),
            title: "Fabric API".to_string(),
        };

        let mut plain = reporter();
        plain.mod_header(&project, "P7dR8mSH");
        assert_eq!(output(plain), "Mod: Fabric API (P7dR8mSH)\nSlug: fabric-api\n");

        let mut colored = TerminalReporter::new(Vec::new(), true, 70);
        colored.mod_header(&project, "P7dR8mSH");
        assert!(output(colored).contains("\x1b[36mfabric-api\x1b[0m"));
    }

    #[test]
    fn test_summary_messages() {
        let mut summary = ReconcileSummary::default();
        let file = Utf8Path::new("server.toml");

        let mut check = reporter();
        check.summary(&Mode::Check, &summary, file);
        assert!(output(check).contains("All mods are up to date!"));

        summary.needing_update.insert("fabric-api".to_string());
        let mut check = reporter();
        check.summary(&Mode::Check, &summary, file);
        assert!(output(check).contains("Found 1 mod(s) that need updating."));

        summary.updates_performed = 1;
        let mut update = reporter();
        update.summary(&Mode::UpdateAll, &summary, file);
        assert!(output(update).contains("Successfully updated 1 mod version(s) in server.toml!"));

        let mut slugs = reporter();
        slugs.summary(&Mode::ReportSlugs, &summary, file);
        assert!(output(slugs).contains("Successfully updated 1 mod ID(s) to readable slugs!"));
    }
}
