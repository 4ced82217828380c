use crate::config::DEFAULT_CONFIG_FILE;
use crate::services::reconcile::Mode;
use camino::Utf8PathBuf;
use clap::Parser;
use clap::builder::FalseyValueParser;
use indexmap::IndexSet;

#[derive(Parser, Debug)]
#[command(
    name = "modcheck",
    version,
    about = "Check and update Minecraft mod versions and IDs."
)]
pub struct Cli {
    #[arg(
        long,
        num_args = 0..,
        value_name = "MOD_ID",
        conflicts_with = "slugs",
        help = "Update specified mods to latest versions (or all if no mods specified)"
    )]
    pub update: Option<Vec<String>>,

    #[arg(long, help = "Convert mod IDs to readable slugs")]
    pub slugs: bool,

    #[arg(
        long,
        default_value = DEFAULT_CONFIG_FILE,
        help = "Server configuration file path"
    )]
    pub file: Utf8PathBuf,

    #[arg(long, help = "Enable debug mode for detailed output")]
    pub debug: bool,

    /// Any non-empty `NO_COLOR` other than a falsey word (`0`, `false`, `no`, `off`)
    /// disables color.
    #[arg(
        long,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(long, value_name = "DIR", help = "Also write logs to daily files in DIR")]
    pub log_dir: Option<Utf8PathBuf>,

    #[arg(long, value_name = "PATH", help = "Settings file (registry URL, user agent, ...)")]
    pub settings: Option<Utf8PathBuf>,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.slugs {
            return Mode::ReportSlugs;
        }
        match &self.update {
            None => Mode::Check,
            Some(ids) if ids.is_empty() => Mode::UpdateAll,
            Some(ids) => Mode::UpdateSubset(ids.iter().cloned().collect::<IndexSet<_>>()),
        }
    }
}
