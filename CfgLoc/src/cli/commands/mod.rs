use clap::Subcommand;
use std::path::PathBuf;

pub mod check;
pub mod dump;
pub mod export;
pub mod fmt;
pub mod sync;

#[derive(Subcommand)]
pub enum Commands {
    /// Re-serialize a config file in canonical layout
    Fmt {
        /// Config file
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long, conflicts_with = "check")]
        output: Option<PathBuf>,

        /// Only report whether the file is already formatted
        #[arg(long)]
        check: bool,
    },

    /// Parse every .cfg file under a directory and report problems
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the parsed node tree as JSON
    Dump {
        /// Config file
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract part strings into a localization catalog
    Export {
        /// Directory to scan
        dir: PathBuf,

        /// Catalog file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Settings file (default: cfgloc.toml in the scanned directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Existing localization file or directory used to fill in tag text
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Replace literal part strings with tags in the scanned files
        #[arg(long)]
        localize: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Refresh tag comments from a localization catalog
    Sync {
        /// Directory to update
        dir: PathBuf,

        /// Localization file or directory
        #[arg(long)]
        catalog: PathBuf,

        /// Settings file (default: cfgloc.toml in the updated directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Fmt {
                file,
                output,
                check,
            } => fmt::execute(file, output.as_deref(), *check),
            Commands::Check { dir, quiet } => check::execute(dir, *quiet),
            Commands::Dump { file, output } => dump::execute(file, output.as_deref()),
            Commands::Export {
                dir,
                output,
                config,
                catalog,
                localize,
                quiet,
            } => export::execute(
                dir,
                output,
                config.as_deref(),
                catalog.as_deref(),
                *localize,
                *quiet,
            ),
            Commands::Sync {
                dir,
                catalog,
                config,
                quiet,
            } => sync::execute(dir, catalog, config.as_deref(), *quiet),
        }
    }
}

/// Settings from an explicit file, or `cfgloc.toml` next to the input.
pub(crate) fn load_config(
    dir: &std::path::Path,
    config: Option<&std::path::Path>,
) -> anyhow::Result<crate::config::ToolConfig> {
    let config = match config {
        Some(path) => crate::config::ToolConfig::load(path)?,
        None => crate::config::ToolConfig::load_or_default(dir)?,
    };
    Ok(config)
}
