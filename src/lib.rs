use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use clap::{
    error::{ContextKind, ContextValue, ErrorKind},
    Args, Parser, Subcommand,
};
use env_logger::Env;
use tokensource_core::{
    consolidate, split, SplitOptions, SplitReport, ThemesPolicy, DEFAULT_OUTPUT,
    DEFAULT_TOKENS_DIR,
};

#[derive(Parser, Debug)]
#[command(
    name = "tokensource",
    version,
    about = "Consolidate design token sets into one document and split them back"
)]
pub struct Cli {
    /// Log every file read and written
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge the token sets of a store into one document, in $metadata.json order
    Consolidate(ConsolidateArgs),
    /// Write one file per token set of a document and regenerate $metadata.json
    Split(SplitArgs),
}

#[derive(Args, Debug)]
pub struct ConsolidateArgs {
    /// Token store directory
    #[arg(long, value_name = "PATH", env = "TOKENSOURCE_TOKENS_DIR", default_value = DEFAULT_TOKENS_DIR)]
    pub tokens_dir: PathBuf,

    /// Consolidated document to write
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Consolidated document to split
    #[arg(long, value_name = "PATH")]
    pub source: PathBuf,

    /// Token store directory
    #[arg(long, value_name = "PATH", env = "TOKENSOURCE_TOKENS_DIR", default_value = DEFAULT_TOKENS_DIR)]
    pub tokens_dir: PathBuf,

    /// Theme index to copy instead of the store's current $themes.json
    #[arg(long, value_name = "PATH")]
    pub themes: Option<PathBuf>,

    /// List the files that would be written without touching the disk
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite the store in place instead of moving it aside first
    #[arg(long)]
    pub no_backup: bool,
}
impl SplitArgs {
    fn options(&self) -> SplitOptions {
        SplitOptions {
            dry_run: self.dry_run,
            backup: !self.no_backup,
            themes: match &self.themes {
                Some(path) => ThemesPolicy::CopyFrom(path.clone()),
                None => ThemesPolicy::Keep,
            },
        }
    }
}

/// Parsing ended without a command to run.
#[derive(Debug, PartialEq)]
pub struct EarlyExit {
    pub code: u8,
    pub message: String,
    pub to_stderr: bool,
}

pub fn parse_args<I, T>(args: I) -> Result<Cli, EarlyExit>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EarlyExit {
            code: 0,
            message: err.render().to_string(),
            to_stderr: false,
        },
        ErrorKind::UnknownArgument => {
            let flag = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(flag)) => flag.clone(),
                _ => String::new(),
            };
            EarlyExit {
                code: 1,
                message: format!("Unknown option: {flag}"),
                to_stderr: true,
            }
        }
        _ => EarlyExit {
            code: 1,
            message: err.render().to_string(),
            to_stderr: true,
        },
    })
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Runs the command and returns the summary lines for stdout.
pub fn execute(command: &Command) -> tokensource_core::Result<Vec<String>> {
    log::debug!("{command:?}");
    match command {
        Command::Consolidate(args) => {
            let report = consolidate(&args.tokens_dir, &args.output)?;
            let mut lines = vec![format!(
                "Consolidated {} token sets into {}",
                report.token_sets_written,
                report.output.display()
            )];
            if !report.warnings.is_empty() {
                lines.push(format!("{} warnings", report.warnings.len()));
            }
            Ok(lines)
        }
        Command::Split(args) => {
            let report = split(&args.source, &args.tokens_dir, &args.options())?;
            Ok(split_summary(&report, &args.tokens_dir))
        }
    }
}

fn split_summary(report: &SplitReport, tokens_dir: &Path) -> Vec<String> {
    if report.dry_run {
        let mut lines: Vec<String> = report
            .backup
            .iter()
            .map(|backup| {
                format!(
                    "[DRY RUN] Would back up {} to {}",
                    tokens_dir.display(),
                    backup.display()
                )
            })
            .collect();
        lines.extend(
            report
                .writes
                .iter()
                .map(|write| format!("[DRY RUN] Would {write}")),
        );
        return lines;
    }
    let mut lines = Vec::new();
    if let Some(backup) = &report.backup {
        lines.push(format!("Backed up previous tokens to {}", backup.display()));
    }
    lines.push(format!(
        "Split {} token sets into {}",
        report.token_sets_written,
        tokens_dir.display()
    ));
    lines
}
