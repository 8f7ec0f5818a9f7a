use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use git_common_hooks::config::HooksToml;
use git_common_hooks::repo::locate_root;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "git-common-hooks")]
#[command(
    version,
    about = "Create shared git hooks and link them into the repository"
)]
pub struct Cli {
    /// Mode to run: create or setup (if omitted, both are executed)
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Directory for the shared hooks (defaults to <repo-root>/hooks)
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Regenerate hook files even if they already exist
    #[arg(long)]
    pub reset: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Write the hooks directory, functions.sh and hook scripts
    Create,
    /// Link .git/hooks to the hooks directory
    Setup,
}

impl Cli {
    fn runs_create(&self) -> bool {
        matches!(self.mode, None | Some(Mode::Create))
    }

    fn runs_setup(&self) -> bool {
        matches!(self.mode, None | Some(Mode::Setup))
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let repo = locate_root(&cwd)?;
    let config = HooksToml::load_or_default(&repo.root)?;

    let cli_dir = cli.directory.as_ref().map(|dir| cwd.join(dir));
    let hooks_dir = config.hooks_dir(&repo, cli_dir.as_deref());
    tracing::debug!(hooks_dir = %hooks_dir.display(), mode = ?cli.mode, "resolved hooks directory");

    if cli.runs_create() {
        cmd::cmd_create(&repo, &hooks_dir, cli.reset, config.lfs_config_key())?;
    }
    if cli.runs_setup() {
        cmd::cmd_setup(&repo, &hooks_dir)?;
    }

    Ok(())
}
