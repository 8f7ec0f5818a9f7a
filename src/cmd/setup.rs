//! Hook linking command — `--mode setup`.

use anyhow::{Context, Result};
use git_common_hooks::link::link;
use git_common_hooks::repo::RepoLocation;
use std::path::Path;

pub fn cmd_setup(repo: &RepoLocation, hooks_dir: &Path) -> Result<()> {
    let report = link(repo, hooks_dir).context("Failed to link hooks directory")?;

    if let Some(backup) = &report.backup {
        println!(
            "Existing .git/hooks directory backed up to: {} (last modified {})",
            backup.path.display(),
            backup.modified.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if let Some(previous) = &report.replaced {
        println!(
            "{}",
            console::style(format!("Replaced previous link to {}", previous.display())).dim()
        );
    }

    if report.link == report.target {
        println!(
            "{} {} is git's own hooks directory; nothing to link",
            console::style("⚠").yellow(),
            report.target.display()
        );
    } else {
        println!(
            "Git hooks directory is now linked to: {}",
            report.target.display()
        );
    }

    Ok(())
}
