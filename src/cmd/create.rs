//! Hook materialization command — `--mode create`.

use anyhow::{Context, Result};
use git_common_hooks::materialize::{MaterializeOptions, materialize};
use git_common_hooks::repo::RepoLocation;
use std::path::Path;

pub fn cmd_create(
    repo: &RepoLocation,
    hooks_dir: &Path,
    reset: bool,
    lfs_config_key: String,
) -> Result<()> {
    let options = MaterializeOptions {
        reset,
        lfs_config_key,
    };
    let report = materialize(repo, hooks_dir, &options)
        .with_context(|| format!("Failed to create hooks in {}", hooks_dir.display()))?;

    println!(
        "Created local hooks directory at: {}",
        report.local_dir.display()
    );

    if !report.written.is_empty() {
        println!("Wrote {} file(s):", report.written.len());
        for path in &report.written {
            println!("  {}", display_relative(path, &report.hooks_dir));
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "{}",
            console::style(format!(
                "Kept {} existing file(s) (use --reset to regenerate)",
                report.skipped.len()
            ))
            .dim()
        );
    }
    for hook in &report.merged {
        println!(
            "  {} preserved existing {} hook body",
            console::style("↳").cyan(),
            hook
        );
    }

    for hook in &report.not_merged {
        println!(
            "{} existing {} hook is not a text script; generated a fresh one instead of appending to it",
            console::style("⚠").yellow(),
            hook
        );
    }

    match (&report.ignore_rule, report.ignore_rule_added) {
        (Some(rule), true) => println!("Added '{}' to .gitignore", rule),
        (Some(_), false) => {}
        (None, _) => println!(
            "{} {} is outside the repository; add its local/ directory to your ignore rules manually",
            console::style("⚠").yellow(),
            report.hooks_dir.display()
        ),
    }

    Ok(())
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
