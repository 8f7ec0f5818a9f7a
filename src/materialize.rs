//! Hook materialization.
//!
//! Builds the shared hooks directory:
//!
//! ```text
//! <hooks_dir>/
//! ├── functions.sh       # run_local_hook helper sourced by every hook
//! ├── local/             # untracked per-user hooks (ignored via .gitignore)
//! │   └── post-checkout  # example local hook
//! ├── pre-commit         # one script per standard hook
//! └── ...
//! ```
//!
//! Every step is idempotent on its own, so re-running after a partial
//! failure repairs whatever is missing. With `reset` set, generated files
//! are rewritten even when they already exist.

use crate::errors::{HooksError, Result};
use crate::repo::RepoLocation;
use crate::templates::{self, FUNCTIONS_FILE, LOCAL_DIR, STANDARD_HOOKS};
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};

/// Mode given to every generated executable.
const EXECUTABLE_MODE: u32 = 0o755;

/// Name of the ignore file the `local/` rule is written to.
const GITIGNORE: &str = ".gitignore";

/// Options controlling a materialization run.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Rewrite generated files even if they exist
    pub reset: bool,
    /// `git config` key checked by the Git LFS guard
    pub lfs_config_key: String,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            reset: false,
            lfs_config_key: templates::DEFAULT_LFS_CONFIG_KEY.to_string(),
        }
    }
}

/// What a materialization run did.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Canonical hooks directory
    pub hooks_dir: PathBuf,
    /// Canonical `local/` directory
    pub local_dir: PathBuf,
    /// Ignore rule for `local/`; `None` when the hooks directory is outside the working tree
    pub ignore_rule: Option<String>,
    /// Whether the ignore rule had to be appended
    pub ignore_rule_added: bool,
    /// Files written during this run
    pub written: Vec<PathBuf>,
    /// Files left untouched because they already existed
    pub skipped: Vec<PathBuf>,
    /// Hooks whose pre-existing native body was preserved
    pub merged: Vec<String>,
    /// Hooks whose native body was not UTF-8 text and was left out of the merge
    pub not_merged: Vec<String>,
}

/// Create or refresh the shared hooks directory for `repo`.
pub fn materialize(
    repo: &RepoLocation,
    hooks_dir: &Path,
    options: &MaterializeOptions,
) -> Result<MaterializeReport> {
    let local_dir = hooks_dir.join(LOCAL_DIR);
    fs::create_dir_all(&local_dir).map_err(HooksError::io("create directory", &local_dir))?;

    let hooks_dir = fs::canonicalize(hooks_dir).map_err(HooksError::io("resolve", hooks_dir))?;
    let local_dir = hooks_dir.join(LOCAL_DIR);

    let mut report = MaterializeReport {
        hooks_dir: hooks_dir.clone(),
        local_dir: local_dir.clone(),
        ..Default::default()
    };

    let (rule, added) = ensure_ignore_rule(repo, &hooks_dir)?;
    report.ignore_rule = rule;
    report.ignore_rule_added = added;

    let functions = hooks_dir.join(FUNCTIONS_FILE);
    write_managed(
        &functions,
        &templates::functions_library(),
        false,
        options.reset,
        &mut report,
    )?;

    let example = local_dir.join("post-checkout");
    write_managed(
        &example,
        &templates::example_local_hook(),
        true,
        options.reset,
        &mut report,
    )?;

    let merge_source = merge_source_dir(repo, &hooks_dir);
    for hook in STANDARD_HOOKS {
        let target = hooks_dir.join(hook);
        if target.exists() && !options.reset {
            tracing::debug!(path = %target.display(), "hook exists, skipping");
            report.skipped.push(target);
            continue;
        }

        let existing = match &merge_source {
            Some(dir) => read_existing_hook(&dir.join(hook))?,
            None => None,
        };
        let content = match existing.map(String::from_utf8) {
            Some(Ok(body)) => {
                tracing::debug!(hook, "preserving existing native hook body");
                report.merged.push(hook.to_string());
                templates::merge_with_existing(&body)
            }
            Some(Err(_)) => {
                tracing::debug!(hook, "native hook is not UTF-8 text, not merging");
                report.not_merged.push(hook.to_string());
                templates::hook_script(hook, &options.lfs_config_key)
            }
            None => templates::hook_script(hook, &options.lfs_config_key),
        };

        write_executable(&target, &content)?;
        report.written.push(target);
    }

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        merged = report.merged.len(),
        "materialized hooks in {}",
        hooks_dir.display()
    );
    Ok(report)
}

/// Write `content` to `path` unless it exists and no reset was requested.
fn write_managed(
    path: &Path,
    content: &str,
    executable: bool,
    reset: bool,
    report: &mut MaterializeReport,
) -> Result<()> {
    if path.exists() && !reset {
        tracing::debug!(path = %path.display(), "exists, skipping");
        report.skipped.push(path.to_path_buf());
        return Ok(());
    }
    if executable {
        write_executable(path, content)?;
    } else {
        fs::write(path, content).map_err(HooksError::io("write", path))?;
    }
    tracing::debug!(path = %path.display(), "written");
    report.written.push(path.to_path_buf());
    Ok(())
}

fn write_executable(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(HooksError::io("write", path))?;
    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
        .map_err(HooksError::io("set permissions on", path))
}

/// Directory whose hook bodies are preserved when generating.
///
/// That is git's own hooks directory, unless it already resolves to the
/// hooks directory being generated (after linking), in which case the
/// "existing" bodies would be our own output.
fn merge_source_dir(repo: &RepoLocation, hooks_dir: &Path) -> Option<PathBuf> {
    let native = repo.native_hooks_dir();
    match fs::canonicalize(&native) {
        Ok(resolved) if resolved == hooks_dir => None,
        Ok(resolved) => Some(resolved),
        Err(_) => None,
    }
}

/// Read a native hook body, returning `None` if it is missing or blank.
fn read_existing_hook(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok((!bytes.iter().all(u8::is_ascii_whitespace)).then_some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) if path.is_dir() => {
            tracing::debug!(path = %path.display(), "native hook is a directory, ignoring: {e}");
            Ok(None)
        }
        Err(e) => Err(HooksError::io("read", path)(e)),
    }
}

/// Ignore rule for `<hooks_dir>/local`, relative to the repository root.
pub fn ignore_rule(root: &Path, hooks_dir: &Path) -> Option<String> {
    let relative = hooks_dir.strip_prefix(root).ok()?;
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(LOCAL_DIR.to_string());
    Some(parts.join("/"))
}

/// Append the `local/` ignore rule to the root `.gitignore` if it is missing.
///
/// Returns the rule (if one applies) and whether it was appended.
fn ensure_ignore_rule(repo: &RepoLocation, hooks_dir: &Path) -> Result<(Option<String>, bool)> {
    let Some(rule) = ignore_rule(&repo.root, hooks_dir) else {
        tracing::debug!(
            hooks_dir = %hooks_dir.display(),
            "hooks directory is outside the working tree; not adding an ignore rule"
        );
        return Ok((None, false));
    };

    let path = repo.root.join(GITIGNORE);
    let existing = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(HooksError::io("read", &path)(e)),
    };

    if has_rule(&existing, &rule) {
        tracing::debug!(rule = %rule, "ignore rule already present");
        return Ok((Some(rule), false));
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&rule);
    updated.push('\n');
    fs::write(&path, updated).map_err(HooksError::io("write", &path))?;
    tracing::debug!(rule = %rule, path = %path.display(), "ignore rule appended");

    Ok((Some(rule), true))
}

fn has_rule(content: &str, rule: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let line = line.strip_suffix('/').unwrap_or(line);
        line == rule
    })
}
