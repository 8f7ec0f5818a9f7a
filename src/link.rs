//! Linking the shared hooks directory into git's hook path.
//!
//! A real `<common_dir>/hooks` directory is moved aside to
//! `<common_dir>/hooks_backup_<mtime>` before being replaced by a symlink to the
//! shared hooks directory. An existing symlink is simply replaced; it is
//! never backed up. In a linked worktree `<common_dir>` is the main
//! repository's `.git`, which is where git looks for hooks.

use crate::errors::{HooksError, Result};
use crate::repo::RepoLocation;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Prefix of backup directories created inside the common git directory.
pub const BACKUP_PREFIX: &str = "hooks_backup_";

/// A native hooks directory that was moved aside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    /// Last modification time of the original directory
    pub modified: DateTime<Utc>,
}

/// Outcome of [`link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Git's native hooks path, now a symlink
    pub link: PathBuf,
    /// Canonical hooks directory the link points at
    pub target: PathBuf,
    pub backup: Option<Backup>,
    /// A previous symlink that was replaced, with its old target
    pub replaced: Option<PathBuf>,
}

/// Point `<common_dir>/hooks` at `hooks_dir`.
pub fn link(repo: &RepoLocation, hooks_dir: &Path) -> Result<LinkReport> {
    if !hooks_dir.is_dir() {
        return Err(HooksError::MissingHooksDirectory {
            path: hooks_dir.to_path_buf(),
        });
    }
    let target = fs::canonicalize(hooks_dir).map_err(HooksError::io("resolve", hooks_dir))?;
    let native = repo.native_hooks_dir();

    let mut report = LinkReport {
        link: native.clone(),
        target: target.clone(),
        backup: None,
        replaced: None,
    };

    match fs::symlink_metadata(&native) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let previous = fs::read_link(&native).map_err(HooksError::io("read link", &native))?;
            fs::remove_file(&native).map_err(HooksError::io("remove link", &native))?;
            tracing::debug!(previous = %previous.display(), "removed existing hooks symlink");
            report.replaced = Some(previous);
        }
        Ok(meta) => {
            if native == target {
                tracing::debug!(
                    path = %native.display(),
                    "hooks directory is git's own hooks directory; nothing to link"
                );
                return Ok(report);
            }
            if target.starts_with(&native) {
                return Err(HooksError::HooksDirectoryInsideNative {
                    path: target,
                    native,
                });
            }
            let modified: DateTime<Utc> = meta
                .modified()
                .unwrap_or_else(|_| SystemTime::now())
                .into();
            let backup = backup_path(&repo.common_dir, modified.timestamp());
            fs::rename(&native, &backup).map_err(HooksError::io("back up", &native))?;
            tracing::debug!(backup = %backup.display(), "moved native hooks aside");
            report.backup = Some(Backup {
                path: backup,
                modified,
            });
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(HooksError::io("inspect", &native)(e)),
    }

    symlink(&target, &native).map_err(HooksError::io("create symlink", &native))?;
    tracing::info!(link = %native.display(), target = %target.display(), "linked hooks directory");

    Ok(report)
}

/// First free backup name for a directory last modified at `epoch_secs`.
///
/// The plain `hooks_backup_<secs>` name is tried first; if taken, a
/// `_<n>` counter is appended until an unused name is found.
fn backup_path(common_dir: &Path, epoch_secs: i64) -> PathBuf {
    let base = format!("{BACKUP_PREFIX}{epoch_secs}");
    let mut candidate = common_dir.join(&base);
    let mut n = 1u32;
    while fs::symlink_metadata(&candidate).is_ok() {
        candidate = common_dir.join(format!("{base}_{n}"));
        n += 1;
    }
    candidate
}
