//! Repository discovery.
//!
//! Resolves the working-tree root and administrative directory of the
//! repository enclosing a start path. Every other module receives the
//! resulting [`RepoLocation`] explicitly instead of consulting the process
//! working directory.

use crate::errors::{HooksError, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// Name of the hooks directory git consults inside its administrative directory.
pub const NATIVE_HOOKS_DIR: &str = "hooks";

/// Where the enclosing repository lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// Canonical top-level working directory
    pub root: PathBuf,
    /// Canonical git directory of this working tree (normally `<root>/.git`;
    /// `<main>/.git/worktrees/<name>` for a linked worktree)
    pub git_dir: PathBuf,
    /// Canonical directory shared by all worktrees; git runs hooks from here
    pub common_dir: PathBuf,
}

impl RepoLocation {
    /// The hooks directory git itself runs hooks from.
    pub fn native_hooks_dir(&self) -> PathBuf {
        self.common_dir.join(NATIVE_HOOKS_DIR)
    }

    /// Default staging location for shared hooks: `<root>/hooks`.
    pub fn default_hooks_dir(&self) -> PathBuf {
        self.root.join("hooks")
    }
}

/// Locate the repository that encloses `start`.
///
/// Fails with [`HooksError::NotARepository`] when no repository is found or
/// the repository is bare (it has no top-level working directory).
pub fn locate_root(start: &Path) -> Result<RepoLocation> {
    let repo = Repository::discover(start).map_err(|e| HooksError::NotARepository {
        path: start.to_path_buf(),
        source: Some(e),
    })?;

    let Some(workdir) = repo.workdir() else {
        return Err(HooksError::NotARepository {
            path: start.to_path_buf(),
            source: None,
        });
    };

    let root = canonical(workdir)?;
    let git_dir = canonical(repo.path())?;
    let common_dir = canonical(repo.commondir())?;
    tracing::debug!(
        root = %root.display(),
        git_dir = %git_dir.display(),
        common_dir = %common_dir.display(),
        "located repository"
    );

    Ok(RepoLocation {
        root,
        git_dir,
        common_dir,
    })
}

fn canonical(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(HooksError::io("resolve", path))
}
