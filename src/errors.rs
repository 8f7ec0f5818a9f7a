//! Typed error hierarchy for hook materialization and linking.
//!
//! `HooksError` covers the three failure classes the tool can hit:
//! - no enclosing repository
//! - `setup` pointed at a hooks directory that does not exist (or that
//!   lives inside git's own hooks directory)
//! - any filesystem failure while creating, moving or linking files

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HooksError>;

#[derive(Debug, Error)]
pub enum HooksError {
    #[error("Not a Git repository: {}", path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("Hooks directory '{}' not found", path.display())]
    MissingHooksDirectory { path: PathBuf },

    #[error(
        "Hooks directory '{}' lies inside git's hooks directory '{}'; it would be moved into the backup",
        path.display(),
        native.display()
    )]
    HooksDirectoryInsideNative { path: PathBuf, native: PathBuf },

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl HooksError {
    /// Build a closure that wraps an `io::Error` with the action and path it came from.
    ///
    /// Intended for `map_err`: `fs::write(&p, s).map_err(HooksError::io("write", &p))?`.
    pub fn io(
        action: &'static str,
        path: &std::path::Path,
    ) -> impl FnOnce(std::io::Error) -> Self + use<> {
        let path = path.to_path_buf();
        move |source| HooksError::Io {
            action,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_hooks_directory_message_names_path() {
        let err = HooksError::MissingHooksDirectory {
            path: PathBuf::from("/repo/hooks"),
        };
        assert_eq!(err.to_string(), "Hooks directory '/repo/hooks' not found");
    }

    #[test]
    fn test_io_helper_keeps_action_and_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = HooksError::io("write", Path::new("/repo/hooks/pre-push"))(source);

        let msg = err.to_string();
        assert!(msg.contains("Failed to write /repo/hooks/pre-push"));
        assert!(msg.contains("denied"));
        assert!(matches!(err, HooksError::Io { action: "write", .. }));
    }
}
