//! Shell templates for the generated hook scripts.
//!
//! Everything written into the hooks directory is built here. Templates are
//! plain POSIX `sh` so they run under whatever `/bin/sh` the host provides.

/// Interpreter directive every generated script starts with.
pub const INTERPRETER: &str = "#!/bin/sh";

/// Default `git config` key that switches the Git LFS guard on.
pub const DEFAULT_LFS_CONFIG_KEY: &str = "hooks.requireLfs";

/// File name of the shared shell function library.
pub const FUNCTIONS_FILE: &str = "functions.sh";

/// Directory (inside the hooks directory) holding untracked per-user hooks.
pub const LOCAL_DIR: &str = "local";

/// First line of the delegation snippet; used to recognise it in existing hook bodies.
pub const DELEGATION_MARKER: &str = "# git-common-hooks: delegate to local hook";

/// The client-side hooks a shared hook script is generated for.
pub const STANDARD_HOOKS: [&str; 14] = [
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "post-rewrite",
    "pre-auto-gc",
];

/// Hooks Git LFS installs itself into; these get the LFS guard.
pub const LFS_HOOKS: [&str; 4] = ["post-checkout", "post-commit", "post-merge", "pre-push"];

/// Whether `hook` is one of the hooks Git LFS needs to run from.
pub fn is_lfs_hook(hook: &str) -> bool {
    LFS_HOOKS.contains(&hook)
}

/// Body of `functions.sh`.
pub fn functions_library() -> String {
    format!(
        r#"{INTERPRETER}
# Shared helpers sourced by the generated hooks.

# Run {LOCAL_DIR}/<hook-name> next to the calling hook when it exists and is
# executable. Returns the local hook's exit status, or 0 when there is none.
run_local_hook() {{
  local_hook="$(dirname "$0")/{LOCAL_DIR}/$(basename "$0")"
  if [ ! -f "$local_hook" ] || [ ! -x "$local_hook" ]; then
    return 0
  fi
  "$local_hook" "$@"
}}
"#
    )
}

/// Body of the example `local/post-checkout` hook.
pub fn example_local_hook() -> String {
    format!("{INTERPRETER}\necho \"Example post-checkout hook! Happy coding\"\n")
}

/// Snippet appended to every hook to hand over to its local counterpart.
pub fn delegation_snippet() -> String {
    format!(
        "{DELEGATION_MARKER}\n. \"$(dirname \"$0\")/{FUNCTIONS_FILE}\"\nrun_local_hook \"$@\"\n"
    )
}

/// Guard that forwards the hook to `git lfs` when the repository requires it.
pub fn lfs_guard(hook: &str, config_key: &str) -> String {
    format!(
        r#"if [ "$(git config --bool {config_key})" = "true" ]; then
  command -v git-lfs >/dev/null 2>&1 || {{
    printf >&2 "\n%s\n\n" "This repository is configured for Git LFS but 'git-lfs' was not found on your path. If you no longer wish to use Git LFS, unset '{config_key}' or remove this hook by deleting the '$0' file."
    exit 2
  }}
  git lfs {hook} "$@" || exit $?
fi
"#
    )
}

/// Canonical content of a generated hook when there is nothing to preserve.
pub fn hook_script(hook: &str, lfs_config_key: &str) -> String {
    let mut script = format!("{INTERPRETER}\n");
    if is_lfs_hook(hook) {
        script.push_str(&lfs_guard(hook, lfs_config_key));
        script.push('\n');
    }
    script.push_str(&delegation_snippet());
    script
}

/// Append the delegation snippet to an existing hook body.
///
/// A delegation block already present in `existing` is cut off first, so the
/// result always carries exactly one.
pub fn merge_with_existing(existing: &str) -> String {
    let body = match find_marker_line(existing) {
        Some(idx) => &existing[..idx],
        None => existing,
    };

    let mut merged = body.trim_end().to_string();
    if merged.is_empty() {
        return format!("{INTERPRETER}\n{}", delegation_snippet());
    }
    merged.push_str("\n\n");
    merged.push_str(&delegation_snippet());
    merged
}

/// Byte offset of the line holding [`DELEGATION_MARKER`], if any.
fn find_marker_line(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_end() == DELEGATION_MARKER {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_unique_standard_hooks() {
        let mut names = STANDARD_HOOKS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
        for hook in LFS_HOOKS {
            assert!(STANDARD_HOOKS.contains(&hook), "{hook} must be standard");
        }
    }

    #[test]
    fn test_plain_hook_script() {
        let script = hook_script("pre-commit", DEFAULT_LFS_CONFIG_KEY);
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(!script.contains("git lfs"));
        assert!(script.ends_with(&delegation_snippet()));
    }

    #[test]
    fn test_lfs_hook_script_has_guard_before_delegation() {
        let script = hook_script("pre-push", DEFAULT_LFS_CONFIG_KEY);
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("git config --bool hooks.requireLfs"));
        assert!(script.contains("command -v git-lfs"));
        assert!(script.contains("exit 2"));
        assert!(script.contains("git lfs pre-push \"$@\""));

        let guard = script.find("git lfs pre-push").unwrap();
        let delegation = script.find(DELEGATION_MARKER).unwrap();
        assert!(guard < delegation);
    }

    #[test]
    fn test_lfs_guard_uses_configured_key() {
        let guard = lfs_guard("post-merge", "acme.lfs");
        assert!(guard.contains("git config --bool acme.lfs"));
        assert!(guard.contains("git lfs post-merge"));
    }

    #[test]
    fn test_functions_library_defines_run_local_hook() {
        let lib = functions_library();
        assert!(lib.contains("run_local_hook() {"));
        assert!(lib.contains("/local/$(basename \"$0\")"));
        assert!(lib.contains("return 0"));
    }

    #[test]
    fn test_merge_appends_snippet_to_existing_body() {
        let merged = merge_with_existing("echo hello\n");
        assert!(merged.starts_with("echo hello"));
        assert!(merged.ends_with(&delegation_snippet()));
    }

    #[test]
    fn test_merge_does_not_duplicate_snippet() {
        let once = merge_with_existing("#!/bin/sh\necho hello\n");
        let twice = merge_with_existing(&once);
        assert_eq!(once, twice);
        assert_eq!(twice.matches(DELEGATION_MARKER).count(), 1);
    }

    #[test]
    fn test_merge_keeps_content_after_marker_out() {
        let existing = format!("echo before\n{}echo after\n", delegation_snippet());
        let merged = merge_with_existing(&existing);
        assert!(merged.starts_with("echo before"));
        assert!(!merged.contains("echo after"));
    }

    #[test]
    fn test_merge_of_bare_snippet_adds_interpreter() {
        let merged = merge_with_existing(&delegation_snippet());
        assert!(merged.starts_with(INTERPRETER));
        assert_eq!(merged.matches(DELEGATION_MARKER).count(), 1);
    }
}
