// crates/scenegate-mcp/src/workspace.rs
// ============================================================================
// Module: Workspace Listing
// Description: Bounded, deterministic file listing under a workspace root.
// Purpose: Back the `workspace.list_files` tool.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Listings never follow symbolic links and skip tool and VCS entries,
//! whether they are directories or files (a worktree `.git` file).
//! Paths are relative to the root, use forward slashes, and are sorted
//! before the file limit is applied.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// Entry names never listed or descended into.
pub const SKIPPED_NAMES: &[&str] = &[".git", ".venv", "__pycache__", "target"];

/// Default listing depth when the caller omits one.
pub const DEFAULT_LIST_DEPTH: usize = 3;

/// Result of a workspace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListing {
    /// Sorted relative paths.
    pub files: Vec<String>,
    /// True when `max_files` cut the listing short.
    pub truncated: bool,
}

/// Lists regular files under `root` down to `max_depth` directory levels.
///
/// Depth 0 lists only files directly under `root`.
///
/// # Errors
///
/// Returns an I/O error when `root` cannot be read.
pub fn list_files(root: &Path, max_depth: usize, max_files: usize) -> io::Result<FileListing> {
    let mut files = Vec::new();
    walk(root, "", 0, max_depth, &mut files)?;
    files.sort();
    let truncated = files.len() > max_files;
    files.truncate(max_files);
    Ok(FileListing {
        files,
        truncated,
    })
}

/// Collects files below `dir`; unreadable subdirectories are skipped.
fn walk(
    dir: &Path,
    prefix: &str,
    depth: usize,
    max_depth: usize,
    files: &mut Vec<String>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else {
            continue;
        };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if SKIPPED_NAMES.contains(&name.as_str()) {
            continue;
        }
        let relative = if prefix.is_empty() { name.clone() } else { format!("{prefix}/{name}") };
        if file_type.is_dir() {
            if depth < max_depth {
                let _ = walk(&entry.path(), &relative, depth + 1, max_depth, files);
            }
        } else if file_type.is_file() {
            files.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use std::fs;

    use super::list_files;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Cargo.toml"), "").unwrap();
        fs::create_dir_all(root.join("src/nested/deeper")).unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join("src/nested/mod.rs"), "").unwrap();
        fs::write(root.join("src/nested/deeper/leaf.rs"), "").unwrap();
        for skipped in [".git", ".venv", "__pycache__", "target"] {
            fs::create_dir_all(root.join(skipped)).unwrap();
            fs::write(root.join(skipped).join("hidden.txt"), "").unwrap();
        }
        dir
    }

    #[test]
    fn depth_bounds_descent() {
        let dir = fixture();
        let top = list_files(dir.path(), 0, 100).unwrap();
        assert_eq!(top.files, vec!["Cargo.toml"]);
        let two = list_files(dir.path(), 2, 100).unwrap();
        assert_eq!(two.files, vec!["Cargo.toml", "src/lib.rs", "src/nested/mod.rs"]);
        assert!(!two.truncated);
    }

    #[test]
    fn skipped_directories_never_appear() {
        let dir = fixture();
        let all = list_files(dir.path(), 10, 100).unwrap();
        assert!(all.files.iter().all(|path| !path.contains("hidden.txt")));
        assert!(all.files.contains(&"src/nested/deeper/leaf.rs".to_string()));
    }

    #[test]
    fn skipped_names_apply_to_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("worktree")).unwrap();
        fs::write(dir.path().join("worktree/.git"), "gitdir: ../.git/worktrees/w").unwrap();
        fs::write(dir.path().join("worktree/main.rs"), "").unwrap();
        fs::write(dir.path().join("target"), "").unwrap();
        let listing = list_files(dir.path(), 2, 100).unwrap();
        assert_eq!(listing.files, vec!["worktree/main.rs"]);
    }

    #[test]
    fn file_limit_truncates_sorted_listing() {
        let dir = fixture();
        let listing = list_files(dir.path(), 10, 2).unwrap();
        assert_eq!(listing.files, vec!["Cargo.toml", "src/lib.rs"]);
        assert!(listing.truncated);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("link")).unwrap();
        let listing = list_files(dir.path(), 10, 100).unwrap();
        assert!(listing.files.iter().all(|path| !path.starts_with("link")));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(&dir.path().join("absent"), 1, 10).is_err());
    }
}
