//! Remediation executor: best-effort batch deletion with a mandatory
//! root-containment guard. Never transactional — each path is attempted
//! independently and failures are reported as data.

use crate::model::{CleanFailure, CleanResult};
use crate::utils;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// True when `path` is lexically inside one of the scanned roots. Paths
/// with parent-dir components are rejected outright so a selection cannot
/// escape a root it appears to live under.
fn contained_in_roots(path: &Path, roots: &[PathBuf]) -> bool {
    if !path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
        return false;
    }
    roots.iter().any(|root| path.starts_with(root))
}

/// Delete every selected path that lies inside `roots`.
///
/// Already-gone paths are success-no-ops so a retry of the same selection
/// is safe; `freed_bytes` counts only what was actually removed.
pub fn clean_paths(roots: &[PathBuf], selection: &[PathBuf]) -> CleanResult {
    let mut result = CleanResult::default();
    let mut seen: HashSet<&Path> = HashSet::new();

    for path in selection {
        if !seen.insert(path.as_path()) {
            continue;
        }

        if !contained_in_roots(path, roots) {
            warn!("refusing to delete outside scanned roots: {}", path.display());
            result.errors.push(CleanFailure {
                path: path.clone(),
                reason: "outside scanned roots".to_string(),
            });
            continue;
        }

        match utils::safe_remove(path) {
            Ok(freed) => {
                debug!("deleted {} ({freed} bytes)", path.display());
                result.freed_bytes += freed;
                result.deleted_count += 1;
            }
            // Vanished since it was selected: the goal state is reached.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                result.errors.push(CleanFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn deletes_and_reports_freed_bytes() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let file = root.join("junk.bin");
        fs::write(&file, vec![0u8; 2_097_152]).unwrap();
        let gone = root.join("already-deleted.bin");

        let result = clean_paths(&[root], &[gone, file.clone()]);
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.freed_bytes, 2_097_152);
        assert!(result.errors.is_empty());
        assert!(!file.exists());
    }

    #[test]
    fn second_invocation_is_a_no_op() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let file = root.join("junk.bin");
        fs::write(&file, [0u8; 100]).unwrap();
        let selection = vec![file];

        let first = clean_paths(&[root.clone()], &selection);
        assert_eq!(first.deleted_count, 1);

        let second = clean_paths(&[root], &selection);
        assert_eq!(second.deleted_count, 0);
        assert_eq!(second.freed_bytes, 0);
        assert!(second.errors.is_empty());
    }

    #[test]
    fn refuses_paths_outside_roots() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("scanned");
        fs::create_dir(&root).unwrap();
        let outside = dir.path().join("precious.txt");
        fs::write(&outside, b"keep me").unwrap();
        // A traversal attempt that lexically starts under the root.
        let sneaky = root.join("..").join("precious.txt");

        let result = clean_paths(&[root], &[outside.clone(), sneaky]);
        assert_eq!(result.deleted_count, 0);
        assert_eq!(result.errors.len(), 2);
        assert!(outside.exists());
    }

    #[test]
    fn duplicate_selection_entries_count_once() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let file = root.join("junk.bin");
        fs::write(&file, [0u8; 64]).unwrap();

        let result = clean_paths(&[root], &[file.clone(), file]);
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.freed_bytes, 64);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn removes_directories_recursively() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let cache = root.join("cache");
        fs::create_dir(&cache).unwrap();
        fs::write(cache.join("a.bin"), [0u8; 40]).unwrap();
        fs::write(cache.join("b.bin"), [0u8; 60]).unwrap();

        let result = clean_paths(&[root], &[cache.clone()]);
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.freed_bytes, 100);
        assert!(!cache.exists());
    }
}
