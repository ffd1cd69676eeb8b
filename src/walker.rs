//! Path walker: one bounded traversal producing a lazy stream of
//! [`FileRecord`]s over a channel, so a single pass can feed several
//! consumers without re-walking the tree.

use crate::model::FileRecord;
use crossbeam_channel::{bounded, Receiver};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Cooperative cancellation flag, safe to trip from any thread. Checked at
/// the top of each unit of work; partial results stay valid.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What the walker thread hands back once the stream closes.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkStats {
    /// Entries (plus their subtrees) skipped over I/O or permission errors.
    pub errors_skipped: u64,
    pub cancelled: bool,
}

/// Spawn one walk over `root`, streaming every regular file of at least
/// `min_size` bytes. Siblings are visited in lexicographic name order so a
/// pass is deterministic. Symlinks are never followed into directories; a
/// symlink to a regular file is recorded with the link's own size.
pub fn spawn_walk(
    root: PathBuf,
    min_size: u64,
    cancel: CancelToken,
    capacity: usize,
) -> (Receiver<FileRecord>, JoinHandle<WalkStats>) {
    let (tx, rx) = bounded(capacity);

    let handle = std::thread::spawn(move || {
        let mut stats = WalkStats::default();
        debug!("walk start: {}", root.display());

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                debug!("walk cancelled: {}", root.display());
                break;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    // Unreadable entry: skip it (and its subtree), count,
                    // keep walking.
                    stats.errors_skipped += 1;
                    warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };

            let file_type = entry.file_type();
            let record = if file_type.is_file() {
                match entry.metadata() {
                    Ok(meta) => make_record(entry.into_path(), meta.len(), meta.modified().ok()),
                    Err(e) => {
                        stats.errors_skipped += 1;
                        warn!("cannot stat {}: {e}", entry.path().display());
                        continue;
                    }
                }
            } else if file_type.is_symlink() {
                // Record links that point at regular files, sized as the
                // link itself. Broken links are not files and not errors.
                if !entry.path().metadata().map(|m| m.is_file()).unwrap_or(false) {
                    continue;
                }
                match entry.path().symlink_metadata() {
                    Ok(meta) => make_record(entry.into_path(), meta.len(), meta.modified().ok()),
                    Err(_) => continue,
                }
            } else {
                continue;
            };

            if record.size_bytes < min_size {
                continue;
            }
            // Consumer hung up: stop producing.
            if tx.send(record).is_err() {
                break;
            }
        }

        stats
    });

    (rx, handle)
}

fn make_record(path: PathBuf, size_bytes: u64, modified: Option<SystemTime>) -> FileRecord {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    FileRecord {
        path,
        size_bytes,
        extension,
        modified: modified.unwrap_or(SystemTime::UNIX_EPOCH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect(root: &std::path::Path, min_size: u64) -> (Vec<FileRecord>, WalkStats) {
        let (rx, handle) = spawn_walk(root.to_path_buf(), min_size, CancelToken::new(), 64);
        let records: Vec<_> = rx.iter().collect();
        let stats = handle.join().unwrap();
        (records, stats)
    }

    #[test]
    fn walk_is_deterministic_and_lexicographic() {
        let dir = tempdir().unwrap();
        for name in ["zebra.txt", "alpha.txt", "mango.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/deep.txt"), b"y").unwrap();

        let (first, stats) = collect(dir.path(), 0);
        let (second, _) = collect(dir.path(), 0);

        assert_eq!(first.len(), 4);
        assert_eq!(stats.errors_skipped, 0);
        let names: Vec<_> = first
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha.txt", "mango.txt", "deep.txt", "zebra.txt"]);
        let second_names: Vec<_> = second
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, second_names);
    }

    #[test]
    fn min_size_filters_records() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("small.bin"), [0u8; 10]).unwrap();
        fs::write(dir.path().join("large.bin"), [0u8; 5000]).unwrap();

        let (records, _) = collect(dir.path(), 1000);
        assert_eq!(records.len(), 1);
        assert!(records[0].path.ends_with("large.bin"));
    }

    #[test]
    fn extension_is_lowercased() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("PHOTO.JPG"), b"x").unwrap();
        fs::write(dir.path().join("noext"), b"x").unwrap();

        let (records, _) = collect(dir.path(), 0);
        let exts: Vec<_> = records.iter().map(|r| r.extension.clone()).collect();
        assert!(exts.contains(&Some("jpg".to_string())));
        assert!(exts.contains(&None));
    }

    #[test]
    fn cancelled_walk_stops_promptly() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();

        let cancel = CancelToken::new();
        cancel.cancel();
        let (rx, handle) = spawn_walk(dir.path().to_path_buf(), 0, cancel, 64);
        let records: Vec<_> = rx.iter().collect();
        let stats = handle.join().unwrap();

        assert!(records.is_empty());
        assert!(stats.cancelled);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("inside.txt"), b"data").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("loop")).unwrap();

        let (records, _) = collect(dir.path(), 0);
        // inside.txt must appear exactly once (via the real directory).
        let hits = records
            .iter()
            .filter(|r| r.path.ends_with("inside.txt"))
            .count();
        assert_eq!(hits, 1);
    }

    #[cfg(unix)]
    #[test]
    fn file_symlink_uses_link_size() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.bin");
        fs::write(&target, [0u8; 4096]).unwrap();
        let link = dir.path().join("link.bin");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let (records, _) = collect(dir.path(), 0);
        let link_rec = records.iter().find(|r| r.path == link).unwrap();
        let link_len = link.symlink_metadata().unwrap().len();
        assert_eq!(link_rec.size_bytes, link_len);
    }
}
