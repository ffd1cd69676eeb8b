use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;

/// One regular file seen by the walker. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Absolute path under the scanned root.
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercased extension, `None` when the name has none.
    pub extension: Option<String>,
    pub modified: SystemTime,
}

/// Per-extension tally across the whole walked set.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionStat {
    /// Lowercased extension; empty string groups extension-less files.
    pub extension: String,
    pub file_count: u64,
    pub total_size_bytes: u64,
}

/// Produced once per walk.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub total_files: u64,
    pub total_bytes: u64,
    pub elapsed_ms: u64,
    /// Entries (and their subtrees) skipped over I/O or permission errors.
    pub errors_skipped: u64,
    /// True when the scan was cancelled and the report is partial.
    pub cancelled: bool,
}

/// Result of `scan_directory`.
#[derive(Debug, Serialize)]
pub struct DirectoryReport {
    pub root: PathBuf,
    /// Largest files, descending by size, at most the requested limit.
    pub top_files: Vec<FileRecord>,
    /// Large files untouched for longer than the configured stale window.
    pub stale_files: Vec<FileRecord>,
    /// Sorted by total size, descending.
    pub by_extension: Vec<ExtensionStat>,
    pub summary: ScanSummary,
}

/// One junk category as reported by `scan_junk`.
#[derive(Debug, Serialize)]
pub struct JunkCategoryReport {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Sum over every member, even when `items` is truncated.
    pub total_bytes: u64,
    pub file_count: u64,
    /// Caller-level hint; the engine never filters a selection by it.
    pub selected_by_default: bool,
    /// Largest members first, truncated for display.
    pub items: Vec<FileRecord>,
}

/// Result of `scan_junk`.
#[derive(Debug, Serialize)]
pub struct JunkReport {
    pub categories: Vec<JunkCategoryReport>,
    pub summary: ScanSummary,
}

/// Files confirmed identical by size and content hash. At least two
/// members by construction; hash equality is accepted as content equality.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Hex digest of the members' content.
    pub hash: String,
    pub size_bytes: u64,
    pub members: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Cost of keeping every copy but one.
    pub fn wasted_bytes(&self) -> u64 {
        self.size_bytes * (self.members.len() as u64 - 1)
    }
}

/// Result of `find_duplicates`.
#[derive(Debug, Serialize)]
pub struct DuplicateReport {
    pub groups: Vec<DuplicateGroup>,
    pub total_groups: usize,
    pub total_wasted_bytes: u64,
    pub summary: ScanSummary,
}

/// One path the executor could not remove.
#[derive(Debug, Clone, Serialize)]
pub struct CleanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a remediation call. Never transactional: failures are listed
/// here and do not undo the deletions that succeeded.
#[derive(Debug, Default, Serialize)]
pub struct CleanResult {
    /// Bytes actually freed; failed or vanished paths contribute nothing.
    pub freed_bytes: u64,
    pub deleted_count: u64,
    pub errors: Vec<CleanFailure>,
}
