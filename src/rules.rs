//! Junk category rule table and the classifier that applies it.
//!
//! The table is configuration: categories are evaluated in order and the
//! first matching rule wins, so a file lands in at most one category.
//! Files matching no rule are not junk — only listed locations are ever
//! offered for cleaning.

use crate::model::{FileRecord, JunkCategoryReport};
use std::path::{Path, PathBuf};

/// A single path-pattern rule.
#[derive(Debug, Clone)]
pub enum JunkMatcher {
    /// Matches every file under this directory.
    Prefix(PathBuf),
    /// Matches on a lowercased file-name suffix, e.g. ".log".
    Suffix(String),
}

impl JunkMatcher {
    fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Prefix(prefix) => path.starts_with(prefix),
            Self::Suffix(suffix) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_ascii_lowercase().ends_with(suffix))
                .unwrap_or(false),
        }
    }
}

/// One category in the rule table.
#[derive(Debug, Clone)]
pub struct JunkCategorySpec {
    /// Stable key used in clean selections (e.g. "system_cache").
    pub id: String,
    pub name: String,
    pub description: String,
    /// Caller-level default; trash ships unselected.
    pub selected_by_default: bool,
    pub matchers: Vec<JunkMatcher>,
}

impl JunkCategorySpec {
    pub fn matches(&self, path: &Path) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

/// Default macOS rule set: user and system caches, application logs,
/// temporary files, and the trash bin.
pub fn default_rules() -> Vec<JunkCategorySpec> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));

    vec![
        JunkCategorySpec {
            id: "system_cache".to_string(),
            name: "System & App Cache".to_string(),
            description: "Cached data applications can regenerate".to_string(),
            selected_by_default: true,
            matchers: vec![
                JunkMatcher::Prefix(home.join("Library/Caches")),
                JunkMatcher::Prefix(PathBuf::from("/Library/Caches")),
            ],
        },
        JunkCategorySpec {
            id: "app_logs".to_string(),
            name: "Application Logs".to_string(),
            description: "Log files written by applications and the system".to_string(),
            selected_by_default: true,
            matchers: vec![
                JunkMatcher::Prefix(home.join("Library/Logs")),
                JunkMatcher::Prefix(PathBuf::from("/Library/Logs")),
                JunkMatcher::Prefix(PathBuf::from("/private/var/log")),
                JunkMatcher::Suffix(".log".to_string()),
            ],
        },
        JunkCategorySpec {
            id: "temp_files".to_string(),
            name: "Temporary Files".to_string(),
            description: "Scratch files left in temporary directories".to_string(),
            selected_by_default: true,
            matchers: vec![
                JunkMatcher::Prefix(std::env::temp_dir()),
                JunkMatcher::Prefix(PathBuf::from("/private/tmp")),
            ],
        },
        JunkCategorySpec {
            id: "trash".to_string(),
            name: "Trash Bin".to_string(),
            description: "Files already moved to the trash".to_string(),
            selected_by_default: false,
            matchers: vec![JunkMatcher::Prefix(home.join(".Trash"))],
        },
    ]
}

/// Distinct prefix roots named by the table, in table order. These are the
/// directories a junk scan walks and the only roots cleaning may touch.
pub fn rule_roots(table: &[JunkCategorySpec]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for spec in table {
        for matcher in &spec.matchers {
            if let JunkMatcher::Prefix(p) = matcher {
                if !roots.iter().any(|r| r == p) {
                    roots.push(p.clone());
                }
            }
        }
    }
    roots
}

struct CategoryAccum {
    members: Vec<FileRecord>,
    total_bytes: u64,
}

/// Streaming classifier over one walk. Owns one accumulator per category;
/// nothing is shared with the walker.
pub struct Classifier<'a> {
    table: &'a [JunkCategorySpec],
    buckets: Vec<CategoryAccum>,
}

impl<'a> Classifier<'a> {
    pub fn new(table: &'a [JunkCategorySpec]) -> Self {
        let buckets = table
            .iter()
            .map(|_| CategoryAccum {
                members: Vec::new(),
                total_bytes: 0,
            })
            .collect();
        Self { table, buckets }
    }

    /// Append the record to the first matching category, or drop it.
    pub fn observe(&mut self, record: FileRecord) {
        for (spec, bucket) in self.table.iter().zip(self.buckets.iter_mut()) {
            if spec.matches(&record.path) {
                bucket.total_bytes += record.size_bytes;
                bucket.members.push(record);
                return;
            }
        }
    }

    /// Category reports with member lists truncated to `max_items` largest
    /// entries; byte totals and counts always cover the full member set.
    pub fn finish(self, max_items: usize) -> Vec<JunkCategoryReport> {
        self.table
            .iter()
            .zip(self.buckets)
            .map(|(spec, mut bucket)| {
                let file_count = bucket.members.len() as u64;
                bucket.members.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
                bucket.members.truncate(max_items);
                JunkCategoryReport {
                    id: spec.id.clone(),
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    total_bytes: bucket.total_bytes,
                    file_count,
                    selected_by_default: spec.selected_by_default,
                    items: bucket.members,
                }
            })
            .collect()
    }
}
