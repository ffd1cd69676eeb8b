//! Scan orchestrator: composes the walker with the aggregator, classifier,
//! or duplicate detector per request kind, and owns the in-flight registry
//! that keeps two walkers off the same root.

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::duplicates::{confirm_groups, SizeBuckets};
use crate::error::{Result, ScanError};
use crate::model::{
    CleanResult, DirectoryReport, DuplicateReport, JunkCategoryReport, JunkReport, ScanSummary,
};
use crate::remediate;
use crate::rules::{rule_roots, Classifier};
use crate::walker::{spawn_walk, CancelToken, WalkStats};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Debug)]
pub struct Engine {
    config: Config,
    in_flight: Mutex<HashSet<PathBuf>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Releases the registered roots when a scan finishes, even on early
/// return.
#[derive(Debug)]
struct ScanGuard<'a> {
    engine: &'a Engine,
    roots: Vec<PathBuf>,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .engine
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for root in &self.roots {
            in_flight.remove(root);
        }
    }
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn register(&self, roots: Vec<PathBuf>) -> Result<ScanGuard<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(busy) = roots.iter().find(|r| in_flight.contains(*r)) {
            return Err(ScanError::AlreadyScanning(busy.clone()));
        }
        for root in &roots {
            in_flight.insert(root.clone());
        }
        Ok(ScanGuard {
            engine: self,
            roots,
        })
    }

    fn canonical_root(path: &Path) -> Result<PathBuf> {
        let root = std::fs::canonicalize(path)
            .map_err(|_| ScanError::RootNotFound(path.to_path_buf()))?;
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(path.to_path_buf()));
        }
        Ok(root)
    }

    /// One walk over `path`: largest files, stale files, per-extension
    /// tallies, and a summary. `min_size_mb` drops small files before
    /// aggregation; `limit` bounds both ranked tables.
    pub fn scan_directory(
        &self,
        path: &Path,
        limit: Option<usize>,
        min_size_mb: Option<u64>,
        cancel: &CancelToken,
    ) -> Result<DirectoryReport> {
        let root = Self::canonical_root(path)?;
        let _guard = self.register(vec![root.clone()])?;
        let min_size = min_size_mb.unwrap_or(0) * 1_048_576;

        debug!("scan_directory {}: walking", root.display());
        let (rx, handle) = spawn_walk(
            root.clone(),
            min_size,
            cancel.clone(),
            self.config.channel_capacity,
        );
        let mut aggregator = Aggregator::new(
            limit.unwrap_or(self.config.top_files),
            self.config.stale_days,
        );
        for record in rx {
            aggregator.observe(record);
        }
        let stats = handle.join().unwrap_or_default();

        debug!("scan_directory {}: done", root.display());
        let out = aggregator.finish(stats);
        Ok(DirectoryReport {
            root,
            top_files: out.top_files,
            stale_files: out.stale_files,
            by_extension: out.by_extension,
            summary: out.summary,
        })
    }

    /// Walk every configured junk location and bucket the findings into
    /// the rule table's categories.
    pub fn scan_junk(&self, cancel: &CancelToken) -> Result<JunkReport> {
        self.collect_junk(cancel, self.config.items_per_category)
    }

    fn collect_junk(&self, cancel: &CancelToken, max_items: usize) -> Result<JunkReport> {
        let roots = rule_roots(&self.config.rules);
        let _guard = self.register(roots.clone())?;
        let started = Instant::now();

        let mut classifier = Classifier::new(&self.config.rules);
        let mut total_files = 0u64;
        let mut total_bytes = 0u64;
        let mut walk = WalkStats::default();

        for root in roots.into_iter().filter(|r| r.is_dir()) {
            if cancel.is_cancelled() {
                walk.cancelled = true;
                break;
            }
            debug!("scan_junk: walking {}", root.display());
            let (rx, handle) = spawn_walk(root, 0, cancel.clone(), self.config.channel_capacity);
            for record in rx {
                total_files += 1;
                total_bytes += record.size_bytes;
                classifier.observe(record);
            }
            let stats = handle.join().unwrap_or_default();
            walk.errors_skipped += stats.errors_skipped;
            walk.cancelled |= stats.cancelled;
        }

        debug!("scan_junk: done ({total_files} files classified)");
        Ok(JunkReport {
            categories: classifier.finish(max_items),
            summary: ScanSummary {
                total_files,
                total_bytes,
                elapsed_ms: started.elapsed().as_millis() as u64,
                errors_skipped: walk.errors_skipped,
                cancelled: walk.cancelled,
            },
        })
    }

    /// Two-phase duplicate detection under `path`. Files below
    /// `min_size_mb` (default 1 MB) are excluded before bucketing.
    pub fn find_duplicates(
        &self,
        path: &Path,
        min_size_mb: Option<u64>,
        cancel: &CancelToken,
    ) -> Result<DuplicateReport> {
        let root = Self::canonical_root(path)?;
        let _guard = self.register(vec![root.clone()])?;
        let min_size = min_size_mb.unwrap_or(1) * 1_048_576;
        let started = Instant::now();

        debug!("find_duplicates {}: walking", root.display());
        let (rx, handle) = spawn_walk(
            root.clone(),
            min_size,
            cancel.clone(),
            self.config.channel_capacity,
        );
        let mut buckets = SizeBuckets::new();
        let mut total_files = 0u64;
        let mut total_bytes = 0u64;
        for record in rx {
            total_files += 1;
            total_bytes += record.size_bytes;
            buckets.observe(record);
        }
        let stats = handle.join().unwrap_or_default();

        let candidates = buckets.into_candidates();
        debug!(
            "find_duplicates {}: hashing {} candidate buckets",
            root.display(),
            candidates.len()
        );
        let (groups, dropped) = confirm_groups(
            candidates,
            self.config.effective_hash_threads(),
            cancel,
        )?;
        let total_wasted_bytes = groups.iter().map(|g| g.wasted_bytes()).sum();

        debug!("find_duplicates {}: done ({} groups)", root.display(), groups.len());
        Ok(DuplicateReport {
            total_groups: groups.len(),
            groups,
            total_wasted_bytes,
            summary: ScanSummary {
                total_files,
                total_bytes,
                elapsed_ms: started.elapsed().as_millis() as u64,
                errors_skipped: stats.errors_skipped + dropped,
                cancelled: stats.cancelled || cancel.is_cancelled(),
            },
        })
    }

    /// Delete every member of the selected junk categories. Runs a fresh
    /// classification pass so the selection reflects the disk as it is
    /// now, then deletes inside the rule-table roots only.
    pub fn clean_junk(&self, category_ids: &[String]) -> Result<CleanResult> {
        for id in category_ids {
            if !self.config.rules.iter().any(|spec| &spec.id == id) {
                return Err(ScanError::UnknownCategory(id.clone()));
            }
        }

        let report = self.collect_junk(&CancelToken::new(), usize::MAX)?;
        let selection: Vec<PathBuf> = report
            .categories
            .into_iter()
            .filter(|c: &JunkCategoryReport| category_ids.contains(&c.id))
            .flat_map(|c| c.items.into_iter().map(|r| r.path))
            .collect();

        let roots = rule_roots(&self.config.rules);
        debug!("clean_junk: removing {} paths", selection.len());
        Ok(remediate::clean_paths(&roots, &selection))
    }

    /// Delete an explicit list of paths, all of which must live under
    /// `root` (typically a root previously scanned for duplicates).
    pub fn clean_paths(&self, root: &Path, selection: &[PathBuf]) -> Result<CleanResult> {
        let root = Self::canonical_root(root)?;
        Ok(remediate::clean_paths(&[root], selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_scan_of_same_root_is_rejected() {
        let engine = Engine::default();
        let root = PathBuf::from("/scan/root");

        let guard = engine.register(vec![root.clone()]).unwrap();
        let err = engine.register(vec![root.clone()]).unwrap_err();
        assert!(matches!(err, ScanError::AlreadyScanning(p) if p == root));

        drop(guard);
        assert!(engine.register(vec![root]).is_ok());
    }

    #[test]
    fn registry_rejects_overlap_across_root_sets() {
        let engine = Engine::default();
        let a = PathBuf::from("/scan/a");
        let b = PathBuf::from("/scan/b");

        let _guard = engine.register(vec![a.clone(), b.clone()]).unwrap();
        assert!(engine.register(vec![b]).is_err());
        assert!(engine.register(vec![PathBuf::from("/scan/c")]).is_ok());
    }

    #[test]
    fn missing_root_is_a_request_error() {
        let engine = Engine::default();
        let err = engine
            .scan_directory(
                Path::new("/definitely/not/here"),
                None,
                None,
                &CancelToken::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound(_)));
    }

    #[test]
    fn unknown_category_is_rejected_before_scanning() {
        let engine = Engine::default();
        let err = engine
            .clean_junk(&["no_such_category".to_string()])
            .unwrap_err();
        assert!(matches!(err, ScanError::UnknownCategory(_)));
    }
}
