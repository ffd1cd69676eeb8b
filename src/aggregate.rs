//! Streaming size/extension aggregation: one O(n log N) pass over the
//! walker's stream, bounded memory regardless of tree size.

use crate::model::{ExtensionStat, FileRecord, ScanSummary};
use crate::walker::WalkStats;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant, SystemTime};

struct HeapEntry {
    size_bytes: u64,
    /// First-seen sequence number; on size ties the earlier record wins.
    seq: u64,
    record: FileRecord,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Among equal sizes the later-seen entry ranks lower, so it is the
        // one evicted first and ties stay stable on first-seen order.
        self.size_bytes
            .cmp(&other.size_bytes)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Fixed-capacity table of the largest files seen so far, kept as a
/// min-heap so each insertion is O(log N) and memory is O(N).
pub struct TopFilesTable {
    capacity: usize,
    heap: BinaryHeap<Reverse<HeapEntry>>,
}

impl TopFilesTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn insert(&mut self, record: FileRecord, seq: u64) {
        if self.capacity == 0 {
            return;
        }
        let entry = HeapEntry {
            size_bytes: record.size_bytes,
            seq,
            record,
        };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(entry));
        } else if let Some(Reverse(min)) = self.heap.peek() {
            // Strictly larger only: an equal-sized latecomer never evicts.
            if entry.size_bytes > min.size_bytes {
                self.heap.pop();
                self.heap.push(Reverse(entry));
            }
        }
    }

    /// Largest first; size ties in first-seen order.
    pub fn into_sorted(self) -> Vec<FileRecord> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(e)| e.record)
            .collect()
    }
}

/// Consumes the record stream once and yields the top-files table, the
/// stale-files table, per-extension tallies, and the scan summary.
pub struct Aggregator {
    top: TopFilesTable,
    stale: TopFilesTable,
    stale_cutoff: SystemTime,
    by_extension: HashMap<String, (u64, u64)>,
    total_files: u64,
    total_bytes: u64,
    seq: u64,
    started: Instant,
}

pub struct AggregateOutput {
    pub top_files: Vec<FileRecord>,
    pub stale_files: Vec<FileRecord>,
    pub by_extension: Vec<ExtensionStat>,
    pub summary: ScanSummary,
}

impl Aggregator {
    pub fn new(top_capacity: usize, stale_days: u64) -> Self {
        let stale_cutoff = SystemTime::now()
            .checked_sub(Duration::from_secs(stale_days * 86_400))
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Self {
            top: TopFilesTable::new(top_capacity),
            stale: TopFilesTable::new(top_capacity),
            stale_cutoff,
            by_extension: HashMap::new(),
            total_files: 0,
            total_bytes: 0,
            seq: 0,
            started: Instant::now(),
        }
    }

    pub fn observe(&mut self, record: FileRecord) {
        self.total_files += 1;
        self.total_bytes += record.size_bytes;

        // Missing extension tallies under the empty-string sentinel.
        let key = record.extension.clone().unwrap_or_default();
        let slot = self.by_extension.entry(key).or_insert((0, 0));
        slot.0 += 1;
        slot.1 += record.size_bytes;

        if record.modified <= self.stale_cutoff {
            self.stale.insert(record.clone(), self.seq);
        }
        self.top.insert(record, self.seq);
        self.seq += 1;
    }

    pub fn finish(self, walk: WalkStats) -> AggregateOutput {
        let mut by_extension: Vec<ExtensionStat> = self
            .by_extension
            .into_iter()
            .map(|(extension, (file_count, total_size_bytes))| ExtensionStat {
                extension,
                file_count,
                total_size_bytes,
            })
            .collect();
        by_extension.sort_by(|a, b| {
            b.total_size_bytes
                .cmp(&a.total_size_bytes)
                .then_with(|| a.extension.cmp(&b.extension))
        });

        AggregateOutput {
            top_files: self.top.into_sorted(),
            stale_files: self.stale.into_sorted(),
            by_extension,
            summary: ScanSummary {
                total_files: self.total_files,
                total_bytes: self.total_bytes,
                elapsed_ms: self.started.elapsed().as_millis() as u64,
                errors_skipped: walk.errors_skipped,
                cancelled: walk.cancelled,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str, size: u64, ext: Option<&str>) -> FileRecord {
        FileRecord {
            path: PathBuf::from("/scan").join(name),
            size_bytes: size,
            extension: ext.map(str::to_string),
            modified: SystemTime::now(),
        }
    }

    #[test]
    fn top_table_keeps_largest_n_sorted() {
        let mut table = TopFilesTable::new(3);
        for (i, size) in [50u64, 10, 90, 30, 70].iter().enumerate() {
            table.insert(record(&format!("f{i}"), *size, None), i as u64);
        }
        let top = table.into_sorted();
        let sizes: Vec<_> = top.iter().map(|r| r.size_bytes).collect();
        assert_eq!(sizes, vec![90, 70, 50]);
    }

    #[test]
    fn size_ties_keep_first_seen() {
        let mut table = TopFilesTable::new(2);
        table.insert(record("first", 100, None), 0);
        table.insert(record("second", 100, None), 1);
        table.insert(record("third", 100, None), 2);

        let top = table.into_sorted();
        let names: Vec<_> = top
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn extension_tallies_use_sentinel_for_missing() {
        let mut agg = Aggregator::new(5, 90);
        agg.observe(record("a.jpg", 10, Some("jpg")));
        agg.observe(record("b.jpg", 30, Some("jpg")));
        agg.observe(record("plain", 5, None));

        let out = agg.finish(WalkStats::default());
        assert_eq!(out.summary.total_files, 3);
        assert_eq!(out.summary.total_bytes, 45);
        assert_eq!(out.by_extension[0].extension, "jpg");
        assert_eq!(out.by_extension[0].file_count, 2);
        assert_eq!(out.by_extension[0].total_size_bytes, 40);
        assert!(out.by_extension.iter().any(|s| s.extension.is_empty()));
    }

    #[test]
    fn stale_files_need_old_mtime() {
        let mut agg = Aggregator::new(5, 90);
        let mut old = record("ancient.iso", 100, Some("iso"));
        old.modified = SystemTime::UNIX_EPOCH;
        agg.observe(old);
        agg.observe(record("fresh.iso", 200, Some("iso")));

        let out = agg.finish(WalkStats::default());
        assert_eq!(out.stale_files.len(), 1);
        assert!(out.stale_files[0].path.ends_with("ancient.iso"));
        assert_eq!(out.top_files.len(), 2);
    }
}
