//! Two-phase duplicate detection: bucket by exact size, then confirm by
//! streamed content hash. Only files with a same-size peer are ever read,
//! which skips hashing for the vast majority of a tree.

use crate::error::{Result, ScanError};
use crate::model::{DuplicateGroup, FileRecord};
use crate::walker::CancelToken;
use log::warn;
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Hash read granularity; memory per worker is independent of file size.
const HASH_CHUNK: usize = 65_536;

/// Phase one: exact-size buckets fed from the walker's stream.
#[derive(Default)]
pub struct SizeBuckets {
    map: HashMap<u64, Vec<PathBuf>>,
}

impl SizeBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: FileRecord) {
        self.map.entry(record.size_bytes).or_default().push(record.path);
    }

    /// Buckets that still matter: two or more files of identical size.
    /// Singletons can have no duplicate and are discarded here.
    pub fn into_candidates(self) -> Vec<(u64, Vec<PathBuf>)> {
        let mut candidates: Vec<_> = self
            .map
            .into_iter()
            .filter(|(_, paths)| paths.len() >= 2)
            .collect();
        // Largest potential waste first; also makes output deterministic.
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates
    }
}

/// Whole-file blake3, streamed in fixed-size chunks. Returns `Ok(None)`
/// when cancellation interrupts the read.
fn hash_file(path: &Path, cancel: &CancelToken) -> std::io::Result<Option<blake3::Hash>> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; HASH_CHUNK];
    loop {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Some(hasher.finalize()))
}

/// Phase two: hash every member of every candidate bucket, in parallel
/// across buckets, and keep the groups that share size and digest.
/// Returns the groups plus how many files were dropped because they
/// became unreadable between bucketing and hashing.
pub fn confirm_groups(
    candidates: Vec<(u64, Vec<PathBuf>)>,
    threads: usize,
    cancel: &CancelToken,
) -> Result<(Vec<DuplicateGroup>, u64)> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

    let (mut groups, dropped) = pool.install(|| {
        candidates
            .par_iter()
            .map(|(size, paths)| hash_bucket(*size, paths, cancel))
            .reduce(
                || (Vec::new(), 0),
                |mut acc, (groups, dropped)| {
                    acc.0.extend(groups);
                    (acc.0, acc.1 + dropped)
                },
            )
    });

    groups.sort_by(|a, b| {
        b.wasted_bytes()
            .cmp(&a.wasted_bytes())
            .then_with(|| a.hash.cmp(&b.hash))
    });
    Ok((groups, dropped))
}

fn hash_bucket(size: u64, paths: &[PathBuf], cancel: &CancelToken) -> (Vec<DuplicateGroup>, u64) {
    if cancel.is_cancelled() {
        return (Vec::new(), 0);
    }

    let mut by_hash: HashMap<blake3::Hash, Vec<PathBuf>> = HashMap::new();
    let mut dropped = 0u64;
    for path in paths {
        match hash_file(path, cancel) {
            Ok(Some(hash)) => by_hash.entry(hash).or_default().push(path.clone()),
            Ok(None) => return (Vec::new(), dropped),
            Err(e) => {
                dropped += 1;
                warn!("dropping {} from duplicate check: {e}", path.display());
            }
        }
    }

    let mut groups: Vec<DuplicateGroup> = by_hash
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(hash, members)| DuplicateGroup {
            hash: hash.to_hex().to_string(),
            size_bytes: size,
            members,
        })
        .collect();
    groups.sort_by(|a, b| a.hash.cmp(&b.hash));
    (groups, dropped)
}
