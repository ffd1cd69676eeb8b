use crate::rules::{default_rules, JunkCategorySpec};

/// Engine configuration. Read-only during a scan; the engine holds no
/// other cross-call state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of the top-files table.
    pub top_files: usize,

    /// Files untouched for this many days are reported as stale.
    pub stale_days: u64,

    /// Per-category member lists in junk reports are truncated to this
    /// many entries (byte totals still cover the full set).
    pub items_per_category: usize,

    /// Worker threads for content hashing (0 = one per logical CPU).
    pub hash_threads: usize,

    /// Bounded buffer between the walker and its consumers.
    pub channel_capacity: usize,

    /// Ordered junk category rule table; first match wins.
    pub rules: Vec<JunkCategorySpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_files: 20,
            stale_days: 90,
            items_per_category: 100,
            hash_threads: 0, // auto
            channel_capacity: 1024,
            rules: default_rules(),
        }
    }
}

impl Config {
    /// Effective hashing pool size.
    pub fn effective_hash_threads(&self) -> usize {
        if self.hash_threads == 0 {
            num_cpus::get()
        } else {
            self.hash_threads
        }
    }
}
