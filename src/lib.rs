//! Surf engine: filesystem scan and remediation.
//!
//! One bounded traversal per request feeds streaming consumers — a top-N
//! size/extension aggregator, a rule-table junk classifier, or a two-phase
//! duplicate detector — and a guarded executor performs best-effort batch
//! deletion. Nothing here is fatal to the process: per-entry failures are
//! counted and reported as data, and only request-level problems (bad
//! root, scan already running) surface as errors.

pub mod aggregate;
pub mod config;
pub mod disk;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod model;
pub mod remediate;
pub mod rules;
pub mod utils;
pub mod walker;

pub use config::Config;
pub use engine::Engine;
pub use error::{Result, ScanError};
pub use walker::CancelToken;
