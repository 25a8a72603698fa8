//! # xlogstat core
//!
//! Statistics over `pg_xlogdump` output.
//!
//! This crate provides:
//! - Line classification (record kinds, operations, block references, backup blocks)
//! - Per-segment statistics accumulation
//! - Rollup of several segments into overall statistics
//! - Top relation ranking with optional name resolution
//!
//! ```rust
//! use xlogstat_core::{rank, Rollup, Statistics};
//!
//! let first = Statistics::from_text("rmgr: Heap  desc: insert: rel 1663/1/16385; tid 0/1");
//! let second = Statistics::from_text("rmgr: Heap  desc: insert: rel 1663/1/16385; tid 7/2");
//!
//! let mut rollup = Rollup::new();
//! rollup.add(&first);
//! rollup.add(&second);
//! let overall = rollup.finish()?;
//!
//! assert_eq!(rank(&overall.relations, 10), vec![("16385".to_string(), 2)]);
//! # Ok::<(), xlogstat_core::AnalyzerError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod classify;
mod config;
mod error;
mod rank;
mod resolver;
mod rollup;
mod source;
mod stats;

pub use analyzer::{analyze_segment, AnalysisReport, Analyzer, SegmentReport, SUMMARY_NAME};
pub use classify::{classify, BackupFlags, Classification, Operation, PageReference, RecordKind};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, AnalyzerResult};
pub use rank::{rank, rank_resolved, RankedRelation};
pub use resolver::{MapResolver, RelationResolver};
pub use rollup::{merge, reweight, Rollup};
pub use source::{FileSource, SegmentSource, TextSource};
pub use stats::{RelationPageMap, Statistics};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
