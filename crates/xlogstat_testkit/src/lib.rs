//! # xlogstat testkit
//!
//! Test utilities for xlogstat.
//!
//! This crate provides:
//! - Dump fixtures that render `pg_xlogdump` style lines
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use xlogstat_testkit::prelude::*;
//! use xlogstat_core::Statistics;
//!
//! let dump = DumpBuilder::new()
//!     .record(Record::HeapInsert { relation: 16385, block: 3 })
//!     .commit()
//!     .build();
//! let stats = Statistics::from_text(&dump);
//! assert_eq!(stats.n_insert, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
