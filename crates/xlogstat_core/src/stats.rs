//! Per-segment statistics.
//!
//! A [`Statistics`] value is created per input segment, fed one dump line at a
//! time and finalized once the segment is exhausted.
//!
//! # Usage
//!
//! ```rust
//! use xlogstat_core::Statistics;
//!
//! let mut stats = Statistics::new();
//! stats.ingest("rmgr: Heap        desc: insert: rel 1663/12029/16385; tid 0/3");
//! stats.ingest("rmgr: Transaction desc: commit: 2014-01-20 10:10:10 CET");
//! stats.finalize();
//!
//! assert_eq!(stats.count, 2);
//! assert_eq!(stats.n_distinct_relation, 1);
//! assert_eq!(stats.avg_pages_per_transaction, 1.0);
//! ```

use crate::classify::{classify, Classification, Operation, RecordKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relation id -> page id -> number of records touching that page.
pub type RelationPageMap = BTreeMap<String, BTreeMap<String, u64>>;

/// Counters collected from a dump.
///
/// `n_other` and the two averages are derived values, valid after
/// [`Statistics::finalize`] (or a rollup) has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of lines seen, including blank ones.
    pub count: u64,

    // Record kinds
    /// Lines tagged `Heap`.
    pub n_heap: u64,
    /// Lines tagged `Heap2`.
    pub n_heap2: u64,
    /// Lines tagged `Btree`.
    pub n_btree: u64,
    /// Lines tagged `Transaction`.
    pub n_transaction: u64,
    /// `count` minus the four kind counters. Negative if kinds overlap.
    pub n_other: i64,

    // Operations
    /// Insert records.
    pub n_insert: u64,
    /// Update records.
    pub n_update: u64,
    /// Heap-only update records.
    pub n_hotupdate: u64,
    /// Delete records.
    pub n_delete: u64,
    /// Commit records.
    pub n_commit: u64,
    /// Abort records.
    pub n_abort: u64,

    // Relations and pages
    /// Relation references, repeats included.
    pub n_relation: u64,
    /// Page references, repeats included.
    pub n_page: u64,
    /// Distinct relations referenced.
    pub n_distinct_relation: u64,
    /// Distinct (relation, page) pairs referenced.
    pub n_distinct_page: u64,
    /// Backup blocks embedded in records.
    pub n_bkp: u64,

    // Derived
    /// `n_distinct_page / n_distinct_relation`, zero without relations.
    pub avg_pages_per_relation: f64,
    /// `n_page / n_transaction`, zero without transaction records.
    pub avg_pages_per_transaction: f64,

    /// Page activity per relation.
    pub relations: RelationPageMap,
}

impl Statistics {
    /// Creates an empty statistics instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds finalized statistics for the complete output of one dump.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self::new();
        stats.ingest_text(text);
        stats.finalize();
        stats
    }

    /// Ingests every line of `text`.
    ///
    /// The text is split on `\n` without dropping the trailing empty piece, so
    /// output ending in a newline counts one extra (blank) line.
    pub fn ingest_text(&mut self, text: &str) {
        for line in text.split('\n') {
            self.ingest(line);
        }
    }

    /// Classifies and ingests one line.
    pub fn ingest(&mut self, line: &str) {
        let classification = classify(line);
        self.record(&classification);
    }

    /// Ingests an already classified line.
    pub fn record(&mut self, c: &Classification) {
        self.count += 1;

        for kind in c.kinds() {
            *self.kind_counter(kind) += 1;
        }
        for op in c.operations() {
            *self.operation_counter(op) += 1;
        }

        if let Some(page) = &c.page {
            self.n_relation += 1;
            self.n_page += 1;

            if !self.relations.contains_key(&page.relation_id) {
                self.n_distinct_relation += 1;
            }
            let pages = self.relations.entry(page.relation_id.clone()).or_default();

            let seen = pages.entry(page.page_id.clone()).or_insert(0);
            if *seen == 0 {
                self.n_distinct_page += 1;
            }
            *seen += 1;
        }

        if let Some(backup) = c.backup {
            self.n_bkp += backup.set_count();
        }
    }

    /// Computes `n_other` and the averages from the current counters.
    pub fn finalize(&mut self) {
        let classified = self.n_heap + self.n_heap2 + self.n_btree + self.n_transaction;
        self.n_other = self.count as i64 - classified as i64;

        self.avg_pages_per_relation = ratio(self.n_distinct_page, self.n_distinct_relation);
        self.avg_pages_per_transaction = ratio(self.n_page, self.n_transaction);
    }

    /// Returns the counter for a record kind.
    #[must_use]
    pub fn kind_count(&self, kind: RecordKind) -> u64 {
        match kind {
            RecordKind::Heap => self.n_heap,
            RecordKind::Heap2 => self.n_heap2,
            RecordKind::Btree => self.n_btree,
            RecordKind::Transaction => self.n_transaction,
        }
    }

    /// Returns the counter for an operation.
    #[must_use]
    pub fn operation_count(&self, op: Operation) -> u64 {
        match op {
            Operation::Insert => self.n_insert,
            Operation::Update => self.n_update,
            Operation::HotUpdate => self.n_hotupdate,
            Operation::Delete => self.n_delete,
            Operation::Commit => self.n_commit,
            Operation::Abort => self.n_abort,
        }
    }

    /// Recounts distinct relations and pages from the relation map.
    pub(crate) fn recount_distinct(&mut self) {
        self.n_distinct_relation = self.relations.len() as u64;
        self.n_distinct_page = self.relations.values().map(|p| p.len() as u64).sum();
    }

    fn kind_counter(&mut self, kind: RecordKind) -> &mut u64 {
        match kind {
            RecordKind::Heap => &mut self.n_heap,
            RecordKind::Heap2 => &mut self.n_heap2,
            RecordKind::Btree => &mut self.n_btree,
            RecordKind::Transaction => &mut self.n_transaction,
        }
    }

    fn operation_counter(&mut self, op: Operation) -> &mut u64 {
        match op {
            Operation::Insert => &mut self.n_insert,
            Operation::Update => &mut self.n_update,
            Operation::HotUpdate => &mut self.n_hotupdate,
            Operation::Delete => &mut self.n_delete,
            Operation::Commit => &mut self.n_commit,
            Operation::Abort => &mut self.n_abort,
        }
    }
}

/// Division that yields zero for a zero denominator.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
