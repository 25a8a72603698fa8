//! Rolling several segments up into overall statistics.
//!
//! Scalar counters are summed. Distinct counts and averages are never summed:
//! they are derived again from the merged relation map and merged totals,
//! since a relation touched by two segments is still one relation and an
//! average of averages is not an average.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::stats::Statistics;

/// Merges `input` into `overall`.
///
/// Relation maps are unioned with occurrence counts summed. Distinct counts
/// of `overall` are recounted from the merged map. Derived values are left
/// stale until [`reweight`] runs.
pub fn merge(overall: &mut Statistics, input: &Statistics) {
    overall.count += input.count;

    overall.n_heap += input.n_heap;
    overall.n_heap2 += input.n_heap2;
    overall.n_btree += input.n_btree;
    overall.n_transaction += input.n_transaction;

    overall.n_insert += input.n_insert;
    overall.n_update += input.n_update;
    overall.n_hotupdate += input.n_hotupdate;
    overall.n_delete += input.n_delete;
    overall.n_commit += input.n_commit;
    overall.n_abort += input.n_abort;

    overall.n_relation += input.n_relation;
    overall.n_page += input.n_page;
    overall.n_bkp += input.n_bkp;

    for (relation, pages) in &input.relations {
        let merged = overall.relations.entry(relation.clone()).or_default();
        for (page, seen) in pages {
            *merged.entry(page.clone()).or_insert(0) += seen;
        }
    }
    overall.recount_distinct();
}

/// Derives `n_other` and the averages of merged statistics.
///
/// The values are computed from the merged totals, so the result does not
/// depend on the number of inputs beyond the precondition that there was at
/// least one.
///
/// # Errors
///
/// Returns [`AnalyzerError::EmptyInputSet`] if `input_count` is zero.
pub fn reweight(overall: &mut Statistics, input_count: usize) -> AnalyzerResult<()> {
    if input_count == 0 {
        return Err(AnalyzerError::EmptyInputSet);
    }
    overall.recount_distinct();
    overall.finalize();
    Ok(())
}

/// Accumulates segment statistics into an overall summary.
#[derive(Debug, Default)]
pub struct Rollup {
    overall: Statistics,
    inputs: usize,
}

impl Rollup {
    /// Creates an empty rollup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one segment's statistics.
    pub fn add(&mut self, input: &Statistics) {
        merge(&mut self.overall, input);
        self.inputs += 1;
    }

    /// Number of merged inputs so far.
    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Finishes the rollup and returns the overall statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::EmptyInputSet`] if nothing was added.
    pub fn finish(mut self) -> AnalyzerResult<Statistics> {
        reweight(&mut self.overall, self.inputs)?;
        tracing::debug!(
            inputs = self.inputs,
            lines = self.overall.count,
            relations = self.overall.n_distinct_relation,
            "rollup finished"
        );
        Ok(self.overall)
    }
}
