//! Analyzer configuration.

use crate::error::{AnalyzerError, AnalyzerResult};

/// Configuration for an analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Whether to attach the top relations to every report.
    pub top_relations: bool,

    /// Number of relations in a top relations list.
    pub top_n: usize,

    /// Whether to roll all segments up into an overall summary.
    pub summary: bool,

    /// Number of segments analyzed concurrently.
    pub jobs: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_relations: false,
            top_n: 10,
            summary: false,
            jobs: 1,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to rank top relations.
    #[must_use]
    pub const fn top_relations(mut self, value: bool) -> Self {
        self.top_relations = value;
        self
    }

    /// Sets the size of top relations lists.
    #[must_use]
    pub const fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Sets whether to produce an overall summary.
    #[must_use]
    pub const fn summary(mut self, value: bool) -> Self {
        self.summary = value;
        self
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub const fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidConfig`] if `jobs` is zero.
    pub fn validate(&self) -> AnalyzerResult<()> {
        if self.jobs == 0 {
            return Err(AnalyzerError::invalid_config("jobs must be at least 1"));
        }
        Ok(())
    }
}
