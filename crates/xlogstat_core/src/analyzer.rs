//! Analysis of one or more segments.
//!
//! Each segment is classified and accumulated on its own, possibly on a
//! worker thread. Reports and the optional rollup are then built in input
//! order on the calling thread.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::rank::{rank_resolved, RankedRelation};
use crate::resolver::RelationResolver;
use crate::rollup::Rollup;
use crate::source::SegmentSource;
use crate::stats::Statistics;
use serde::Serialize;
use std::thread;

/// Title of the rolled up report.
pub const SUMMARY_NAME: &str = "Overall Statistics";

/// Statistics of one segment (or of the summary).
#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    /// Segment name.
    pub segment: String,
    /// Finalized statistics.
    pub statistics: Statistics,
    /// Top relations, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_relations: Option<Vec<RankedRelation>>,
}

/// Result of an analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// One report per input, in input order.
    pub segments: Vec<SegmentReport>,
    /// Rollup over all inputs, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SegmentReport>,
}

/// Runs classification, accumulation, rollup and ranking.
pub struct Analyzer {
    config: AnalyzerConfig,
    resolver: Option<Box<dyn RelationResolver>>,
}

impl Analyzer {
    /// Creates an analyzer without name resolution.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Uses `resolver` to name ranked relations.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn RelationResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes all sources.
    ///
    /// Either every source is analyzed or an error is returned; no partial
    /// report is produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a source can't be
    /// read, or a summary is requested for zero sources.
    pub fn analyze(&self, sources: &[Box<dyn SegmentSource>]) -> AnalyzerResult<AnalysisReport> {
        self.config.validate()?;
        if self.config.summary && sources.is_empty() {
            return Err(AnalyzerError::EmptyInputSet);
        }

        let all_stats = self.collect_statistics(sources)?;

        let mut rollup = self.config.summary.then(Rollup::new);
        let mut segments = Vec::with_capacity(sources.len());
        for (source, stats) in sources.iter().zip(all_stats) {
            if let Some(rollup) = rollup.as_mut() {
                rollup.add(&stats);
            }
            segments.push(self.report(source.name().to_string(), stats));
        }

        let summary = match rollup {
            Some(rollup) => Some(self.report(SUMMARY_NAME.to_string(), rollup.finish()?)),
            None => None,
        };

        Ok(AnalysisReport { segments, summary })
    }

    fn report(&self, segment: String, statistics: Statistics) -> SegmentReport {
        let top_relations = self.config.top_relations.then(|| {
            rank_resolved(
                &statistics.relations,
                self.config.top_n,
                self.resolver.as_deref(),
            )
        });
        SegmentReport {
            segment,
            statistics,
            top_relations,
        }
    }

    fn collect_statistics(
        &self,
        sources: &[Box<dyn SegmentSource>],
    ) -> AnalyzerResult<Vec<Statistics>> {
        if self.config.jobs <= 1 || sources.len() <= 1 {
            return sources.iter().map(|s| analyze_segment(s.as_ref())).collect();
        }

        let chunk_size = sources.len().div_ceil(self.config.jobs);
        thread::scope(|scope| {
            let handles: Vec<_> = sources
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|s| analyze_segment(s.as_ref()))
                            .collect::<Vec<_>>()
                    });
                    (chunk, handle)
                })
                .collect();

            // Join every worker before returning so a panic can't escape the scope.
            let mut results = Vec::with_capacity(sources.len());
            let mut panicked = None;
            for (chunk, handle) in handles {
                match handle.join() {
                    Ok(stats) => results.extend(stats),
                    Err(_) => {
                        panicked.get_or_insert_with(|| AnalyzerError::WorkerPanicked {
                            segment: chunk[0].name().to_string(),
                        });
                    }
                }
            }
            match panicked {
                Some(e) => Err(e),
                None => results.into_iter().collect(),
            }
        })
    }
}

/// Reads and accumulates a single segment.
///
/// # Errors
///
/// Returns the source's error if its text can't be read.
pub fn analyze_segment(source: &dyn SegmentSource) -> AnalyzerResult<Statistics> {
    let text = source.read_text()?;
    let stats = Statistics::from_text(&text);
    tracing::debug!(
        segment = source.name(),
        lines = stats.count,
        relations = stats.n_distinct_relation,
        pages = stats.n_distinct_page,
        "analyzed segment"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MapResolver;
    use crate::source::{FileSource, TextSource};

    fn text(name: &str, body: &str) -> Box<dyn SegmentSource> {
        Box::new(TextSource::new(name, body))
    }

    fn sources() -> Vec<Box<dyn SegmentSource>> {
        vec![
            text("a", " Heap  insert rel 1/1/100; tid 1/1\n Heap  insert rel 1/1/100; tid 2/1\n Transaction commit"),
            text("b", " Heap  delete rel 1/1/200; tid 1/1\n Transaction abort"),
            text("c", " Btree  insert rel 1/1/100; tid 9/1"),
        ]
    }

    #[test]
    fn per_segment_reports() {
        let analyzer = Analyzer::new(AnalyzerConfig::default());
        let report = analyzer.analyze(&sources()).unwrap();

        assert!(report.summary.is_none());
        let names: Vec<_> = report.segments.iter().map(|s| s.segment.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(report.segments[0].statistics.n_insert, 2);
        assert!(report.segments[0].top_relations.is_none());
    }

    #[test]
    fn summary_and_top_relations() {
        let config = AnalyzerConfig::new().summary(true).top_relations(true).top_n(1);
        let resolver = MapResolver::new().with_name("100", "accounts");
        let analyzer = Analyzer::new(config).with_resolver(Box::new(resolver));
        let report = analyzer.analyze(&sources()).unwrap();

        let summary = report.summary.unwrap();
        assert_eq!(summary.segment, SUMMARY_NAME);
        assert_eq!(summary.statistics.count, 6);
        assert_eq!(summary.statistics.n_distinct_relation, 2);
        assert_eq!(summary.statistics.n_distinct_page, 4);

        let top = summary.top_relations.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].relation_id, "100");
        assert_eq!(top[0].name.as_deref(), Some("accounts"));
        assert_eq!(top[0].distinct_pages, 3);
    }

    #[test]
    fn concurrent_matches_sequential() {
        let sequential = Analyzer::new(AnalyzerConfig::new().summary(true))
            .analyze(&sources())
            .unwrap();
        let concurrent = Analyzer::new(AnalyzerConfig::new().summary(true).jobs(2))
            .analyze(&sources())
            .unwrap();

        for (s, c) in sequential.segments.iter().zip(&concurrent.segments) {
            assert_eq!(s.segment, c.segment);
            assert_eq!(s.statistics, c.statistics);
        }
        assert_eq!(
            sequential.summary.unwrap().statistics,
            concurrent.summary.unwrap().statistics
        );
    }

    #[test]
    fn summary_without_inputs_is_rejected() {
        let analyzer = Analyzer::new(AnalyzerConfig::new().summary(true));
        assert!(matches!(
            analyzer.analyze(&[]),
            Err(AnalyzerError::EmptyInputSet)
        ));
    }

    #[test]
    fn no_inputs_without_summary() {
        let analyzer = Analyzer::new(AnalyzerConfig::default());
        assert!(analyzer.analyze(&[]).unwrap().segments.is_empty());
    }

    #[test]
    fn unreadable_input_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = sources();
        inputs.push(Box::new(FileSource::new(dir.path().join("missing"))));

        let analyzer = Analyzer::new(AnalyzerConfig::new().jobs(3));
        assert!(matches!(
            analyzer.analyze(&inputs),
            Err(AnalyzerError::InputNotFound { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let analyzer = Analyzer::new(AnalyzerConfig::new().jobs(0));
        assert!(matches!(
            analyzer.analyze(&sources()),
            Err(AnalyzerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn report_serializes() {
        let analyzer = Analyzer::new(AnalyzerConfig::new().top_relations(true));
        let report = analyzer.analyze(&sources()[..1]).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["segments"][0]["segment"], "a");
        assert_eq!(json["segments"][0]["statistics"]["n_heap"], 2);
        assert_eq!(json["segments"][0]["top_relations"][0]["relation_id"], "100");
        assert!(json.get("summary").is_none());
    }
}
