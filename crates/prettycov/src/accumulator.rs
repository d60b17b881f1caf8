//! Report accumulator
//!
//! Caller-owned, append-only list of reports for one generation run. The
//! owner decides when a run starts ([`ReportAccumulator::reset`]) and when
//! it ends ([`ReportAccumulator::finalize`]), so one accumulator can serve
//! any number of independent runs.

use crate::model::Report;
use crate::result::{ReportError, ReportResult};
use std::collections::HashSet;

/// Ordered reports of the current run
#[derive(Debug, Default)]
pub struct ReportAccumulator {
    reports: Vec<Report>,
    entities: HashSet<String>,
    runs: u64,
}

impl ReportAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything collected so far and start a new run
    pub fn reset(&mut self) {
        self.reports.clear();
        self.entities.clear();
        self.runs += 1;
    }

    /// Append a report; entities must be unique within a run
    pub fn push(&mut self, report: Report) -> ReportResult<()> {
        if !self.entities.insert(report.entity().to_string()) {
            return Err(ReportError::DuplicateEntity {
                entity: report.entity().to_string(),
            });
        }
        self.reports.push(report);
        Ok(())
    }

    /// Reports in insertion order
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Whether `entity` has been recorded in this run
    #[must_use]
    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains(entity)
    }

    /// Number of reports
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no report has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of runs started on this accumulator
    #[must_use]
    pub const fn runs(&self) -> u64 {
        self.runs
    }

    /// Hand out the collected reports, leaving the accumulator empty
    pub fn finalize(&mut self) -> Vec<Report> {
        self.entities.clear();
        std::mem::take(&mut self.reports)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::Watermarks;
    use crate::model::DirectoryReport;
    use crate::stats::{compute_stats, CoverageSummary};

    fn dir(entity: &str) -> Report {
        Report::Directory(DirectoryReport {
            root: entity.is_empty(),
            name: entity.to_string(),
            entity: entity.to_string(),
            stats: compute_stats(&CoverageSummary::new(), &Watermarks::default()),
            child_stats: Vec::new(),
            unix: 0,
        })
    }

    #[test]
    fn test_push_keeps_order() {
        let mut acc = ReportAccumulator::new();
        acc.push(dir("")).unwrap();
        acc.push(dir("src")).unwrap();
        let entities: Vec<_> = acc.reports().iter().map(Report::entity).collect();
        assert_eq!(entities, ["", "src"]);
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut acc = ReportAccumulator::new();
        acc.push(dir("src")).unwrap();
        let err = acc.push(dir("src")).unwrap_err();
        assert!(matches!(err, ReportError::DuplicateEntity { .. }));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_reset_clears_previous_run() {
        let mut acc = ReportAccumulator::new();
        acc.reset();
        acc.push(dir("src")).unwrap();
        acc.reset();
        assert!(acc.is_empty());
        assert!(!acc.contains("src"));
        acc.push(dir("src")).unwrap();
        assert_eq!(acc.runs(), 2);
    }

    #[test]
    fn test_finalize_empties() {
        let mut acc = ReportAccumulator::new();
        acc.push(dir("")).unwrap();
        let reports = acc.finalize();
        assert_eq!(reports.len(), 1);
        assert!(acc.is_empty());
        acc.push(dir("")).unwrap();
    }
}
