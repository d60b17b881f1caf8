//! Summary statistics
//!
//! Converts raw per-node counters into the normalized [`SummaryStats`]
//! carried by every report. All four metrics are always present; a metric
//! the input has no data for is reported as `0/0` at 100%.

use crate::classify::{Class, Metric, PercentClassifier};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use tracing::warn;

/// Allowed drift between a stored `pct` and the one recomputed from counters
const PCT_TOLERANCE: f64 = 0.01;

/// Percentage of `covered` over `total`, truncated to two decimals.
///
/// An empty metric (`total == 0`) counts as fully covered.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let scaled = (1000.0 * 100.0 * covered as f64) / total as f64;
    (scaled / 10.0).floor() / 100.0
}

/// Raw counters for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    /// Number of coverable items
    pub total: u64,
    /// Number of items hit at least once
    pub covered: u64,
    /// Number of items excluded from coverage
    pub skipped: u64,
}

impl Totals {
    /// Create totals from counts
    #[must_use]
    pub const fn new(total: u64, covered: u64) -> Self {
        Self {
            total,
            covered,
            skipped: 0,
        }
    }

    /// Count `hits`, treating any non-zero entry as covered
    pub fn from_hits<I>(hits: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        hits.into_iter().fold(Self::default(), |mut acc, count| {
            acc.total += 1;
            if count > 0 {
                acc.covered += 1;
            }
            acc
        })
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.covered += rhs.covered;
        self.skipped += rhs.skipped;
    }
}

/// Raw coverage counters of a tree node, as produced by the measurement tool.
///
/// Any metric may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageSummary {
    /// Statement counters
    pub statements: Option<Totals>,
    /// Branch outcome counters
    pub branches: Option<Totals>,
    /// Line counters
    pub lines: Option<Totals>,
    /// Function counters
    pub functions: Option<Totals>,
}

impl CoverageSummary {
    /// Create an empty summary
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the counters of one metric
    #[must_use]
    pub fn with(mut self, metric: Metric, totals: Totals) -> Self {
        *self.slot(metric) = Some(totals);
        self
    }

    /// Counters of one metric, if the input carried any
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<Totals> {
        match metric {
            Metric::Statements => self.statements,
            Metric::Branches => self.branches,
            Metric::Lines => self.lines,
            Metric::Functions => self.functions,
        }
    }

    /// Add another summary into this one, metric by metric
    pub fn merge(&mut self, other: &Self) {
        for metric in Metric::ALL {
            if let Some(theirs) = other.get(metric) {
                *self.slot(metric).get_or_insert_with(Totals::default) += theirs;
            }
        }
    }

    fn slot(&mut self, metric: Metric) -> &mut Option<Totals> {
        match metric {
            Metric::Statements => &mut self.statements,
            Metric::Branches => &mut self.branches,
            Metric::Lines => &mut self.lines,
            Metric::Functions => &mut self.functions,
        }
    }
}

/// Normalized statistic for one metric.
///
/// `pct` is always derived from `total` and `covered`; the fields are
/// read-only so the three cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSingleStat")]
pub struct SummarySingleStat {
    total: u64,
    covered: u64,
    pct: f64,
    class: Class,
}

impl SummarySingleStat {
    /// Build a stat from counters, classifying the resulting percentage.
    ///
    /// `covered` is clamped to `total`.
    #[must_use]
    pub fn new(
        metric: Metric,
        total: u64,
        covered: u64,
        classifier: &dyn PercentClassifier,
    ) -> Self {
        let covered = if covered > total {
            warn!(%metric, total, covered, "covered count exceeds total, clamping");
            total
        } else {
            covered
        };
        let pct = percent(covered, total);
        Self {
            total,
            covered,
            pct,
            class: classifier.classify(metric, pct),
        }
    }

    /// Number of coverable items
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of covered items
    #[must_use]
    pub const fn covered(&self) -> u64 {
        self.covered
    }

    /// Coverage percentage
    #[must_use]
    pub const fn pct(&self) -> f64 {
        self.pct
    }

    /// Severity class
    #[must_use]
    pub const fn class(&self) -> Class {
        self.class
    }
}

#[derive(Deserialize)]
struct RawSingleStat {
    total: u64,
    covered: u64,
    pct: f64,
    class: Class,
}

impl TryFrom<RawSingleStat> for SummarySingleStat {
    type Error = String;

    fn try_from(raw: RawSingleStat) -> Result<Self, Self::Error> {
        if raw.covered > raw.total {
            return Err(format!(
                "covered ({}) exceeds total ({})",
                raw.covered, raw.total
            ));
        }
        let expected = percent(raw.covered, raw.total);
        if (raw.pct - expected).abs() > PCT_TOLERANCE {
            return Err(format!(
                "pct {} does not match {}/{} ({expected})",
                raw.pct, raw.covered, raw.total
            ));
        }
        Ok(Self {
            total: raw.total,
            covered: raw.covered,
            pct: expected,
            class: raw.class,
        })
    }
}

/// The four metric stats of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Statement stat
    pub statements: SummarySingleStat,
    /// Branch stat
    pub branches: SummarySingleStat,
    /// Line stat
    pub lines: SummarySingleStat,
    /// Function stat
    pub functions: SummarySingleStat,
}

impl SummaryStats {
    /// Stat for one metric
    #[must_use]
    pub const fn get(&self, metric: Metric) -> &SummarySingleStat {
        match metric {
            Metric::Statements => &self.statements,
            Metric::Branches => &self.branches,
            Metric::Lines => &self.lines,
            Metric::Functions => &self.functions,
        }
    }
}

/// Normalize raw counters into [`SummaryStats`].
///
/// Pure: the same summary and classifier always give identical output.
#[must_use]
pub fn compute_stats(
    summary: &CoverageSummary,
    classifier: &dyn PercentClassifier,
) -> SummaryStats {
    let stat = |metric: Metric| {
        let totals = summary.get(metric).unwrap_or_default();
        SummarySingleStat::new(metric, totals.total, totals.covered, classifier)
    };
    SummaryStats {
        statements: stat(Metric::Statements),
        branches: stat(Metric::Branches),
        lines: stat(Metric::Lines),
        functions: stat(Metric::Functions),
    }
}

/// Format a stat as `"<pct>% (<covered>/<total>)"`
#[must_use]
pub fn stat_to_string(stat: &SummarySingleStat) -> String {
    format!("{}% ({}/{})", stat.pct(), stat.covered(), stat.total())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::Watermarks;
    use proptest::prelude::*;

    mod percent_tests {
        use super::*;

        #[test]
        fn test_empty_metric_is_fully_covered() {
            assert_eq!(percent(0, 0), 100.0);
        }

        #[test]
        fn test_half() {
            assert_eq!(percent(1, 2), 50.0);
        }

        #[test]
        fn test_truncates_to_two_decimals() {
            assert_eq!(percent(1, 3), 33.33);
            assert_eq!(percent(2, 3), 66.66);
            assert_eq!(percent(99_999, 100_000), 99.99);
        }
    }

    mod compute_tests {
        use super::*;

        #[test]
        fn test_missing_metrics_default_to_empty() {
            let summary = CoverageSummary::new().with(Metric::Statements, Totals::new(4, 1));
            let stats = compute_stats(&summary, &Watermarks::default());

            assert_eq!(stats.statements.pct(), 25.0);
            assert_eq!(stats.statements.class(), Class::Low);
            for metric in [Metric::Branches, Metric::Lines, Metric::Functions] {
                let stat = stats.get(metric);
                assert_eq!(stat.total(), 0);
                assert_eq!(stat.covered(), 0);
                assert_eq!(stat.pct(), 100.0);
                assert_eq!(stat.class(), Class::High);
            }
        }

        #[test]
        fn test_all_four_keys_serialized() {
            let stats = compute_stats(&CoverageSummary::new(), &Watermarks::default());
            let value = serde_json::to_value(stats).unwrap();
            let object = value.as_object().unwrap();
            assert_eq!(object.len(), 4);
            for metric in Metric::ALL {
                assert!(object.contains_key(metric.as_str()));
            }
        }

        #[test]
        fn test_covered_clamped_to_total() {
            let stat = SummarySingleStat::new(Metric::Lines, 2, 5, &Watermarks::default());
            assert_eq!(stat.covered(), 2);
            assert_eq!(stat.pct(), 100.0);
        }

        #[test]
        fn test_merge_sums_present_metrics() {
            let mut a = CoverageSummary::new().with(Metric::Lines, Totals::new(3, 1));
            let b = CoverageSummary::new()
                .with(Metric::Lines, Totals::new(2, 2))
                .with(Metric::Functions, Totals::new(1, 0));
            a.merge(&b);
            assert_eq!(a.lines, Some(Totals::new(5, 3)));
            assert_eq!(a.functions, Some(Totals::new(1, 0)));
            assert_eq!(a.statements, None);
        }

        #[test]
        fn test_from_hits() {
            assert_eq!(Totals::from_hits([0, 3, 1, 0]), Totals::new(4, 2));
        }

        #[test]
        fn test_stat_to_string() {
            let stat = SummarySingleStat::new(Metric::Branches, 2, 1, &Watermarks::default());
            assert_eq!(stat_to_string(&stat), "50% (1/2)");
        }
    }

    mod deserialize_tests {
        use super::*;

        #[test]
        fn test_rejects_covered_above_total() {
            let json = r#"{"total":1,"covered":2,"pct":200,"class":"high"}"#;
            assert!(serde_json::from_str::<SummarySingleStat>(json).is_err());
        }

        #[test]
        fn test_rejects_inconsistent_pct() {
            let json = r#"{"total":4,"covered":1,"pct":90,"class":"high"}"#;
            assert!(serde_json::from_str::<SummarySingleStat>(json).is_err());
        }

        #[test]
        fn test_accepts_consistent_stat() {
            let json = r#"{"total":3,"covered":1,"pct":33.33,"class":"low"}"#;
            let stat: SummarySingleStat = serde_json::from_str(json).unwrap();
            assert_eq!(stat.pct(), 33.33);
        }
    }

    proptest! {
        #[test]
        fn prop_stat_invariants(total in 0u64..1_000_000, covered in 0u64..1_000_000) {
            let stat = SummarySingleStat::new(Metric::Statements, total, covered, &Watermarks::default());
            prop_assert!(stat.covered() <= stat.total());
            prop_assert!(stat.pct() >= 0.0 && stat.pct() <= 100.0);
            prop_assert_eq!(stat.pct(), percent(stat.covered(), stat.total()));
        }

        #[test]
        fn prop_compute_is_idempotent(
            s in (0u64..500, 0u64..500),
            b in (0u64..500, 0u64..500),
            has_lines in any::<bool>(),
        ) {
            let mut summary = CoverageSummary::new()
                .with(Metric::Statements, Totals::new(s.0.max(s.1), s.0.min(s.1)))
                .with(Metric::Branches, Totals::new(b.0.max(b.1), b.0.min(b.1)));
            if has_lines {
                summary = summary.with(Metric::Lines, Totals::new(s.0.max(s.1), s.0.min(s.1)));
            }
            let watermarks = Watermarks::default();
            let first = serde_json::to_string(&compute_stats(&summary, &watermarks)).unwrap();
            let second = serde_json::to_string(&compute_stats(&summary, &watermarks)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
