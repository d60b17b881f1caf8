//! Istanbul per-file coverage
//!
//! One entry of a `coverage-final.json` map. Only the fields the report
//! needs are kept; anything else (`hash`, `inputSourceMap`, ...) is ignored.

use crate::model::{BlockRange, BranchMapping, CoverageDetail, FunctionMapping};
use crate::result::{ReportError, ReportResult};
use crate::stats::{CoverageSummary, Totals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statement, branch and function counters of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileCoverage {
    /// Filesystem path of the source
    pub path: String,
    /// Statement id to range
    pub statement_map: BTreeMap<String, BlockRange>,
    /// Function id to metadata
    pub fn_map: BTreeMap<String, FunctionMapping>,
    /// Branch id to metadata
    pub branch_map: BTreeMap<String, BranchMapping>,
    /// Statement hits
    pub s: BTreeMap<String, u64>,
    /// Function hits
    pub f: BTreeMap<String, u64>,
    /// Branch outcome hits
    pub b: BTreeMap<String, Vec<u64>>,
}

impl FileCoverage {
    /// Create empty coverage for a path
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Check that every hit counter refers to a mapped construct
    pub fn validate(&self) -> ReportResult<()> {
        fn check<V, M>(
            path: &str,
            what: &str,
            hits: &BTreeMap<String, V>,
            map: &BTreeMap<String, M>,
        ) -> ReportResult<()> {
            match hits.keys().find(|id| !map.contains_key(*id)) {
                Some(id) => Err(ReportError::invalid_coverage(
                    path,
                    format!("{what} id {id:?} has hits but no map entry"),
                )),
                None => Ok(()),
            }
        }

        check(&self.path, "statement", &self.s, &self.statement_map)?;
        check(&self.path, "function", &self.f, &self.fn_map)?;
        check(&self.path, "branch", &self.b, &self.branch_map)
    }

    /// Hit count per line, keyed by each statement's start line.
    ///
    /// When several statements start on one line the highest count wins.
    #[must_use]
    pub fn line_coverage(&self) -> BTreeMap<u32, u64> {
        let mut lines = BTreeMap::new();
        for (id, range) in &self.statement_map {
            let Some(&count) = self.s.get(id) else {
                continue;
            };
            let entry = lines.entry(range.start.line).or_insert(count);
            if *entry < count {
                *entry = count;
            }
        }
        lines
    }

    /// Raw counters for all four metrics
    #[must_use]
    pub fn to_summary(&self) -> CoverageSummary {
        CoverageSummary {
            statements: Some(Totals::from_hits(self.s.values().copied())),
            branches: Some(Totals::from_hits(self.b.values().flatten().copied())),
            lines: Some(Totals::from_hits(self.line_coverage().into_values())),
            functions: Some(Totals::from_hits(self.f.values().copied())),
        }
    }

    /// Detail record embedded in a file report
    #[must_use]
    pub fn detail(&self) -> CoverageDetail {
        CoverageDetail {
            statement_map: self.statement_map.clone(),
            lines: self.line_coverage(),
            s: self.s.clone(),
            branch_map: self.branch_map.clone(),
            b: self.b.clone(),
            fn_map: self.fn_map.clone(),
            f: self.f.clone(),
        }
    }
}
