//! Prettycov: offline coverage viewer generator
//!
//! Turns an istanbul coverage tree into one flat, self-contained payload that
//! a static client-side viewer renders from `file://` or any static host.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      PRETTYCOV Data Flow                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐             │
//! │   │ Coverage   │    │ Report     │    │ Payload    │             │
//! │   │ Tree       │───►│ Flattener  │───►│ Emitter    │──► loadcov.js│
//! │   │ (visitor)  │    │ stats, lz  │    │ + bundle   │             │
//! │   └────────────┘    └────────────┘    └────────────┘             │
//! │                                                                  │
//! │   loadcov.js ──► Router ──► /            (root directory)         │
//! │                        └──► /<entity>    (directory or file page) │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use prettycov::{CoverageMap, CoverageTree, ReportOptions, Reporter};
//! use std::path::Path;
//!
//! # fn main() -> prettycov::ReportResult<()> {
//! let map = CoverageMap::from_path(Path::new("coverage/coverage-final.json"))?;
//! let tree = CoverageTree::build(map)?;
//! let mut reporter = Reporter::new(ReportOptions::new().with_subdir("html"));
//! let summary = reporter.execute(tree.root(), Path::new("coverage"))?;
//! println!("{} reports in {}", summary.reports, summary.output_dir.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod accumulator;
mod classify;
mod compress;
/// Istanbul coverage input and the tree visitor contract
pub mod coverage;
mod emit;
mod flatten;
mod model;
mod pages;
/// Payload script encoding
pub mod payload;
mod reporter;
mod result;
mod router;
mod stats;
mod writer;

pub use accumulator::ReportAccumulator;
pub use classify::{Class, Metric, PercentClassifier, Watermarks};
pub use compress::{compress, decompress};
pub use coverage::{
    traverse, Context, CoverageMap, CoverageTree, FileCoverage, ReportNode, TreeNode, VisitKind,
    Visitor, Walk,
};
pub use emit::{EmitSummary, PayloadEmitter, INDEX_FILE};
pub use flatten::{system_clock, Clock, ReportFlattener};
pub use model::{
    BlockRange, BranchMapping, ChildStat, CoverageDetail, DirectoryReport, FileReport,
    FunctionMapping, Position, Report, ReportKind,
};
pub use pages::{
    href_for, Breadcrumb, DirectoryPage, FilePage, ListingRow, Page, SourceLine, ROOT_TITLE,
};
pub use payload::{GLOBAL_BINDING, PAYLOAD_FILE};
pub use reporter::{ReportOptions, Reporter};
pub use result::{ReportError, ReportResult};
pub use router::{RejectedEntry, Route, Router, ROOT_ADDRESS};
pub use stats::{
    compute_stats, percent, stat_to_string, CoverageSummary, SummarySingleStat, SummaryStats,
    Totals,
};
pub use writer::FileWriter;
