//! Coverage input
//!
//! Reads istanbul `coverage-final.json` data, groups it into a nested
//! directory tree and drives a [`Visitor`] over it.
//!
//! ```text
//! coverage-final.json → CoverageMap → CoverageTree → Visitor hooks
//!                                        │
//!                        on_start, on_summary*, on_detail*, on_end
//! ```

mod file_coverage;
mod map;
mod tree;
mod visitor;

pub use file_coverage::FileCoverage;
pub use map::CoverageMap;
pub use tree::{traverse, CoverageTree, TreeNode, Walk};
pub use visitor::{Context, ReportNode, VisitKind, Visitor};
