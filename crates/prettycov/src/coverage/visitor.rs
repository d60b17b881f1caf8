//! Tree visitor contract
//!
//! A coverage tree is consumed through four hooks fired in a fixed order:
//! `on_start` once, `on_summary` for every directory, `on_detail` for every
//! file, and `on_end` once after all nodes. Hooks run synchronously on the
//! caller's thread and the first error aborts the traversal.

use super::FileCoverage;
use crate::classify::{Class, Metric, PercentClassifier, Watermarks};
use crate::result::{ReportError, ReportResult};
use crate::stats::CoverageSummary;
use crate::writer::FileWriter;
use std::collections::BTreeMap;
use std::fmt;

/// Which hook a node is visited with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    /// Directory summary (`on_summary`)
    Summary,
    /// File detail (`on_detail`)
    Detail,
}

/// Accessors of a coverage tree node
pub trait ReportNode {
    /// Whether this is the traversal root
    fn is_root(&self) -> bool;

    /// Whether the node is a directory (visited with `on_summary`)
    fn is_summary(&self) -> bool;

    /// Display label relative to the parent
    fn relative_name(&self) -> String;

    /// Canonical unique path of the node
    fn qualified_name(&self) -> ReportResult<String>;

    /// Immediate children, in display order
    fn children(&self) -> Box<dyn Iterator<Item = &dyn ReportNode> + '_>;

    /// Raw counters of the node's subtree
    fn coverage_summary(&self) -> ReportResult<CoverageSummary>;

    /// File coverage; fails for directory nodes
    fn file_coverage(&self) -> ReportResult<&FileCoverage>;

    /// Hit count per line of a file node
    fn line_coverage(&self) -> ReportResult<BTreeMap<u32, u64>> {
        Ok(self.file_coverage()?.line_coverage())
    }

    /// Source text of a file node, read from its coverage path
    fn source_text(&self) -> ReportResult<String> {
        let path = &self.file_coverage()?.path;
        std::fs::read_to_string(path).map_err(|e| {
            let entity = self.qualified_name().unwrap_or_else(|_| path.clone());
            ReportError::traversal(entity, format!("cannot read source {path}: {e}"))
        })
    }
}

/// Consumer of a tree traversal
pub trait Visitor {
    /// Fired once before any node
    fn on_start(&mut self, _root: &dyn ReportNode, _context: &Context) -> ReportResult<()> {
        Ok(())
    }

    /// Fired once per directory node
    fn on_summary(&mut self, node: &dyn ReportNode, context: &Context) -> ReportResult<()>;

    /// Fired once per file node
    fn on_detail(&mut self, node: &dyn ReportNode, context: &Context) -> ReportResult<()>;

    /// Fired once after every node
    fn on_end(&mut self, _root: &dyn ReportNode, _context: &Context) -> ReportResult<()> {
        Ok(())
    }
}

/// Environment handed to every hook: where to write and how to classify
pub struct Context {
    writer: FileWriter,
    classifier: Box<dyn PercentClassifier>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context writing under `writer`, classifying with default watermarks
    #[must_use]
    pub fn new(writer: FileWriter) -> Self {
        Self {
            writer,
            classifier: Box::new(Watermarks::default()),
        }
    }

    /// Replace the classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl PercentClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Output writer
    #[must_use]
    pub const fn writer(&self) -> &FileWriter {
        &self.writer
    }

    /// Classifier in use
    #[must_use]
    pub fn classifier(&self) -> &dyn PercentClassifier {
        self.classifier.as_ref()
    }

    /// Classify a percentage
    #[must_use]
    pub fn class_for_percent(&self, metric: Metric, pct: f64) -> Class {
        self.classifier.classify(metric, pct)
    }
}

/// Error for a file-only accessor called on a directory
pub(crate) fn not_a_file(entity: &str) -> ReportError {
    ReportError::traversal(entity, "node is a directory and has no file coverage")
}
