//! Report flattener
//!
//! Visitor that turns every directory and file of a coverage tree into one
//! [`Report`], appended in hook order. It never recurses on its own; the
//! traversal decides the order. Directories inline the stats of their
//! immediate children so the tree itself can be dropped afterwards.

use crate::accumulator::ReportAccumulator;
use crate::compress::compress;
use crate::coverage::{Context, ReportNode, Visitor};
use crate::emit::{EmitSummary, PayloadEmitter};
use crate::model::{ChildStat, DirectoryReport, FileReport, Report};
use crate::result::{ReportError, ReportResult};
use crate::stats::compute_stats;
use std::path::PathBuf;
use tracing::{debug, info};

/// Milliseconds since the Unix epoch
pub type Clock = fn() -> i64;

/// Wall clock used for report timestamps
pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Visitor building the flat report list of one run
#[derive(Debug)]
pub struct ReportFlattener<'a> {
    accumulator: &'a mut ReportAccumulator,
    emitter: &'a PayloadEmitter,
    clock: Clock,
    copied_assets: Vec<PathBuf>,
    summary: Option<EmitSummary>,
}

impl<'a> ReportFlattener<'a> {
    /// Flatten into `accumulator`, emitting through `emitter` at the end
    #[must_use]
    pub fn new(accumulator: &'a mut ReportAccumulator, emitter: &'a PayloadEmitter) -> Self {
        Self {
            accumulator,
            emitter,
            clock: system_clock,
            copied_assets: Vec::new(),
            summary: None,
        }
    }

    /// Use a fixed or fake clock
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Emission result, available once `on_end` has run
    #[must_use]
    pub fn into_summary(self) -> Option<EmitSummary> {
        self.summary
    }

    fn child_stat(child: &dyn ReportNode, context: &Context) -> ReportResult<ChildStat> {
        Ok(ChildStat {
            name: child.relative_name(),
            entity: child.qualified_name()?,
            stats: compute_stats(&child.coverage_summary()?, context.classifier()),
        })
    }
}

impl Visitor for ReportFlattener<'_> {
    fn on_start(&mut self, _root: &dyn ReportNode, context: &Context) -> ReportResult<()> {
        self.accumulator.reset();
        self.summary = None;
        self.emitter.clear_payload(context.writer())?;
        self.copied_assets = self.emitter.copy_assets(context.writer())?;
        info!(
            run = self.accumulator.runs(),
            assets = self.copied_assets.len(),
            "report generation started"
        );
        Ok(())
    }

    fn on_summary(&mut self, node: &dyn ReportNode, context: &Context) -> ReportResult<()> {
        let entity = node.qualified_name()?;
        let child_stats = node
            .children()
            .map(|child| Self::child_stat(child, context))
            .collect::<ReportResult<Vec<_>>>()?;
        debug!(entity = %entity, children = child_stats.len(), "directory");

        self.accumulator.push(Report::Directory(DirectoryReport {
            root: node.is_root(),
            name: node.relative_name(),
            stats: compute_stats(&node.coverage_summary()?, context.classifier()),
            entity,
            child_stats,
            unix: (self.clock)(),
        }))
    }

    fn on_detail(&mut self, node: &dyn ReportNode, context: &Context) -> ReportResult<()> {
        let entity = node.qualified_name()?;
        let coverage = node.file_coverage()?;
        let source = node.source_text()?;
        let mut detail = coverage.detail();
        detail.lines = node.line_coverage()?;
        debug!(entity = %entity, path = %coverage.path, bytes = source.len(), "file");

        self.accumulator.push(Report::File(FileReport {
            name: node.relative_name(),
            stats: compute_stats(&coverage.to_summary(), context.classifier()),
            path: coverage.path.clone(),
            detail,
            file_content: compress(&source),
            entity,
            unix: (self.clock)(),
        }))
    }

    fn on_end(&mut self, _root: &dyn ReportNode, context: &Context) -> ReportResult<()> {
        let reports = self.accumulator.finalize();
        if !reports.iter().any(Report::is_root) {
            return Err(ReportError::traversal("", "traversal produced no root directory"));
        }
        let summary = self
            .emitter
            .emit(context.writer(), &reports, &self.copied_assets)?;
        info!(
            reports = summary.reports,
            payload = %summary.payload_path.display(),
            "report generation finished"
        );
        self.summary = Some(summary);
        Ok(())
    }
}
