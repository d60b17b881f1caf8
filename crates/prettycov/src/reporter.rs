//! Long-lived reporter
//!
//! Owns the options and the report accumulator. Each [`Reporter::execute`]
//! is one independent generation run; nothing carries over between runs.

use crate::accumulator::ReportAccumulator;
use crate::classify::Watermarks;
use crate::coverage::{traverse, Context, ReportNode};
use crate::emit::{EmitSummary, PayloadEmitter};
use crate::flatten::{system_clock, Clock, ReportFlattener};
use crate::result::{ReportError, ReportResult};
use crate::writer::FileWriter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Report configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportOptions {
    /// Nest all output under this subdirectory of the output root
    pub subdir: Option<String>,
    /// Pre-built viewer bundle to copy into the output
    pub assets_dir: Option<PathBuf>,
    /// Classification thresholds
    pub watermarks: Watermarks,
}

impl ReportOptions {
    /// Default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output subdirectory
    #[must_use]
    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = Some(subdir.into());
        self
    }

    /// Set the viewer bundle directory
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Set the watermarks
    #[must_use]
    pub const fn with_watermarks(mut self, watermarks: Watermarks) -> Self {
        self.watermarks = watermarks;
        self
    }
}

/// Generates static coverage viewers, run after run
#[derive(Debug)]
pub struct Reporter {
    options: ReportOptions,
    accumulator: ReportAccumulator,
    clock: Clock,
}

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            accumulator: ReportAccumulator::new(),
            clock: system_clock,
        }
    }

    /// Use a fixed or fake clock for report timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Options in use
    #[must_use]
    pub const fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Number of runs started so far
    #[must_use]
    pub const fn runs(&self) -> u64 {
        self.accumulator.runs()
    }

    /// Flatten the tree under `root` and write the viewer to `output_dir`
    pub fn execute(
        &mut self,
        root: &dyn ReportNode,
        output_dir: &Path,
    ) -> ReportResult<EmitSummary> {
        let context = Context::new(FileWriter::new(output_dir))
            .with_classifier(self.options.watermarks);
        let emitter = PayloadEmitter::new()
            .with_subdir(self.options.subdir.clone())
            .with_assets_dir(self.options.assets_dir.clone());

        let mut flattener =
            ReportFlattener::new(&mut self.accumulator, &emitter).with_clock(self.clock);
        let outcome = traverse(root, &mut flattener, &context);
        let summary = flattener.into_summary();

        match (outcome, summary) {
            (Ok(()), Some(summary)) => Ok(summary),
            (Ok(()), None) => Err(ReportError::traversal(
                "",
                "traversal never reached its end",
            )),
            (Err(e), _) => {
                warn!(error = %e, "report generation aborted");
                let _ = self.accumulator.finalize();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_yaml_like_json() {
        let json = r#"{"subdir":"html","watermarks":{"branches":[10,20]}}"#;
        let options: ReportOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.subdir.as_deref(), Some("html"));
        assert_eq!(options.watermarks.branches, [10.0, 20.0]);
        assert_eq!(options.assets_dir, None);
    }

    #[test]
    fn test_builder() {
        let options = ReportOptions::new()
            .with_subdir("nested")
            .with_assets_dir("/dist");
        assert_eq!(options.subdir.as_deref(), Some("nested"));
        assert_eq!(options.assets_dir, Some(PathBuf::from("/dist")));
    }
}
