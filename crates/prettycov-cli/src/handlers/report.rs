//! Report command handler

use crate::config::{load_report_options, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::ReportArgs;
use prettycov::{compute_stats, CoverageMap, CoverageTree, EmitSummary, ReportOptions, Reporter};
use tracing::info;

/// Execute the report command
pub fn execute_report(config: &CliConfig, args: &ReportArgs) -> CliResult<EmitSummary> {
    let output = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let options = resolve_options(args)?;

    if !args.input.is_file() {
        return Err(CliError::invalid_argument(format!(
            "coverage map not found: {}",
            args.input.display()
        )));
    }

    let map = CoverageMap::from_path(&args.input)?;
    if map.is_empty() {
        output.warning("coverage map has no files; the viewer will only list the root");
    }
    info!(files = map.len(), input = %args.input.display(), "building coverage tree");
    let tree = CoverageTree::build(map)?;
    let root_stats = compute_stats(tree.root().summary(), &options.watermarks);

    let mut reporter = Reporter::new(options);
    let summary = reporter.execute(tree.root(), &args.output)?;

    output.header("Coverage summary");
    output.coverage_summary(&root_stats);
    output.success(&format!(
        "{} reports written to {}",
        summary.reports,
        summary.output_dir.display()
    ));
    if config.verbosity.is_verbose() {
        output.info(&format!("payload: {}", summary.payload_path.display()));
        output.info(&format!("bundle files copied: {}", summary.assets_copied));
    }
    Ok(summary)
}

/// Options from the config file, with command-line flags taking precedence
pub fn resolve_options(args: &ReportArgs) -> CliResult<ReportOptions> {
    let mut options = match &args.config {
        Some(path) => load_report_options(path)?,
        None => ReportOptions::default(),
    };
    if let Some(subdir) = &args.subdir {
        options.subdir = Some(subdir.clone());
    }
    if let Some(assets) = &args.assets {
        options.assets_dir = Some(assets.clone());
    }
    if let Some(dir) = &options.assets_dir {
        if !dir.is_dir() {
            return Err(CliError::invalid_argument(format!(
                "viewer bundle is not a directory: {}",
                dir.display()
            )));
        }
    }
    Ok(options)
}
