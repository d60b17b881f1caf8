//! Routes command handler

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::RoutesArgs;
use prettycov::Router;
use std::fmt::Write as _;
use std::fs;

/// Execute the routes command
pub fn execute_routes(config: &CliConfig, args: &RoutesArgs) -> CliResult<Router> {
    let output = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let text = fs::read_to_string(&args.payload).map_err(|e| {
        CliError::invalid_argument(format!("cannot read {}: {e}", args.payload.display()))
    })?;
    let router = Router::from_payload(&text)?;

    print!("{}", render_routes(&router));
    for entry in router.rejected() {
        output.warning(&format!(
            "entry #{} ({}) rejected: {}",
            entry.index,
            entry.entity.as_deref().unwrap_or("?"),
            entry.reason
        ));
    }
    if router.root().is_none() {
        output.warning("payload has no root directory; `/` will not resolve");
    }
    output.success(&format!(
        "{} routes, {} rejected",
        router.routes().len(),
        router.rejected().len()
    ));
    Ok(router)
}

/// One `address  kind  name` line per route
#[must_use]
pub fn render_routes(router: &Router) -> String {
    let width = router
        .routes()
        .iter()
        .map(|r| r.address().chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for route in router.routes() {
        let _ = writeln!(
            out,
            "{:<width$}  {:<9}  {}",
            route.address(),
            route.kind().as_str(),
            route.report().name()
        );
    }
    out
}
