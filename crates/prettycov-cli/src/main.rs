//! Prettycov CLI: build offline coverage viewers
//!
//! ## Usage
//!
//! ```bash
//! prettycov report -i coverage/coverage-final.json -o coverage --subdir html
//! prettycov report --assets viewer/dist --config prettycov.yaml
//! prettycov routes --payload coverage/html/loadcov.js
//! ```

use clap::Parser;
use prettycov_cli::{
    handlers::{execute_report, execute_routes},
    Cli, CliConfig, CliResult, ColorChoice, Commands, ProgressReporter, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match run(&config, &cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Failures print even in quiet mode
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet())
                .failure(&format!("Error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Report(args) => execute_report(config, args).map(|_| ()),
        Commands::Routes(args) => execute_routes(config, args).map(|_| ()),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the flag-derived level
fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.filter_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_quiet_wins() {
        let cli = Cli::parse_from(["prettycov", "-q", "-v", "routes"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_build_config_color() {
        let cli = Cli::parse_from(["prettycov", "--color", "always", "routes"]);
        assert_eq!(build_config(&cli).color, ColorChoice::Always);
    }
}
