//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Prettycov: build a static, offline coverage viewer from istanbul output
#[derive(Parser, Debug)]
#[command(name = "prettycov")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the static coverage viewer
    Report(ReportArgs),

    /// List the routes a generated payload resolves to
    Routes(RoutesArgs),
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Istanbul coverage map (coverage-final.json)
    #[arg(short, long, default_value = "coverage/coverage-final.json")]
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "coverage")]
    pub output: PathBuf,

    /// Nest all output under this subdirectory of the output directory
    #[arg(long)]
    pub subdir: Option<String>,

    /// Pre-built viewer bundle to copy into the output
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// YAML or JSON file with report options
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the routes command
#[derive(Parser, Debug)]
pub struct RoutesArgs {
    /// Payload script (loadcov.js) or bare JSON report array
    #[arg(short, long, default_value = "coverage/loadcov.js")]
    pub payload: PathBuf,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_report_defaults() {
            let cli = Cli::parse_from(["prettycov", "report"]);
            let Commands::Report(args) = cli.command else {
                panic!("expected report command");
            };
            assert_eq!(args.input, PathBuf::from("coverage/coverage-final.json"));
            assert_eq!(args.output, PathBuf::from("coverage"));
            assert!(args.subdir.is_none());
            assert!(args.assets.is_none());
        }

        #[test]
        fn test_parse_report_with_options() {
            let cli = Cli::parse_from([
                "prettycov",
                "report",
                "-i",
                "cov.json",
                "-o",
                "out",
                "--subdir",
                "html",
                "--assets",
                "dist",
            ]);
            let Commands::Report(args) = cli.command else {
                panic!("expected report command");
            };
            assert_eq!(args.input, PathBuf::from("cov.json"));
            assert_eq!(args.subdir.as_deref(), Some("html"));
            assert_eq!(args.assets, Some(PathBuf::from("dist")));
        }

        #[test]
        fn test_parse_routes() {
            let cli = Cli::parse_from(["prettycov", "routes", "--payload", "x/loadcov.js"]);
            let Commands::Routes(args) = cli.command else {
                panic!("expected routes command");
            };
            assert_eq!(args.payload, PathBuf::from("x/loadcov.js"));
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::parse_from(["prettycov", "-vv", "--color", "never", "routes"]);
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
            assert!(!cli.quiet);
        }
    }

    mod color_arg_tests {
        use super::*;
        use crate::config::ColorChoice;

        #[test]
        fn test_color_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
