//! Prettycov CLI Library
//!
//! Command-line interface for generating and inspecting static coverage
//! viewers.

#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, ReportArgs, RoutesArgs};
pub use config::{load_report_options, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
