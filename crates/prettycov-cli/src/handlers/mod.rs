//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod report;
pub mod routes;

pub use report::{execute_report, resolve_options};
pub use routes::{execute_routes, render_routes};
