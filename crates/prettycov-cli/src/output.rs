//! Output formatting and status reporting

use console::{style, Style, Term};
use prettycov::{stat_to_string, Class, Metric, SummaryStats};

/// Status line printer for CLI commands
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl ProgressReporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "DONE".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the four metrics of the root directory, colored by class
    pub fn coverage_summary(&self, stats: &SummaryStats) {
        if self.quiet {
            return;
        }

        for metric in Metric::ALL {
            let _ = self.term.write_line(&self.metric_line(metric, stats));
        }
    }

    /// One `Statements   : 50% (1/2)` line
    #[must_use]
    pub fn metric_line(&self, metric: Metric, stats: &SummaryStats) -> String {
        let stat = stats.get(metric);
        let label = format!("{:<12}", capitalize(metric.as_str()));
        let value = stat_to_string(stat);
        if !self.use_color {
            return format!("{label} : {value}");
        }
        let class_style = match stat.class() {
            Class::Low => Style::new().red(),
            Class::Medium => Style::new().yellow(),
            Class::High => Style::new().green(),
        };
        format!("{label} : {}", class_style.apply_to(value))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use prettycov::{compute_stats, CoverageSummary, Totals, Watermarks};

    fn stats() -> SummaryStats {
        let summary = CoverageSummary::new()
            .with(Metric::Statements, Totals::new(2, 1))
            .with(Metric::Branches, Totals::new(4, 4));
        compute_stats(&summary, &Watermarks::default())
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_messages_do_not_panic() {
            let reporter = ProgressReporter::new(false, false);
            reporter.success("done");
            reporter.failure("failed");
            reporter.warning("careful");
            reporter.info("note");
            reporter.header("Header");
            reporter.coverage_summary(&stats());
        }

        #[test]
        fn test_quiet_mode_suppresses_output() {
            let reporter = ProgressReporter::new(false, true);
            reporter.success("hidden");
            reporter.warning("hidden");
            reporter.info("hidden");
            reporter.header("hidden");
            reporter.coverage_summary(&stats());
            // Failure is still printed
            reporter.failure("shown");
        }
    }

    mod metric_line_tests {
        use super::*;

        #[test]
        fn test_plain_line() {
            let reporter = ProgressReporter::new(false, false);
            assert_eq!(
                reporter.metric_line(Metric::Statements, &stats()),
                "Statements   : 50% (1/2)"
            );
            assert_eq!(
                reporter.metric_line(Metric::Functions, &stats()),
                "Functions    : 100% (0/0)"
            );
        }

        #[test]
        fn test_capitalize() {
            assert_eq!(capitalize("lines"), "Lines");
            assert_eq!(capitalize(""), "");
        }
    }
}
