//! Percent classification
//!
//! Maps a metric percentage onto a three-level severity. The thresholds are
//! policy supplied by the host; [`Watermarks`] carries the defaults used by
//! istanbul-style reporters (`[50, 80]` for every metric).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four standard coverage metrics, in payload order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Statement coverage
    Statements,
    /// Branch outcome coverage
    Branches,
    /// Line coverage
    Lines,
    /// Function coverage
    Functions,
}

impl Metric {
    /// All metrics, in the order they appear in a summary
    pub const ALL: [Self; 4] = [
        Self::Statements,
        Self::Branches,
        Self::Lines,
        Self::Functions,
    ];

    /// Metric key as used in the payload
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Statements => "statements",
            Self::Branches => "branches",
            Self::Lines => "lines",
            Self::Functions => "functions",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity class of a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Class {
    /// Below the low watermark
    Low,
    /// Between the watermarks
    Medium,
    /// At or above the high watermark
    High,
}

impl Class {
    /// Class name as used in the payload
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Classifies a metric percentage
pub trait PercentClassifier {
    /// Return the class for `pct` of `metric`
    fn classify(&self, metric: Metric, pct: f64) -> Class;
}

/// Per-metric `[low, high]` thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watermarks {
    /// Statement thresholds
    pub statements: [f64; 2],
    /// Branch thresholds
    pub branches: [f64; 2],
    /// Line thresholds
    pub lines: [f64; 2],
    /// Function thresholds
    pub functions: [f64; 2],
}

impl Default for Watermarks {
    fn default() -> Self {
        Self {
            statements: Self::DEFAULT,
            branches: Self::DEFAULT,
            lines: Self::DEFAULT,
            functions: Self::DEFAULT,
        }
    }
}

impl Watermarks {
    /// Default thresholds for every metric
    pub const DEFAULT: [f64; 2] = [50.0, 80.0];

    /// Create default watermarks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the thresholds of one metric
    #[must_use]
    pub const fn with(mut self, metric: Metric, low: f64, high: f64) -> Self {
        match metric {
            Metric::Statements => self.statements = [low, high],
            Metric::Branches => self.branches = [low, high],
            Metric::Lines => self.lines = [low, high],
            Metric::Functions => self.functions = [low, high],
        }
        self
    }

    /// Thresholds for a metric
    #[must_use]
    pub const fn get(&self, metric: Metric) -> [f64; 2] {
        match metric {
            Metric::Statements => self.statements,
            Metric::Branches => self.branches,
            Metric::Lines => self.lines,
            Metric::Functions => self.functions,
        }
    }
}

impl PercentClassifier for Watermarks {
    fn classify(&self, metric: Metric, pct: f64) -> Class {
        let [low, high] = self.get(metric);
        if pct < low {
            Class::Low
        } else if pct >= high {
            Class::High
        } else {
            Class::Medium
        }
    }
}
