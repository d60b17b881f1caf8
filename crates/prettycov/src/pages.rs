//! Viewer page models
//!
//! What the static viewer renders for a route: a listing for directories and
//! an annotated source view for files. Rendering itself lives in the bundle;
//! these types carry the data it needs.

use crate::compress::decompress;
use crate::model::{DirectoryReport, FileReport};
use crate::result::{ReportError, ReportResult};
use crate::stats::SummaryStats;
use serde::Serialize;

/// Title shown for the root directory
pub const ROOT_TITLE: &str = "All files";

/// Link to an ancestor directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Last path segment
    pub label: String,
    /// Hash link, absent when the ancestor has no route of its own
    pub href: Option<String>,
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRow {
    /// Child display label
    pub name: String,
    /// Hash link to the child's route
    pub href: String,
    /// Child stats
    pub stats: SummaryStats,
}

/// Listing view of a directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryPage {
    /// Heading
    pub title: String,
    /// Directory stats
    pub stats: SummaryStats,
    /// Ancestors, outermost first
    pub breadcrumbs: Vec<Breadcrumb>,
    /// One row per immediate child
    pub rows: Vec<ListingRow>,
}

impl DirectoryPage {
    /// Build the listing of `report`
    #[must_use]
    pub fn build(report: &DirectoryReport, breadcrumbs: Vec<Breadcrumb>) -> Self {
        let rows = report
            .child_stats
            .iter()
            .map(|child| ListingRow {
                name: child.name.clone(),
                href: href_for(&child.entity),
                stats: child.stats,
            })
            .collect();
        let title = if report.root {
            ROOT_TITLE.to_string()
        } else {
            report.name.clone()
        };
        Self {
            title,
            stats: report.stats,
            breadcrumbs,
            rows,
        }
    }
}

/// A source line with its execution count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    /// 1-based line number
    pub number: u32,
    /// Line text without its terminator
    pub text: String,
    /// Hit count, absent for lines with no statement
    pub hits: Option<u64>,
}

impl SourceLine {
    /// Whether the line holds a statement that never ran
    #[must_use]
    pub const fn is_uncovered(&self) -> bool {
        matches!(self.hits, Some(0))
    }
}

/// Source view of a file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilePage {
    /// Heading
    pub title: String,
    /// Original filesystem path
    pub path: String,
    /// File stats
    pub stats: SummaryStats,
    /// Ancestors, outermost first
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Restored source, line by line
    pub lines: Vec<SourceLine>,
    /// Names of functions that were never called, in source order
    pub uncovered_functions: Vec<String>,
}

impl FilePage {
    /// Build the source view of `report`, restoring its compressed text
    pub fn build(report: &FileReport, breadcrumbs: Vec<Breadcrumb>) -> ReportResult<Self> {
        let text = decompress(&report.file_content).map_err(|e| match e {
            ReportError::Compression { message, .. } => {
                ReportError::compression(&report.entity, message)
            }
            other => other,
        })?;

        let lines = text
            .lines()
            .zip(1u32..)
            .map(|(line, number)| SourceLine {
                number,
                text: line.to_string(),
                hits: report.detail.lines.get(&number).copied(),
            })
            .collect();

        let mut uncovered: Vec<_> = report
            .detail
            .fn_map
            .iter()
            .filter(|(id, _)| report.detail.f.get(*id).copied().unwrap_or(0) == 0)
            .map(|(_, mapping)| mapping)
            .collect();
        uncovered.sort_by(|a, b| {
            (a.decl.start.line, &a.name).cmp(&(b.decl.start.line, &b.name))
        });

        Ok(Self {
            title: report.name.clone(),
            path: report.path.clone(),
            stats: report.stats,
            breadcrumbs,
            lines,
            uncovered_functions: uncovered.into_iter().map(|m| m.name.clone()).collect(),
        })
    }
}

/// A built page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Page {
    /// Listing view
    Directory(DirectoryPage),
    /// Source view
    File(FilePage),
}

impl Page {
    /// Heading of either variant
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Directory(page) => &page.title,
            Self::File(page) => &page.title,
        }
    }
}

/// Hash link for an entity's route
#[must_use]
pub fn href_for(entity: &str) -> String {
    format!("#/{entity}")
}
