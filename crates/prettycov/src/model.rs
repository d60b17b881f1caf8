//! Report data model
//!
//! The flat payload is an ordered list of [`Report`] records, one per visited
//! coverage-tree node. No tree pointers survive flattening: directories carry
//! their immediate children's summaries inline (`childStats`) and every record
//! is addressed by its unique `entity`.

use crate::result::{ReportError, ReportResult};
use crate::stats::SummaryStats;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A source position; istanbul may omit the column or leave it `null`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    /// 1-based line
    pub line: u32,
    /// 0-based column
    pub column: Option<u32>,
}

impl Position {
    /// Create a position
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }
}

/// Start/end of a source construct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRange {
    /// Start position
    pub start: Position,
    /// End position
    pub end: Position,
}

impl BlockRange {
    /// Create a range spanning two positions
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Branch metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchMapping {
    /// Branch kind (`if`, `switch`, `cond-expr`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Anchor line
    pub line: u32,
    /// Anchor location
    pub loc: BlockRange,
    /// One range per outcome
    pub locations: Vec<BlockRange>,
}

/// Function metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionMapping {
    /// Function name
    pub name: String,
    /// Declaration range
    pub decl: BlockRange,
    /// Body range
    pub loc: BlockRange,
}

/// Per-file coverage detail embedded in a [`FileReport`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageDetail {
    /// Statement id to range
    pub statement_map: BTreeMap<String, BlockRange>,
    /// Line number to hit count, derived from statements
    pub lines: BTreeMap<u32, u64>,
    /// Statement id to hit count
    pub s: BTreeMap<String, u64>,
    /// Branch id to metadata
    pub branch_map: BTreeMap<String, BranchMapping>,
    /// Branch id to per-outcome hit counts
    pub b: BTreeMap<String, Vec<u64>>,
    /// Function id to metadata
    pub fn_map: BTreeMap<String, FunctionMapping>,
    /// Function id to hit count
    pub f: BTreeMap<String, u64>,
}

/// Summary of an immediate child, inlined into its parent directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildStat {
    /// Display label of the child
    pub name: String,
    /// Entity of the child's own report
    pub entity: String,
    /// Child stats
    pub stats: SummaryStats,
}

/// Report for a directory node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryReport {
    /// True only for the traversal's root directory
    pub root: bool,
    /// Relative display label
    pub name: String,
    /// Qualified, globally unique path
    pub entity: String,
    /// Stats for the whole subtree
    pub stats: SummaryStats,
    /// Stats of each immediate child, in traversal order
    pub child_stats: Vec<ChildStat>,
    /// Creation time, milliseconds since the Unix epoch
    pub unix: i64,
}

/// Report for a source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Relative display label
    pub name: String,
    /// Qualified, globally unique path
    pub entity: String,
    /// File stats
    pub stats: SummaryStats,
    /// Original filesystem path
    pub path: String,
    /// Statement, branch, function and line detail
    pub detail: CoverageDetail,
    /// Compressed source text
    pub file_content: String,
    /// Creation time, milliseconds since the Unix epoch
    pub unix: i64,
}

/// Kind of a report record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// A directory listing
    Directory,
    /// A source file
    File,
}

impl ReportKind {
    /// Payload tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

/// One flattened payload record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Report {
    /// Directory record
    Directory(DirectoryReport),
    /// File record
    File(FileReport),
}

impl Report {
    /// Decode a single payload element, dispatching on its `type` tag
    pub fn from_value(value: Value) -> ReportResult<Self> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(ReportError::schema(format!("`type` is not a string: {other}")))
            }
            None => return Err(ReportError::schema("missing `type`")),
        };
        match kind.as_str() {
            "directory" => Ok(Self::Directory(serde_json::from_value(value)?)),
            "file" => Ok(Self::File(serde_json::from_value(value)?)),
            other => Err(ReportError::schema(format!("unknown report type {other:?}"))),
        }
    }

    /// Record kind
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::Directory(_) => ReportKind::Directory,
            Self::File(_) => ReportKind::File,
        }
    }

    /// Unique entity
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::Directory(d) => &d.entity,
            Self::File(f) => &f.entity,
        }
    }

    /// Display label
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(d) => &d.name,
            Self::File(f) => &f.name,
        }
    }

    /// Summary stats
    #[must_use]
    pub const fn stats(&self) -> &SummaryStats {
        match self {
            Self::Directory(d) => &d.stats,
            Self::File(f) => &f.stats,
        }
    }

    /// Creation timestamp
    #[must_use]
    pub const fn unix(&self) -> i64 {
        match self {
            Self::Directory(d) => d.unix,
            Self::File(f) => f.unix,
        }
    }

    /// Whether this is the root directory record
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Directory(DirectoryReport { root: true, .. }))
    }
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
