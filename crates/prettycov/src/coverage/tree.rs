//! Nested coverage tree
//!
//! Groups a [`CoverageMap`] into directories below the longest common parent
//! directory of all files. Directory counters are the sum of their children.

use super::visitor::{not_a_file, Context, ReportNode, VisitKind, Visitor};
use super::{CoverageMap, FileCoverage};
use crate::result::{ReportError, ReportResult};
use crate::stats::CoverageSummary;
use std::collections::BTreeMap;
use std::fmt;

/// A directory or file in the coverage tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    path: Vec<String>,
    root: bool,
    summary: CoverageSummary,
    children: Vec<TreeNode>,
    coverage: Option<FileCoverage>,
}

impl TreeNode {
    /// Path components relative to the tree root
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Immediate children
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.children
    }

    /// Raw counters of this subtree
    #[must_use]
    pub const fn summary(&self) -> &CoverageSummary {
        &self.summary
    }

    fn directory(name: String, path: Vec<String>, children: Vec<TreeNode>) -> Self {
        let mut summary = CoverageSummary::new();
        for child in &children {
            summary.merge(&child.summary);
        }
        Self {
            name,
            path,
            root: false,
            summary,
            children,
            coverage: None,
        }
    }

    fn file(name: String, path: Vec<String>, coverage: FileCoverage) -> Self {
        Self {
            name,
            path,
            root: false,
            summary: coverage.to_summary(),
            children: Vec::new(),
            coverage: Some(coverage),
        }
    }
}

impl ReportNode for TreeNode {
    fn is_root(&self) -> bool {
        self.root
    }

    fn is_summary(&self) -> bool {
        self.coverage.is_none()
    }

    fn relative_name(&self) -> String {
        self.name.clone()
    }

    fn qualified_name(&self) -> ReportResult<String> {
        Ok(self.path.join("/"))
    }

    fn children(&self) -> Box<dyn Iterator<Item = &dyn ReportNode> + '_> {
        Box::new(self.children.iter().map(|c| c as &dyn ReportNode))
    }

    fn coverage_summary(&self) -> ReportResult<CoverageSummary> {
        Ok(self.summary)
    }

    fn file_coverage(&self) -> ReportResult<&FileCoverage> {
        self.coverage
            .as_ref()
            .ok_or_else(|| not_a_file(&self.path.join("/")))
    }
}

enum Entry {
    Dir(BTreeMap<String, Entry>),
    File(FileCoverage),
}

fn split_path(path: &str) -> Vec<String> {
    path.split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .map(String::from)
        .collect()
}

fn common_prefix_len(dirs: &[Vec<String>]) -> usize {
    let Some((first, rest)) = dirs.split_first() else {
        return 0;
    };
    rest.iter().fold(first.len(), |len, dir| {
        first
            .iter()
            .zip(dir)
            .take(len)
            .take_while(|(a, b)| a == b)
            .count()
    })
}

fn conflict(path: &str) -> ReportError {
    ReportError::invalid_coverage(path, "path collides with another file or directory")
}

/// A nested coverage tree ready for traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageTree {
    root: TreeNode,
}

impl CoverageTree {
    /// Build the tree from a coverage map
    pub fn build(map: CoverageMap) -> ReportResult<Self> {
        let files: Vec<(Vec<String>, FileCoverage)> = map
            .into_iter()
            .map(|coverage| {
                let parts = split_path(&coverage.path);
                if parts.is_empty() {
                    return Err(ReportError::invalid_coverage(&coverage.path, "empty file path"));
                }
                Ok((parts, coverage))
            })
            .collect::<ReportResult<_>>()?;

        let dirs: Vec<Vec<String>> = files
            .iter()
            .map(|(parts, _)| parts[..parts.len() - 1].to_vec())
            .collect();
        let prefix = common_prefix_len(&dirs);

        let mut top: BTreeMap<String, Entry> = BTreeMap::new();
        for (parts, coverage) in files {
            let (file_name, dir_parts) = match parts[prefix..].split_last() {
                Some((name, dirs)) => (name.clone(), dirs.to_vec()),
                None => return Err(conflict(&coverage.path)),
            };
            let mut level = &mut top;
            for dir in dir_parts {
                let entry = level
                    .entry(dir)
                    .or_insert_with(|| Entry::Dir(BTreeMap::new()));
                level = match entry {
                    Entry::Dir(children) => children,
                    Entry::File(_) => return Err(conflict(&coverage.path)),
                };
            }
            if level.contains_key(&file_name) {
                return Err(conflict(&coverage.path));
            }
            let _ = level.insert(file_name, Entry::File(coverage));
        }

        let mut root = TreeNode::directory(String::new(), Vec::new(), Self::convert(top, &[]));
        root.root = true;
        Ok(Self { root })
    }

    fn convert(entries: BTreeMap<String, Entry>, parent: &[String]) -> Vec<TreeNode> {
        entries
            .into_iter()
            .map(|(name, entry)| {
                let mut path = parent.to_vec();
                path.push(name.clone());
                match entry {
                    Entry::Dir(children) => {
                        let children = Self::convert(children, &path);
                        TreeNode::directory(name, path, children)
                    }
                    Entry::File(coverage) => TreeNode::file(name, path, coverage),
                }
            })
            .collect()
    }

    /// Root directory
    #[must_use]
    pub const fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Pre-order walk of every node
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root)
    }

    /// Drive `visitor` over the whole tree
    pub fn visit(&self, visitor: &mut dyn Visitor, context: &Context) -> ReportResult<()> {
        traverse(&self.root, visitor, context)
    }
}

/// Pre-order iterator of `(node, hook)` pairs
pub struct Walk<'a> {
    stack: Vec<&'a dyn ReportNode>,
}

impl fmt::Debug for Walk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("pending", &self.stack.len())
            .finish()
    }
}

impl<'a> Walk<'a> {
    /// Walk starting at `root`
    #[must_use]
    pub fn new(root: &'a dyn ReportNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a dyn ReportNode, VisitKind);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children: Vec<&'a dyn ReportNode> = node.children().collect();
        self.stack.extend(children.into_iter().rev());
        let kind = if node.is_summary() {
            VisitKind::Summary
        } else {
            VisitKind::Detail
        };
        Some((node, kind))
    }
}

/// Fire the visitor hooks over any tree: start, each node in pre-order, end
pub fn traverse(
    root: &dyn ReportNode,
    visitor: &mut dyn Visitor,
    context: &Context,
) -> ReportResult<()> {
    visitor.on_start(root, context)?;
    for (node, kind) in Walk::new(root) {
        match kind {
            VisitKind::Summary => visitor.on_summary(node, context)?,
            VisitKind::Detail => visitor.on_detail(node, context)?,
        }
    }
    visitor.on_end(root, context)
}
