//! Coverage map loading (`coverage-final.json`)

use super::FileCoverage;
use crate::result::{ReportError, ReportResult};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// File coverage keyed by source path, in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageMap {
    files: BTreeMap<String, FileCoverage>,
}

impl CoverageMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an istanbul coverage map.
    ///
    /// Entries without a `path` take their key; every entry is validated.
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        let raw: BTreeMap<String, FileCoverage> = serde_json::from_str(json)?;
        let mut map = Self::new();
        for (key, mut coverage) in raw {
            if coverage.path.is_empty() {
                coverage.path = key;
            }
            map.insert(coverage)?;
        }
        Ok(map)
    }

    /// Read and parse a coverage map file
    pub fn from_path(path: &Path) -> ReportResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReportError::traversal(path.display().to_string(), e.to_string()))?;
        let map = Self::from_json_str(&json)?;
        debug!(path = %path.display(), files = map.len(), "loaded coverage map");
        Ok(map)
    }

    /// Add one file, replacing any previous coverage for the same path
    pub fn insert(&mut self, coverage: FileCoverage) -> ReportResult<()> {
        coverage.validate()?;
        let _ = self.files.insert(coverage.path.clone(), coverage);
        Ok(())
    }

    /// Coverage for a path
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileCoverage> {
        self.files.get(path)
    }

    /// All files in path order
    pub fn files(&self) -> impl Iterator<Item = &FileCoverage> {
        self.files.values()
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the map has no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl IntoIterator for CoverageMap {
    type Item = FileCoverage;
    type IntoIter = std::collections::btree_map::IntoValues<String, FileCoverage>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_values()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_fills_missing_path() {
        let map = CoverageMap::from_json_str(r#"{"/r/a.js": {"s": {}}}"#).unwrap();
        assert_eq!(map.get("/r/a.js").unwrap().path, "/r/a.js");
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let json = r#"{"/r/a.js": {"path": "/r/a.js", "f": {"0": 1}}}"#;
        assert!(CoverageMap::from_json_str(json).is_err());
    }

    #[test]
    fn test_missing_file_is_traversal_error() {
        let err = CoverageMap::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ReportError::TraversalAccess { .. }));
    }

    #[test]
    fn test_files_in_path_order() {
        let json = r#"{"/r/b.js": {}, "/r/a.js": {}}"#;
        let map = CoverageMap::from_json_str(json).unwrap();
        let paths: Vec<_> = map.files().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["/r/a.js", "/r/b.js"]);
    }
}
