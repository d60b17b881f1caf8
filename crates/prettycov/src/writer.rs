//! Output directory writer
//!
//! All report output goes through a [`FileWriter`] rooted at the output
//! directory (or a subdirectory of it). Parent directories are created on
//! demand and paths are always relative to the writer's base.

use crate::result::{ReportError, ReportResult};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes files beneath a base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWriter {
    base: PathBuf,
}

impl FileWriter {
    /// Create a writer rooted at `base`
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base directory
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Writer nested under `subdir` of this writer's base.
    ///
    /// The subdirectory obeys the same rule as file targets.
    pub fn writer_for_dir(&self, subdir: impl AsRef<Path>) -> ReportResult<Self> {
        self.resolve(subdir.as_ref()).map(Self::new)
    }

    /// Absolute target for a relative path.
    ///
    /// Rejects absolute paths and `..` so nothing escapes the base.
    pub fn resolve(&self, relative: &Path) -> ReportResult<PathBuf> {
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(ReportError::write(
                self.base.join(relative),
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "target must be a relative path inside the output directory",
                ),
            ));
        }
        Ok(self.base.join(relative))
    }

    /// Remove a file if present
    pub fn remove_file(&self, relative: &Path) -> ReportResult<bool> {
        let target = self.resolve(relative)?;
        match fs::remove_file(&target) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ReportError::write(&target, e)),
        }
    }

    /// Copy `source` byte-for-byte to `relative`
    pub fn copy_file(&self, source: &Path, relative: &Path) -> ReportResult<PathBuf> {
        let target = self.resolve(relative)?;
        Self::ensure_parent(&target)?;
        let _ = fs::copy(source, &target).map_err(|e| ReportError::write(&target, e))?;
        Ok(target)
    }

    /// Write `contents` to `relative`
    pub fn write_file(&self, relative: &Path, contents: &[u8]) -> ReportResult<PathBuf> {
        let target = self.resolve(relative)?;
        Self::ensure_parent(&target)?;
        fs::write(&target, contents).map_err(|e| ReportError::write(&target, e))?;
        Ok(target)
    }

    /// Write `contents` to `relative` so that readers see either the old file
    /// or the complete new one, never a partial write
    pub fn write_file_atomic(&self, relative: &Path, contents: &[u8]) -> ReportResult<PathBuf> {
        let target = self.resolve(relative)?;
        let parent = Self::ensure_parent(&target)?;
        let mut staged =
            NamedTempFile::new_in(&parent).map_err(|e| ReportError::write(&parent, e))?;
        staged
            .write_all(contents)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| ReportError::write(staged.path(), e))?;
        let _ = staged
            .persist(&target)
            .map_err(|e| ReportError::write(&target, e.error))?;
        Ok(target)
    }

    fn ensure_parent(target: &Path) -> ReportResult<PathBuf> {
        let parent = target
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        fs::create_dir_all(&parent).map_err(|e| ReportError::write(&parent, e))?;
        Ok(parent)
    }
}
