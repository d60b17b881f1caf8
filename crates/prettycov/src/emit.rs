//! Payload emitter
//!
//! Lays out the static viewer: the pre-built bundle copied verbatim, an entry
//! `index.html`, and the `loadcov.js` payload. The payload is written last
//! and atomically; its presence marks the output as complete.

use crate::model::Report;
use crate::payload::{self, PAYLOAD_FILE};
use crate::result::ReportResult;
use crate::writer::FileWriter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entry document name
pub const INDEX_FILE: &str = "index.html";

/// What one emission produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    /// Directory holding the viewer
    pub output_dir: PathBuf,
    /// Path of the payload script
    pub payload_path: PathBuf,
    /// Number of bundle files copied
    pub assets_copied: usize,
    /// Number of reports serialized
    pub reports: usize,
    /// Whether `index.html` was generated rather than copied
    pub generated_index: bool,
}

/// Writes the viewer bundle and payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadEmitter {
    subdir: Option<String>,
    assets_dir: Option<PathBuf>,
}

impl PayloadEmitter {
    /// Emitter writing at the output root with no bundle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nest all output under `subdir`
    #[must_use]
    pub fn with_subdir(mut self, subdir: Option<String>) -> Self {
        self.subdir = subdir.filter(|s| !s.is_empty());
        self
    }

    /// Copy the pre-built viewer bundle from `dir`
    #[must_use]
    pub fn with_assets_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.assets_dir = dir;
        self
    }

    /// Writer for the report output; fails when `subdir` would leave it
    pub fn writer_for(&self, writer: &FileWriter) -> ReportResult<FileWriter> {
        match &self.subdir {
            Some(subdir) => writer.writer_for_dir(subdir),
            None => Ok(writer.clone()),
        }
    }

    /// Drop the payload of an earlier run so the output reads as unfinished
    /// until this run completes
    pub fn clear_payload(&self, writer: &FileWriter) -> ReportResult<()> {
        if self.writer_for(writer)?.remove_file(Path::new(PAYLOAD_FILE))? {
            debug!("removed stale payload");
        }
        Ok(())
    }

    /// Copy every bundle file to the same relative path; returns those paths
    pub fn copy_assets(&self, writer: &FileWriter) -> ReportResult<Vec<PathBuf>> {
        let Some(dist) = &self.assets_dir else {
            return Ok(Vec::new());
        };
        let writer = self.writer_for(writer)?;
        let mut files = Vec::new();
        walk_dir(dist, &mut files)?;
        files.sort();

        let mut copied = Vec::with_capacity(files.len());
        for source in files {
            let relative = source.strip_prefix(dist).unwrap_or(&source).to_path_buf();
            let _ = writer.copy_file(&source, &relative)?;
            debug!(asset = %relative.display(), "copied");
            copied.push(relative);
        }
        Ok(copied)
    }

    /// Write the entry document (when the bundle has none) and the payload
    pub fn emit(
        &self,
        writer: &FileWriter,
        reports: &[Report],
        assets: &[PathBuf],
    ) -> ReportResult<EmitSummary> {
        let writer = self.writer_for(writer)?;
        let script = payload::render(reports)?;

        let generated_index = !assets.iter().any(|p| p.as_path() == Path::new(INDEX_FILE));
        if generated_index {
            let _ = writer.write_file(Path::new(INDEX_FILE), index_html(assets).as_bytes())?;
        }
        let payload_path = writer.write_file_atomic(Path::new(PAYLOAD_FILE), script.as_bytes())?;

        Ok(EmitSummary {
            output_dir: writer.base_dir().to_path_buf(),
            payload_path,
            assets_copied: assets.len(),
            reports: reports.len(),
            generated_index,
        })
    }
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> ReportResult<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let metadata = fs::metadata(&path)?;
        if metadata.is_dir() {
            walk_dir(&path, files)?;
        } else if metadata.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn web_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn with_ext<'a>(assets: &'a [PathBuf], ext: &'a str) -> impl Iterator<Item = String> + 'a {
    assets
        .iter()
        .filter(move |p| p.extension().is_some_and(|e| e == ext))
        .map(|p| escape_attr(&web_path(p)))
}

/// Entry document loading the payload before any bundle script
fn index_html(assets: &[PathBuf]) -> String {
    let styles: String = with_ext(assets, "css")
        .map(|href| format!("    <link rel=\"stylesheet\" href=\"{href}\">\n"))
        .collect();
    let scripts: String = with_ext(assets, "js")
        .map(|src| format!("    <script src=\"{src}\"></script>\n"))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Coverage Report</title>
{styles}</head>
<body>
    <div id="app"></div>
    <script src="{PAYLOAD_FILE}"></script>
{scripts}</body>
</html>
"#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle(dir: &Path) -> PathBuf {
        let dist = dir.join("dist");
        fs::create_dir_all(dist.join("assets")).unwrap();
        fs::write(dist.join("assets/index.js"), b"console.log(1)").unwrap();
        fs::write(dist.join("assets/index.css"), b"body{}").unwrap();
        fs::write(dist.join("favicon.ico"), [0u8, 159, 146, 150]).unwrap();
        dist
    }

    #[test]
    fn test_copy_preserves_relative_paths_and_bytes() {
        let dir = TempDir::new().unwrap();
        let dist = bundle(dir.path());
        let out = FileWriter::new(dir.path().join("out"));
        let emitter = PayloadEmitter::new().with_assets_dir(Some(dist));

        let copied = emitter.copy_assets(&out).unwrap();
        assert_eq!(copied.len(), 3);
        assert_eq!(
            fs::read(dir.path().join("out/favicon.ico")).unwrap(),
            [0u8, 159, 146, 150]
        );
        assert!(dir.path().join("out/assets/index.js").exists());
    }

    #[test]
    fn test_subdir_nests_everything() {
        let dir = TempDir::new().unwrap();
        let dist = bundle(dir.path());
        let out = FileWriter::new(dir.path().join("out"));
        let emitter = PayloadEmitter::new()
            .with_subdir(Some("html".into()))
            .with_assets_dir(Some(dist));

        let copied = emitter.copy_assets(&out).unwrap();
        let summary = emitter.emit(&out, &[], &copied).unwrap();
        assert_eq!(summary.output_dir, dir.path().join("out/html"));
        assert!(dir.path().join("out/html/loadcov.js").exists());
        assert!(dir.path().join("out/html/assets/index.css").exists());
        assert!(!dir.path().join("out/loadcov.js").exists());
    }

    #[test]
    fn test_generated_index_references_payload_and_bundle() {
        let dir = TempDir::new().unwrap();
        let dist = bundle(dir.path());
        let out = FileWriter::new(dir.path().join("out"));
        let emitter = PayloadEmitter::new().with_assets_dir(Some(dist));

        let copied = emitter.copy_assets(&out).unwrap();
        let summary = emitter.emit(&out, &[], &copied).unwrap();
        assert!(summary.generated_index);
        let html = fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(html.contains(r#"<script src="loadcov.js"></script>"#));
        assert!(html.contains(r#"<script src="assets/index.js"></script>"#));
        assert!(html.contains(r#"href="assets/index.css""#));
        assert!(html.find("loadcov.js").unwrap() < html.find("assets/index.js").unwrap());
    }

    #[test]
    fn test_bundled_index_is_kept() {
        let dir = TempDir::new().unwrap();
        let dist = bundle(dir.path());
        fs::write(dist.join("index.html"), "<html>custom</html>").unwrap();
        let out = FileWriter::new(dir.path().join("out"));
        let emitter = PayloadEmitter::new().with_assets_dir(Some(dist));

        let copied = emitter.copy_assets(&out).unwrap();
        let summary = emitter.emit(&out, &[], &copied).unwrap();
        assert!(!summary.generated_index);
        let html = fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert_eq!(html, "<html>custom</html>");
    }

    #[test]
    fn test_index_regenerated_when_bundle_added() {
        let dir = TempDir::new().unwrap();
        let out = FileWriter::new(dir.path().join("out"));
        let first = PayloadEmitter::new().emit(&out, &[], &[]).unwrap();
        assert!(first.generated_index);

        let emitter = PayloadEmitter::new().with_assets_dir(Some(bundle(dir.path())));
        let copied = emitter.copy_assets(&out).unwrap();
        let second = emitter.emit(&out, &[], &copied).unwrap();
        assert!(second.generated_index);
        let html = fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(html.contains(r#"<script src="assets/index.js"></script>"#));
    }

    #[test]
    fn test_escaping_subdir_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = FileWriter::new(dir.path().join("out"));
        for subdir in ["../sibling", "/elsewhere"] {
            let emitter = PayloadEmitter::new()
                .with_subdir(Some(subdir.into()))
                .with_assets_dir(Some(bundle(dir.path())));
            assert!(emitter.copy_assets(&out).is_err());
            assert!(emitter.emit(&out, &[], &[]).is_err());
        }
        assert!(!dir.path().join("sibling").exists());
        assert!(!dir.path().join("out/loadcov.js").exists());
    }

    #[test]
    fn test_clear_payload() {
        let dir = TempDir::new().unwrap();
        let out = FileWriter::new(dir.path());
        let emitter = PayloadEmitter::new().with_subdir(Some("html".into()));
        emitter.emit(&out, &[], &[]).unwrap();
        assert!(dir.path().join("html/loadcov.js").exists());
        emitter.clear_payload(&out).unwrap();
        assert!(!dir.path().join("html/loadcov.js").exists());
        emitter.clear_payload(&out).unwrap();
    }

    #[test]
    fn test_payload_assigns_global() {
        let dir = TempDir::new().unwrap();
        let out = FileWriter::new(dir.path());
        let summary = PayloadEmitter::new().emit(&out, &[], &[]).unwrap();
        assert_eq!(fs::read_to_string(summary.payload_path).unwrap(), "window.reports=[]");
    }

    #[test]
    fn test_missing_bundle_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let emitter = PayloadEmitter::new().with_assets_dir(Some(dir.path().join("nope")));
        assert!(emitter.copy_assets(&FileWriter::new(dir.path())).is_err());
    }
}
