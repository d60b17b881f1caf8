//! Static payload encoding
//!
//! The report list ships as a script that assigns a JSON array to a global,
//! so a page opened from `file://` gets the data with a plain `<script>` tag.

use crate::model::Report;
use crate::result::{ReportError, ReportResult};
use serde_json::Value;

/// File name of the generated payload script
pub const PAYLOAD_FILE: &str = "loadcov.js";

/// Global the payload script assigns
pub const GLOBAL_BINDING: &str = "window.reports";

/// Render the payload script for `reports`
pub fn render(reports: &[Report]) -> ReportResult<String> {
    let json = serde_json::to_string(reports)?;
    // JSON allows these separators inside strings; older JS parsers do not
    let json = json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029");
    Ok(format!("{GLOBAL_BINDING}={json}"))
}

/// The JSON text inside a payload script (or the input itself if it is bare JSON)
#[must_use]
pub fn extract_json(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}').trim();
    let body = text
        .strip_prefix(GLOBAL_BINDING)
        .map_or(text, |rest| rest.trim_start().trim_start_matches('=').trim());
    body.trim_end_matches(';').trim_end()
}

/// Parse a payload into its raw array elements
pub fn parse_values(text: &str) -> ReportResult<Vec<Value>> {
    match serde_json::from_str(extract_json(text))? {
        Value::Array(values) => Ok(values),
        other => Err(ReportError::schema(format!(
            "expected an array of reports, found {}",
            json_type(&other)
        ))),
    }
}

pub(crate) const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]).unwrap(), "window.reports=[]");
    }

    #[test]
    fn test_extract_variants() {
        assert_eq!(extract_json("window.reports=[1]"), "[1]");
        assert_eq!(extract_json("window.reports = [1];\n"), "[1]");
        assert_eq!(extract_json("  [1]  "), "[1]");
    }

    #[test]
    fn test_parse_requires_array() {
        let err = parse_values("window.reports={}").unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_values() {
        let values = parse_values("window.reports=[{\"a\":1},2]").unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_line_separators_escaped() {
        use crate::classify::Watermarks;
        use crate::model::DirectoryReport;
        use crate::stats::{compute_stats, CoverageSummary};

        let report = Report::Directory(DirectoryReport {
            root: true,
            name: "odd\u{2028}name".into(),
            entity: String::new(),
            stats: compute_stats(&CoverageSummary::new(), &Watermarks::default()),
            child_stats: vec![],
            unix: 0,
        });
        let script = render(&[report]).unwrap();
        assert!(!script.contains('\u{2028}'));
        let values = parse_values(&script).unwrap();
        assert_eq!(values[0]["name"], "odd\u{2028}name");
    }
}
