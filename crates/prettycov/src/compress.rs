//! Source text compression
//!
//! Embedded source uses the lz-string algorithm in its base64 form, so the
//! payload stays plain ASCII and the viewer can restore it without a
//! server. Output is a pure function of the input.

use crate::result::{ReportError, ReportResult};

/// Compress source text for embedding.
///
/// The empty string maps to itself.
#[must_use]
pub fn compress(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    lz_str::compress_to_base64(text)
}

/// Restore text produced by [`compress`]
pub fn decompress(encoded: &str) -> ReportResult<String> {
    if encoded.is_empty() {
        return Ok(String::new());
    }
    if !encoded
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
    {
        return Err(ReportError::compression("", "not base64 text"));
    }
    let wide = lz_str::decompress_from_base64(encoded)
        .ok_or_else(|| ReportError::compression("", "invalid lz-string base64 data"))?;
    String::from_utf16(&wide)
        .map_err(|e| ReportError::compression("", format!("decoded text is not UTF-16: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_round_trip() {
        assert_eq!(compress(""), "");
        assert_eq!(decompress("").unwrap(), "");
    }

    #[test]
    fn test_non_ascii_round_trip() {
        let text = "const grüße = \"こんにちは 🌍\";\n// ünïcödé\r\n\tend";
        assert_eq!(decompress(&compress(text)).unwrap(), text);
    }

    #[test]
    fn test_output_is_ascii() {
        let encoded = compress("λ x → x + 1\n".repeat(20).as_str());
        assert!(encoded.is_ascii());
    }

    #[test]
    fn test_rejects_non_base64() {
        assert!(decompress("\u{1}\u{2}").is_err());
        assert!(decompress("abc def").is_err());
    }

    #[test]
    fn test_deterministic() {
        let text = "function add(a, b) {\n  return a + b;\n}\n";
        assert_eq!(compress(text), compress(text));
    }

    #[test]
    fn test_repetitive_source_shrinks() {
        let text = "export const x = 1;\n".repeat(200);
        assert!(compress(&text).len() < text.len());
    }

    proptest! {
        #[test]
        fn prop_round_trip(text in any::<String>()) {
            prop_assert_eq!(decompress(&compress(&text)).unwrap(), text);
        }

        #[test]
        fn prop_round_trip_source_like(text in "[ -~\n\t]{0,400}") {
            prop_assert_eq!(decompress(&compress(&text)).unwrap(), text);
        }
    }
}
