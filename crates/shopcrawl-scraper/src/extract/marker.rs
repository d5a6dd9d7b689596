//! Marker-pair delimited payload extraction.
//!
//! Several storefronts embed their structured data as a JSON literal
//! framed by fixed surrounding text inside a script tag. The pattern is
//! fragile by nature — it couples extraction to exact page text — so each
//! marker pair is a named strategy value: a markup change means adjusting
//! one [`MarkerPair`], not core logic.

use regex::Regex;

use crate::error::ScraperError;

/// A start/end marker framing an embedded JSON literal.
#[derive(Debug, Clone, Copy)]
pub struct MarkerPair {
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

impl MarkerPair {
    /// Extracts the trimmed substring between the first occurrence of
    /// `start` and the following occurrence of `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingPayload`] when either marker is
    /// absent. Marker absence is the expected "page shape changed or item
    /// absent" signal and is deliberately distinct from a JSON parse
    /// failure.
    pub fn extract<'a>(&self, text: &'a str) -> Result<&'a str, ScraperError> {
        let start_idx = text
            .find(self.start)
            .ok_or_else(|| self.missing("start marker"))?
            + self.start.len();
        let end_offset = text[start_idx..]
            .find(self.end)
            .ok_or_else(|| self.missing("end marker"))?;
        Ok(text[start_idx..start_idx + end_offset].trim())
    }

    /// Extracts the delimited substring and parses it as JSON.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingPayload`] when a marker is absent,
    /// [`ScraperError::Deserialize`] when the substring is not valid JSON.
    pub fn extract_json(&self, text: &str) -> Result<serde_json::Value, ScraperError> {
        let payload = self.extract(text)?;
        serde_json::from_str(payload).map_err(|source| ScraperError::Deserialize {
            context: format!("{} payload", self.name),
            source,
        })
    }

    fn missing(&self, which: &str) -> ScraperError {
        ScraperError::MissingPayload {
            context: format!("{} {which} not found", self.name),
        }
    }
}

/// Returns the text content of the first `<script>` tag whose `id`
/// attribute equals `id`, or a [`ScraperError::MissingPayload`] when no
/// such tag exists.
///
/// # Errors
///
/// Returns [`ScraperError::MissingPayload`] when the script tag is absent.
pub fn script_by_id<'a>(html: &'a str, id: &str) -> Result<&'a str, ScraperError> {
    let re = Regex::new(&format!(
        r#"(?is)<script[^>]+id\s*=\s*["']{}["'][^>]*>(.*?)</script>"#,
        regex::escape(id)
    ))
    .expect("valid script-id regex");

    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ScraperError::MissingPayload {
            context: format!("script tag with id \"{id}\" not found"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: MarkerPair = MarkerPair {
        name: "test payload",
        start: r#"publish("viewed","#,
        end: ");}",
    };

    #[test]
    fn extracts_substring_between_markers() {
        let text = r#"before publish("viewed", {"a": 1} );} after"#;
        assert_eq!(PAIR.extract(text).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn missing_start_marker_is_missing_payload_not_parse_error() {
        let err = PAIR.extract("no markers here").unwrap_err();
        assert!(err.is_missing_data(), "expected MissingPayload, got {err:?}");
    }

    #[test]
    fn missing_end_marker_is_missing_payload() {
        let err = PAIR.extract(r#"publish("viewed", {"a": 1}"#).unwrap_err();
        assert!(err.is_missing_data());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let text = r#"publish("viewed", {"a": );} "#;
        let err = PAIR.extract_json(text).unwrap_err();
        assert!(matches!(err, ScraperError::Deserialize { .. }));
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = r#"publish("viewed", {"items": [1, 2, 3], "next": null} );}"#;
        let first = PAIR.extract_json(text).unwrap();
        let second = PAIR.extract_json(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn script_by_id_returns_inner_text() {
        let html = r#"<html><script id="setup" type="text/javascript">var x = 1;</script></html>"#;
        assert_eq!(script_by_id(html, "setup").unwrap(), "var x = 1;");
    }

    #[test]
    fn script_by_id_spans_newlines() {
        let html = "<script id=\"setup\">line1\nline2</script>";
        assert_eq!(script_by_id(html, "setup").unwrap(), "line1\nline2");
    }

    #[test]
    fn script_by_id_missing_is_missing_payload() {
        let err = script_by_id("<html></html>", "setup").unwrap_err();
        assert!(err.is_missing_data());
    }
}
