//! schema.org JSON-LD island extraction.

use regex::Regex;

use crate::error::ScraperError;

/// Extracts the item URLs of the first `ItemList` found in an
/// `application/ld+json` script block, in listed order.
///
/// Blocks that fail to parse as JSON are skipped — pages routinely carry
/// several LD islands and only one of interest.
///
/// # Errors
///
/// Returns [`ScraperError::MissingPayload`] when no block contains an
/// `ItemList` with at least one element URL.
pub fn item_list_urls(html: &str) -> Result<Vec<String>, ScraperError> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid ld+json regex");

    for cap in script_re.captures_iter(html) {
        let Some(json_text) = cap.get(1).map(|m| m.as_str()) else {
            continue;
        };

        let Ok(value) = serde_json::from_str::<serde_json::Value>(json_text) else {
            continue;
        };

        // Accept a top-level ItemList object or an array containing one.
        let candidates: Vec<&serde_json::Value> = match &value {
            serde_json::Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for candidate in candidates {
            if candidate.get("@type").and_then(serde_json::Value::as_str) != Some("ItemList") {
                continue;
            }
            let urls: Vec<String> = candidate
                .get("itemListElement")
                .and_then(serde_json::Value::as_array)
                .map(|elements| {
                    elements
                        .iter()
                        .filter_map(|e| {
                            e.get("url")
                                .or_else(|| e.get("item").and_then(|i| i.get("url")))
                                .and_then(serde_json::Value::as_str)
                                .map(str::to_owned)
                        })
                        .collect()
                })
                .unwrap_or_default();
            if !urls.is_empty() {
                return Ok(urls);
            }
        }
    }

    Err(ScraperError::MissingPayload {
        context: "ld+json ItemList block not found".to_owned(),
    })
}
