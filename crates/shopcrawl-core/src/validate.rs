//! Business-rule validation over normalized products.
//!
//! The validator is a pure function: it never mutates its input and never
//! aborts on a malformed record — each rule failure is isolated to one
//! field of one product, and a single product can yield several errors.
//!
//! Rules run over `serde_json::Value` objects rather than typed
//! [`Product`]s so the same rule set covers freshly scraped records and
//! previously persisted JSON files re-checked from disk.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::product::Product;

/// Fields every persisted product must carry with a truthy value.
const REQUIRED_FIELDS: [&str; 4] = ["id", "title", "price", "url"];

/// Absolute HTTP(S) or `www.`-prefixed URL, anchored at the start.
const URL_PATTERN: &str = r#"^(https?://[^\s<>"]+|www\.[^\s<>"]+)"#;

/// One rule violation for one field of one product.
///
/// Produced only by the validator; consumed for logging/alerting and never
/// persisted as primary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub error: String,
    /// Identifier of the offending product, absent when the product itself
    /// carries no usable id.
    pub product_id: Option<String>,
}

/// Validates typed products by serializing them through the same rule set
/// as [`validate_values`].
#[must_use]
pub fn validate_products(products: &[Product]) -> Vec<ValidationError> {
    let values: Vec<Value> = products
        .iter()
        .map(|p| serde_json::to_value(p).unwrap_or(Value::Null))
        .collect();
    validate_values(&values)
}

/// Runs all rule checks over every product object and concatenates the
/// results.
#[must_use]
pub fn validate_values(products: &[Value]) -> Vec<ValidationError> {
    let url_re = Regex::new(URL_PATTERN).expect("valid URL regex");
    products
        .iter()
        .flat_map(|product| validate_value(product, &url_re))
        .collect()
}

fn validate_value(product: &Value, url_re: &Regex) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let product_id = extract_id(product);

    // Required-field rule: absent or falsy values both count as missing.
    for field in REQUIRED_FIELDS {
        let value = product.get(field);
        if value.is_none_or(is_falsy) {
            errors.push(ValidationError {
                field: field.to_string(),
                error: format!("Missing required field: {field}"),
                product_id: product_id.clone(),
            });
        }
    }

    // Price-consistency rule: only when both a price and a sales-price
    // list are present. Comparison is exact decimal; a value that does not
    // convert is reported rather than crashing the run.
    if let (Some(price), Some(Value::Array(sales))) =
        (product.get("price"), product.get("sales_prices"))
    {
        if let Some(first_sale) = sales.first() {
            match (decimal_from_value(price), decimal_from_value(first_sale)) {
                (Some(price), Some(sale)) => {
                    if sale > price {
                        errors.push(ValidationError {
                            field: "sales_price".to_string(),
                            error: "Sales price cannot be greater than original price"
                                .to_string(),
                            product_id: product_id.clone(),
                        });
                    }
                }
                _ => errors.push(ValidationError {
                    field: "price".to_string(),
                    error: "Invalid price format".to_string(),
                    product_id: product_id.clone(),
                }),
            }
        }
    }

    // URL-format rule: anything that is not an absolute HTTP(S) or
    // `www.`-prefixed URL is rejected, including non-string values.
    if let Some(url) = product.get("url") {
        let well_formed = url.as_str().is_some_and(|u| url_re.is_match(u));
        if !well_formed {
            errors.push(ValidationError {
                field: "url".to_string(),
                error: "Invalid URL format".to_string(),
                product_id: product_id.clone(),
            });
        }
    }

    errors
}

/// Python-style falsiness: null, false, zero, and empty containers all
/// count as absent for the required-field rule.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn extract_id(product: &Value) -> Option<String> {
    match product.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Converts a JSON number or numeric string to an exact [`Decimal`].
fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_id_yields_exactly_one_required_field_error() {
        let products = vec![json!({
            "id": "",
            "title": "t",
            "price": 1,
            "url": "http://x"
        })];
        let errors = validate_values(&products);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "id");
        assert_eq!(errors[0].error, "Missing required field: id");
    }

    #[test]
    fn missing_field_and_falsy_field_both_reported() {
        let products = vec![json!({
            "id": "p1",
            "price": 0,
            "url": "https://example.com/p/1"
        })];
        let errors = validate_values(&products);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "price"]);
    }

    #[test]
    fn sales_price_above_list_price_is_an_error() {
        let products = vec![json!({
            "id": "p1",
            "title": "t",
            "price": "10.00",
            "sales_prices": ["12.00"],
            "url": "https://example.com/p/1"
        })];
        let errors = validate_values(&products);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "sales_price");
        assert_eq!(errors[0].product_id.as_deref(), Some("p1"));
    }

    #[test]
    fn sales_price_below_list_price_passes() {
        let products = vec![json!({
            "id": "p1",
            "title": "t",
            "price": "10.00",
            "sales_prices": ["8.00"],
            "url": "https://example.com/p/1"
        })];
        assert!(validate_values(&products).is_empty());
    }

    #[test]
    fn exact_decimal_comparison_is_not_float_comparison() {
        // 10.10 vs 10.1 must compare equal under exact decimal semantics.
        let products = vec![json!({
            "id": "p1",
            "title": "t",
            "price": "10.10",
            "sales_prices": [10.1],
            "url": "https://example.com/p/1"
        })];
        assert!(validate_values(&products).is_empty());
    }

    #[test]
    fn non_numeric_price_reports_invalid_format() {
        let products = vec![json!({
            "id": "p1",
            "title": "t",
            "price": "ten dollars",
            "sales_prices": ["8.00"],
            "url": "https://example.com/p/1"
        })];
        let errors = validate_values(&products);
        assert!(errors
            .iter()
            .any(|e| e.field == "price" && e.error == "Invalid price format"));
    }

    #[test]
    fn malformed_url_is_an_error() {
        let products = vec![json!({
            "id": "p1",
            "title": "t",
            "price": 1,
            "url": "not-a-url"
        })];
        let errors = validate_values(&products);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "url");
        assert_eq!(errors[0].error, "Invalid URL format");
    }

    #[test]
    fn absolute_and_www_urls_pass() {
        let products = vec![
            json!({"id": "a", "title": "t", "price": 1, "url": "https://example.com/p/1"}),
            json!({"id": "b", "title": "t", "price": 1, "url": "www.example.com/p/2"}),
        ];
        assert!(validate_values(&products).is_empty());
    }

    #[test]
    fn one_product_can_yield_multiple_errors() {
        let products = vec![json!({
            "id": "",
            "title": "",
            "price": "10.00",
            "sales_prices": ["20.00"],
            "url": "nope"
        })];
        let errors = validate_values(&products);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "title", "sales_price", "url"]);
    }

    #[test]
    fn malformed_product_does_not_abort_the_batch() {
        let products = vec![
            json!("not an object"),
            json!({"id": "ok", "title": "t", "price": 1, "url": "https://example.com"}),
        ];
        let errors = validate_values(&products);
        // The non-object yields required-field errors; the good product none.
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.product_id.is_none()));
    }

    #[test]
    fn numeric_id_is_stringified_in_reports() {
        let products = vec![json!({
            "id": 42,
            "title": "",
            "price": 1,
            "url": "https://example.com"
        })];
        let errors = validate_values(&products);
        assert_eq!(errors[0].product_id.as_deref(), Some("42"));
    }

    #[test]
    fn validate_products_accepts_typed_input() {
        use crate::product::Product;
        let product = Product {
            id: String::new(),
            title: "t".to_string(),
            image: "https://cdn.example.com/a.jpg".to_string(),
            price: Some(rust_decimal::Decimal::ONE),
            description: "t".to_string(),
            sales_prices: vec![],
            prices: vec![],
            images: vec![],
            url: "https://example.com/p/1".to_string(),
            brand: "b".to_string(),
            models: vec![],
        };
        let errors = validate_products(&[product]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "id");
    }
}
