//! Normalization from raw extracted fields to the canonical [`Product`].
//!
//! The merge rule is fixed across sources: detail-page fields win over the
//! listing snapshot, and anything still missing is defaulted so the
//! validator can report it instead of the pipeline crashing.

use std::str::FromStr;

use rust_decimal::Decimal;
use shopcrawl_core::{Product, Variant, VariantGroup};

use crate::error::ScraperError;
use crate::extract::{ListingMeta, RawDetail, RawVariant};

/// Separator between the size and color components of a combined variant
/// title, e.g. `"M / Red"`.
const VARIANT_TITLE_SEPARATOR: &str = " / ";

/// Coerces a display price to an exact decimal, tolerating currency
/// symbols and thousands separators: every character that is not an ASCII
/// digit or `.` is stripped before parsing.
#[must_use]
pub fn clean_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Prefixes scheme-relative image references (`//cdn…`) with `https:`;
/// anything else passes through unchanged.
#[must_use]
pub fn normalize_image_url(raw: &str) -> String {
    if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_owned()
    }
}

/// Partitions raw variants into color groups.
///
/// A title of the form `"<size> / <color>"` splits into a size label and a
/// grouping key; a title without the separator is itself the key, with the
/// size defaulted to [`Variant::DEFAULT_SIZE`]. Groups appear in
/// first-seen key order and each group preserves input order, so the
/// partition is a pure function of the raw list.
#[must_use]
pub fn group_variants(raw_variants: &[RawVariant]) -> Vec<VariantGroup> {
    let mut groups: Vec<VariantGroup> = Vec::new();

    for raw in raw_variants {
        let (size, color) = match raw.title.split_once(VARIANT_TITLE_SEPARATOR) {
            Some((size, color)) => (size.to_owned(), color.to_owned()),
            None => (Variant::DEFAULT_SIZE.to_owned(), raw.title.clone()),
        };

        let variant = Variant {
            id: raw.id.clone(),
            size,
            // A variant price that fails coercion stays unset rather than
            // dropping the whole item.
            price: raw.price.as_deref().and_then(clean_price),
            image: raw.image.as_deref().map(normalize_image_url),
            url: raw.url.clone(),
        };

        match groups.iter_mut().find(|g| g.color == color) {
            Some(group) => group.variants.push(variant),
            None => groups.push(VariantGroup {
                color,
                variants: vec![variant],
            }),
        }
    }

    groups
}

/// Builds one canonical [`Product`] from the listing snapshot and the
/// detail-page field bag.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] when the detail page exposes a
/// display price that cannot be coerced to a decimal; the item is dropped
/// rather than persisted with a wrong price.
pub fn build_product(meta: &ListingMeta, raw: RawDetail) -> Result<Product, ScraperError> {
    let id = raw.id.unwrap_or_else(|| meta.id.clone());

    let title = raw
        .title
        .or_else(|| meta.title.clone())
        .unwrap_or_default();

    let price = match raw.price {
        Some(display) => Some(clean_price(&display).ok_or_else(|| {
            ScraperError::Normalization {
                product_id: id.clone(),
                reason: format!("cannot coerce price \"{display}\" to a decimal"),
            }
        })?),
        None => meta.price,
    };

    let images: Vec<String> = if raw.images.is_empty() {
        meta.images.iter().map(|i| normalize_image_url(i)).collect()
    } else {
        raw.images.iter().map(|i| normalize_image_url(i)).collect()
    };

    let image = images
        .first()
        .cloned()
        .or_else(|| meta.image.as_deref().map(normalize_image_url))
        .unwrap_or_default();

    let prices = if meta.prices.is_empty() {
        price.into_iter().collect()
    } else {
        meta.prices.clone()
    };
    let sales_prices = if meta.sales_prices.is_empty() {
        price.into_iter().collect()
    } else {
        meta.sales_prices.clone()
    };

    Ok(Product {
        id,
        title: title.clone(),
        image,
        price,
        // Sources without a description block fall back to the title.
        description: raw.description.unwrap_or(title),
        sales_prices,
        prices,
        images,
        url: raw.url.unwrap_or_else(|| meta.url.clone()),
        brand: meta.brand.clone().unwrap_or_default(),
        models: group_variants(&raw.variants),
    })
}
