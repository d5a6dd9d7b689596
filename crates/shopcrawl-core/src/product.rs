//! Canonical catalog entities shared by every source.
//!
//! Every source converges on [`Product`] regardless of how the storefront
//! exposes its data (embedded script JSON, JSON-LD, raw markup). Field
//! names are fixed — the persisted output is one JSON array of these
//! records per source, and the validator addresses fields by name.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalog item, normalized from listing + detail page data.
///
/// Instances are built once per scrape by the normalizer and are not
/// mutated afterwards. `Decimal` fields serialize as decimal strings to
/// avoid float drift in persisted snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Source-assigned identifier. Numeric IDs are stored as strings to
    /// avoid precision loss on large Shopify-style IDs.
    pub id: String,
    pub title: String,
    /// Primary image URL, absolute.
    pub image: String,
    /// Current display price. `None` when the source exposed no usable
    /// price; the validator reports it as a missing required field.
    pub price: Option<Decimal>,
    pub description: String,
    /// One entry per known price tier/variant snapshot. By invariant
    /// `sales_prices[i] <= prices[i]`.
    #[serde(default)]
    pub sales_prices: Vec<Decimal>,
    #[serde(default)]
    pub prices: Vec<Decimal>,
    /// Full image gallery, ordered; may be a single-element list.
    #[serde(default)]
    pub images: Vec<String>,
    /// Canonical product page URL, absolute HTTP(S).
    pub url: String,
    pub brand: String,
    /// Variant groups keyed by color (or equivalent). Empty when the
    /// source has no variant concept.
    #[serde(default)]
    pub models: Vec<VariantGroup>,
}

impl Product {
    /// Returns the total number of purchasable variants across all groups.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.models.iter().map(|g| g.variants.len()).sum()
    }
}

/// All variants sharing one grouping key (commonly a color).
///
/// Groups preserve first-seen key order from the raw variant list; the
/// partition is a pure function of that list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantGroup {
    /// Grouping label. For sources without a color axis this carries the
    /// raw variant title.
    pub color: String,
    pub variants: Vec<Variant>,
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Size label parsed from a combined `"<size> / <color>"` title, or
    /// [`Variant::DEFAULT_SIZE`] when the source has no size axis.
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Variant-specific image URL, absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Variant-specific page URL, for sources that model variants as
    /// linked products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Variant {
    /// Sentinel size for variants whose title carries no size component.
    pub const DEFAULT_SIZE: &'static str = "ONE SIZE";
}
