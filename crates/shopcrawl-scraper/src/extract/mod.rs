//! Raw extraction types and shared payload-extraction strategies.
//!
//! Extractors turn fetched page text into *raw* field bags; nothing here
//! is canonical yet. Three strategies are shared across sources:
//!
//! - [`marker`] — marker-pair delimited JSON embedded in script text,
//! - [`jsonld`] — `application/ld+json` structured-data islands,
//! - [`dom`] — CSS-query text/attribute assembly over parsed markup.
//!
//! Optional fields that are absent come back as `None`/empty; only a
//! required field's absence escalates as an error for that item.

pub mod dom;
pub mod jsonld;
pub mod marker;

use rust_decimal::Decimal;

/// Raw result of extracting one listing page.
#[derive(Debug)]
pub struct Listing {
    /// Per-item metadata in page order, carried into detail extraction.
    pub items: Vec<ListingMeta>,
    pub next_page: NextPage,
}

/// The listing's "next page" affordance, as observed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// The page shape exposes no pagination affordance at all; the loop
    /// continues until a page comes back empty.
    Open,
    /// Affordance present, referencing this href.
    Link(String),
    /// Affordance absent where the shape normally has one, or the listing
    /// is single-page by construction.
    End,
}

/// Fields captured from a listing snapshot for one item, before its detail
/// page has been fetched.
#[derive(Debug, Clone, Default)]
pub struct ListingMeta {
    pub id: String,
    pub title: Option<String>,
    /// Absolute URL of the item's detail page.
    pub url: String,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub prices: Vec<Decimal>,
    pub sales_prices: Vec<Decimal>,
    pub images: Vec<String>,
    pub brand: Option<String>,
}

/// Untyped field bag extracted from a detail page. The normalizer merges
/// this with the listing snapshot; detail fields win where both exist.
#[derive(Debug, Default)]
pub struct RawDetail {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub images: Vec<String>,
    /// Display price as shown on the page, uncleaned (may carry currency
    /// symbols or thousands separators).
    pub price: Option<String>,
    pub variants: Vec<RawVariant>,
}

/// One raw variant record prior to grouping.
#[derive(Debug, Clone)]
pub struct RawVariant {
    pub id: Option<String>,
    /// Display title, optionally of the form `"<size> / <color>"`.
    pub title: String,
    pub price: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
}
