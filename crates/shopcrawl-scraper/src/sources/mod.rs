//! Source-specific extraction strategies.
//!
//! Each storefront exposes catalog data differently — embedded script
//! JSON, JSON-LD islands, or plain markup — so each gets one small
//! [`Source`] implementation. Normalization is shared: strategies produce
//! raw field bags and [`crate::normalize`] converges them on the canonical
//! schema.

mod foreign_fortune;
mod le_chocolat;
mod trader_joes;

pub use foreign_fortune::ForeignFortune;
pub use le_chocolat::LeChocolat;
pub use trader_joes::TraderJoes;

use crate::error::ScraperError;
use crate::extract::{Listing, ListingMeta, RawDetail};

/// One listing root to paginate. Most sources have a single collection;
/// category-driven sources have several.
#[derive(Debug, Clone)]
pub struct Collection {
    pub label: String,
    pub url: String,
}

/// A per-source field extraction strategy.
///
/// Implementations are pure with respect to page text: all I/O stays in
/// the pipeline, which makes strategies directly testable on fixture HTML.
pub trait Source {
    fn name(&self) -> &'static str;

    /// Listing roots to paginate, in scrape order.
    fn collections(&self) -> Vec<Collection>;

    /// URL of page `page` of a collection listing. Page 1 is the bare
    /// collection URL; later pages append a source-specific page query
    /// parameter.
    fn listing_page_url(&self, collection_url: &str, page: u32) -> String {
        if page <= 1 {
            collection_url.to_owned()
        } else {
            format!("{collection_url}?page={page}")
        }
    }

    /// Extracts the item list and next-page affordance from a listing page.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingPayload`] when the listing's data block is
    /// absent (end of listings or changed page shape);
    /// [`ScraperError::Deserialize`] when the block is present but
    /// malformed.
    fn extract_listing(&self, page_text: &str) -> Result<Listing, ScraperError>;

    /// Extracts the raw detail fields for one item.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingPayload`] when the product block is absent,
    /// [`ScraperError::Deserialize`] when it is present but malformed.
    fn extract_detail(
        &self,
        page_text: &str,
        meta: &ListingMeta,
    ) -> Result<RawDetail, ScraperError>;
}

/// All registered sources, in scrape order.
#[must_use]
pub fn all() -> Vec<Box<dyn Source + Send + Sync>> {
    vec![
        Box::new(ForeignFortune::new()),
        Box::new(LeChocolat::new()),
        Box::new(TraderJoes::new()),
    ]
}

/// Looks a source up by its registered name.
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn Source + Send + Sync>> {
    all().into_iter().find(|s| s.name() == name)
}

/// Stringifies a JSON id field that may be a string or a number.
pub(crate) fn value_to_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_all_sources() {
        let names: Vec<&str> = all().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["foreignfortune", "lechocolat", "traderjoes"]);
    }

    #[test]
    fn by_name_finds_registered_sources() {
        assert!(by_name("lechocolat").is_some());
        assert!(by_name("unknown-shop").is_none());
    }

    #[test]
    fn default_listing_page_url_appends_page_param_after_page_one() {
        let source = ForeignFortune::new();
        assert_eq!(
            source.listing_page_url("https://shop.example.com/collections/all", 1),
            "https://shop.example.com/collections/all"
        );
        assert_eq!(
            source.listing_page_url("https://shop.example.com/collections/all", 3),
            "https://shop.example.com/collections/all?page=3"
        );
    }
}
