//! Le Chocolat Alain Ducasse: category-driven catalog.
//!
//! Listings are single-page category views whose product URLs sit in a
//! JSON-LD `ItemList` island. Detail pages mix DOM queries (name,
//! description, gallery, linked products) with a JSON blob in the
//! `data-product` attribute of the product-details article.

use scraper::Html;
use serde_json::Value;

use crate::error::ScraperError;
use crate::extract::{dom, jsonld, Listing, ListingMeta, NextPage, RawDetail, RawVariant};

use super::{value_to_id, Collection, Source};

const CATEGORIES: [(&str, &str); 7] = [
    ("christmas", "/uk/christmas"),
    ("boxes", "/uk/chocolates"),
    ("gifts", "/uk/chocolate-gift"),
    ("bars", "/uk/chocolate-bar"),
    ("simple pleasures", "/uk/simple-pleasures"),
    ("specialty coffee beans", "/uk/specialty-coffee-beans"),
    ("specialty coffee capsules", "/uk/specialty-coffee-capsules"),
];

pub struct LeChocolat {
    base_url: String,
}

impl LeChocolat {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url("https://www.lechocolat-alainducasse.com")
    }

    /// Overrides the site origin; used by tests serving fixture pages.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for LeChocolat {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for LeChocolat {
    fn name(&self) -> &'static str {
        "lechocolat"
    }

    fn collections(&self) -> Vec<Collection> {
        CATEGORIES
            .iter()
            .map(|(label, path)| Collection {
                label: (*label).to_owned(),
                url: format!("{}{path}", self.base_url),
            })
            .collect()
    }

    fn extract_listing(&self, page_text: &str) -> Result<Listing, ScraperError> {
        let items = jsonld::item_list_urls(page_text)?
            .into_iter()
            .map(|url| ListingMeta {
                url,
                brand: Some("LE CHOCOLAT".to_owned()),
                ..ListingMeta::default()
            })
            .collect();

        // Categories are single-page; there is no pagination affordance.
        Ok(Listing {
            items,
            next_page: NextPage::End,
        })
    }

    fn extract_detail(
        &self,
        page_text: &str,
        meta: &ListingMeta,
    ) -> Result<RawDetail, ScraperError> {
        let doc = Html::parse_document(page_text);
        let root = doc.root_element();

        // The product-details article carries the authoritative JSON blob:
        // id, display price, and canonical link.
        let blob = dom::first_attr(root, "article#product-details", "data-product").ok_or_else(
            || ScraperError::MissingPayload {
                context: "article#product-details data-product attribute not found".to_owned(),
            },
        )?;
        let data: Value =
            serde_json::from_str(&blob).map_err(|source| ScraperError::Deserialize {
                context: "data-product attribute".to_owned(),
                source,
            })?;

        let title = dom::text_joined(root, "div[class*='productCard__name']");
        let description = dom::text_joined(root, "div[class*='productDescription__text']");
        let images = dom::all_attrs(root, "ul[class*='productImages__'] li a", "href");

        // Linked products act as this site's variant axis: one group per
        // linked flavor, labelled by the anchor title or the bullet text.
        let link_sel = dom::sel("ul.linkedProducts__list > li");
        let variants = root
            .select(&link_sel)
            .filter_map(|li| {
                let title = dom::first_attr(li, "a", "title")
                    .or_else(|| dom::first_text(li, "span[class*='linkedProducts__bullet'] span"))?;
                let url = dom::first_attr(li, "a", "href")
                    .unwrap_or_else(|| meta.url.clone());
                Some(RawVariant {
                    id: None,
                    title,
                    price: None,
                    image: None,
                    url: Some(url),
                })
            })
            .collect();

        Ok(RawDetail {
            id: data.get("id_product").and_then(value_to_id),
            title,
            description,
            url: data
                .get("link")
                .and_then(Value::as_str)
                .map(str::to_owned),
            images,
            price: data
                .get("price")
                .and_then(Value::as_str)
                .map(str::to_owned),
            variants,
        })
    }
}
