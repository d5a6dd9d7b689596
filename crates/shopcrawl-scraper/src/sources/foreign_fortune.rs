//! Foreign Fortune: a Shopify storefront whose catalog data rides in the
//! `web-pixels-manager-setup` script.
//!
//! The listing page publishes a `collection_viewed` event whose JSON
//! argument carries `collection.productVariants`; the detail page embeds
//! an `initData` JSON literal with the full variant list. Both are
//! marker-pair payloads inside the same script tag.

use rust_decimal::Decimal;
use scraper::Html;
use serde_json::Value;

use crate::error::ScraperError;
use crate::extract::marker::{script_by_id, MarkerPair};
use crate::extract::{dom, Listing, ListingMeta, NextPage, RawDetail, RawVariant};

use super::{value_to_id, Collection, Source};

const WEB_PIXELS_SCRIPT_ID: &str = "web-pixels-manager-setup";

const COLLECTION_VIEWED: MarkerPair = MarkerPair {
    name: "collection_viewed event",
    start: "publish(\"collection_viewed\",",
    end: ");}",
};

const INIT_DATA: MarkerPair = MarkerPair {
    name: "web pixels initData",
    start: "isMerchantRequest: false,initData:",
    end: ",},function pageEvents",
};

pub struct ForeignFortune {
    base_url: String,
}

impl ForeignFortune {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url("https://foreignfortune.com")
    }

    /// Overrides the storefront origin; used by tests that serve fixture
    /// pages from a local server.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_owned()
        } else {
            format!("{}{href}", self.base_url)
        }
    }

    /// One listing entry from the `collection_viewed` payload. Entries
    /// missing a required field are dropped, not fatal.
    fn listing_item(&self, item: &Value) -> Option<ListingMeta> {
        let product = item.get("product")?;
        let id = value_to_id(item.get("id")?)?;
        let title = product.get("title").and_then(Value::as_str)?.to_owned();
        let url = self.absolute(product.get("url").and_then(Value::as_str)?);
        let brand = product
            .get("vendor")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let image = item
            .get("image")
            .and_then(|i| i.get("src"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let price = item
            .get("price")
            .and_then(|p| p.get("amount"))
            .and_then(value_to_decimal);

        Some(ListingMeta {
            id,
            title: Some(title),
            url,
            image: image.clone(),
            price,
            prices: price.into_iter().collect(),
            sales_prices: price.into_iter().collect(),
            images: image.into_iter().collect(),
            brand,
        })
    }
}

impl Default for ForeignFortune {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for ForeignFortune {
    fn name(&self) -> &'static str {
        "foreignfortune"
    }

    fn collections(&self) -> Vec<Collection> {
        vec![Collection {
            label: "all".to_owned(),
            url: format!("{}/collections/all", self.base_url),
        }]
    }

    fn extract_listing(&self, page_text: &str) -> Result<Listing, ScraperError> {
        let script = script_by_id(page_text, WEB_PIXELS_SCRIPT_ID)?;
        let data = COLLECTION_VIEWED.extract_json(script)?;

        let entries = data
            .get("collection")
            .and_then(|c| c.get("productVariants"))
            .and_then(Value::as_array)
            .ok_or_else(|| ScraperError::MissingPayload {
                context: "collection.productVariants not in collection_viewed payload".to_owned(),
            })?;

        let items: Vec<ListingMeta> = entries
            .iter()
            .filter_map(|item| {
                let meta = self.listing_item(item);
                if meta.is_none() {
                    tracing::debug!("dropping listing entry with missing required fields");
                }
                meta
            })
            .collect();

        // The themed pagination block's last <li> holds the next-page link.
        let doc = Html::parse_document(page_text);
        let next_page = dom::first_attr(
            doc.root_element(),
            "ul.list--inline.pagination li:last-child a",
            "href",
        )
        .map_or(NextPage::End, NextPage::Link);

        Ok(Listing { items, next_page })
    }

    fn extract_detail(
        &self,
        page_text: &str,
        _meta: &ListingMeta,
    ) -> Result<RawDetail, ScraperError> {
        let script = script_by_id(page_text, WEB_PIXELS_SCRIPT_ID)?;
        let data = INIT_DATA.extract_json(script)?;

        let variants = data
            .get("productVariants")
            .and_then(Value::as_array)
            .ok_or_else(|| ScraperError::MissingPayload {
                context: "productVariants not in initData payload".to_owned(),
            })?
            .iter()
            .filter_map(|v| {
                Some(RawVariant {
                    id: v.get("id").and_then(value_to_id),
                    title: v.get("title").and_then(Value::as_str)?.to_owned(),
                    price: v
                        .get("price")
                        .and_then(|p| p.get("amount"))
                        .and_then(value_to_amount),
                    image: v
                        .get("image")
                        .and_then(|i| i.get("src"))
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    url: None,
                })
            })
            .collect();

        Ok(RawDetail {
            variants,
            ..RawDetail::default()
        })
    }
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_amount(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_page(with_next: bool) -> String {
        let payload = serde_json::json!({
            "collection": {
                "id": "c-all",
                "productVariants": [
                    {
                        "id": 111,
                        "price": {"amount": 25.0, "currencyCode": "USD"},
                        "image": {"src": "//cdn.example.com/tee-red.jpg"},
                        "product": {
                            "title": "Classic Tee",
                            "vendor": "Foreign Fortune Clothing",
                            "url": "/products/classic-tee"
                        }
                    },
                    {
                        "id": 222,
                        "price": {"amount": 40.0, "currencyCode": "USD"},
                        "image": {"src": "//cdn.example.com/hoodie.jpg"},
                        "product": {
                            "title": "Zip Hoodie",
                            "vendor": "Foreign Fortune Clothing",
                            "url": "/products/zip-hoodie"
                        }
                    }
                ]
            }
        });
        let pagination = if with_next {
            r#"<ul class="list--inline pagination">
                 <li><a href="/collections/all?page=1">1</a></li>
                 <li><a href="/collections/all?page=2">Next</a></li>
               </ul>"#
        } else {
            ""
        };
        format!(
            r#"<html><body>{pagination}
               <script id="web-pixels-manager-setup">
                 (function() {{ publish("collection_viewed", {payload} );}} )();
               </script></body></html>"#
        )
    }

    fn detail_page() -> String {
        let payload = serde_json::json!({
            "productVariants": [
                {
                    "id": 111,
                    "title": "M / Red",
                    "price": {"amount": 25.0},
                    "image": {"src": "//cdn.example.com/tee-red.jpg"}
                },
                {
                    "id": 112,
                    "title": "L / Red",
                    "price": {"amount": 25.0},
                    "image": {"src": "//cdn.example.com/tee-red.jpg"}
                }
            ]
        });
        format!(
            r#"<html><script id="web-pixels-manager-setup">
               webPixelsManagerAPI.publish({{isMerchantRequest: false,initData: {payload} ,}},function pageEvents() {{}});
               </script></html>"#
        )
    }

    #[test]
    fn listing_extracts_items_and_next_link() {
        let source = ForeignFortune::new();
        let listing = source.extract_listing(&listing_page(true)).unwrap();
        assert_eq!(listing.items.len(), 2);
        let first = &listing.items[0];
        assert_eq!(first.id, "111");
        assert_eq!(first.title.as_deref(), Some("Classic Tee"));
        assert_eq!(first.url, "https://foreignfortune.com/products/classic-tee");
        assert_eq!(first.brand.as_deref(), Some("Foreign Fortune Clothing"));
        assert_eq!(first.price, Some(Decimal::new(250, 1)));
        assert_eq!(
            listing.next_page,
            NextPage::Link("/collections/all?page=2".to_owned())
        );
    }

    #[test]
    fn listing_without_pagination_block_ends() {
        let source = ForeignFortune::new();
        let listing = source.extract_listing(&listing_page(false)).unwrap();
        assert_eq!(listing.next_page, NextPage::End);
    }

    #[test]
    fn listing_without_script_is_missing_payload() {
        let source = ForeignFortune::new();
        let err = source
            .extract_listing("<html><body>maintenance</body></html>")
            .unwrap_err();
        assert!(err.is_missing_data());
    }

    #[test]
    fn detail_extracts_variants() {
        let source = ForeignFortune::new();
        let meta = ListingMeta::default();
        let raw = source.extract_detail(&detail_page(), &meta).unwrap();
        assert_eq!(raw.variants.len(), 2);
        assert_eq!(raw.variants[0].title, "M / Red");
        assert_eq!(raw.variants[0].id.as_deref(), Some("111"));
        assert_eq!(raw.variants[0].price.as_deref(), Some("25.0"));
        assert_eq!(
            raw.variants[0].image.as_deref(),
            Some("//cdn.example.com/tee-red.jpg")
        );
    }

    #[test]
    fn detail_without_init_data_is_missing_payload() {
        let source = ForeignFortune::new();
        let html = r#"<html><script id="web-pixels-manager-setup">var x;</script></html>"#;
        let err = source
            .extract_detail(html, &ListingMeta::default())
            .unwrap_err();
        assert!(err.is_missing_data());
    }
}
