//! Trader Joe's: JavaScript-rendered product grid.
//!
//! The listing markup only exists after client-side rendering, so this
//! source is normally driven through a browser-backed [`crate::fetch::PageFetcher`]
//! collaborator. Extraction itself is plain DOM work against the rendered
//! markup: hashed CSS-module class names are matched by prefix. The grid
//! has no next-page affordance; pagination runs until an empty page.

use scraper::Html;

use crate::error::ScraperError;
use crate::extract::{dom, Listing, ListingMeta, NextPage, RawDetail};
use crate::normalize::clean_price;

use super::{Collection, Source};

pub struct TraderJoes {
    base_url: String,
}

impl TraderJoes {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url("https://www.traderjoes.com")
    }

    /// Overrides the site origin; used by tests serving fixture pages.
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
}

impl Default for TraderJoes {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for TraderJoes {
    fn name(&self) -> &'static str {
        "traderjoes"
    }

    fn collections(&self) -> Vec<Collection> {
        vec![Collection {
            label: "products".to_owned(),
            url: format!("{}/home/products/category/products-2", self.base_url),
        }]
    }

    fn listing_page_url(&self, collection_url: &str, page: u32) -> String {
        if page <= 1 {
            collection_url.to_owned()
        } else {
            // URL-encoded {"page":N} filter object.
            format!("{collection_url}?filters=%7B%22page%22%3A{page}%7D")
        }
    }

    fn extract_listing(&self, page_text: &str) -> Result<Listing, ScraperError> {
        let doc = Html::parse_document(page_text);
        let root = doc.root_element();

        let list_sel = dom::sel("ul[class*='ProductList_productList__list'] > li");
        let items: Vec<ListingMeta> = root
            .select(&list_sel)
            .filter_map(|li| {
                let href = dom::first_attr(li, "section a", "href");
                let image = dom::first_attr(li, "section a div source", "srcset");
                let price_text =
                    dom::first_text(li, "span[class*='ProductPrice_productPrice__price']");

                // All three are required; a card missing any of them is
                // skipped, matching the "skip, don't abort" contract.
                let (Some(href), Some(image), Some(price_text)) = (href, image, price_text)
                else {
                    tracing::debug!("skipping product card with missing required fields");
                    return None;
                };

                let url = self.absolute(&href);
                let image = self.absolute(&image);
                let price = clean_price(&price_text);

                Some(ListingMeta {
                    // Detail pages carry no structured id; the trailing
                    // hyphen-separated URL segment is the stable one.
                    id: id_from_url(&url),
                    title: None,
                    url,
                    image: Some(image.clone()),
                    price,
                    prices: price.into_iter().collect(),
                    sales_prices: price.into_iter().collect(),
                    images: vec![image],
                    brand: Some("TRADERJOES".to_owned()),
                })
            })
            .collect();

        Ok(Listing {
            items,
            next_page: NextPage::Open,
        })
    }

    fn extract_detail(
        &self,
        page_text: &str,
        _meta: &ListingMeta,
    ) -> Result<RawDetail, ScraperError> {
        let doc = Html::parse_document(page_text);
        let root = doc.root_element();

        let title = dom::first_text(root, "h1[class*='ProductDetails_main__title']").ok_or_else(
            || ScraperError::MissingPayload {
                context: "product title heading not found".to_owned(),
            },
        )?;

        let description = dom::text_joined(root, "div[class*='Expand_expand__container'] div p");

        Ok(RawDetail {
            title: Some(title),
            description,
            ..RawDetail::default()
        })
    }
}

/// Stable id: the final hyphen-separated segment of the detail URL.
fn id_from_url(url: &str) -> String {
    url.rsplit('-').next().unwrap_or(url).to_owned()
}
