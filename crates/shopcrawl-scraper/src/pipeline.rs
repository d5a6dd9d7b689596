//! Per-source orchestration: pagination, item traversal, failure isolation.
//!
//! One pipeline run covers one source with one fetcher session. Products
//! accumulate in strict listing-then-detail traversal order; duplicate ids
//! across pages are kept as observed (the output order is the audit
//! trail). Every failure class is contained to the smallest scope that
//! can absorb it: an item failure skips that item, a listing-page failure
//! ends that collection's pagination, and a run always yields whatever
//! was collected.

use std::time::Duration;

use shopcrawl_core::{AppConfig, Product};

use crate::error::ScraperError;
use crate::extract::ListingMeta;
use crate::fetch::PageFetcher;
use crate::normalize::build_product;
use crate::pagination::should_continue;
use crate::sources::{Collection, Source};

/// Orchestrates one source's scrape over an owned fetcher reference.
pub struct Pipeline<'a, F: PageFetcher> {
    fetcher: &'a F,
    config: &'a AppConfig,
}

impl<'a, F: PageFetcher> Pipeline<'a, F> {
    #[must_use]
    pub fn new(fetcher: &'a F, config: &'a AppConfig) -> Self {
        Self { fetcher, config }
    }

    /// Runs the full scrape for `source` and returns every successfully
    /// processed product, best-effort. Page- and item-level failures are
    /// logged and contained; they never abort the run.
    pub async fn run(&self, source: &(dyn Source + Send + Sync)) -> Vec<Product> {
        let mut products = Vec::new();

        for collection in source.collections() {
            self.scrape_collection(source, &collection, &mut products)
                .await;
        }

        tracing::info!(
            source = source.name(),
            total = products.len(),
            "scrape complete"
        );
        products
    }

    /// Paginates one collection listing, appending products in traversal
    /// order.
    async fn scrape_collection(
        &self,
        source: &(dyn Source + Send + Sync),
        collection: &Collection,
        products: &mut Vec<Product>,
    ) {
        let mut page: u32 = 1;

        loop {
            // Safety bound over the otherwise open-ended loop: a site that
            // paginates forever must not consume unbounded resources.
            if page > self.config.max_pages {
                let err = ScraperError::PaginationLimit {
                    source_name: source.name().to_owned(),
                    max_pages: self.config.max_pages,
                };
                tracing::error!(collection = %collection.label, error = %err, "stopping pagination");
                break;
            }

            let url = source.listing_page_url(&collection.url, page);
            tracing::info!(
                source = source.name(),
                collection = %collection.label,
                page,
                url = %url,
                "scraping listing page"
            );

            let page_text = match self.fetcher.fetch(&url).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "listing fetch failed, stopping pagination");
                    break;
                }
            };

            let listing = match source.extract_listing(&page_text) {
                Ok(listing) => listing,
                Err(err) if err.is_missing_data() => {
                    tracing::info!(page, "no listing payload, stopping pagination");
                    break;
                }
                Err(err) => {
                    tracing::warn!(page, error = %err, "listing extraction failed, stopping pagination");
                    break;
                }
            };

            if listing.items.is_empty() {
                tracing::info!(page, "no products on page, stopping pagination");
                break;
            }

            for meta in &listing.items {
                match self.process_item(source, meta).await {
                    Ok(product) => products.push(product),
                    Err(err) if err.is_missing_data() => {
                        tracing::debug!(url = %meta.url, "no product payload on detail page, skipping item");
                    }
                    Err(err) => {
                        tracing::warn!(url = %meta.url, error = %err, "failed to process item, skipping");
                    }
                }

                if self.config.inter_item_delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(self.config.inter_item_delay_ms))
                        .await;
                }
            }

            tracing::info!(page, running_total = products.len(), "completed listing page");

            if !should_continue(&listing.next_page, page) {
                tracing::info!(page, "pagination contract exhausted, stopping");
                break;
            }

            if self.config.inter_page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.inter_page_delay_ms)).await;
            }
            page += 1;
        }
    }

    /// Fetches, extracts, and normalizes one item. Any error here is
    /// scoped to this item.
    async fn process_item(
        &self,
        source: &(dyn Source + Send + Sync),
        meta: &ListingMeta,
    ) -> Result<Product, ScraperError> {
        let page_text = self.fetcher.fetch(&meta.url).await?;
        let raw = source.extract_detail(&page_text, meta)?;
        build_product(meta, raw)
    }
}
