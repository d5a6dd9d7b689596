//! Persisted output: one JSON array of products per source.

use std::path::{Path, PathBuf};

use shopcrawl_core::Product;

use crate::error::ScraperError;

/// Writes `products` to `<output_dir>/<source_name>.json`, creating the
/// directory if absent. The file is truncated on write so a re-run
/// replaces the previous snapshot instead of concatenating onto it.
///
/// # Errors
///
/// Returns [`ScraperError::OutputIo`] on filesystem failure and
/// [`ScraperError::OutputEncode`] if the products cannot be serialized.
pub fn write_products(
    output_dir: &Path,
    source_name: &str,
    products: &[Product],
) -> Result<PathBuf, ScraperError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ScraperError::OutputIo {
        path: output_dir.display().to_string(),
        source,
    })?;

    let path = output_dir.join(format!("{source_name}.json"));
    let json =
        serde_json::to_string_pretty(products).map_err(|source| ScraperError::OutputEncode {
            path: path.display().to_string(),
            source,
        })?;

    std::fs::write(&path, json).map_err(|source| ScraperError::OutputIo {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}
