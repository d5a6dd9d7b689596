pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod output;
pub mod pagination;
pub mod pipeline;
mod rate_limit;
pub mod sources;

pub use error::ScraperError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use pipeline::Pipeline;
