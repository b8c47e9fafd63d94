//! Crawler building blocks shared by every strategy
//!
//! This module contains the per-URL work, independent of how it is scheduled:
//! - HTTP fetching (blocking and async flavours, one error classification)
//! - HTML parsing for title, text snippet and links
//! - The page pipeline from fetch result to outcome and sink write
//! - The frontier a run draws its URLs from

mod fetcher;
mod frontier;
mod page;
mod parser;

pub use fetcher::{
    build_blocking_client, build_http_client, fetch_url, fetch_url_blocking, FetchErrorKind,
    FetchResult,
};
pub use frontier::Frontier;
pub use page::{CrawlOutcome, PageProcessor, PageResult, ParsedRecord};
pub use parser::{parse_html, ParsedPage};
