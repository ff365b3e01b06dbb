//! Crawler module for catalog walking and field extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of catalog and detail pages
//! - A small DOM query interface over parsed pages
//! - Extraction of listing and detail fields
//! - Pagination-driven crawl coordination

mod coordinator;
pub mod document;
pub mod extractor;
mod fetcher;

pub use coordinator::{open_sink, run_crawl, CrawlReport, Crawler};
pub use document::{Node, Page};
pub use extractor::{rating_from_image_url, DetailFetch, DetailFields, ExtractedItem, Listing};
pub use fetcher::{build_http_client, fetch_document, FetchError};
