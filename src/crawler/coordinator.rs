//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is a two-state machine. While a catalog page is held it is
//! *active*: its listings are extracted (one detail fetch per listing) and
//! the next-page link is followed. When no next link exists the crawl is
//! *done*. Everything runs strictly in sequence; each request is awaited
//! before the next one is issued.

use crate::config::{Config, OutputMode};
use crate::crawler::document::Page;
use crate::crawler::extractor::{
    next_page_link, read_detail, read_listings, DetailFetch, ExtractedItem, Listing,
};
use crate::crawler::{build_http_client, fetch_document};
use crate::output::{RowSink, SqlDumpSink};
use crate::storage::SqliteStorage;
use crate::{ConfigError, HarvestError};
use reqwest::Client;
use std::path::Path;

/// Totals for a finished crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Catalog pages fetched and processed
    pub pages: u32,
    /// Rows handed to the sink
    pub rows: usize,
    /// Rows whose detail page could not be fetched
    pub detail_failures: usize,
    /// Rows written by the sink's final flush (0 in direct-write mode)
    pub flushed: usize,
}

enum CrawlState {
    Active { page: Page, number: u32 },
    Done,
}

/// Walks catalog pages and feeds one row per listing into a [`RowSink`]
pub struct Crawler<S: RowSink> {
    client: Client,
    sink: S,
    max_pages: u32,
}

impl<S: RowSink> Crawler<S> {
    pub fn new(client: Client, sink: S) -> Self {
        Self {
            client,
            sink,
            max_pages: 0,
        }
    }

    /// Stops after `max_pages` catalog pages; 0 means no limit
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the crawl from `start_url` until pagination runs out
    ///
    /// The sink is finished on every exit path: buffered rows are flushed
    /// and held handles released even when a catalog page fetch aborts the
    /// crawl. In that case the fetch error is returned and a flush failure
    /// is only logged.
    ///
    /// # Arguments
    ///
    /// * `start_url` - URL of the first catalog page; empty means nothing to crawl
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Pagination ran out or the page limit was reached
    /// * `Err(HarvestError)` - A catalog page fetch, a sink write, or the final flush failed
    pub async fn run(&mut self, start_url: &str) -> Result<CrawlReport, HarvestError> {
        let mut report = CrawlReport::default();
        let outcome = self.crawl(start_url, &mut report).await;
        let finished = self.sink.finish();

        match (outcome, finished) {
            (Ok(()), Ok(flushed)) => {
                report.flushed = flushed;
                tracing::info!(
                    "Crawl finished: {} pages, {} rows ({} without detail page)",
                    report.pages,
                    report.rows,
                    report.detail_failures
                );
                Ok(report)
            }
            (Ok(()), Err(e)) => Err(e),
            (Err(e), finished) => {
                tracing::error!(
                    "Crawl aborted on page {} after {} rows: {}",
                    report.pages + 1,
                    report.rows,
                    e
                );
                match finished {
                    Ok(flushed) if flushed > 0 => {
                        tracing::info!("Saved {} rows collected before the abort", flushed)
                    }
                    Ok(_) => {}
                    Err(flush_err) => {
                        tracing::error!("Failed to save rows after abort: {}", flush_err)
                    }
                }
                Err(e)
            }
        }
    }

    async fn crawl(
        &mut self,
        start_url: &str,
        report: &mut CrawlReport,
    ) -> Result<(), HarvestError> {
        if start_url.is_empty() {
            tracing::warn!("No catalog URL given, nothing to crawl");
            return Ok(());
        }

        let mut state = CrawlState::Active {
            page: fetch_document(&self.client, start_url).await?,
            number: 1,
        };

        while let CrawlState::Active { page, number } = state {
            tracing::info!(
                "Working on page: {} | current items: {}",
                number,
                report.rows
            );

            let next = next_page_link(&page.root()).map(|href| page.resolve(&href));

            self.process_page(&page, report).await?;
            report.pages = number;

            if self.max_pages > 0 && number >= self.max_pages {
                tracing::info!("Reached the limit of {} pages", self.max_pages);
                break;
            }

            state = match next {
                Some(link) => {
                    tracing::debug!("Next page: {}", link);
                    CrawlState::Active {
                        page: fetch_document(&self.client, &link).await?,
                        number: number + 1,
                    }
                }
                None => {
                    tracing::debug!("No next page link on page {}", number);
                    CrawlState::Done
                }
            };
        }

        Ok(())
    }

    /// Extracts and records every listing on one catalog page
    async fn process_page(
        &mut self,
        page: &Page,
        report: &mut CrawlReport,
    ) -> Result<(), HarvestError> {
        for listing in read_listings(page) {
            let item = self.extract_item(listing).await;

            if let DetailFetch::Failed { error } = &item.detail {
                tracing::warn!(
                    "Detail page for '{}' unavailable, using defaults: {}",
                    item.row.title,
                    error
                );
                report.detail_failures += 1;
            }

            tracing::debug!(
                "Item '{}' rating={} players={}",
                item.row.title,
                item.row.rating,
                item.row.players
            );
            self.sink.record(&item.row)?;
            report.rows += 1;
        }
        Ok(())
    }

    /// Visits the listing's detail page; failures are absorbed into the result
    async fn extract_item(&self, listing: Listing) -> ExtractedItem {
        let detail = if listing.link.is_empty() {
            DetailFetch::NoLink
        } else {
            match fetch_document(&self.client, &listing.link).await {
                Ok(detail_page) => DetailFetch::Loaded(read_detail(&detail_page.root())),
                Err(e) => DetailFetch::Failed {
                    error: e.to_string(),
                },
            }
        };
        ExtractedItem::new(listing, detail)
    }
}

/// Opens the sink selected by the output settings
pub fn open_sink(config: &Config) -> Result<Box<dyn RowSink>, HarvestError> {
    match config.output.mode {
        OutputMode::File => Ok(Box::new(SqlDumpSink::new(
            &config.output.sql_file,
            &config.output.table,
        ))),
        OutputMode::Database => {
            let db = config.database.as_ref().ok_or_else(|| {
                ConfigError::Validation(
                    "[database] section is required in database mode".to_string(),
                )
            })?;
            let storage = SqliteStorage::open(Path::new(&db.path), &config.output.table)?;
            tracing::info!("Writing rows directly to {} ({})", db.path, config.output.table);
            Ok(Box::new(storage))
        }
    }
}

/// Runs a complete crawl described by the settings
///
/// # Example
///
/// ```no_run
/// use workshop_harvest::config::load_config;
/// use workshop_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("settings.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} rows", report.rows);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let start_url = config.catalog.first_page_url()?;
    let client = build_http_client(&config.http)?;
    let sink = open_sink(config)?;

    tracing::info!("Starting crawl at {}", start_url);
    let mut crawler = Crawler::new(client, sink).with_max_pages(config.catalog.max_pages);
    crawler.run(start_url.as_str()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, HttpConfig};
    use crate::output::ResultRow;

    #[tokio::test]
    async fn test_empty_start_url_fetches_nothing() {
        let client = build_http_client(&HttpConfig::default()).unwrap();
        let mut crawler = Crawler::new(client, Vec::<ResultRow>::new());

        let report = crawler.run("").await.unwrap();

        assert_eq!(report, CrawlReport::default());
        assert!(crawler.sink().is_empty());
    }

    #[test]
    fn test_open_sink_file_mode() {
        let config = Config::default();
        assert!(open_sink(&config).is_ok());
    }

    #[test]
    fn test_open_sink_database_mode() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.mode = OutputMode::Database;
        config.database = Some(DatabaseConfig {
            path: dir.path().join("w.db").display().to_string(),
        });

        let mut sink = open_sink(&config).unwrap();
        assert_eq!(sink.finish().unwrap(), 0);
    }

    #[test]
    fn test_open_sink_database_mode_without_section() {
        let mut config = Config::default();
        config.output.mode = OutputMode::Database;
        assert!(matches!(
            open_sink(&config),
            Err(HarvestError::Config(ConfigError::Validation(_)))
        ));
    }
}
