use std::ops::AddAssign;
use std::time::Duration;

use log::{error, info, warn};

use crate::config::ScraperConfig;
use crate::delay_manager;
use crate::error::Result;
use crate::extractor::SectionExtractor;
use crate::fetcher::PageSource;
use crate::listing::ListingExtractor;
use crate::record::{CaseLink, CaseRecord};
use crate::writer::RecordWriter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Unique case links on the listing page, before the case limit.
    pub found: usize,
    pub processed: usize,
    /// Rows written that are not error rows.
    pub succeeded: usize,
    pub failed: usize,
}

impl AddAssign for ScrapeSummary {
    fn add_assign(&mut self, other: Self) {
        self.found += other.found;
        self.processed += other.processed;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

/// Drives one listing page at a time: links first, then every case page
/// in order, one request in flight.
pub struct CaseScraper<S: PageSource> {
    source: S,
    listing: ListingExtractor,
    extractor: SectionExtractor,
    delay: Duration,
    max_cases: Option<usize>,
}

impl<S: PageSource> CaseScraper<S> {
    pub fn new(source: S, config: &ScraperConfig) -> Result<Self> {
        Ok(CaseScraper {
            source,
            listing: ListingExtractor::new(config)?,
            extractor: SectionExtractor::new(config)?,
            delay: config.request_delay(),
            max_cases: config.case_limit(),
        })
    }

    /// A listing page that cannot be fetched counts as zero cases.
    pub fn case_links(&self, listing_url: &str) -> Vec<CaseLink> {
        info!("Accessing listing page: {}", listing_url);
        match self.source.fetch(listing_url) {
            Ok(html) => self.listing.extract(&html),
            Err(e) => {
                error!("Error accessing listing page {}: {}", listing_url, e);
                Vec::new()
            }
        }
    }

    /// Fetch failures become an error record; this never fails.
    pub fn scrape_case(&self, link: &CaseLink) -> CaseRecord {
        let known_title = Some(link.title.as_str()).filter(|t| !t.trim().is_empty());
        match self.source.fetch(&link.url) {
            Ok(html) => self.extractor.extract(&html, known_title),
            Err(e) => {
                error!("Error processing case page {}: {}", link.url, e);
                CaseRecord::failed(&e, known_title)
            }
        }
    }

    pub fn run(&self, listing_url: &str, writer: &mut RecordWriter) -> ScrapeSummary {
        let mut links = self.case_links(listing_url);
        let mut summary = ScrapeSummary {
            found: links.len(),
            ..ScrapeSummary::default()
        };
        if let Some(limit) = self.max_cases {
            links.truncate(limit);
        }
        info!("Found {} cases to process", links.len());

        let total = links.len();
        for (i, link) in links.iter().enumerate() {
            info!("Processing case {} / {}: {}", i + 1, total, link.url);
            let record = self.scrape_case(link);
            summary.processed += 1;

            match writer.write(&record) {
                Ok(()) if record.is_error() => {
                    summary.failed += 1;
                    warn!("Wrote error row for {}", link.url);
                }
                Ok(()) => {
                    summary.succeeded += 1;
                    info!("Successfully scraped case: {}", record.case_number);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("Failed to write CSV record for {}: {}", link.url, e);
                }
            }

            if i + 1 < total {
                delay_manager::polite_delay(self.delay);
            }
        }

        info!(
            "Scraping complete: {} of {} cases scraped, data saved to {:?}",
            summary.succeeded,
            summary.processed,
            writer.path()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::writer::read_records;
    use std::collections::HashMap;

    struct StaticPages(HashMap<String, String>);

    impl PageSource for StaticPages {
        fn fetch(&self, url: &str) -> Result<String> {
            self.0.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn config() -> ScraperConfig {
        ScraperConfig {
            request_delay_secs: 0,
            ..ScraperConfig::default()
        }
    }

    const LISTING: &str = "https://elibrary.judiciary.gov.ph/thebookshelf/docmonth/Jan/2025/1";

    #[test]
    fn unreachable_listing_yields_no_links() {
        let scraper = CaseScraper::new(StaticPages(HashMap::new()), &config()).unwrap();
        assert!(scraper.case_links(LISTING).is_empty());
    }

    #[test]
    fn failed_case_is_written_as_error_row_and_batch_continues() {
        let mut pages = HashMap::new();
        pages.insert(
            LISTING.to_string(),
            r#"<a href="/thebookshelf/showdocs/1/1">G.R. No. 1 PEOPLE VS. ONE</a>
               <a href="/thebookshelf/showdocs/1/2">G.R. No. 2</a>"#
                .to_string(),
        );
        pages.insert(
            "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/2".to_string(),
            "<h3>G.R. No. 2</h3><p>WHEREFORE, DENIED.</p><p>SO ORDERED.</p>".to_string(),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = RecordWriter::open(&path).unwrap();
        let scraper = CaseScraper::new(StaticPages(pages), &config()).unwrap();

        let summary = scraper.run(LISTING, &mut writer);
        assert_eq!(
            summary,
            ScrapeSummary { found: 2, processed: 2, succeeded: 1, failed: 1 }
        );

        let rows = read_records(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_error());
        assert_eq!(rows[0].case_title, "PEOPLE VS. ONE");
        assert!(rows[0].facts.contains("returned status 404"));
        assert_eq!(rows[1].case_number, "G.R. No. 2");
        assert_eq!(rows[1].verdict, "WHEREFORE, DENIED. SO ORDERED.");
    }
}
