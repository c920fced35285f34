pub mod config;
pub mod delay_manager;
pub mod docket;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod listing;
pub mod logger;
pub mod record;
pub mod scraper;
pub mod text;
pub mod writer;

// Exporting types for convenience
pub use config::{OutputMode, ScraperConfig};
pub use error::ScrapeError;
pub use extractor::SectionExtractor;
pub use fetcher::{HttpFetcher, PageSource};
pub use listing::ListingExtractor;
pub use record::{CaseLink, CaseRecord};
pub use scraper::{CaseScraper, ScrapeSummary};
pub use writer::RecordWriter;
