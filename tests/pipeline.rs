use std::cell::RefCell;
use std::collections::HashMap;

use court_scraper_lib::error::Result;
use court_scraper_lib::writer::read_records;
use court_scraper_lib::{CaseScraper, PageSource, RecordWriter, ScrapeError, ScraperConfig};

const LISTING: &str = "https://elibrary.judiciary.gov.ph/thebookshelf/docmonth/Mar/2025/1";
const SITE: &str = "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1";

/// Serves canned pages and remembers which URLs were requested.
struct CannedSite {
    pages: HashMap<String, String>,
    requested: RefCell<Vec<String>>,
}

impl PageSource for CannedSite {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn case_page(number: u32, party: &str) -> String {
    format!(
        r#"<html><body><div class="single_content">
        <h3>[ G.R. No. {number}, March 3, 2025 ]</h3>
        <h3>PEOPLE OF THE PHILIPPINES VS. {party}</h3>
        <h3>DECISION</h3>
        <p>This is an appeal from a conviction.</p>
        <p><strong>Antecedent Facts</strong></p>
        <p>{party} was caught in a buy-bust operation.</p>
        <h4>Our Ruling</h4>
        <p>The appeal is bereft of merit.</p>
        <p>WHEREFORE, the appeal is DISMISSED.</p>
        <p>SO ORDERED.</p>
        <p>Caguioa (Chairperson), Inting, and Dimaampao, JJ., concur.</p>
        </div></body></html>"#
    )
}

fn site() -> CannedSite {
    let listing = format!(
        r#"<html><body><div id="container_title"><ul>
        <li><a href="/thebookshelf/showdocs/1/101"><strong>G.R. No. 101</strong></a></li>
        <li><a href="/thebookshelf/showdocs/1/102"><strong>G.R. No. 102</strong></a></li>
        <li><a href="{SITE}/101"><strong>G.R. No. 101</strong></a></li>
        <li><a href="/thebookshelf/showdocs/1/103"><strong>A.C. No. 103</strong></a></li>
        </ul></div></body></html>"#
    );

    let mut pages = HashMap::new();
    pages.insert(LISTING.to_string(), listing);
    pages.insert(format!("{SITE}/101"), case_page(101, "ALPHA"));
    pages.insert(format!("{SITE}/102"), case_page(102, "BRAVO"));
    pages.insert(format!("{SITE}/103"), case_page(103, "CHARLIE"));
    CannedSite { pages, requested: RefCell::new(Vec::new()) }
}

fn config(max_cases: Option<usize>) -> ScraperConfig {
    ScraperConfig {
        request_delay_secs: 0,
        max_cases,
        ..ScraperConfig::default()
    }
}

#[test]
fn listing_dedup_keeps_first_seen_order() {
    let scraper = CaseScraper::new(site(), &config(None)).unwrap();
    let urls: Vec<String> = scraper.case_links(LISTING).into_iter().map(|l| l.url).collect();
    assert_eq!(
        urls,
        vec![format!("{SITE}/101"), format!("{SITE}/102"), format!("{SITE}/103")]
    );
}

#[test]
fn max_cases_limits_rows_to_first_links() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decisions.csv");
    let mut writer = RecordWriter::open(&path).unwrap();

    let scraper = CaseScraper::new(site(), &config(Some(2))).unwrap();
    let summary = scraper.run(LISTING, &mut writer);
    assert_eq!(summary.found, 3);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.succeeded, 2);
    drop(writer);

    let rows = read_records(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].case_number, "G.R. No. 101");
    assert_eq!(rows[1].case_number, "G.R. No. 102");

    let first = &rows[0];
    assert_eq!(first.case_title, "PEOPLE OF THE PHILIPPINES VS. ALPHA");
    assert_eq!(first.facts, "Antecedent Facts ALPHA was caught in a buy-bust operation.");
    assert_eq!(first.ruling, "Our Ruling The appeal is bereft of merit.");
    assert_eq!(
        first.verdict,
        "WHEREFORE, the appeal is DISMISSED. SO ORDERED."
    );
    assert!(first.decision.starts_with("DECISION This is an appeal from a conviction."));
}

#[test]
fn each_page_is_requested_once_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = RecordWriter::open(dir.path().join("out.csv")).unwrap();

    let source = site();
    let scraper = CaseScraper::new(&source, &config(None)).unwrap();
    let summary = scraper.run(LISTING, &mut writer);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(
        *source.requested.borrow(),
        vec![
            LISTING.to_string(),
            format!("{SITE}/101"),
            format!("{SITE}/102"),
            format!("{SITE}/103"),
        ]
    );
}

#[test]
fn missing_listing_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut writer = RecordWriter::open(&path).unwrap();

    let scraper = CaseScraper::new(site(), &config(None)).unwrap();
    let summary = scraper.run(
        "https://elibrary.judiciary.gov.ph/thebookshelf/docmonth/Apr/2025/1",
        &mut writer,
    );
    assert_eq!(summary.found, 0);
    drop(writer);
    assert!(read_records(&path).unwrap().is_empty());
}
