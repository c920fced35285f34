use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{error, info};

use court_scraper_lib::config::month_abbrev;
use court_scraper_lib::record::{HEADERS, VERDICT_NOT_FOUND};
use court_scraper_lib::writer::{month_file, read_records};
use court_scraper_lib::{delay_manager, logger};
use court_scraper_lib::{
    CaseScraper, HttpFetcher, OutputMode, RecordWriter, ScrapeSummary, ScraperConfig,
};

#[derive(Parser)]
#[command(name = "court_scraper", about = "Supreme Court e-library decision scraper")]
struct Cli {
    /// JSON config file; built-in defaults otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every case listed for the given months into CSV
    Scrape {
        /// Months to scrape (Jan, Feb, ...)
        #[arg(short, long, num_args = 1.., required = true)]
        months: Vec<String>,
        #[arg(short, long)]
        year: u32,
        /// Listing page number
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Max cases per listing page (0 = all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write one file per month instead of one shared file
        #[arg(long)]
        per_month: bool,
        /// Seconds to wait between requests
        #[arg(long)]
        delay: Option<u64>,
    },
    /// List the case links found on a listing page
    Links {
        #[arg(short, long)]
        month: String,
        #[arg(short, long)]
        year: u32,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Summarise an output CSV file
    Stats {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let mut config = ScraperConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scrape { months, year, page, limit, output, per_month, delay } => {
            if limit.is_some() {
                config.max_cases = limit;
            }
            if let Some(secs) = delay {
                config.request_delay_secs = secs;
            }
            if let Some(path) = output {
                config.output_file = path.to_string_lossy().into_owned();
            }
            if per_month {
                config.output_mode = OutputMode::PerMonth;
            }
            let months = normalise_months(&months)?;
            run_scrape(&config, &months, year, page)
        }
        Commands::Links { month, year, page } => {
            let month = normalise_months(&[month])?.remove(0);
            let scraper = CaseScraper::new(HttpFetcher::new(&config)?, &config)?;
            let links = scraper.case_links(&config.listing_url(month, year, page));
            for (i, link) in links.iter().enumerate() {
                println!("{:>3}  {}  {}", i + 1, link.url, link.title);
            }
            println!("{} case links found.", links.len());
            Ok(())
        }
        Commands::Stats { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(&config.output_file));
            print_stats(&path)
        }
    }
}

fn normalise_months(raw: &[String]) -> Result<Vec<&'static str>, Box<dyn Error>> {
    raw.iter()
        .map(|m| month_abbrev(m).ok_or_else(|| -> Box<dyn Error> { format!("unknown month: {}", m).into() }))
        .collect()
}

fn run_scrape(config: &ScraperConfig, months: &[&str], year: u32, page: u32) -> Result<(), Box<dyn Error>> {
    let scraper = CaseScraper::new(HttpFetcher::new(config)?, config)?;
    let base = PathBuf::from(&config.output_file);

    let mut shared = match config.output_mode {
        OutputMode::Shared => Some(RecordWriter::open(&base)?),
        OutputMode::PerMonth => None,
    };

    let mut total = ScrapeSummary::default();
    for (i, month) in months.iter().enumerate() {
        if i > 0 {
            delay_manager::polite_delay(config.request_delay());
        }
        let url = config.listing_url(month, year, page);
        info!("Scraping {} {} (page {})", month, year, page);

        let summary = match shared.as_mut() {
            Some(writer) => scraper.run(&url, writer),
            None => {
                let mut writer = RecordWriter::open(month_file(&base, month, year))?;
                scraper.run(&url, &mut writer)
            }
        };
        if summary.found == 0 {
            error!("No cases found for {} {}", month, year);
        }
        total += summary;
    }

    println!(
        "Done: {} cases scraped ({} processed, {} failed, {} listed).",
        total.succeeded, total.processed, total.failed, total.found
    );
    Ok(())
}

fn print_stats(path: &Path) -> Result<(), Box<dyn Error>> {
    let records = read_records(path)?;
    let ok: Vec<_> = records.iter().filter(|r| !r.is_error()).collect();

    println!("File:           {}", path.display());
    println!("Rows:           {}", records.len());
    println!("Error rows:     {}", records.len() - ok.len());
    for (idx, name) in HEADERS.iter().enumerate().take(5) {
        let empty = ok.iter().filter(|r| r.fields()[idx].is_empty()).count();
        println!("{:<15} {}", format!("No {}:", name.to_lowercase()), empty);
    }
    let no_verdict = ok.iter().filter(|r| r.verdict == VERDICT_NOT_FOUND).count();
    println!("{:<15} {}", "No verdict:", no_verdict);
    Ok(())
}
