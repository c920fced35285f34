use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A docket kind and the regex that recognises its case numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocketPattern {
    pub kind: String,
    pub pattern: String,
}

/// Header labels that open a section, and labels that end it.
/// Both lists are in priority order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SectionLabels {
    pub labels: Vec<String>,
    pub boundaries: Vec<String>,
}

/// Where scraped rows go when more than one month is scraped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Shared,
    PerMonth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub listing_path: String,
    pub document_path_marker: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub request_delay_secs: u64,
    pub max_cases: Option<usize>,
    pub output_file: String,
    pub output_mode: OutputMode,
    pub docket_patterns: Vec<DocketPattern>,
    pub facts: SectionLabels,
    pub decision: SectionLabels,
    pub ruling: SectionLabels,
    pub verdict_markers: Vec<String>,
    pub verdict_closers: Vec<String>,
    pub disposition_keywords: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const VERDICT_INTROS: &[&str] = &[
    "ACCORDINGLY",
    "FOR THESE REASONS",
    "IN VIEW OF THE FOREGOING",
    "PREMISES CONSIDERED",
];

impl Default for ScraperConfig {
    fn default() -> Self {
        let mut decision_bounds = strings(&["WHEREFORE", "Conclusion", "Our Ruling"]);
        decision_bounds.extend(strings(VERDICT_INTROS));
        let mut ruling_bounds = strings(&["WHEREFORE", "Conclusion"]);
        ruling_bounds.extend(strings(VERDICT_INTROS));

        ScraperConfig {
            base_url: "https://elibrary.judiciary.gov.ph".to_string(),
            listing_path: "thebookshelf/docmonth".to_string(),
            document_path_marker: "/thebookshelf/showdocs/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 30,
            request_delay_secs: 2,
            max_cases: None,
            output_file: "supreme_court_decisions.csv".to_string(),
            output_mode: OutputMode::Shared,
            docket_patterns: vec![
                DocketPattern {
                    kind: "G.R.".to_string(),
                    pattern: r"G\.R\.\s+Nos?\.\s+\d+(?:-\d+)?".to_string(),
                },
                DocketPattern {
                    kind: "A.C.".to_string(),
                    pattern: r"A\.C\.\s+Nos?\.\s+\d+(?:-\d+)?".to_string(),
                },
                DocketPattern {
                    kind: "A.M.".to_string(),
                    pattern: r"A\.M\.\s+Nos?\.\s+(?:[A-Z]+-)?\d+(?:-\d+)*".to_string(),
                },
            ],
            facts: SectionLabels {
                labels: strings(&[
                    "Factual Antecedents",
                    "The Facts",
                    "Antecedent Facts",
                    "The Antecedents",
                    "Facts",
                ]),
                boundaries: strings(&["Ruling", "Decision", "Discussion"]),
            },
            decision: SectionLabels {
                labels: strings(&["DECISION", "RESOLUTION"]),
                boundaries: decision_bounds,
            },
            ruling: SectionLabels {
                labels: strings(&[
                    "Our Ruling",
                    "The Court's Ruling",
                    "Ruling of the Court",
                    "The Ruling",
                    "Ruling",
                ]),
                boundaries: ruling_bounds,
            },
            verdict_markers: strings(&[
                "WHEREFORE",
                "ACCORDINGLY",
                "FOR THESE REASONS",
                "IN VIEW OF THE FOREGOING",
                "IN LIGHT OF THE FOREGOING",
                "PREMISES CONSIDERED",
                "FOR ALL THE FOREGOING",
            ]),
            verdict_closers: strings(&["SO ORDERED", "concur"]),
            disposition_keywords: strings(&[
                "is sentenced to",
                "are sentenced to",
                "is ordered to pay",
                "is hereby ordered",
                "penalty of",
            ]),
        }
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `jan`, `JAN` or `January` → `Jan`, the form the listing URLs use.
pub fn month_abbrev(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if input.len() < 3 {
        return None;
    }
    let prefix = input.get(..3)?.to_ascii_lowercase();
    MONTHS.iter().copied().find(|m| m.to_ascii_lowercase() == prefix)
}

impl ScraperConfig {
    /// Reads a JSON config; fields missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p)?;
                let config: ScraperConfig = serde_json::from_str(&content)?;
                info!("Loaded config from {:?}", p);
                Ok(config)
            }
            None => Ok(ScraperConfig::default()),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `<base>/<listing_path>/<Month>/<Year>/<page>`
    pub fn listing_url(&self, month: &str, year: u32, page: u32) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.listing_path.trim_matches('/'),
            month,
            year,
            page
        )
    }

    /// Zero or unset means no limit.
    pub fn case_limit(&self) -> Option<usize> {
        self.max_cases.filter(|&n| n > 0)
    }
}
