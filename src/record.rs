use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::text::truncate_chars;

/// Column order of the output file.
pub const HEADERS: [&str; 6] = ["Case Number", "Case Title", "Facts", "Decision", "Ruling", "Verdict"];

pub const ERROR_PREFIX: &str = "Error retrieving data: ";
pub const VERDICT_NOT_FOUND: &str = "Verdict not found";
const ERROR_DETAIL_LIMIT: usize = 100;

/// A case page discovered on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLink {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "Case Number")]
    pub case_number: String,
    #[serde(rename = "Case Title")]
    pub case_title: String,
    #[serde(rename = "Facts")]
    pub facts: String,
    #[serde(rename = "Decision")]
    pub decision: String,
    #[serde(rename = "Ruling")]
    pub ruling: String,
    #[serde(rename = "Verdict")]
    pub verdict: String,
}

impl CaseRecord {
    /// Every field carries the error marker, except the title when the
    /// listing already supplied one.
    pub fn failed(err: &dyn Display, known_title: Option<&str>) -> Self {
        let detail = err.to_string();
        let marker = format!("{}{}", ERROR_PREFIX, truncate_chars(&detail, ERROR_DETAIL_LIMIT));
        let case_title = match known_title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => marker.clone(),
        };
        CaseRecord {
            case_number: marker.clone(),
            case_title,
            facts: marker.clone(),
            decision: marker.clone(),
            ruling: marker.clone(),
            verdict: marker,
        }
    }

    pub fn is_error(&self) -> bool {
        self.case_number.starts_with(ERROR_PREFIX) && self.verdict.starts_with(ERROR_PREFIX)
    }

    pub fn fields(&self) -> [&str; 6] {
        [
            &self.case_number,
            &self.case_title,
            &self.facts,
            &self.decision,
            &self.ruling,
            &self.verdict,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_record_truncates_detail() {
        let long = "x".repeat(250);
        let record = CaseRecord::failed(&long, None);
        assert!(record.is_error());
        assert_eq!(record.facts.len(), ERROR_PREFIX.len() + 100);
        assert_eq!(record.case_title, record.facts);
    }

    #[test]
    fn failed_record_keeps_known_title() {
        let record = CaseRecord::failed(&"timed out", Some("PEOPLE VS. REYES"));
        assert_eq!(record.case_title, "PEOPLE VS. REYES");
        assert_eq!(record.ruling, "Error retrieving data: timed out");
    }

    #[test]
    fn blank_known_title_is_ignored() {
        let record = CaseRecord::failed(&"boom", Some("  "));
        assert_eq!(record.case_title, "Error retrieving data: boom");
    }
}
