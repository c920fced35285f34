use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::config::{ScraperConfig, SectionLabels};
use crate::docket::DocketPatterns;
use crate::dom::{
    element_text, elements_by_tag, find_text, following_siblings, has_tag, nearest_ancestor,
    visible_texts, Sibling, TextHit, CONTAINER_TAGS, SECTION_HEADINGS,
};
use crate::error::{Result, ScrapeError};
use crate::record::{CaseRecord, VERDICT_NOT_FOUND};
use crate::text::clean_text;

/// Blocks searched for a case number when no single text node holds one.
const NUMBER_BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "div", "p"];
/// Blocks scanned for disposition keywords when no verdict marker exists.
const DISPOSITION_TAGS: &[&str] = &["p", "div"];

/// A section opened by one of `labels` and closed by a heading, a
/// boundary label, or loose untagged text.
struct LabeledSection {
    name: &'static str,
    labels: Vec<(String, Regex)>,
    boundaries: Vec<Regex>,
}

impl LabeledSection {
    fn new(name: &'static str, section: &SectionLabels) -> Result<Self> {
        let labels = section
            .labels
            .iter()
            .map(|l| Regex::new(&format!("(?i){}", regex::escape(l))).map(|re| (l.clone(), re)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let boundaries = section
            .boundaries
            .iter()
            .map(|b| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(b))))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(LabeledSection { name, labels, boundaries })
    }

    /// Labels in priority order; exact text first, then case-insensitive.
    fn locate<'a>(&self, doc: &'a Html) -> Option<TextHit<'a>> {
        self.labels.iter().find_map(|(label, re)| {
            find_text(doc, |t| t.contains(label.as_str())).or_else(|| find_text(doc, |t| re.is_match(t)))
        })
    }

    fn is_boundary(&self, text: &str) -> bool {
        self.boundaries.iter().any(|re| re.is_match(text))
    }

    fn extract(&self, doc: &Html) -> String {
        let Some(hit) = self.locate(doc) else {
            debug!("{} header not found", self.name);
            return String::new();
        };
        let Some(container) = nearest_ancestor(hit.parent, CONTAINER_TAGS) else {
            debug!("{} header has no enclosing block", self.name);
            return String::new();
        };

        let mut parts = vec![element_text(container)];
        for sibling in following_siblings(container) {
            let Sibling::Element(el) = sibling else {
                break;
            };
            if has_tag(el, SECTION_HEADINGS) {
                break;
            }
            let text = element_text(el);
            if self.is_boundary(&text) {
                break;
            }
            parts.push(text);
        }
        clean_text(&parts.join(" "))
    }
}

/// Pulls the case number, title and the four text sections out of a
/// single decision page.
pub struct SectionExtractor {
    dockets: DocketPatterns,
    title_regex: Regex,
    facts: LabeledSection,
    decision: LabeledSection,
    ruling: LabeledSection,
    verdict_markers: Vec<(String, Regex)>,
    verdict_closers: Vec<Regex>,
    disposition_keywords: Vec<String>,
}

impl SectionExtractor {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let verdict_closers = config
            .verdict_closers
            .iter()
            .map(|c| Regex::new(&format!(r"(?i)\b{}", regex::escape(c))))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(SectionExtractor {
            dockets: DocketPatterns::new(&config.docket_patterns)?,
            // Two capitalised party runs around a "VS." token.
            title_regex: Regex::new(r"[A-Z][A-Z\s.,&'-]*[A-Z.,]\s+(?i:vs\.)\s+[A-Z][A-Z\s.,&'-]*[A-Z.]")?,
            facts: LabeledSection::new("Facts", &config.facts)?,
            decision: LabeledSection::new("Decision", &config.decision)?,
            ruling: LabeledSection::new("Ruling", &config.ruling)?,
            verdict_markers: config
                .verdict_markers
                .iter()
                .map(|m| Regex::new(&format!("(?i){}", regex::escape(m))).map(|re| (m.clone(), re)))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            verdict_closers,
            disposition_keywords: config.disposition_keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
    }

    /// Never fails: a page that cannot be read becomes an error record.
    pub fn extract(&self, html: &str, known_title: Option<&str>) -> CaseRecord {
        if html.trim().is_empty() {
            return CaseRecord::failed(&ScrapeError::EmptyDocument, known_title);
        }
        let doc = Html::parse_document(html);
        self.extract_document(&doc, known_title)
    }

    pub fn extract_document(&self, doc: &Html, known_title: Option<&str>) -> CaseRecord {
        CaseRecord {
            case_number: self.case_number(doc),
            case_title: self.case_title(doc, known_title),
            facts: self.facts.extract(doc),
            decision: self.decision.extract(doc),
            ruling: self.ruling.extract(doc),
            verdict: self.verdict(doc),
        }
    }

    pub fn case_number(&self, doc: &Html) -> String {
        if let Some(found) = visible_texts(doc).find_map(|hit| self.dockets.find(hit.text)) {
            return clean_text(found);
        }
        elements_by_tag(doc, NUMBER_BLOCK_TAGS)
            .find_map(|el| {
                let text = element_text(el);
                self.dockets.find(&text).map(clean_text)
            })
            .unwrap_or_default()
    }

    /// A title from the listing page is kept verbatim.
    pub fn case_title(&self, doc: &Html, known_title: Option<&str>) -> String {
        if let Some(title) = known_title.filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }
        if let Some(m) = visible_texts(doc).find_map(|hit| self.title_regex.find(hit.text)) {
            return clean_text(m.as_str());
        }
        // Party names split by <br> across several text nodes.
        elements_by_tag(doc, CONTAINER_TAGS)
            .find_map(|el| {
                let text = clean_text(&element_text(el));
                self.title_regex.find(&text).map(|m| m.as_str().to_string())
            })
            .unwrap_or_default()
    }

    pub fn facts(&self, doc: &Html) -> String {
        self.facts.extract(doc)
    }

    pub fn decision(&self, doc: &Html) -> String {
        self.decision.extract(doc)
    }

    pub fn ruling(&self, doc: &Html) -> String {
        self.ruling.extract(doc)
    }

    pub fn verdict(&self, doc: &Html) -> String {
        self.verdict_from_marker(doc)
            .or_else(|| self.verdict_from_disposition(doc))
            .unwrap_or_else(|| VERDICT_NOT_FOUND.to_string())
    }

    fn is_closer(&self, text: &str) -> bool {
        self.verdict_closers.iter().any(|re| re.is_match(text))
    }

    /// Markers are tried in priority order, not document order. Each one
    /// is looked up verbatim first, then case-insensitively.
    fn verdict_from_marker(&self, doc: &Html) -> Option<String> {
        let (marker, hit) = self.verdict_markers.iter().find_map(|(marker, re)| {
            find_text(doc, |t| t.contains(marker.as_str()))
                .or_else(|| find_text(doc, |t| re.is_match(t)))
                .map(|hit| (marker, hit))
        })?;
        debug!("Verdict marker: {}", marker);

        let Some(container) = nearest_ancestor(hit.parent, CONTAINER_TAGS) else {
            return Some(clean_text(hit.text));
        };

        let mut parts = vec![element_text(container)];
        if !self.is_closer(&parts[0]) {
            for sibling in following_siblings(container) {
                let text = match sibling {
                    Sibling::Element(el) => element_text(el),
                    Sibling::Text(t) => t.to_string(),
                };
                let closes = self.is_closer(&text);
                parts.push(text);
                if closes {
                    break;
                }
            }
        }
        Some(clean_text(&parts.join(" ")))
    }

    /// Innermost paragraph or container holding a disposition keyword.
    fn verdict_from_disposition(&self, doc: &Html) -> Option<String> {
        let mentions_keyword = |el: ElementRef<'_>| {
            let text = clean_text(&element_text(el)).to_lowercase();
            self.disposition_keywords.iter().any(|k| text.contains(k.as_str()))
        };
        elements_by_tag(doc, DISPOSITION_TAGS)
            .filter(|el| mentions_keyword(*el))
            .find(|el| {
                !el.descendants()
                    .skip(1)
                    .filter_map(ElementRef::wrap)
                    .any(|inner| has_tag(inner, DISPOSITION_TAGS) && mentions_keyword(inner))
            })
            .map(|el| clean_text(&element_text(el)))
    }
}
