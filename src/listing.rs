use std::collections::HashSet;

use log::{debug, info, warn};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::ScraperConfig;
use crate::docket::DocketPatterns;
use crate::dom::{element_text, first_link, following_siblings, href, visible_texts, Sibling};
use crate::error::{Result, ScrapeError};
use crate::record::CaseLink;
use crate::text::clean_text;

/// Finds case-document links on a monthly listing page.
pub struct ListingExtractor {
    base_url: Url,
    document_marker: String,
    dockets: DocketPatterns,
}

impl ListingExtractor {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|_| ScrapeError::InvalidUrl(config.base_url.clone()))?;
        let dockets = DocketPatterns::new(&config.docket_patterns)?;
        debug!("Listing docket kinds: {:?}", dockets.kinds().collect::<Vec<_>>());
        Ok(ListingExtractor {
            base_url,
            document_marker: config.document_path_marker.clone(),
            dockets,
        })
    }

    fn is_document_link(&self, href: &str) -> bool {
        href.contains(self.document_marker.as_str())
    }

    /// Ordered, de-duplicated case links. Docket-number anchors are
    /// preferred; every document-view link is the fallback.
    pub fn extract(&self, html: &str) -> Vec<CaseLink> {
        let doc = Html::parse_document(html);

        let mut candidates = self.links_by_docket(&doc);
        if candidates.is_empty() {
            info!("No docket-number links found, falling back to document links");
            candidates = self.document_links(&doc);
        }

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for (raw_href, title) in candidates {
            let url = match self.base_url.join(raw_href.trim()) {
                Ok(u) => u.to_string(),
                Err(e) => {
                    warn!("Skipping unresolvable link {}: {}", raw_href, e);
                    continue;
                }
            };
            if seen.insert(url.clone()) {
                debug!("Found case link: {} ({})", url, title);
                links.push(CaseLink { url, title });
            }
        }
        links
    }

    fn links_by_docket(&self, doc: &Html) -> Vec<(String, String)> {
        let mut found = Vec::new();
        for hit in visible_texts(doc) {
            let Some(number) = self.dockets.find(hit.text) else {
                continue;
            };
            let Some(link) = self.resolve_link(hit.parent) else {
                debug!("No document link near {}", number);
                continue;
            };
            if let Some(target) = href(link) {
                found.push((target.to_string(), title_without(&element_text(link), number)));
            }
        }
        found
    }

    /// The element itself, then its link ancestors, then the first
    /// following sibling that is or holds a document link.
    fn resolve_link<'a>(&self, el: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let enclosing = std::iter::once(el)
            .chain(el.ancestors().filter_map(ElementRef::wrap))
            .find(|e| href(*e).is_some());
        if let Some(link) = enclosing {
            return href(link).is_some_and(|h| self.is_document_link(h)).then_some(link);
        }
        following_siblings(el).find_map(|sibling| match sibling {
            Sibling::Element(s) => first_link(s, |h| self.is_document_link(h)),
            Sibling::Text(_) => None,
        })
    }

    fn document_links(&self, doc: &Html) -> Vec<(String, String)> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        doc.select(&selector)
            .filter_map(|a| {
                let target = a.value().attr("href")?;
                if !self.is_document_link(target) {
                    return None;
                }
                let title = clean_text(&element_text(a));
                (!title.is_empty()).then(|| (target.to_string(), title))
            })
            .collect()
    }
}

/// Link text with the docket number removed; may end up empty.
fn title_without(link_text: &str, number: &str) -> String {
    let cleaned = clean_text(link_text);
    let number = clean_text(number);
    cleaned
        .replacen(&number, "", 1)
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-' | '[' | ']'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(&ScraperConfig::default()).unwrap()
    }

    fn urls(links: &[CaseLink]) -> Vec<&str> {
        links.iter().map(|l| l.url.as_str()).collect()
    }

    #[test]
    fn docket_inside_link_resolves_relative_href() {
        let html = r#"<div id="container_title"><ul>
            <li><a href="/thebookshelf/showdocs/1/68001"><strong>G.R. No. 258805</strong><br><small>PEOPLE VS. REYES</small></a></li>
            <li><a href="https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/68002"><strong>A.C. No. 13715</strong></a></li>
        </ul></div>"#;
        let links = extractor().extract(html);
        assert_eq!(
            urls(&links),
            vec![
                "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/68001",
                "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/68002",
            ]
        );
        assert_eq!(links[0].title, "PEOPLE VS. REYES");
        assert_eq!(links[1].title, "");
    }

    #[test]
    fn docket_outside_link_uses_following_sibling() {
        let html = r#"<p><span>G.R. No. 1001</span> <a href="/about">About</a> <a href="/thebookshelf/showdocs/1/9">view</a></p>"#;
        let links = extractor().extract(html);
        assert_eq!(urls(&links), vec!["https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/9"]);
    }

    #[test]
    fn non_document_ancestor_link_is_rejected() {
        let html = r#"<a href="/search?q=1">G.R. No. 1002</a>
            <a href="/thebookshelf/showdocs/1/10">Some Case</a>"#;
        let links = extractor().extract(html);
        // No docket anchor resolves, so every document link is taken.
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Some Case");
    }

    #[test]
    fn duplicates_keep_first_position() {
        let html = r#"
            <a href="/thebookshelf/showdocs/1/1">G.R. No. 1</a>
            <a href="/thebookshelf/showdocs/1/2">G.R. No. 2</a>
            <a href="/thebookshelf/showdocs/1/1">G.R. No. 1</a>
            <a href="/thebookshelf/showdocs/1/3">G.R. No. 3</a>"#;
        let links = extractor().extract(html);
        assert_eq!(
            urls(&links),
            vec![
                "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/1",
                "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/2",
                "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/3",
            ]
        );
    }

    #[test]
    fn fallback_skips_empty_link_text() {
        let html = r#"<a href="/thebookshelf/showdocs/1/5"><img src="x.png"></a>
            <a href="/thebookshelf/showdocs/1/6"> Heirs of Cruz  vs. Santos </a>
            <a href="/thebookshelf/docmonth/Jan/2025/2">Next</a>"#;
        let links = extractor().extract(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://elibrary.judiciary.gov.ph/thebookshelf/showdocs/1/6");
        assert_eq!(links[0].title, "Heirs of Cruz vs. Santos");
    }

    #[test]
    fn page_without_links_is_empty() {
        assert!(extractor().extract("<p>No decisions this month.</p>").is_empty());
    }

    #[test]
    fn title_strips_number_and_separators() {
        assert_eq!(title_without("G.R. No. 5 - PEOPLE VS. CRUZ", "G.R. No. 5"), "PEOPLE VS. CRUZ");
    }
}
