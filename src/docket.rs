use regex::Regex;

use crate::config::DocketPattern;
use crate::error::Result;

/// Docket-kind patterns, compiled once and tried in configured order.
pub struct DocketPatterns {
    patterns: Vec<(String, Regex)>,
}

impl DocketPatterns {
    pub fn new(configured: &[DocketPattern]) -> Result<Self> {
        let patterns = configured
            .iter()
            .map(|p| Regex::new(&p.pattern).map(|re| (p.kind.clone(), re)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(DocketPatterns { patterns })
    }

    /// First pattern (in configured order) that matches wins, even if a
    /// later kind matches earlier in the text.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns
            .iter()
            .find_map(|(_, re)| re.find(text))
            .map(|m| m.as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|(_, re)| re.is_match(text))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(kind, _)| kind.as_str())
    }
}
