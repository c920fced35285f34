use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use log::debug;
use url::Url;

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};

/// Anything that can turn a URL into page markup.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP client that presents itself as a desktop browser.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        if let Ok(ua) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        if Url::parse(url).is_err() {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }
        debug!("GET {}", url);
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_url_is_rejected_before_request() {
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        assert!(matches!(
            fetcher.fetch("/thebookshelf/showdocs/1/1"),
            Err(ScrapeError::InvalidUrl(_))
        ));
    }
}
