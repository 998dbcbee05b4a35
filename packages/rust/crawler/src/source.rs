//! Page sources: turn a URL into rendered HTML.
//!
//! A run holds exactly one [`Source`] for its whole lifetime. Every load
//! waits for a marker element and fails if it does not show up in time.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use heritage_shared::{Backend, HeritageError, Result, ScrapeConfig};

#[cfg(feature = "browser")]
use crate::browser::BrowserSource;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Something that can load pages for the scraper.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Load `url` and return its HTML once an element matching `marker`
    /// is present.
    async fn load(&mut self, url: &Url, marker: &str) -> Result<String>;

    /// Release the underlying session.
    async fn close(self) -> Result<()>
    where
        Self: Sized;

    /// Human-readable source name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

/// Loads pages with a plain HTTP client.
///
/// Wikipedia serves fully rendered article HTML, so the marker wait reduces
/// to checking that the marker is present in the response.
pub struct HttpSource {
    client: Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.wait_timeout)
            .build()
            .map_err(|e| HeritageError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout: config.wait_timeout,
        })
    }
}

impl PageSource for HttpSource {
    #[instrument(skip_all, fields(url = %url, marker))]
    async fn load(&mut self, url: &Url, marker: &str) -> Result<String> {
        debug!("fetching page");

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                HeritageError::timeout(url.as_str(), marker, self.timeout.as_secs())
            } else {
                HeritageError::Network(format!("{url}: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HeritageError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HeritageError::Network(format!("{url}: body read failed: {e}")))?;

        if !has_marker(&body, marker)? {
            return Err(HeritageError::timeout(
                url.as_str(),
                marker,
                self.timeout.as_secs(),
            ));
        }

        debug!(bytes = body.len(), "page loaded");
        Ok(body)
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Whether `html` contains an element matching `marker`.
pub(crate) fn has_marker(html: &str, marker: &str) -> Result<bool> {
    let sel = Selector::parse(marker)
        .map_err(|e| HeritageError::parse(format!("invalid marker selector '{marker}': {e}")))?;
    let doc = Html::parse_document(html);
    Ok(doc.select(&sel).next().is_some())
}

// ---------------------------------------------------------------------------
// Source (backend dispatch)
// ---------------------------------------------------------------------------

/// The page source selected by configuration.
pub enum Source {
    Http(HttpSource),
    #[cfg(feature = "browser")]
    Browser(BrowserSource),
}

impl Source {
    /// Acquire the session for `config.backend`.
    pub async fn open(config: &ScrapeConfig) -> Result<Self> {
        match config.backend {
            Backend::Http => Ok(Self::Http(HttpSource::new(config)?)),
            Backend::Browser => open_browser(config).await,
        }
    }
}

#[cfg(feature = "browser")]
async fn open_browser(config: &ScrapeConfig) -> Result<Source> {
    Ok(Source::Browser(BrowserSource::launch(config).await?))
}

#[cfg(not(feature = "browser"))]
async fn open_browser(_config: &ScrapeConfig) -> Result<Source> {
    Err(HeritageError::config(
        "backend `browser` needs the crawler built with the `browser` feature",
    ))
}

impl PageSource for Source {
    async fn load(&mut self, url: &Url, marker: &str) -> Result<String> {
        match self {
            Self::Http(source) => source.load(url, marker).await,
            #[cfg(feature = "browser")]
            Self::Browser(source) => source.load(url, marker).await,
        }
    }

    async fn close(self) -> Result<()> {
        match self {
            Self::Http(source) => source.close().await,
            #[cfg(feature = "browser")]
            Self::Browser(source) => source.close().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Http(source) => source.name(),
            #[cfg(feature = "browser")]
            Self::Browser(source) => source.name(),
        }
    }
}
