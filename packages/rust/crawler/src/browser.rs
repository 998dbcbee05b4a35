//! Headless Chromium page source (`browser` feature).

use std::time::{Duration, Instant};

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use heritage_shared::{HeritageError, Result, ScrapeConfig};

use crate::source::PageSource;

/// How often the marker element is polled while a page renders.
const MARKER_POLL: Duration = Duration::from_millis(250);

/// One browser process with a single tab reused for every load.
pub struct BrowserSource {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    wait_timeout: Duration,
}

impl BrowserSource {
    /// Launch headless Chromium and open the working tab.
    pub async fn launch(config: &ScrapeConfig) -> Result<Self> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", config.user_agent))
            .request_timeout(config.wait_timeout)
            .build()
            .map_err(HeritageError::Browser)?;

        let (mut browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| HeritageError::Browser(format!("failed to launch chromium: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser event loop stopped");
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(HeritageError::Browser(format!("failed to open tab: {e}")));
            }
        };

        info!("headless browser started");

        Ok(Self {
            browser,
            page,
            handler,
            wait_timeout: config.wait_timeout,
        })
    }

    fn timeout_error(&self, url: &Url, marker: &str) -> HeritageError {
        HeritageError::timeout(url.as_str(), marker, self.wait_timeout.as_secs())
    }
}

impl PageSource for BrowserSource {
    #[instrument(skip_all, fields(url = %url, marker))]
    async fn load(&mut self, url: &Url, marker: &str) -> Result<String> {
        let deadline = Instant::now() + self.wait_timeout;

        tokio::time::timeout(self.wait_timeout, self.page.goto(url.as_str()))
            .await
            .map_err(|_| self.timeout_error(url, marker))?
            .map_err(|e| HeritageError::Browser(format!("{url}: navigation failed: {e}")))?;

        while self.page.find_element(marker).await.is_err() {
            if Instant::now() >= deadline {
                return Err(self.timeout_error(url, marker));
            }
            tokio::time::sleep(MARKER_POLL).await;
        }

        self.page
            .content()
            .await
            .map_err(|e| HeritageError::Browser(format!("{url}: reading page failed: {e}")))
    }

    async fn close(mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| HeritageError::Browser(format!("failed to close browser: {e}")));

        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "browser process did not exit cleanly");
        }
        self.handler.abort();

        info!("headless browser closed");
        closed
    }

    fn name(&self) -> &str {
        "browser"
    }
}
