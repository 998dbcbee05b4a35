//! End-to-end scrape: listing → detail pages → filter → JSON/CSV outputs.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use heritage_crawler::{PageSource, Source, extract_detail, extract_listing};
use heritage_export::{write_csv, write_json};
use heritage_shared::{HeritageError, HeritageSite, Result, ScrapeConfig};

use crate::filter::filter_historical;

/// Result of a completed run.
#[derive(Debug)]
pub struct ScrapeOutcome {
    /// Records extracted from the listing.
    pub total: usize,
    /// Records that passed the historical-site filter.
    pub filtered: usize,
    /// Detail pages loaded and extracted.
    pub details_loaded: usize,
    /// Detail pages that failed to load and were skipped.
    pub details_failed: usize,
    /// Output files, in write order.
    pub files: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each record's detail step, `current` counting from 1.
    fn site_started(&self, name: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, outcome: &ScrapeOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn site_started(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _outcome: &ScrapeOutcome) {}
}

/// Open the configured page source and scrape with it (see
/// [`run_with_source`]).
pub async fn run_with_session(
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> Result<ScrapeOutcome> {
    let source = Source::open(config).await?;
    info!(source = source.name(), "page source ready");

    run_with_source(source, config, progress).await
}

/// Run the scrape on `source`, then close it whether or not the run
/// succeeded.
pub async fn run_with_source<S: PageSource>(
    mut source: S,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> Result<ScrapeOutcome> {
    let result = run(&mut source, config, progress).await;

    if let Err(e) = source.close().await {
        warn!(error = %e, "failed to close page source");
    }

    result
}

/// Run the scrape against an already open `source`.
///
/// 1. Load the listing page and extract one record per qualifying row
/// 2. Visit each record's detail page in order, pausing after every visit
/// 3. Filter the historical sites
/// 4. Write the full and filtered sets as JSON and CSV
///
/// Only a listing failure aborts the run. A detail page that cannot be
/// loaded leaves its record's detail fields empty.
#[instrument(skip_all, fields(source = source.name(), url = %config.listing_url))]
pub async fn run<S: PageSource>(
    source: &mut S,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> Result<ScrapeOutcome> {
    let start = Instant::now();

    // --- Phase 1: Listing ---
    progress.phase("Loading listing page");
    let listing = source
        .load(&config.listing_url, &config.listing_marker)
        .await?;
    let mut sites = extract_listing(&listing, &config.listing_url, &config.table_selector)?;
    info!(sites = sites.len(), "listing extracted");

    // --- Phase 2: Detail pages ---
    progress.phase("Visiting detail pages");
    let total = sites.len();
    let mut details_loaded = 0;
    let mut details_failed = 0;

    for (i, site) in sites.iter_mut().enumerate() {
        progress.site_started(&site.name, i + 1, total);

        let Some(link) = site.detail_link.clone() else {
            debug!(name = %site.name, "no detail link");
            continue;
        };

        match visit_detail(source, &link, site, config).await {
            Ok(()) => {
                details_loaded += 1;
                info!(current = i + 1, total, name = %site.name, "detail page extracted");
            }
            Err(e) => {
                details_failed += 1;
                warn!(name = %site.name, url = %link, error = %e, "detail page failed, skipping");
            }
        }

        tokio::time::sleep(config.detail_delay).await;
    }

    // --- Phase 3: Filter ---
    progress.phase("Filtering historical sites");
    let filtered = filter_historical(&sites, &config.historical_tag);
    info!(total, filtered = filtered.len(), "filter applied");

    // --- Phase 4: Write outputs ---
    progress.phase("Writing outputs");
    write_json(&config.full_json, &sites)?;
    write_csv(&config.full_csv, &sites)?;
    write_json(&config.filtered_json, filtered.iter().copied())?;
    write_csv(&config.filtered_csv, filtered.iter().copied())?;

    let outcome = ScrapeOutcome {
        total,
        filtered: filtered.len(),
        details_loaded,
        details_failed,
        files: vec![
            config.full_json.clone(),
            config.full_csv.clone(),
            config.filtered_json.clone(),
            config.filtered_csv.clone(),
        ],
        elapsed: start.elapsed(),
    };

    progress.done(&outcome);

    info!(
        total = outcome.total,
        filtered = outcome.filtered,
        details_failed = outcome.details_failed,
        elapsed_ms = outcome.elapsed.as_millis(),
        "scrape complete"
    );

    Ok(outcome)
}

/// Load one detail page and copy what it yields into `site`.
async fn visit_detail<S: PageSource>(
    source: &mut S,
    link: &str,
    site: &mut HeritageSite,
    config: &ScrapeConfig,
) -> Result<()> {
    let url = Url::parse(link)
        .map_err(|e| HeritageError::parse(format!("invalid detail link '{link}': {e}")))?;
    let html = source.load(&url, &config.detail_marker).await?;

    extract_detail(&html, &site.name, &config.sections).apply_to(site);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
