//! Run configuration for the heritage scraper.
//!
//! Every run parameter has a fixed built-in default. An optional TOML file
//! (passed with `--config`) may override any subset of them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{HeritageError, Result};

/// The listing article of special national heritage sites.
pub const LISTING_URL: &str = "https://vi.wikipedia.org/wiki/Di_t%C3%ADch_qu%E1%BB%91c_gia_%C4%91%E1%BA%B7c_bi%E1%BB%87t_(Vi%E1%BB%87t_Nam)";

// ---------------------------------------------------------------------------
// Config structs (TOML schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the listing lives and how pages are recognised as loaded.
    #[serde(default)]
    pub source: SourceConfig,

    /// Page loading behaviour.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Keyword sets used to classify detail-page sections.
    #[serde(default)]
    pub sections: SectionsConfig,

    /// Output files and the filter tag.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// Marker that must be present before the listing is parsed.
    #[serde(default = "default_listing_marker")]
    pub listing_marker: String,

    /// Selector for the heritage tables inside the listing.
    #[serde(default = "default_table_selector")]
    pub table_selector: String,

    /// Marker that must be present before a detail page is parsed.
    #[serde(default = "default_detail_marker")]
    pub detail_marker: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            listing_marker: default_listing_marker(),
            table_selector: default_table_selector(),
            detail_marker: default_detail_marker(),
        }
    }
}

fn default_listing_url() -> String {
    LISTING_URL.into()
}
fn default_listing_marker() -> String {
    "table.wikitable".into()
}
fn default_table_selector() -> String {
    "table.wikitable".into()
}
fn default_detail_marker() -> String {
    "#mw-content-text".into()
}

/// Which page source drives the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Plain HTTP client; Wikipedia serves rendered HTML.
    #[default]
    Http,
    /// Headless Chromium (requires the `browser` feature).
    Browser,
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub backend: Backend,

    /// How long to wait for a page's marker element.
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Fixed pause after every detail-page visit.
    #[serde(default = "default_detail_delay")]
    pub detail_delay_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            wait_timeout_secs: default_wait_timeout(),
            detail_delay_ms: default_detail_delay(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_wait_timeout() -> u64 {
    10
}
fn default_detail_delay() -> u64 {
    1000
}
fn default_user_agent() -> String {
    concat!("heritage-scraper/", env!("CARGO_PKG_VERSION")).into()
}

/// `[sections]` section. Keywords are matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsConfig {
    #[serde(default = "default_history_keywords")]
    pub history: Vec<String>,

    #[serde(default = "default_architecture_keywords")]
    pub architecture: Vec<String>,

    #[serde(default = "default_festival_keywords")]
    pub festival: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            history: default_history_keywords(),
            architecture: default_architecture_keywords(),
            festival: default_festival_keywords(),
        }
    }
}

fn default_history_keywords() -> Vec<String> {
    vec!["lịch sử".into(), "sự kiện".into(), "hình thành".into()]
}
fn default_architecture_keywords() -> Vec<String> {
    vec!["kiến trúc".into(), "cấu trúc".into(), "kết cấu".into()]
}
fn default_festival_keywords() -> Vec<String> {
    vec!["lễ hội".into(), "nghi lễ".into(), "tín ngưỡng".into()]
}

impl SectionsConfig {
    /// The keyword sets as an ordered rule list.
    pub fn rules(&self) -> Vec<SectionRule> {
        [
            (SectionKind::History, &self.history),
            (SectionKind::Architecture, &self.architecture),
            (SectionKind::Festival, &self.festival),
        ]
        .into_iter()
        .map(|(kind, keywords)| SectionRule::new(kind, keywords.iter().map(String::as_str)))
        .collect()
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the working directory.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    #[serde(default = "default_full_json")]
    pub full_json: String,

    #[serde(default = "default_full_csv")]
    pub full_csv: String,

    #[serde(default = "default_filtered_json")]
    pub filtered_json: String,

    #[serde(default = "default_filtered_csv")]
    pub filtered_csv: String,

    /// Substring a record's type text must contain to pass the filter.
    #[serde(default = "default_historical_tag")]
    pub historical_tag: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            full_json: default_full_json(),
            full_csv: default_full_csv(),
            filtered_json: default_filtered_json(),
            filtered_csv: default_filtered_csv(),
            historical_tag: default_historical_tag(),
        }
    }
}

fn default_output_dir() -> String {
    "data/raw".into()
}
fn default_full_json() -> String {
    "vietnam-heritage-sites.json".into()
}
fn default_full_csv() -> String {
    "vietnam-heritage-sites.csv".into()
}
fn default_filtered_json() -> String {
    "vietnam-heritage-sites-filtered.json".into()
}
fn default_filtered_csv() -> String {
    "vietnam-heritage-sites-filtered.csv".into()
}
fn default_historical_tag() -> String {
    "lịch sử".into()
}

// ---------------------------------------------------------------------------
// Section rules
// ---------------------------------------------------------------------------

/// Which record field a detail-page section feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    History,
    Architecture,
    Festival,
}

/// One keyword set: a heading matches when its lower-cased text contains
/// any keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRule {
    pub kind: SectionKind,
    keywords: Vec<String>,
}

impl SectionRule {
    pub fn new<'a>(kind: SectionKind, keywords: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            kind,
            keywords: keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, heading: &str) -> bool {
        let heading = heading.to_lowercase();
        self.keywords.iter().any(|k| heading.contains(k.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Runtime config
// ---------------------------------------------------------------------------

/// Validated runtime configuration, derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub listing_url: Url,
    pub listing_marker: String,
    pub table_selector: String,
    pub detail_marker: String,
    pub backend: Backend,
    pub wait_timeout: Duration,
    pub detail_delay: Duration,
    pub user_agent: String,
    pub sections: Vec<SectionRule>,
    pub output_dir: PathBuf,
    pub full_json: PathBuf,
    pub full_csv: PathBuf,
    pub filtered_json: PathBuf,
    pub filtered_csv: PathBuf,
    pub historical_tag: String,
}

impl TryFrom<&AppConfig> for ScrapeConfig {
    type Error = HeritageError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let listing_url = Url::parse(&config.source.listing_url).map_err(|e| {
            HeritageError::config(format!(
                "invalid listing_url '{}': {e}",
                config.source.listing_url
            ))
        })?;

        for selector in [
            &config.source.listing_marker,
            &config.source.table_selector,
            &config.source.detail_marker,
        ] {
            Selector::parse(selector).map_err(|e| {
                HeritageError::config(format!("invalid CSS selector '{selector}': {e}"))
            })?;
        }

        if config.output.historical_tag.is_empty() {
            return Err(HeritageError::config("historical_tag must not be empty"));
        }

        let dir = PathBuf::from(&config.output.dir);

        Ok(Self {
            listing_url,
            listing_marker: config.source.listing_marker.clone(),
            table_selector: config.source.table_selector.clone(),
            detail_marker: config.source.detail_marker.clone(),
            backend: config.fetch.backend,
            wait_timeout: Duration::from_secs(config.fetch.wait_timeout_secs),
            detail_delay: Duration::from_millis(config.fetch.detail_delay_ms),
            user_agent: config.fetch.user_agent.clone(),
            sections: config.sections.rules(),
            full_json: dir.join(&config.output.full_json),
            full_csv: dir.join(&config.output.full_csv),
            filtered_json: dir.join(&config.output.filtered_json),
            filtered_csv: dir.join(&config.output.filtered_csv),
            output_dir: dir,
            historical_tag: config.output.historical_tag.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `path`, or the built-in defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => load_config_from(path),
        None => {
            tracing::debug!("no config file given, using built-in defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HeritageError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        HeritageError::config(format!("failed to parse {}: {e}", path.display()))
    })
}
