//! Shared types, error model, and configuration for the heritage scraper.
//!
//! This crate is the foundation depended on by all other heritage crates.
//! It provides:
//! - [`HeritageError`] — the unified error type
//! - Domain types ([`HeritageSite`], [`Coordinates`], [`HistoryEvent`])
//! - Configuration ([`AppConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Backend, FetchConfig, OutputConfig, ScrapeConfig, SectionKind, SectionRule,
    SectionsConfig, SourceConfig, load_config, load_config_from,
};
pub use error::{HeritageError, Result};
pub use types::{Coordinates, HeritageSite, HistoryEvent};
