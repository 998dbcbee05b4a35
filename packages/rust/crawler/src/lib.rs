//! Page loading and HTML extraction for the heritage listing.
//!
//! This crate provides:
//! - [`source`] — the [`PageSource`] seam with HTTP and (feature `browser`)
//!   headless Chromium implementations
//! - [`listing`] — listing-table rows → [`HeritageSite`](heritage_shared::HeritageSite) records
//! - [`detail`] — detail-page description and keyword-located sections

#[cfg(feature = "browser")]
pub mod browser;
pub mod detail;
mod dom;
pub mod listing;
pub mod source;

#[cfg(feature = "browser")]
pub use browser::BrowserSource;
pub use detail::{DetailContent, extract_detail};
pub use listing::extract_listing;
pub use source::{HttpSource, PageSource, Source};
