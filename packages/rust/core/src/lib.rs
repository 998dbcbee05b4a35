//! Scrape orchestration for the heritage dataset.
//!
//! Ties the page source, the extractors and the writers together into one
//! sequential run (see [`pipeline::run_with_session`]).

pub mod filter;
pub mod pipeline;

pub use filter::filter_historical;
pub use pipeline::{
    ProgressReporter, ScrapeOutcome, SilentProgress, run, run_with_session, run_with_source,
};
