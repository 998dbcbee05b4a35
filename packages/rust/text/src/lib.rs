//! Text normalization and coordinate parsing.
//!
//! - [`clean`] — the cleanup passes every scraped string goes through
//! - [`parse_coordinates`] / [`split_coordinates`] — lift a coordinate pair
//!   out of free-form location text

mod clean;
mod coords;

pub use clean::{clean, clean_opt};
pub use coords::{CoordinateMatch, find_coordinates, parse_coordinates, split_coordinates};
