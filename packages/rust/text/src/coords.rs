//! Coordinate extraction from location text.
//!
//! Two notations are recognised, tried in this order:
//! 1. decimal degrees: `21,0307°B 105,852°Đ`
//! 2. sexagesimal: `10°46′37″B 106°41′43″Đ`
//!
//! Markers are the Vietnamese initials: `B`/`N` (Bắc/Nam) for latitude,
//! `Đ`/`T` (Đông/Tây) for longitude. Values are kept as strings; nothing is
//! range-checked.

use std::ops::Range;
use std::sync::LazyLock;

use heritage_shared::Coordinates;
use regex::{Captures, Regex};

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*°\s*([BN])[\s,;/]*(\d+(?:[.,]\d+)?)\s*°\s*([ĐT])")
        .expect("valid regex")
});

static SEXAGESIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(\d+°\s*\d+[′']\s*\d+(?:[.,]\d+)?[″"]\s*[BN])"#,
        r"[\s,;/]*",
        r#"(\d+°\s*\d+[′']\s*\d+(?:[.,]\d+)?[″"]\s*[ĐT])"#,
    ))
    .expect("valid regex")
});

/// A coordinate pair and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateMatch {
    pub coordinates: Coordinates,
    /// Byte range of the whole match in the input.
    pub range: Range<usize>,
}

/// Find the first coordinate pair, decimal notation first.
pub fn find_coordinates(text: &str) -> Option<CoordinateMatch> {
    if let Some(caps) = DECIMAL_RE.captures(text) {
        return Some(CoordinateMatch {
            coordinates: decimal_pair(&caps),
            range: whole_range(&caps),
        });
    }

    SEXAGESIMAL_RE.captures(text).map(|caps| CoordinateMatch {
        coordinates: Coordinates {
            latitude: caps[1].to_string(),
            longitude: caps[2].to_string(),
        },
        range: whole_range(&caps),
    })
}

/// Parse a coordinate pair out of `text`, if one is present.
pub fn parse_coordinates(text: &str) -> Option<Coordinates> {
    find_coordinates(text).map(|m| m.coordinates)
}

/// Return `text` with the matched coordinate substring cut out, plus the
/// parsed pair. Text without coordinates comes back unchanged.
pub fn split_coordinates(text: &str) -> (String, Option<Coordinates>) {
    match find_coordinates(text) {
        Some(m) => {
            let rest = format!("{}{}", &text[..m.range.start], &text[m.range.end..]);
            (rest, Some(m.coordinates))
        }
        None => (text.to_string(), None),
    }
}

fn decimal_pair(caps: &Captures<'_>) -> Coordinates {
    Coordinates {
        latitude: format!("{}°{}", caps[1].replace(',', "."), &caps[2]),
        longitude: format!("{}°{}", caps[3].replace(',', "."), &caps[4]),
    }
}

fn whole_range(caps: &Captures<'_>) -> Range<usize> {
    caps.get(0).map(|m| m.range()).unwrap_or(0..0)
}
