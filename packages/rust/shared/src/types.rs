//! Core domain types for the heritage dataset.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A latitude/longitude pair exactly as written in the source notation.
///
/// Values are matched substrings (`21.0307°B`, `10°46′37″B`), not numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

// ---------------------------------------------------------------------------
// HistoryEvent
// ---------------------------------------------------------------------------

/// One entry of a site's history section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Sub-heading text, or `History of <name>` for a synthetic event.
    pub title: String,
    /// Cleaned paragraph text under the sub-heading.
    pub description: String,
}

impl HistoryEvent {
    /// Build the single event that holds an undivided history section.
    pub fn synthetic(site_name: &str, description: String) -> Self {
        Self {
            title: format!("History of {site_name}"),
            description,
        }
    }
}

// ---------------------------------------------------------------------------
// HeritageSite
// ---------------------------------------------------------------------------

/// A single national heritage site, one per listing-table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageSite {
    /// Cleaned display name. Never empty.
    pub name: String,
    /// Place description with any coordinate substring removed.
    pub location: String,
    /// Coordinates lifted out of the location cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Free-text classification.
    #[serde(default)]
    pub types: String,
    /// Absolute URL of the site's own article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_link: Option<String>,
    /// Absolute image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// First introductory paragraph of the detail page.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub events: Vec<HistoryEvent>,
    #[serde(default)]
    pub architectural: String,
    #[serde(default)]
    pub cultural_festival: String,
}

impl HeritageSite {
    /// Whether the type text contains `tag` (plain substring test).
    pub fn has_type_tag(&self, tag: &str) -> bool {
        self.types.contains(tag)
    }
}
