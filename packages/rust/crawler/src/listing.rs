//! Listing-table extraction: one [`HeritageSite`] per qualifying table row.
//!
//! Column layout of the listing tables:
//!
//! | # | content |
//! |---|---------|
//! | 0 | name, usually linking to the site's article |
//! | 1 | image |
//! | 2 | location, often with embedded coordinates |
//! | 3 | classification (missing in narrower tables) |

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use heritage_shared::{HeritageError, HeritageSite, Result};
use heritage_text::{clean, clean_opt, split_coordinates};

use crate::dom::{has_class, is_tag, visible_text};

/// Rows with fewer `td` cells than this are skipped.
const MIN_CELLS: usize = 3;

static IMG_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Extract every site from every table matching `table_selector`.
///
/// Finding no table at all is an error: the listing is unusable.
#[instrument(skip(html, base_url))]
pub fn extract_listing(
    html: &str,
    base_url: &Url,
    table_selector: &str,
) -> Result<Vec<HeritageSite>> {
    let table_sel = Selector::parse(table_selector).map_err(|e| {
        HeritageError::parse(format!("invalid table selector '{table_selector}': {e}"))
    })?;

    let doc = Html::parse_document(html);
    let tables: Vec<ElementRef<'_>> = doc.select(&table_sel).collect();
    if tables.is_empty() {
        return Err(HeritageError::parse(format!(
            "no listing table matches `{table_selector}`"
        )));
    }
    info!(tables = tables.len(), "found listing tables");

    let mut sites = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        let before = sites.len();
        sites.extend(own_rows(*table).filter_map(|row| extract_row(row, base_url)));
        info!(table = index + 1, sites = sites.len() - before, "processed table");
    }

    Ok(sites)
}

/// Rows of `table` itself, skipping rows of tables nested inside its cells.
fn own_rows(table: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .flat_map(|child| match child.value().name() {
            "tr" => vec![child],
            "thead" | "tbody" | "tfoot" => child
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|row| is_tag(*row, "tr"))
                .collect(),
            _ => Vec::new(),
        })
}

/// Build a record from one table row, or `None` if the row does not qualify.
pub(crate) fn extract_row(row: ElementRef<'_>, base_url: &Url) -> Option<HeritageSite> {
    let cells: Vec<ElementRef<'_>> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| is_tag(*cell, "td"))
        .collect();

    if cells.len() < MIN_CELLS {
        return None;
    }

    let name = clean(&visible_text(cells[0]));
    if name.is_empty() {
        debug!("row without a name, skipping");
        return None;
    }

    let (location, coordinates) = split_coordinates(&visible_text(cells[2]));
    let types = clean_opt(cells.get(3).map(|cell| visible_text(*cell)).as_deref());

    let image_url = image_url(cells[1], base_url);
    if image_url.is_none() {
        debug!(%name, "no image");
    }
    let detail_link = detail_link(cells[0], base_url);

    debug!(%name, "added site");

    Some(HeritageSite {
        name,
        location: clean(&location),
        coordinates,
        types,
        detail_link,
        image_url,
        ..Default::default()
    })
}

/// `src` of the first image in `cell`, made absolute.
fn image_url(cell: ElementRef<'_>, base_url: &Url) -> Option<String> {
    let src = cell.select(&IMG_SEL).next()?.value().attr("src")?.trim();
    resolve_image_src(src, base_url)
}

pub(crate) fn resolve_image_src(src: &str, base_url: &Url) -> Option<String> {
    if src.is_empty() {
        return None;
    }
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    base_url.join(src).ok().map(String::from)
}

/// Absolute URL of the first link in the name cell. Red links (articles
/// that do not exist yet) count as no link.
fn detail_link(cell: ElementRef<'_>, base_url: &Url) -> Option<String> {
    let anchor = cell.select(&LINK_SEL).next()?;
    if has_class(anchor, "new") {
        debug!("name links to a missing article");
        return None;
    }
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    base_url.join(href).ok().map(String::from)
}
