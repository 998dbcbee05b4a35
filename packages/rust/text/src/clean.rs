//! Cleanup passes for scraped text.
//!
//! Each pass is a function `&str -> String` applied in sequence. The result
//! is stable: running the pipeline on its own output changes nothing.

use std::sync::LazyLock;

use regex::Regex;

/// Normalize a scraped string.
///
/// Newlines become spaces, `[n]` citation markers are dropped, whitespace
/// runs collapse, the ends are trimmed, and the space after `.`, `,`, `;`
/// and `:` is removed (`"a, b"` becomes `"a,b"`).
pub fn clean(raw: &str) -> String {
    let mut result = replace_newlines(raw);

    result = strip_citations(&result);
    result = collapse_whitespace(&result);
    result = result.trim().to_string();
    result = tighten_punctuation(&result);

    result
}

/// [`clean`] for optional input; absent text cleans to an empty string.
pub fn clean_opt(raw: Option<&str>) -> String {
    raw.map(clean).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Pass 1: Newlines
// ---------------------------------------------------------------------------

fn replace_newlines(text: &str) -> String {
    text.replace('\n', " ")
}

// ---------------------------------------------------------------------------
// Pass 2: Citation markers
// ---------------------------------------------------------------------------

/// Remove `[12]`-style markers until none are left, so `[1[2]]` does not
/// leave a fresh `[1]` behind.
fn strip_citations(text: &str) -> String {
    static CITATION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid regex"));

    let mut result = text.to_string();
    while CITATION_RE.is_match(&result) {
        result = CITATION_RE.replace_all(&result, "").into_owned();
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 3: Whitespace runs
// ---------------------------------------------------------------------------

/// Collapse runs of Unicode whitespace (including NBSP) into one space.
fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: Tight punctuation
// ---------------------------------------------------------------------------

/// Drop the single space following `.`, `,`, `;` or `:`.
fn tighten_punctuation(text: &str) -> String {
    static PUNCT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([.,;:]) ").expect("valid regex"));

    PUNCT_RE.replace_all(text, "$1").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
