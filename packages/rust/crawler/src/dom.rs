//! Small DOM helpers shared by the listing and detail extractors.

use std::sync::LazyLock;

use scraper::{ElementRef, Node, Selector};

/// Classes whose subtrees are not shown as text by a browser (geo
/// microformats, edit links, citation superscripts).
const HIDDEN_CLASSES: &[&str] = &[
    "geo-nondefault",
    "geo-multi-punct",
    "mw-editsection",
    "reference",
];

static HEADLINE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".mw-headline").expect("valid selector"));

/// Text of `el` as a rendered page would show it.
///
/// Skips hidden subtrees, `<style>`/`<script>`, and turns `<br>` into a
/// newline.
pub(crate) fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_visible(el, &mut out);
    out
}

fn push_visible(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if child_el.value().name() == "br" {
                    out.push('\n');
                } else if !is_hidden(child_el) {
                    push_visible(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if matches!(value.name(), "style" | "script" | "noscript") {
        return true;
    }
    if value.classes().any(|c| HIDDEN_CLASSES.contains(&c)) {
        return true;
    }
    value
        .attr("style")
        .is_some_and(|s| s.replace(char::is_whitespace, "").contains("display:none"))
}

/// Heading text, preferring an old-style `.mw-headline` child.
pub(crate) fn heading_text(heading: ElementRef<'_>) -> String {
    match heading.select(&HEADLINE_SEL).next() {
        Some(headline) => visible_text(headline),
        None => visible_text(heading),
    }
}

pub(crate) fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

pub(crate) fn is_tag(el: ElementRef<'_>, name: &str) -> bool {
    el.value().name() == name
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, sel: &str) -> ElementRef<'a> {
        let sel = Selector::parse(sel).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn visible_text_skips_hidden_parts() {
        let doc = Html::parse_fragment(
            r#"<div id="c">Hà Nội<br><style>.x{}</style><span class="geo-dms">21°01′47″B 105°51′07″Đ</span><span class="geo-multi-punct"> / </span><span class="geo-nondefault">21.0297°B 105.8519°Đ</span><sup class="reference">[1]</sup><span style="display: none">x</span></div>"#,
        );
        let text = visible_text(first(&doc, "#c"));
        assert_eq!(text, "Hà Nội\n21°01′47″B 105°51′07″Đ");
    }

    #[test]
    fn heading_text_prefers_headline() {
        let doc = Html::parse_fragment(
            r#"<h2 id="h"><span class="mw-headline">Lịch sử</span><span class="mw-editsection">[sửa]</span></h2>"#,
        );
        assert_eq!(heading_text(first(&doc, "#h")), "Lịch sử");
    }

    #[test]
    fn heading_text_plain() {
        let doc = Html::parse_fragment(r#"<h3 id="h">Thời Lý</h3>"#);
        assert_eq!(heading_text(first(&doc, "#h")), "Thời Lý");
    }
}
