//! Detail-page extraction: description paragraph plus keyword-located
//! history, architecture, and festival sections.
//!
//! A section is found by taking the first `h2` whose text matches a
//! [`SectionRule`], then collecting the elements that follow the heading's
//! container until the next top-level heading boundary.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use heritage_shared::{HeritageSite, HistoryEvent, SectionKind, SectionRule};
use heritage_text::clean;

use crate::dom::{has_class, heading_text, is_tag, visible_text};

static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#mw-content-text").expect("valid selector"));
static PARAGRAPH_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static H2_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid selector"));
static H3_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("valid selector"));

/// Everything a detail page contributes to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailContent {
    pub description: Option<String>,
    pub events: Vec<HistoryEvent>,
    pub architectural: String,
    pub cultural_festival: String,
}

impl DetailContent {
    /// Fill the detail fields of `site`. An absent description leaves the
    /// existing value alone.
    pub fn apply_to(self, site: &mut HeritageSite) {
        if let Some(description) = self.description {
            site.description = description;
        }
        site.events = self.events;
        site.architectural = self.architectural;
        site.cultural_festival = self.cultural_festival;
    }
}

/// Extract the detail fields for the site called `site_name`.
///
/// Missing pieces are not errors; the matching field stays empty.
pub fn extract_detail(html: &str, site_name: &str, rules: &[SectionRule]) -> DetailContent {
    let doc = Html::parse_document(html);
    let content = doc.select(&CONTENT_SEL).next();
    let scope = content.unwrap_or_else(|| doc.root_element());

    let mut detail = DetailContent {
        description: content.and_then(first_paragraph),
        ..Default::default()
    };
    if detail.description.is_none() {
        debug!("no description paragraph");
    }

    let headings: Vec<ElementRef<'_>> = scope.select(&H2_SEL).collect();

    for rule in rules {
        let Some(heading) = headings
            .iter()
            .copied()
            .find(|h| rule.matches(&heading_text(*h)))
        else {
            debug!(kind = ?rule.kind, "section not found");
            continue;
        };

        let blocks = section_blocks(heading);
        match rule.kind {
            SectionKind::History => detail.events = history_events(&blocks, site_name),
            SectionKind::Architecture => detail.architectural = section_prose(&blocks),
            SectionKind::Festival => detail.cultural_festival = section_prose(&blocks),
        }
        debug!(kind = ?rule.kind, blocks = blocks.len(), "section extracted");
    }

    detail
}

/// First paragraph in the content region with any text in it.
fn first_paragraph(content: ElementRef<'_>) -> Option<String> {
    content
        .select(&PARAGRAPH_SEL)
        .map(|p| clean(&visible_text(p)))
        .find(|text| !text.is_empty())
}

// ---------------------------------------------------------------------------
// Section walking
// ---------------------------------------------------------------------------

/// The element whose siblings make up the section: the `div.mw-heading`
/// wrapper in current markup, the heading itself in older markup.
fn section_container(heading: ElementRef<'_>) -> ElementRef<'_> {
    heading
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| has_class(*parent, "mw-heading"))
        .unwrap_or(heading)
}

/// Elements after the heading up to the next top-level heading boundary.
/// `<section>` wrappers are flattened into their children.
fn section_blocks(heading: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut flat = Vec::new();
    for sibling in section_container(heading)
        .next_siblings()
        .filter_map(ElementRef::wrap)
    {
        flatten_sections(sibling, &mut flat);
    }

    flat.into_iter()
        .take_while(|el| !is_section_boundary(*el))
        .collect()
}

fn flatten_sections<'a>(el: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
    if is_tag(el, "section") {
        for child in el.children().filter_map(ElementRef::wrap) {
            flatten_sections(child, out);
        }
    } else {
        out.push(el);
    }
}

fn is_section_boundary(el: ElementRef<'_>) -> bool {
    is_tag(el, "h2") || has_class(el, "mw-heading2") || el.select(&H2_SEL).next().is_some()
}

/// Title of a level-three sub-heading, if `el` is one.
fn subheading_title(el: ElementRef<'_>) -> Option<String> {
    if is_tag(el, "h3") {
        return Some(clean(&heading_text(el)));
    }
    if has_class(el, "mw-heading") || has_class(el, "mw-heading3") {
        return el.select(&H3_SEL).next().map(|h3| clean(&heading_text(h3)));
    }
    None
}

/// All paragraph text in `blocks`, cleaned into one string.
fn section_prose(blocks: &[ElementRef<'_>]) -> String {
    let paragraphs: Vec<String> = blocks
        .iter()
        .filter(|el| is_tag(**el, "p"))
        .map(|p| visible_text(*p))
        .collect();
    clean(&paragraphs.join("\n"))
}

/// Split a history section into one event per sub-heading, or a single
/// synthetic event when there are none.
fn history_events(blocks: &[ElementRef<'_>], site_name: &str) -> Vec<HistoryEvent> {
    if !blocks.iter().any(|el| subheading_title(*el).is_some()) {
        let prose = section_prose(blocks);
        if prose.is_empty() {
            return Vec::new();
        }
        return vec![HistoryEvent::synthetic(site_name, prose)];
    }

    let mut events = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for el in blocks {
        if let Some(title) = subheading_title(*el) {
            if let Some((title, paragraphs)) = current.take() {
                events.push(finish_event(title, &paragraphs));
            }
            current = Some((title, Vec::new()));
        } else if is_tag(*el, "p") {
            // Paragraphs before the first sub-heading belong to no event.
            if let Some((_, paragraphs)) = current.as_mut() {
                paragraphs.push(visible_text(*el));
            }
        }
    }

    if let Some((title, paragraphs)) = current {
        events.push(finish_event(title, &paragraphs));
    }

    events
}

fn finish_event(title: String, paragraphs: &[String]) -> HistoryEvent {
    HistoryEvent {
        title,
        description: clean(&paragraphs.join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_shared::SectionsConfig;

    fn rules() -> Vec<SectionRule> {
        SectionsConfig::default().rules()
    }

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><h1>Trang</h1><div id="mw-content-text"><div class="mw-content-ltr mw-parser-output">{body}</div></div></body></html>"#
        )
    }

    fn h2(text: &str) -> String {
        format!(
            r#"<div class="mw-heading mw-heading2"><h2 id="x">{text}</h2><span class="mw-editsection">[sửa | sửa mã nguồn]</span></div>"#
        )
    }

    fn h3(text: &str) -> String {
        format!(r#"<div class="mw-heading mw-heading3"><h3>{text}</h3></div>"#)
    }

    #[test]
    fn history_split_by_subheadings() {
        let html = page(&format!(
            "<p>Mở đầu.</p>{}<p>Giới thiệu chung.</p>{}<p>Xây năm 1070.[2]</p>{}<p>Trùng tu\n thời Lê.</p>{}<p>Không thuộc lịch sử.</p>",
            h2("Lịch sử"),
            h3("Thời Lý"),
            h3("Thời Lê"),
            h2("Tham khảo"),
        ));
        let detail = extract_detail(&html, "Văn Miếu", &rules());

        assert_eq!(
            detail.events,
            vec![
                HistoryEvent {
                    title: "Thời Lý".into(),
                    description: "Xây năm 1070.".into(),
                },
                HistoryEvent {
                    title: "Thời Lê".into(),
                    description: "Trùng tu thời Lê.".into(),
                },
            ]
        );
        assert_eq!(detail.description.as_deref(), Some("Mở đầu."));
    }

    #[test]
    fn history_without_subheadings_is_one_synthetic_event() {
        let html = page(&format!(
            "<p>Giới thiệu.</p>{}<p>Được xây dựng từ thế kỷ XI.</p>{}<p>Khác.</p>",
            h2("Lịch sử hình thành"),
            h2("Xem thêm"),
        ));
        let detail = extract_detail(&html, "Chùa Một Cột", &rules());

        assert_eq!(
            detail.events,
            vec![HistoryEvent {
                title: "History of Chùa Một Cột".into(),
                description: "Được xây dựng từ thế kỷ XI.".into(),
            }]
        );
    }

    #[test]
    fn empty_history_section_yields_no_events() {
        let html = page(&format!("<p>a</p>{}<ul><li>x</li></ul>{}", h2("Lịch sử"), h2("Khác")));
        let detail = extract_detail(&html, "X", &rules());
        assert!(detail.events.is_empty());
    }

    #[test]
    fn architecture_and_festival_concatenate_paragraphs() {
        let html = page(&format!(
            "<p>Mô tả.</p>{}<p>Cổng chính.</p>{}<p>Gác Khuê Văn.</p>{}<p>Tổ chức vào mùng 5.</p><p>Rước kiệu.</p>",
            h2("Kiến trúc"),
            h3("Khuê Văn Các"),
            h2("Lễ hội truyền thống"),
        ));
        let detail = extract_detail(&html, "X", &rules());

        assert_eq!(detail.architectural, "Cổng chính.Gác Khuê Văn.");
        assert_eq!(detail.cultural_festival, "Tổ chức vào mùng 5.Rước kiệu.");
        assert!(detail.events.is_empty());
    }

    #[test]
    fn first_matching_heading_wins() {
        let html = page(&format!(
            "{}<p>Một.</p>{}<p>Hai.</p>",
            h2("Kiến trúc tổng thể"),
            h2("Kiến trúc chi tiết"),
        ));
        let detail = extract_detail(&html, "X", &rules());
        assert_eq!(detail.architectural, "Một.");
    }

    #[test]
    fn one_heading_can_feed_several_sections() {
        let html = page(&format!(
            "{}<p>Chung.</p>",
            h2("Lịch sử và kiến trúc")
        ));
        let detail = extract_detail(&html, "X", &rules());
        assert_eq!(detail.architectural, "Chung.");
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].description, "Chung.");
    }

    #[test]
    fn legacy_heading_markup() {
        let html = page(
            r#"<p></p><p>Đền Hùng là quần thể.</p>
<h2><span class="mw-headline" id="L">Lịch sử</span><span class="mw-editsection">[sửa]</span></h2>
<h3><span class="mw-headline">Thời Hùng Vương</span></h3>
<p>Truyền thuyết.</p>
<h2><span class="mw-headline">Lễ hội</span></h2>
<p>Giỗ Tổ.</p>"#,
        );
        let detail = extract_detail(&html, "Đền Hùng", &rules());

        assert_eq!(detail.description.as_deref(), Some("Đền Hùng là quần thể."));
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].title, "Thời Hùng Vương");
        assert_eq!(detail.events[0].description, "Truyền thuyết.");
        assert_eq!(detail.cultural_festival, "Giỗ Tổ.");
    }

    #[test]
    fn parsoid_sections_are_flattened() {
        let html = page(&format!(
            r#"<section>{}<p>Mở.</p><section>{}<p>Thời kỳ đầu.</p></section></section><section>{}<p>Khác.</p></section>"#,
            h2("Lịch sử"),
            h3("Khởi dựng"),
            h2("Tham khảo"),
        ));
        let detail = extract_detail(&html, "X", &rules());
        assert_eq!(
            detail.events,
            vec![HistoryEvent {
                title: "Khởi dựng".into(),
                description: "Thời kỳ đầu.".into(),
            }]
        );
    }

    #[test]
    fn page_without_sections_keeps_defaults() {
        let detail = extract_detail("<html><body><p>x</p></body></html>", "X", &rules());
        assert_eq!(detail, DetailContent::default());
    }

    #[test]
    fn apply_to_fills_record() {
        let mut site = HeritageSite {
            name: "X".into(),
            description: "cũ".into(),
            ..Default::default()
        };
        DetailContent {
            description: None,
            events: vec![HistoryEvent::synthetic("X", "a".into())],
            architectural: "b".into(),
            cultural_festival: "c".into(),
        }
        .apply_to(&mut site);

        assert_eq!(site.description, "cũ");
        assert_eq!(site.events.len(), 1);
        assert_eq!(site.architectural, "b");
        assert_eq!(site.cultural_festival, "c");
    }
}
