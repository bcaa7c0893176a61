//! Section extraction from the page DOM.
//!
//! Selects every `section.section` container in document order and pulls out
//! a title (first h1/h2/h3), body copy (class allow-list with a plain
//! paragraph fallback), content images, and an inline background image.

use std::path::Path;
use std::sync::LazyLock;

use deck_core::normalize::{is_substantial, normalize_text};
use deck_core::{Result, Section, SectionImage};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Class names that mark body copy on the source page. This is a closed set
/// of stylistic roles from the page's design; anything else is decoration.
const TEXT_CLASSES: &[&str] = &[
    "story-line",
    "story-text",
    "mission-line",
    "principle",
    "transition-line",
    "failure-text",
    "comparison-line",
    "response-line",
    "strategy-line",
    "finale-line",
    "salute-line",
    "reason-line",
    "hospital-line",
    "heroic-line",
    "mantra-line",
    "audience-text",
    "card-title",
    "card-text",
];

/// Subtrees whose text content is never page copy.
const SKIPPED_SUBTREES: &[&str] = &["script", "style", "svg"];

static SECTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section.section").unwrap());
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3").unwrap());
static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static TEXT_BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, span, div").unwrap());
static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

static BACKGROUND_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\('([^']+)'\)").unwrap());

/// Extractor for `section.section` containers.
pub struct SectionExtractor;

impl SectionExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Read a document from disk and extract its sections.
    ///
    /// The file must exist and be valid UTF-8. The HTML parse itself is
    /// error-tolerant and never fails on malformed markup.
    pub fn extract_file(&self, path: &Path) -> Result<Vec<Section>> {
        let html = std::fs::read_to_string(path)?;
        Ok(self.extract(&html))
    }

    /// Extract ordered section records from an HTML document.
    ///
    /// Sections whose title, text, and images are all empty are dropped.
    pub fn extract(&self, html: &str) -> Vec<Section> {
        let document = Html::parse_document(html);

        let mut sections = Vec::new();
        for element in document.select(&SECTION_SELECTOR) {
            let section = extract_section(element);
            if section.is_empty() {
                log::debug!("dropping empty section (id={:?})", section.id);
                continue;
            }
            sections.push(section);
        }
        sections
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one section record from its container element.
fn extract_section(element: ElementRef) -> Section {
    let mut section = Section::new(element.value().attr("id").unwrap_or(""));

    if let Some(heading) = element.select(&HEADING_SELECTOR).next() {
        section.title = collect_text(heading);
    }

    section.background_image = background_image(element);

    for img in element.select(&IMG_SELECTOR) {
        if img.value().attr("aria-hidden") == Some("true") {
            continue;
        }
        let Some(src) = img.value().attr("src").filter(|s| !s.is_empty()) else {
            continue;
        };
        let alt = img.value().attr("alt").unwrap_or("");
        section.add_image(SectionImage::new(src, alt));
    }

    for block in element.select(&TEXT_BLOCK_SELECTOR) {
        if !has_text_class(block) {
            continue;
        }
        let text = collect_text(block);
        if is_substantial(&text) {
            section.add_text(text);
        }
    }

    // Some sections carry plain paragraphs with no semantic class at all.
    if section.text.is_empty() {
        for paragraph in element.select(&PARAGRAPH_SELECTOR) {
            let text = collect_text(paragraph);
            if is_substantial(&text) {
                section.add_text(text);
            }
        }
    }

    section
}

/// Capture the URL of an inline `background-image` declaration, if any.
fn background_image(element: ElementRef) -> Option<String> {
    let style = element.value().attr("style")?;
    if !style.contains("background-image") {
        return None;
    }
    BACKGROUND_URL_REGEX
        .captures(style)
        .map(|caps| caps[1].to_string())
}

/// Whether a block carries at least one allow-listed class token.
///
/// Matching is substring-per-token, so `story-line-2` still counts as a
/// `story-line` role.
fn has_text_class(element: ElementRef) -> bool {
    element
        .value()
        .classes()
        .any(|class| TEXT_CLASSES.iter().any(|role| class.contains(role)))
}

/// Collect normalized text from a subtree, skipping script/style/svg content.
fn collect_text(element: ElementRef) -> String {
    let mut chunks: Vec<&str> = Vec::new();
    collect_text_nodes(element, &mut chunks);
    normalize_text(&chunks.join(" "))
}

fn collect_text_nodes<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&**text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if SKIPPED_SUBTREES.contains(&child_el.value().name()) {
                continue;
            }
            collect_text_nodes(child_el, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<Section> {
        SectionExtractor::new().extract(html)
    }

    #[test]
    fn test_sections_in_document_order() {
        let html = r#"
            <section class="section" id="first"><h2>Alpha</h2></section>
            <section class="section" id="second"><h2>Beta</h2></section>
        "#;
        let sections = extract(html);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "first");
        assert_eq!(sections[0].title, "Alpha");
        assert_eq!(sections[1].id, "second");
        assert_eq!(sections[1].title, "Beta");
    }

    #[test]
    fn test_unmarked_sections_are_not_selected() {
        let html = r#"
            <section id="plain"><h2>Not a marked section</h2></section>
            <div class="section"><h2>Wrong element type</h2></div>
            <section class="section"><h2>Kept</h2></section>
        "#;
        let sections = extract(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Kept");
    }

    #[test]
    fn test_empty_section_is_dropped() {
        let html = r#"
            <section class="section" id="spacer"></section>
            <section class="section"><h2>Kept</h2></section>
        "#;
        let sections = extract(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Kept");
    }

    #[test]
    fn test_first_heading_wins() {
        let html = r#"
            <section class="section">
                <h3>Sub first</h3>
                <h1>Main later</h1>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].title, "Sub first");
    }

    #[test]
    fn test_title_whitespace_is_normalized() {
        let html = r#"<section class="section"><h1>Hello
            World</h1></section>"#;
        let sections = extract(html);
        assert_eq!(sections[0].title, "Hello World");
    }

    #[test]
    fn test_allow_listed_text_in_order() {
        let html = r#"
            <section class="section">
                <p class="story-line">First line of the story</p>
                <span class="mantra-line">Deliver through anything</span>
                <div class="card-text">Card body copy</div>
                <p class="decoration">Ignored, wrong class</p>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(
            sections[0].text,
            vec![
                "First line of the story",
                "Deliver through anything",
                "Card body copy"
            ]
        );
    }

    #[test]
    fn test_substring_class_match() {
        let html = r#"
            <section class="section">
                <p class="story-line-2 highlighted">Variant role still counts</p>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].text, vec!["Variant role still counts"]);
    }

    #[test]
    fn test_short_entries_are_discarded() {
        let html = r#"
            <section class="section">
                <p class="story-line">ok</p>
                <p class="story-line">okay</p>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].text, vec!["okay"]);
    }

    #[test]
    fn test_paragraph_fallback() {
        let html = r#"
            <section class="section">
                <p>Plain paragraph one</p>
                <p>Plain paragraph two</p>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(
            sections[0].text,
            vec!["Plain paragraph one", "Plain paragraph two"]
        );
    }

    #[test]
    fn test_fallback_not_taken_when_allow_list_matches() {
        let html = r#"
            <section class="section">
                <p class="mission-line">Marked copy</p>
                <p>Unmarked paragraph</p>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].text, vec!["Marked copy"]);
    }

    #[test]
    fn test_images_with_alt_in_order() {
        let html = r#"
            <section class="section">
                <img src="images/pigeon.png" alt="A carrier pigeon">
                <img src="images/trench.jpg">
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].images.len(), 2);
        assert_eq!(sections[0].images[0].src, "images/pigeon.png");
        assert_eq!(sections[0].images[0].alt, "A carrier pigeon");
        assert_eq!(sections[0].images[1].src, "images/trench.jpg");
        assert_eq!(sections[0].images[1].alt, "");
    }

    #[test]
    fn test_hidden_and_srcless_images_excluded() {
        let html = r#"
            <section class="section">
                <img src="images/deco.png" aria-hidden="true">
                <img src="" alt="no source">
                <img src="images/real.png" alt="kept">
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].images.len(), 1);
        assert_eq!(sections[0].images[0].src, "images/real.png");
    }

    #[test]
    fn test_background_image_captured() {
        let html = r#"
            <section class="section"
                     style="background-image: url('images/skies.jpg'); color: red">
                <h2>Hero</h2>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(
            sections[0].background_image.as_deref(),
            Some("images/skies.jpg")
        );
    }

    #[test]
    fn test_background_absent_without_declaration() {
        let html = r#"
            <section class="section" style="color: red"><h2>Hero</h2></section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].background_image, None);
    }

    #[test]
    fn test_script_style_svg_excluded_from_text() {
        let html = r#"
            <section class="section">
                <p class="story-line">Visible copy<script>var x = 1;</script>
                    <style>.a { color: red }</style>
                    <svg><title>vector label</title></svg></p>
            </section>
        "#;
        let sections = extract(html);
        assert_eq!(sections[0].text, vec!["Visible copy"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = r#"
            <section class="section" id="mission">
                <h2>Our Mission</h2>
                <p class="mission-line">Deliver the message</p>
                <img src="images/pigeon.png" alt="pigeon">
            </section>
        "#;
        let extractor = SectionExtractor::new();
        assert_eq!(extractor.extract(html), extractor.extract(html));
    }

    #[test]
    fn test_extract_file_missing_is_fatal() {
        let extractor = SectionExtractor::new();
        let result = extractor.extract_file(Path::new("no/such/page.html"));
        assert!(result.is_err());
    }
}
