//! Domain types for representing extracted page sections.

use serde::{Deserialize, Serialize};

/// One semantic block of the source page.
///
/// Sections are built once by the extractor, held in document order, and
/// consumed exactly once by the renderer. They are never mutated after
/// extraction completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Element `id` attribute, possibly empty. Only consulted to trigger
    /// the capability-card slide.
    pub id: String,

    /// Normalized text of the first h1/h2/h3 in the subtree, or empty.
    pub title: String,

    /// Normalized body lines, in document order.
    pub text: Vec<String>,

    /// Content images in document order, aria-hidden ones excluded.
    pub images: Vec<SectionImage>,

    /// URL captured from an inline `background-image` declaration.
    pub background_image: Option<String>,
}

impl Section {
    /// Create an empty section with the given element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add a body text line.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.text.push(text.into());
    }

    /// Add a content image.
    pub fn add_image(&mut self, image: SectionImage) {
        self.images.push(image);
    }

    /// A section with no title, no text, and no images carries nothing
    /// worth a slide.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.text.is_empty() && self.images.is_empty()
    }
}

/// An image reference extracted from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionImage {
    /// Source path as written in the `src` attribute.
    pub src: String,

    /// Alternative text, possibly empty.
    pub alt: String,
}

impl SectionImage {
    /// Create a new image reference.
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_section_is_empty() {
        assert!(Section::new("intro").is_empty());
    }

    #[test]
    fn test_title_alone_retains_section() {
        let mut section = Section::new("");
        section.title = "Our Mission".to_string();
        assert!(!section.is_empty());
    }

    #[test]
    fn test_text_alone_retains_section() {
        let mut section = Section::new("");
        section.add_text("A line of copy");
        assert!(!section.is_empty());
    }

    #[test]
    fn test_image_alone_retains_section() {
        let mut section = Section::new("");
        section.add_image(SectionImage::new("images/pigeon.png", "A pigeon"));
        assert!(!section.is_empty());
    }

    #[test]
    fn test_background_alone_does_not_retain_section() {
        let mut section = Section::new("hero");
        section.background_image = Some("images/trench.jpg".to_string());
        assert!(section.is_empty());
    }
}
