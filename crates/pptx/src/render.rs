//! Fixed-layout rendering of sections onto slides.
//!
//! Every coordinate in this module is a deliberate constant; there is no
//! layout engine. One slide per section, plus one extra card slide for the
//! capabilities section. Missing or unreadable images are skipped, never
//! fatal; everything else propagates.

use std::path::{Path, PathBuf};

use deck_core::{Result, Section};

use crate::emu::inches;
use crate::package::{PptxPackage, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use crate::slide::{Align, SlideBuilder, TextBox};
use crate::theme::{SEPIA_BROWN, SEPIA_CREAM, SEPIA_DARK, SEPIA_MEDIUM};

/// Section id that triggers the extra capability-card slide.
pub const CARD_SECTION_ID: &str = "capabilities";

/// At most this many body text boxes per slide; later entries are dropped.
pub const MAX_TEXT_BOXES: usize = 6;

/// At most this many content images per slide.
pub const MAX_IMAGES: usize = 2;

/// Width of the right-hand image column, in inches.
const IMAGE_WIDTH_IN: f64 = 2.5;

/// Banner above the card grid.
const CARD_SLIDE_TITLE: &str = "MailingPigeon does not just deliver emails.";

/// The six capability cards: icon glyph, short title, short description.
/// Fixed copy, independent of the page content.
const CAPABILITY_CARDS: [(&str, &str, &str); 6] = [
    ("\u{1F50D}", "It scouts.", "Finds the right prospects."),
    ("\u{1F4CB}", "It builds.", "Clean, intelligent lists."),
    ("\u{1F6E4}\u{FE0F}", "It prepares.", "Warms domains. Warms inboxes."),
    ("\u{1F4E7}", "It carries.", "Every kind of message."),
    ("\u{1F441}\u{FE0F}", "It watches.", "Open rates. Replies. Bounces."),
    ("\u{1F504}", "It adapts.", "When conditions change."),
];

/// Renders ordered sections into a deck package.
pub struct DeckRenderer {
    /// Directory image paths from the page are resolved against.
    base_dir: PathBuf,
}

impl DeckRenderer {
    /// Create a renderer resolving image assets against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Render every section, in order, into a finished package.
    pub fn render(&self, sections: &[Section]) -> Result<PptxPackage> {
        let mut package = PptxPackage::new();

        for section in sections {
            // The extractor already drops empty sections; re-check anyway.
            if section.is_empty() {
                continue;
            }
            self.render_section(&mut package, section)?;
            if section.id == CARD_SECTION_ID {
                self.render_card_slide(&mut package)?;
            }
        }

        Ok(package)
    }

    fn render_section(&self, package: &mut PptxPackage, section: &Section) -> Result<()> {
        let mut slide = SlideBuilder::new()?;

        if let Some(background) = &section.background_image {
            self.place_background(package, &mut slide, background)?;
        }

        if !section.title.is_empty() {
            slide.add_text_box(&TextBox {
                text: &section.title,
                x: inches(0.5),
                y: inches(0.5),
                cx: inches(9.0),
                cy: inches(1.0),
                size_pt: 44,
                bold: true,
                color: Some(SEPIA_DARK),
                align: Align::Left,
            })?;
        }

        let text_top = if section.title.is_empty() { 1.0 } else { 1.8 };
        for (row, line) in section.text.iter().take(MAX_TEXT_BOXES).enumerate() {
            slide.add_text_box(&TextBox {
                text: line,
                x: inches(0.5),
                y: inches(text_top + row as f64 * 0.8),
                cx: inches(6.0),
                cy: inches(0.7),
                size_pt: 18,
                bold: false,
                color: Some(SEPIA_BROWN),
                align: Align::Left,
            })?;
        }

        for (row, img) in section.images.iter().take(MAX_IMAGES).enumerate() {
            let path = self.base_dir.join(&img.src);
            if !path.exists() {
                log::warn!("skipping missing image {}", img.src);
                continue;
            }
            let (cx, cy) = match scaled_extent(&path, IMAGE_WIDTH_IN) {
                Ok(extent) => extent,
                Err(e) => {
                    log::warn!("skipping unreadable image {}: {}", img.src, e);
                    continue;
                }
            };
            let media = match package.add_media(&path) {
                Ok(media) => media,
                Err(e) => {
                    log::warn!("skipping image {}: {}", img.src, e);
                    continue;
                }
            };
            slide.add_picture(
                &media,
                &img.alt,
                inches(7.0),
                inches(1.5 + row as f64 * 3.0),
                cx,
                cy,
            )?;
        }

        let (xml, rels) = slide.finish()?;
        package.add_slide(xml, rels);
        Ok(())
    }

    /// Full-bleed background picture, best effort.
    fn place_background(
        &self,
        package: &mut PptxPackage,
        slide: &mut SlideBuilder,
        background: &str,
    ) -> Result<()> {
        let path = self.base_dir.join(background);
        if !path.exists() {
            log::warn!("skipping missing background {}", background);
            return Ok(());
        }
        match package.add_media(&path) {
            Ok(media) => slide.add_picture(&media, "", 0, 0, SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU),
            Err(e) => {
                log::warn!("skipping background {}: {}", background, e);
                Ok(())
            }
        }
    }

    /// The extra slide: a banner plus a 3x2 grid of the six fixed cards.
    fn render_card_slide(&self, package: &mut PptxPackage) -> Result<()> {
        let mut slide = SlideBuilder::new()?;

        slide.add_text_box(&TextBox {
            text: CARD_SLIDE_TITLE,
            x: inches(0.5),
            y: inches(0.3),
            cx: inches(9.0),
            cy: inches(0.8),
            size_pt: 32,
            bold: true,
            color: Some(SEPIA_DARK),
            align: Align::Left,
        })?;

        let (card_w, card_h, gutter) = (2.8, 2.0, 0.2);
        let (origin_x, origin_y) = (0.5, 1.5);

        for (index, (icon, title, description)) in CAPABILITY_CARDS.iter().enumerate() {
            let row = (index / 3) as f64;
            let col = (index % 3) as f64;
            let x = origin_x + col * (card_w + gutter);
            let y = origin_y + row * (card_h + gutter);

            slide.add_rounded_rect(
                inches(x),
                inches(y),
                inches(card_w),
                inches(card_h),
                SEPIA_CREAM,
                SEPIA_MEDIUM,
                3.0,
            )?;

            slide.add_text_box(&TextBox {
                text: icon,
                x: inches(x + 0.2),
                y: inches(y + 0.2),
                cx: inches(2.4),
                cy: inches(0.5),
                size_pt: 36,
                bold: false,
                color: None,
                align: Align::Center,
            })?;
            slide.add_text_box(&TextBox {
                text: title,
                x: inches(x + 0.2),
                y: inches(y + 0.8),
                cx: inches(2.4),
                cy: inches(0.4),
                size_pt: 20,
                bold: true,
                color: Some(SEPIA_DARK),
                align: Align::Center,
            })?;
            slide.add_text_box(&TextBox {
                text: description,
                x: inches(x + 0.2),
                y: inches(y + 1.3),
                cx: inches(2.4),
                cy: inches(0.5),
                size_pt: 14,
                bold: false,
                color: Some(SEPIA_MEDIUM),
                align: Align::Center,
            })?;
        }

        let (xml, rels) = slide.finish()?;
        package.add_slide(xml, rels);
        Ok(())
    }
}

/// Extent for a content image scaled to `width_in` inches wide, aspect ratio
/// preserved from the file's pixel dimensions.
fn scaled_extent(path: &Path, width_in: f64) -> Result<(i64, i64)> {
    let (px_w, px_h) = image::image_dimensions(path)
        .map_err(|e| deck_core::Error::ImageError(format!("{}: {}", path.display(), e)))?;
    let cx = inches(width_in);
    let cy = (cx as f64 * px_h as f64 / px_w as f64).round() as i64;
    Ok((cx, cy))
}
