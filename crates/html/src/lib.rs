//! HTML section extractor for webpage-to-deck conversion.
//!
//! Walks the page's section containers and produces ordered records of
//! titles, body copy, images, and background images.

pub mod extractor;

pub use extractor::SectionExtractor;
