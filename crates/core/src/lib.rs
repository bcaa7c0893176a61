//! Core domain types, text normalization, and shared error types for
//! webpage-to-deck conversion.

pub mod error;
pub mod normalize;
pub mod types;

pub use error::{Error, Result};
pub use types::{Section, SectionImage};
