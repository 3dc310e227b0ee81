//! Lesson content processing: section parsing, progress scoping and
//! prose extraction.
//!
//! Everything here is pure and works on borrowed lesson text.

pub mod scope;
pub mod sections;
pub mod strip;

pub use scope::scope_sections;
pub use sections::{
    char_prefix, lesson_text, parse_lesson_bytes, parse_sections, parse_sections_with, validate_lesson,
    FALLBACK_TITLE,
};
pub use strip::strip_markdown_noise;
