//! Document Composer
//!
//! This module provides:
//! - `compose` for merging the three source buffers into one document
//! - the reserved placeholder markers and starter templates
//! - wrapping helpers and document-shape queries
//!
//! Everything here is pure string work. No I/O, no failure paths.

mod document;
pub mod template;

pub use document::{compose, is_complete_document, wrap_script, wrap_style};
pub use template::{
    DEFAULT_MARKUP, DEFAULT_SCRIPT, DEFAULT_STYLE, SCRIPT_PLACEHOLDER, STYLE_PLACEHOLDER,
};
