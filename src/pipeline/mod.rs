//! Pipeline stages for Markdown-to-HTML post-processing.
//!
//! Each submodule implements one transformation step as a pure
//! `&str -> String` function, so every stage is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ urls ──▶ embedded ──▶ render ──▶ postprocess
//! (file/text) (prefix)  (td, form)   (comrak)   (attrs, dashes)
//! ```
//!
//! 1. [`input`]    : pick the file contents or the literal fallback text
//! 2. [`urls`]     : prefix local image and anchor URLs in the Markdown source
//! 3. [`embedded`] : render Markdown inside `<td>` cells, then `<form>` bodies
//! 4. [`render`]   : full-document Markdown render
//! 5. [`postprocess`] : paragraph `{.class #id}` attributes, then en dashes

pub mod embedded;
pub mod input;
pub mod postprocess;
pub mod render;
pub mod urls;
