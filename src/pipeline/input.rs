//! Input resolution: decide which Markdown text the pipeline works on.
//!
//! Resolution order:
//!
//! 1. No path given: the literal text from the config, if any.
//! 2. Path given and present on disk: the file's full contents.
//! 3. Path given but missing: the literal text again, as a fallback.
//!
//! When none of these yields text the input is [`ResolvedInput::Unavailable`]
//! and the caller skips every stage. A path that exists but cannot be read
//! is a hard error, not a fallback.

use crate::error::MdPostError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The resolved Markdown source for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    /// Text read from a file on disk.
    File { path: PathBuf, text: String },
    /// Literal text supplied through the config.
    Literal(String),
    /// Nothing to render.
    Unavailable,
}

impl ResolvedInput {
    /// The Markdown text, or `None` when unavailable.
    pub fn text(&self) -> Option<&str> {
        match self {
            ResolvedInput::File { text, .. } | ResolvedInput::Literal(text) => Some(text.as_str()),
            ResolvedInput::Unavailable => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ResolvedInput::File { text, .. } | ResolvedInput::Literal(text) => Some(text),
            ResolvedInput::Unavailable => None,
        }
    }
}

/// Resolve the working buffer from an optional path and the literal fallback.
pub fn resolve_input(path: Option<&Path>, literal: Option<&str>) -> Result<ResolvedInput, MdPostError> {
    let fallback = || match literal {
        Some(text) => ResolvedInput::Literal(text.to_string()),
        None => ResolvedInput::Unavailable,
    };

    let Some(path) = path else {
        debug!("No input path; using literal text");
        return Ok(fallback());
    };

    if !path.exists() {
        debug!("Input '{}' not found; falling back to literal text", path.display());
        return Ok(fallback());
    }

    let text = std::fs::read_to_string(path).map_err(|e| MdPostError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Resolved local Markdown: {} ({} bytes)", path.display(), text.len());
    Ok(ResolvedInput::File {
        path: path.to_path_buf(),
        text,
    })
}
