//! Error type for the mdpost library.
//!
//! The rewrite stages themselves never fail: every pass is a total function
//! over UTF-8 text, and regions that do not match a pattern are left alone.
//! The only fatal conditions are I/O around the single input read (and the
//! optional output write) plus configuration that cannot be honoured.
//!
//! A missing input file with no literal fallback is *not* an error. It yields
//! `Ok(None)` from the `run*` entry points so callers can tell "nothing to
//! render" apart from "rendered to an empty string".

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mdpost library.
#[derive(Debug, Error)]
pub enum MdPostError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input path exists but could not be read as UTF-8 text.
    #[error("Failed to read Markdown source '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A JSON configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON configuration file is not a valid `PipelineConfig`.
    #[error("Failed to parse configuration file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
