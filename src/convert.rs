//! Pipeline entry points.
//!
//! The `run*` functions are stateless: they borrow a [`PipelineConfig`] for
//! the duration of one call and never keep it. [`Pipeline`] bundles a config
//! with a renderer for callers that render many pages with the same setup;
//! its `reset` simply swaps in [`PipelineConfig::default()`].
//!
//! Stage order is fixed:
//!
//! ```text
//! URL prefixes → <td> cells → <form> bodies → render → {.class #id} → dashes
//! ```

use crate::config::PipelineConfig;
use crate::error::MdPostError;
use crate::pipeline::embedded::{render_form_bodies, render_table_cells};
use crate::pipeline::input::{resolve_input, ResolvedInput};
use crate::pipeline::postprocess::finish_html;
use crate::pipeline::render::{default_renderer, ComrakRenderer, MarkdownRenderer};
use crate::pipeline::urls::rewrite_local_urls;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Render a Markdown file (or the configured literal text) to HTML.
///
/// This is the primary entry point for the library. Uses the shared
/// [`ComrakRenderer`].
///
/// # Returns
/// `Ok(Some(html))` on success, `Ok(None)` when there was nothing to render:
/// no path and no literal text, or a missing path and no literal text.
///
/// # Errors
/// Returns `Err(MdPostError::ReadFailed)` only when `path` exists but cannot
/// be read as UTF-8 text.
///
/// # Example
/// ```rust
/// use mdpost::{run, PipelineConfig};
///
/// let config = PipelineConfig::builder().text("# Hi").build().unwrap();
/// let html = run(&config, None).unwrap().unwrap();
/// assert!(html.contains("<h1>Hi</h1>"));
/// ```
pub fn run(config: &PipelineConfig, path: Option<&Path>) -> Result<Option<String>, MdPostError> {
    run_with(default_renderer(), config, path)
}

/// Same as [`run`] with a caller-supplied Markdown renderer.
pub fn run_with(
    renderer: &dyn MarkdownRenderer,
    config: &PipelineConfig,
    path: Option<&Path>,
) -> Result<Option<String>, MdPostError> {
    let resolved = resolve_input(path, config.text.as_deref())?;
    match &resolved {
        ResolvedInput::File { path, .. } => info!("Rendering {}", path.display()),
        ResolvedInput::Literal(_) => info!("Rendering literal text"),
        ResolvedInput::Unavailable => {
            info!("No input available; nothing rendered");
            return Ok(None);
        }
    }

    Ok(resolved
        .into_text()
        .map(|markdown| process_markdown(renderer, config, &markdown)))
}

/// Run every stage over `markdown` with the shared [`ComrakRenderer`].
///
/// No input resolution happens here: `config.text` is ignored.
pub fn run_str(config: &PipelineConfig, markdown: &str) -> String {
    process_markdown(default_renderer(), config, markdown)
}

/// Run every stage over `markdown`, in order.
pub fn process_markdown(
    renderer: &dyn MarkdownRenderer,
    config: &PipelineConfig,
    markdown: &str,
) -> String {
    // ── Stage 1: Local URL prefixes ──────────────────────────────────────
    let s = rewrite_local_urls(markdown, config);

    // ── Stage 2: Embedded blocks ─────────────────────────────────────────
    let s = render_table_cells(&s, renderer);
    let s = render_form_bodies(&s, renderer);
    debug!("Pre-render buffer: {} bytes", s.len());

    // ── Stage 3: Full-document render ────────────────────────────────────
    let html = renderer.render(&s);
    debug!("Rendered HTML: {} bytes", html.len());

    // ── Stage 4: Paragraph attributes and dashes ─────────────────────────
    finish_html(&html, config.ids_as_classes)
}

/// Render and write the HTML directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files. Returns
/// `Ok(false)` without touching `output` when there was nothing to render.
pub fn run_to_file(
    config: &PipelineConfig,
    path: Option<&Path>,
    output: impl AsRef<Path>,
) -> Result<bool, MdPostError> {
    let Some(html) = run(config, path)? else {
        return Ok(false);
    };
    let output = output.as_ref();
    write_atomic(output, &html)?;
    info!("Wrote {} bytes to {}", html.len(), output.display());
    Ok(true)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), MdPostError> {
    let write_failed = |e: std::io::Error| MdPostError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("html.tmp");
    std::fs::write(&tmp_path, contents).map_err(write_failed)?;
    std::fs::rename(&tmp_path, path).map_err(write_failed)
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// A renderer and a config, reused across runs.
///
/// Reconfiguring or resetting takes `&mut self`, running takes `&self`, so a
/// config can never change under a run in progress.
///
/// # Example
/// ```rust
/// use mdpost::{Pipeline, PipelineConfig};
///
/// let mut pipeline = Pipeline::new(
///     PipelineConfig::builder().url_prefix("/docs/").build().unwrap(),
/// );
/// let html = pipeline.run_str("[guide](guide.html)");
/// assert!(html.contains(r#"href="/docs/guide.html""#));
///
/// pipeline.reset();
/// assert_eq!(pipeline.run(None).unwrap(), None);
/// ```
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    renderer: Arc<dyn MarkdownRenderer>,
}

impl Pipeline {
    /// Create a pipeline using a fresh [`ComrakRenderer`].
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_renderer(config, Arc::new(ComrakRenderer::new()))
    }

    pub fn with_renderer(config: PipelineConfig, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }

    /// Clear the literal text and every prefix.
    pub fn reset(&mut self) {
        self.config = PipelineConfig::default();
    }

    /// See [`run`].
    pub fn run(&self, path: Option<&Path>) -> Result<Option<String>, MdPostError> {
        run_with(self.renderer.as_ref(), &self.config, path)
    }

    /// See [`run_str`].
    pub fn run_str(&self, markdown: &str) -> String {
        process_markdown(self.renderer.as_ref(), &self.config, markdown)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("renderer", &"<dyn MarkdownRenderer>")
            .finish()
    }
}
