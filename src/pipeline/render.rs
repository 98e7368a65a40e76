//! Markdown rendering: the one collaborator the pipeline does not own.
//!
//! The pipeline only needs `render(markdown) -> html`. It calls it once for
//! the whole document and once per embedded block (table cell, form body),
//! so the renderer has to pass block-level raw HTML through untouched and
//! wrap loose text in `<p>...</p>`. [`ComrakRenderer`] is configured for
//! exactly that.
//!
//! Any `Fn(&str) -> String` closure is also a renderer, which keeps tests and
//! alternative engines cheap to plug in.

use comrak::options::Options;
use once_cell::sync::Lazy;
use tracing::trace;

/// Converts Markdown source to HTML.
///
/// Implementations must be `Send + Sync` so a configured pipeline can be
/// shared between threads.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// Default renderer backed by comrak.
///
/// Raw HTML is emitted verbatim and the tag filter is off: the embedded
/// block pass relies on `<table>` and `<form>` blocks surviving the final
/// render untouched. Smart punctuation stays off so ` -- ` reaches the
/// typographic pass unchanged.
pub struct ComrakRenderer {
    options: Options<'static>,
}

impl ComrakRenderer {
    pub fn new() -> Self {
        Self {
            options: default_options(),
        }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        let html = comrak::markdown_to_html(markdown, &self.options);
        trace!("Rendered {} bytes of Markdown to {} bytes of HTML", markdown.len(), html.len());
        html
    }
}

static DEFAULT_RENDERER: Lazy<ComrakRenderer> = Lazy::new(ComrakRenderer::new);

/// Shared default renderer, initialised on first use.
pub fn default_renderer() -> &'static ComrakRenderer {
    &DEFAULT_RENDERER
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.tagfilter = false;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;
    ext.description_lists = true;

    options.parse.smart = false;
    options.render.r#unsafe = true;

    options
}
