//! # mdpost
//!
//! Post-process Markdown on its way to HTML.
//!
//! A plain Markdown renderer leaves a few things undone for a static site:
//! local links and images need a site prefix, Markdown inside raw `<td>` and
//! `<form>` blocks is left as literal text, paragraphs cannot carry an `id`
//! or `class`, and ` -- ` stays a pair of hyphens. This crate wraps a
//! renderer with text passes that fix all four.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown (file or literal text)
//!  │
//!  ├─ 1. Input     file contents, else the literal fallback, else nothing
//!  ├─ 2. URLs      prefix local ![img](..) and [link](..) targets
//!  ├─ 3. Cells     render Markdown inside <td>\n…</td>
//!  ├─ 4. Forms     render Markdown inside <form …>\n…</form>
//!  ├─ 5. Render    full document through the Markdown renderer (comrak)
//!  ├─ 6. Attrs     <p>{.class #id}\n → <p id="…" class="…">
//!  └─ 7. Dashes    " -- " → " &ndash; "
//! ```
//!
//! Every pass is a regex substitution over text, not a DOM walk. Nested or
//! unbalanced markup that does not fit a pattern is passed through untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdpost::{run, PipelineConfig, UrlPrefix};
//!
//! let config = PipelineConfig::builder()
//!     .text("{.lead}\nSee the [guide](guide.html) -- and ![logo](logo.png).")
//!     .anchor_prefix("/docs/")
//!     .image_prefix(UrlPrefix::keyed([("logo", "/static/")]))
//!     .build()
//!     .unwrap();
//!
//! let html = run(&config, None).unwrap().expect("literal text is set");
//! assert!(html.starts_with(r#"<p class="lead">"#));
//! assert!(html.contains(r#"href="/docs/guide.html""#));
//! assert!(html.contains(r#"src="/static/logo.png""#));
//! assert!(html.contains("&ndash;"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdpost` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder, PrefixRule, UrlPrefix};
pub use convert::{process_markdown, run, run_str, run_to_file, run_with, Pipeline};
pub use error::MdPostError;
pub use pipeline::input::ResolvedInput;
pub use pipeline::render::{ComrakRenderer, MarkdownRenderer};
