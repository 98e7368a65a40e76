//! Re-rendering of Markdown embedded in raw HTML blocks.
//!
//! A Markdown renderer treats `<table>` and `<form>` blocks as opaque HTML:
//! whatever Markdown sits inside a `<td>` or a form body comes out as
//! literal asterisks and brackets. These passes run on the source before the
//! full-document render, render just the inner text, and splice the result
//! back between the original tags. The final render then passes the already
//! converted block through verbatim.
//!
//! Only the `<td>\n...</td>` and `<form ...>\n...</form>` shapes are
//! recognised: the opening tag must be followed by a newline. Anything else
//! (inline cells, unclosed tags) is left as it is.
//!
//! The final render follows CommonMark HTML block rules: a block that opens
//! with `<table>` or `<form>` runs until the next blank line. Markdown placed
//! directly after `</form>` or `</table>` with no blank line in between is
//! part of that HTML block and comes out as raw text. Leave a blank line
//! after the closing tag.

use crate::pipeline::render::MarkdownRenderer;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

// ── Table cells ─────────────────────────────────────────────────────────────

static RE_TABLE_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<td>\n(.*?)</td>").unwrap());

/// Render the Markdown inside every multi-line `<td>` cell.
pub fn render_table_cells(input: &str, renderer: &dyn MarkdownRenderer) -> String {
    let mut cells = 0usize;
    let result = RE_TABLE_CELL.replace_all(input, |caps: &Captures<'_>| {
        cells += 1;
        format!("<td>{}</td>", renderer.render(&caps[1]))
    });
    if cells > 0 {
        debug!("Re-rendered {} table cell(s)", cells);
    }
    result.into_owned()
}

// ── Form bodies ─────────────────────────────────────────────────────────────

static RE_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<form(.*?)>\n(.*?)</form>").unwrap());

/// Render the Markdown inside every `<form>` whose body starts on a new line.
///
/// The attributes of the opening tag are copied through unchanged.
pub fn render_form_bodies(input: &str, renderer: &dyn MarkdownRenderer) -> String {
    let mut forms = 0usize;
    let result = RE_FORM.replace_all(input, |caps: &Captures<'_>| {
        forms += 1;
        format!("<form{}>{}</form>", &caps[1], renderer.render(&caps[2]))
    });
    if forms > 0 {
        debug!("Re-rendered {} form(s)", forms);
    }
    result.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::ComrakRenderer;

    /// Wraps its input so splices are easy to see.
    fn bracket(s: &str) -> String {
        format!("[{}]", s.trim_end())
    }

    #[test]
    fn test_table_cell_splice() {
        let input = "<tr>\n<td>\n*em*\n</td>\n</tr>";
        assert_eq!(
            render_table_cells(input, &bracket),
            "<tr>\n<td>[*em*]</td>\n</tr>"
        );
    }

    #[test]
    fn test_table_cell_with_comrak() {
        let html = render_table_cells("<td>\n*em*\n</td>", &ComrakRenderer::new());
        assert!(html.starts_with("<td>"), "got: {html}");
        assert!(html.contains("<em>em</em>"), "got: {html}");
        assert!(html.ends_with("</td>"), "got: {html}");
        assert!(!html.contains('*'), "got: {html}");
    }

    #[test]
    fn test_multiple_cells_single_pass() {
        let input = "<td>\na\n</td><td>\nb\n</td>";
        assert_eq!(render_table_cells(input, &bracket), "<td>[a]</td><td>[b]</td>");
    }

    #[test]
    fn test_multiline_cell_content() {
        let input = "<td>\n- one\n- two\n</td>";
        assert_eq!(
            render_table_cells(input, &bracket),
            "<td>[- one\n- two]</td>"
        );
    }

    #[test]
    fn test_inline_cell_untouched() {
        let input = "<td>*em*</td>";
        assert_eq!(render_table_cells(input, &bracket), input);
    }

    #[test]
    fn test_unclosed_cell_untouched() {
        let input = "<td>\n*em*\n<tr>";
        assert_eq!(render_table_cells(input, &bracket), input);
    }

    #[test]
    fn test_form_keeps_attributes() {
        let input = r#"<form action="/send" method="post">
**Name**
</form>"#;
        assert_eq!(
            render_form_bodies(input, &bracket),
            r#"<form action="/send" method="post">[**Name**]</form>"#
        );
    }

    #[test]
    fn test_form_without_attributes() {
        assert_eq!(
            render_form_bodies("<form>\nx\n</form>", &bracket),
            "<form>[x]</form>"
        );
    }

    #[test]
    fn test_text_after_form_needs_blank_line() {
        let renderer = ComrakRenderer::new();

        let joined = render_form_bodies("<form>\nx\n</form>\nNext *para*\n", &renderer);
        let html = renderer.render(&joined);
        assert!(html.contains("Next *para*"), "got: {html}");

        let separated = render_form_bodies("<form>\nx\n</form>\n\nNext *para*\n", &renderer);
        let html = renderer.render(&separated);
        assert!(html.contains("<p>Next <em>para</em></p>"), "got: {html}");
    }

    #[test]
    fn test_form_with_comrak() {
        let html = render_form_bodies(
            "<form class=\"contact\">\n*Required*\n</form>",
            &ComrakRenderer::new(),
        );
        assert!(html.starts_with("<form class=\"contact\">"), "got: {html}");
        assert!(html.contains("<em>Required</em>"), "got: {html}");
        assert!(html.ends_with("</form>"), "got: {html}");
    }

    #[test]
    fn test_no_blocks_is_noop() {
        let input = "# Title\n\nText with <b>html</b>.";
        assert_eq!(render_table_cells(input, &bracket), input);
        assert_eq!(render_form_bodies(input, &bracket), input);
    }
}
