//! Post-processing: passes over the fully rendered HTML.
//!
//! Two rules run after the Markdown renderer, in this order:
//!
//! 1. Paragraph attributes: `<p>{.class #id}\n` becomes `<p id=".." class="..">`
//! 2. Typographic dashes: ` -- ` becomes ` &ndash; `
//!
//! Both are plain text substitutions. The attribute rule depends on the
//! renderer emitting the annotation as the first line of the paragraph
//! followed by a soft line break, which is what a CommonMark renderer does
//! for:
//!
//! ```text
//! {.lead #intro}
//! First sentence of the paragraph.
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Apply both post-render rules to `input`.
///
/// `ids_as_classes` selects the legacy annotation output, see
/// [`apply_paragraph_attributes`].
pub fn finish_html(input: &str, ids_as_classes: bool) -> String {
    let s = apply_paragraph_attributes(input, ids_as_classes);
    typographic_dashes(&s)
}

// ── Rule 1: Paragraph attributes ─────────────────────────────────────────────

static RE_PARAGRAPH_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^<p>\{([.#].*)\}\n").unwrap());

/// Move a leading `{.class #id}` annotation into the paragraph's opening tag.
///
/// Tokens are separated by single spaces. `.name` adds a class, `#name` an
/// id, anything else is dropped. The annotation line and its newline are
/// removed. Paragraphs without an annotation are left untouched.
///
/// With `ids_as_classes` set, `#name` tokens are added to the class list
/// and no `id` attribute is written.
pub fn apply_paragraph_attributes(input: &str, ids_as_classes: bool) -> String {
    RE_PARAGRAPH_ANNOTATION
        .replace_all(input, |caps: &Captures<'_>| {
            let mut ids: Vec<&str> = Vec::new();
            let mut classes: Vec<&str> = Vec::new();

            for token in caps[1].split(' ') {
                if let Some(name) = token.strip_prefix('.') {
                    if !name.is_empty() {
                        classes.push(name);
                    }
                } else if let Some(name) = token.strip_prefix('#') {
                    if name.is_empty() {
                        continue;
                    }
                    if ids_as_classes {
                        classes.push(name);
                    } else {
                        ids.push(name);
                    }
                }
            }

            let mut tag = String::from("<p");
            if !ids.is_empty() {
                tag.push_str(&format!(" id=\"{}\"", ids.join(" ")));
            }
            if !classes.is_empty() {
                tag.push_str(&format!(" class=\"{}\"", classes.join(" ")));
            }
            tag.push('>');
            tag
        })
        .into_owned()
}

// ── Rule 2: Typographic dashes ───────────────────────────────────────────────

/// Replace spaced double hyphens with an en dash entity.
///
/// The third form covers a dash directly followed by a tag, where the
/// renderer has already dropped the trailing space.
pub fn typographic_dashes(input: &str) -> String {
    input
        .replace(" -- ", " &ndash; ")
        .replace(" --,", " &ndash;,")
        .replace(" --<", " &ndash; <")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_and_id() {
        let input = "<p>{.intro #lead}\nHello world</p>\n";
        assert_eq!(
            apply_paragraph_attributes(input, false),
            "<p id=\"lead\" class=\"intro\">Hello world</p>\n"
        );
    }

    #[test]
    fn test_multiple_classes() {
        let input = "<p>{.note .wide}\nBody</p>";
        assert_eq!(
            apply_paragraph_attributes(input, false),
            "<p class=\"note wide\">Body</p>"
        );
    }

    #[test]
    fn test_id_only() {
        let input = "<p>{#anchor}\nBody</p>";
        assert_eq!(
            apply_paragraph_attributes(input, false),
            "<p id=\"anchor\">Body</p>"
        );
    }

    // The historical annotator pushed `#id` tokens into the class list and
    // never wrote an `id`. Kept behind `ids_as_classes` so existing sites
    // can keep their CSS selectors; the default emits a real `id`.
    #[test]
    fn test_ids_as_classes_reproduces_legacy_output() {
        let input = "<p>{.intro #lead}\nHello world</p>\n";
        assert_eq!(
            apply_paragraph_attributes(input, true),
            "<p class=\"intro lead\">Hello world</p>\n"
        );
    }

    #[test]
    fn test_unannotated_paragraph_unchanged() {
        let input = "<p>Plain text</p>\n<p>{not an annotation}\nx</p>\n";
        assert_eq!(apply_paragraph_attributes(input, false), input);
    }

    #[test]
    fn test_annotation_must_start_line() {
        let input = "<li><p>{.x}\nitem</p></li>";
        assert_eq!(apply_paragraph_attributes(input, false), input);
    }

    #[test]
    fn test_annotation_needs_line_break() {
        let input = "<p>{.x}</p>";
        assert_eq!(apply_paragraph_attributes(input, false), input);
    }

    #[test]
    fn test_unknown_and_empty_tokens_dropped() {
        let input = "<p>{.a  plain # .}\nBody</p>";
        assert_eq!(
            apply_paragraph_attributes(input, false),
            "<p class=\"a\">Body</p>"
        );
    }

    #[test]
    fn test_every_annotated_paragraph_rewritten() {
        let input = "<p>{.a}\nOne</p>\n<p>Two</p>\n<p>{#b}\nThree</p>\n";
        assert_eq!(
            apply_paragraph_attributes(input, false),
            "<p class=\"a\">One</p>\n<p>Two</p>\n<p id=\"b\">Three</p>\n"
        );
    }

    #[test]
    fn test_spaced_dash() {
        assert_eq!(typographic_dashes("word -- word"), "word &ndash; word");
    }

    #[test]
    fn test_dash_before_comma() {
        assert_eq!(typographic_dashes("word --, next"), "word &ndash;, next");
    }

    #[test]
    fn test_dash_before_tag() {
        assert_eq!(typographic_dashes("word --<b>x</b>"), "word &ndash; <b>x</b>");
    }

    #[test]
    fn test_unspaced_dashes_untouched() {
        let input = "<!-- comment --> a--b --flag";
        assert_eq!(typographic_dashes(input), input);
    }

    #[test]
    fn test_finish_html_runs_both_rules() {
        let input = "<p>{.aside}\nBefore -- after</p>\n";
        assert_eq!(
            finish_html(input, false),
            "<p class=\"aside\">Before &ndash; after</p>\n"
        );
    }
}
