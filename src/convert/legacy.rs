//! Regex-based template conversion
//!
//! Each span is rewritten with plain find/replace: holes become `" + (EXPR) + "`,
//! the result is quoted, and a cleanup pass removes empty `""` segments. Every
//! cleanup substitution runs once, left to right. Chains of empty segments are
//! therefore not always fully collapsed: `${x}` on its own stays `"" + (x) + ""`.
//!
//! Multi-line output gets two more substitutions: `"` + `(` collapses to a bare
//! `(` and `)` + `"` is respaced to `) + "`. The first one swallows the closing
//! quote of the literal before a hole, so `Rubric:\n${rubric}` followed by another
//! line becomes `"Rubric:\n(rubric) + "\n"`. Converted files depend on this exact
//! output; [`super::scanner`] is the strategy that keeps literals balanced.

use crate::span::{find_spans, HOLE};
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

/// `"` + `""`: a literal followed by an empty one
static LEADING_EMPTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""\s*\+\s*"""#).expect("cleanup pattern is valid"));

/// `""` + `"`: an empty literal followed by a literal
static TRAILING_EMPTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"""\s*\+\s*""#).expect("cleanup pattern is valid"));

/// `"` + `(`: replaced by a bare `(`
static OPEN_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""\s*\+\s*\("#).expect("cleanup pattern is valid"));

static CLOSE_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\)\s*\+\s*""#).expect("cleanup pattern is valid"));

/// Convert the content of one template span into a quoted-string expression.
///
/// Content without a newline becomes a single literal, possibly with spliced
/// holes. Content with newlines becomes one `"<line>\n"` segment per non-blank
/// line, joined with ` +`, a line break, and `join_indent`.
pub fn convert_span(content: &str, join_indent: &str) -> String {
    if content.contains('\n') {
        convert_multiline(content, join_indent)
    } else {
        convert_single_line(content)
    }
}

/// Rewrite every template span in `text`. Returns the new text and the number of
/// spans converted.
pub fn convert_text(text: &str, join_indent: &str) -> (String, usize) {
    let spans = find_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for span in &spans {
        out.push_str(&text[last..span.range.start]);
        let converted = convert_span(span.content, join_indent);
        tracing::debug!(
            start = span.range.start,
            holes = span.holes().len(),
            multiline = span.is_multiline(),
            "converted template span"
        );
        out.push_str(&converted);
        last = span.range.end;
    }
    out.push_str(&text[last..]);

    (out, spans.len())
}

fn convert_single_line(content: &str) -> String {
    let quoted = format!("\"{}\"", splice_holes(content));
    elide_empty_segments(&quoted)
}

fn convert_multiline(content: &str, join_indent: &str) -> String {
    let segments: Vec<String> = content
        .split('\n')
        .map(splice_holes)
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("\"{}\\n\"", line))
        .collect();

    if segments.is_empty() {
        return "\"\"".to_string();
    }

    let joined = segments.join(&format!(" +\n{}", join_indent));
    collapse_paren_joins(&elide_empty_segments(&joined))
}

fn splice_holes(line: &str) -> String {
    HOLE.replace_all(line, |caps: &Captures| format!("\" + ({}) + \"", &caps[1]))
        .into_owned()
}

fn elide_empty_segments(text: &str) -> String {
    let text = LEADING_EMPTY.replace_all(text, NoExpand("\""));
    TRAILING_EMPTY
        .replace_all(&text, NoExpand("\""))
        .into_owned()
}

fn collapse_paren_joins(text: &str) -> String {
    let text = OPEN_PAREN.replace_all(text, NoExpand("("));
    CLOSE_PAREN
        .replace_all(&text, NoExpand(") + \""))
        .into_owned()
}
