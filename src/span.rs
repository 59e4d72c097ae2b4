//! Template span discovery
//!
//! A template span is the text between a backtick and the next backtick. Matching is
//! not nesting-aware: the first closing backtick ends the span, so a template that
//! contains a literal (escaped) backtick is cut short at that backtick.
//!
//! Interpolation holes are found the same way: `${` up to the next `}`, with no
//! brace counting.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Backtick-delimited span. The character class admits newlines.
static SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]*)`").expect("span pattern is valid"));

/// `${EXPR}` where EXPR is at least one character and stops at the first `}`.
pub(crate) static HOLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("hole pattern is valid"));

/// A backtick-delimited substring of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpan<'a> {
    /// Byte range of the span in the source, backticks included
    pub range: Range<usize>,
    /// Raw text between the backticks
    pub content: &'a str,
}

impl<'a> TemplateSpan<'a> {
    pub fn is_multiline(&self) -> bool {
        self.content.contains('\n')
    }

    /// The content split on `\n`. A trailing newline yields a final empty line.
    pub fn lines(&self) -> Vec<&'a str> {
        self.content.split('\n').collect()
    }

    pub fn holes(&self) -> Vec<InterpolationHole<'a>> {
        find_holes(self.content)
    }
}

/// An `${...}` expression inside a template span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationHole<'a> {
    /// Byte range of `${...}` within the span content
    pub range: Range<usize>,
    /// Text between `${` and `}`
    pub expr: &'a str,
}

/// Find every template span in `text`, in source order.
pub fn find_spans(text: &str) -> Vec<TemplateSpan<'_>> {
    SPAN.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let content = caps.get(1)?;
            Some(TemplateSpan {
                range: whole.range(),
                content: content.as_str(),
            })
        })
        .collect()
}

/// Find every interpolation hole in a span's content, in order.
pub fn find_holes(content: &str) -> Vec<InterpolationHole<'_>> {
    HOLE.captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let expr = caps.get(1)?;
            Some(InterpolationHole {
                range: whole.range(),
                expr: expr.as_str(),
            })
        })
        .collect()
}
