//! Brace-aware template conversion
//!
//! A character scanner over the source text. Outside templates every character is
//! copied. Inside a template it tracks `\` escapes and `${ ... }` brace depth, so
//! escaped backticks and object literals inside holes survive. The surrounding
//! language is not tokenized: a backtick inside an ordinary string or comment still
//! opens a template.
//!
//! Output is always a single line. Line breaks become `\n` escapes and the
//! indentation after them is dropped.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Expr(String),
}

/// Rewrite every template in `text`. Returns the new text and the number of
/// templates converted. An unterminated template is left as-is.
pub fn convert_text(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut spans = 0;
    let mut rest = text;

    while let Some(open) = rest.find('`') {
        out.push_str(&rest[..open]);
        let body = &rest[open + 1..];
        match scan_template(body) {
            Some((segments, consumed)) => {
                out.push_str(&render(&segments));
                spans += 1;
                rest = &body[consumed..];
            }
            None => {
                tracing::debug!("unterminated template, copying verbatim");
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    (out, spans)
}

/// Convert the content of a single template (without the backticks).
pub fn convert_span(content: &str) -> String {
    let mut body = String::with_capacity(content.len() + 1);
    body.push_str(content);
    body.push('`');
    match scan_template(&body) {
        Some((segments, _)) => render(&segments),
        None => "\"\"".to_string(),
    }
}

/// Scan from just after an opening backtick. Returns the segments and the number of
/// bytes consumed, closing backtick included, or `None` if input ends first.
fn scan_template(src: &str) -> Option<(Vec<Segment>, usize)> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = src.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '`' => {
                flush_text(&mut segments, &mut current);
                return Some((segments, idx + 1));
            }
            '\\' => match chars.next()? {
                (_, '`') => current.push('`'),
                (_, escaped) => {
                    current.push('\\');
                    current.push(escaped);
                }
            },
            '$' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                flush_text(&mut segments, &mut current);
                segments.push(Segment::Expr(scan_hole(&mut chars)?));
            }
            '"' => current.push_str("\\\""),
            '\r' if matches!(chars.peek(), Some((_, '\n'))) => {
                chars.next();
                push_line_break(&mut current, &mut chars);
            }
            '\n' => push_line_break(&mut current, &mut chars),
            _ => current.push(c),
        }
    }

    None
}

/// Read a hole body up to the `}` that balances the opening `${`.
fn scan_hole(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    let mut expr = String::new();
    let mut depth = 1usize;

    loop {
        let (_, c) = chars.next()?;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(expr);
                }
            }
            _ => {}
        }
        expr.push(c);
    }
}

fn push_line_break(current: &mut String, chars: &mut Peekable<CharIndices<'_>>) {
    current.push_str("\\n");
    while matches!(chars.peek(), Some((_, ' ' | '\t'))) {
        chars.next();
    }
}

fn flush_text(segments: &mut Vec<Segment>, current: &mut String) {
    if !current.is_empty() {
        segments.push(Segment::Text(std::mem::take(current)));
    }
}

/// Join segments with ` + `. A leading expression gets an `""` prefix so the
/// concatenation starts from a string.
fn render(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => format!("\"{}\"", text),
            Segment::Expr(expr) => format!("({})", expr),
        })
        .collect();

    match segments.first() {
        None => "\"\"".to_string(),
        Some(Segment::Expr(_)) => format!("\"\" + {}", parts.join(" + ")),
        Some(Segment::Text(_)) => parts.join(" + "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("hello", r#""hello""#)]
    #[case::empty("", r#""""#)]
    #[case::surrounded("a${x}b", r#""a" + (x) + "b""#)]
    #[case::hole_only("${x}", r#""" + (x)"#)]
    #[case::adjacent_holes("${a}${b}", r#""" + (a) + (b)"#)]
    #[case::trailing_hole("total: ${n}", r#""total: " + (n)"#)]
    #[case::nested_braces("${ {a: 1}.a }", r#""" + ( {a: 1}.a )"#)]
    #[case::escaped_backtick(r"use \`code\`", r#""use `code`""#)]
    #[case::other_escapes_kept(r"tab\there \${not}", r#""tab\there \${not}""#)]
    #[case::double_quotes(r#"say "${x}""#, r#""say \"" + (x) + "\"""#)]
    fn single_template(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(convert_span(content), expected);
    }

    #[test]
    fn line_breaks_become_escapes_and_drop_indentation() {
        let out = convert_span("Dear ${name},\n    thanks.\n");
        assert_eq!(out, r#""Dear " + (name) + ",\nthanks.\n""#);
    }

    #[test]
    fn crlf_line_breaks_are_handled() {
        assert_eq!(convert_span("a\r\n\tb"), r#""a\nb""#);
    }

    #[test]
    fn converts_text_with_surrounding_code() {
        let (out, spans) = convert_text("const s = `Hi ${name}!`;\nlet t = `x`;");
        assert_eq!(out, "const s = \"Hi \" + (name) + \"!\";\nlet t = \"x\";");
        assert_eq!(spans, 2);
    }

    #[test]
    fn embedded_escaped_backtick_keeps_span_whole() {
        let (out, spans) = convert_text(r"x = `a \` b`;");
        assert_eq!(out, r#"x = "a ` b";"#);
        assert_eq!(spans, 1);
    }

    #[test]
    fn backtick_inside_hole_expression_does_not_close_template() {
        let (out, spans) = convert_text("`${ f(`inner`) }`");
        assert_eq!(out, "\"\" + ( f(`inner`) )");
        assert_eq!(spans, 1);
    }

    #[test]
    fn unterminated_template_is_copied_verbatim() {
        let source = "ok = `done`; broken = `never closed ${x}";
        let (out, spans) = convert_text(source);
        assert_eq!(out, "ok = \"done\"; broken = `never closed ${x}");
        assert_eq!(spans, 1);
    }

    #[test]
    fn unterminated_hole_is_copied_verbatim() {
        let (out, spans) = convert_text("x = `${a`");
        assert_eq!(out, "x = `${a`");
        assert_eq!(spans, 0);
    }

    #[test]
    fn text_without_backticks_is_unchanged() {
        let source = "const a = \"\" + b;\n";
        assert_eq!(convert_text(source), (source.to_string(), 0));
    }
}
