//! Template-literal to string-concatenation conversion
//!
//! Two strategies are available:
//!
//! - [`Strategy::Regex`] is the legacy find/replace conversion in [`legacy`]. Span and
//!   hole boundaries are the nearest backtick and the nearest `}`.
//! - [`Strategy::Scanner`] is the brace-aware character scanner in [`scanner`].
//!
//! [`Converter`] picks the strategy and carries the formatting knobs.

pub mod legacy;
pub mod scanner;

use std::fmt;
use std::str::FromStr;

/// Default whitespace placed after each ` +` line break in multi-line output.
pub const DEFAULT_JOIN_INDENT: &str = "        ";

/// How template spans are located and rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Regex,
    Scanner,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Regex => write!(f, "regex"),
            Strategy::Scanner => write!(f, "scanner"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regex" => Ok(Strategy::Regex),
            "scanner" => Ok(Strategy::Scanner),
            other => Err(format!("Unknown strategy: {}", other)),
        }
    }
}

/// Result of converting one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    /// Number of template spans rewritten
    pub spans: usize,
}

impl Conversion {
    pub fn changed(&self) -> bool {
        self.spans > 0
    }
}

/// Converts template literals in source text.
///
/// # Example
///
/// ```rust
/// use detemplate::convert::{Converter, Strategy};
///
/// let converter = Converter::new().with_strategy(Strategy::Regex);
/// let out = converter.convert("const s = `Hi ${name}!`;");
/// assert_eq!(out.text, r#"const s = "Hi " + (name) + "!";"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    strategy: Strategy,
    join_indent: String,
}

impl Converter {
    pub fn new() -> Self {
        Self {
            strategy: Strategy::default(),
            join_indent: DEFAULT_JOIN_INDENT.to_string(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the indentation used by multi-line regex output. The scanner strategy
    /// always emits single-line literals and ignores it.
    pub fn with_join_indent(mut self, indent: impl Into<String>) -> Self {
        self.join_indent = indent.into();
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn join_indent(&self) -> &str {
        &self.join_indent
    }

    /// Rewrite every template span in `text`.
    pub fn convert(&self, text: &str) -> Conversion {
        let (text, spans) = match self.strategy {
            Strategy::Regex => legacy::convert_text(text, &self.join_indent),
            Strategy::Scanner => scanner::convert_text(text),
        };
        Conversion { text, spans }
    }

    /// Convert the content of a single template span (backticks excluded).
    pub fn convert_span(&self, content: &str) -> String {
        match self.strategy {
            Strategy::Regex => legacy::convert_span(content, &self.join_indent),
            Strategy::Scanner => scanner::convert_span(content),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Strategy;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_regex_with_eight_space_indent() {
        let converter = Converter::default();
        assert_eq!(converter.strategy(), Strategy::Regex);
        assert_eq!(converter.join_indent(), "        ");
    }

    #[test]
    fn strategy_round_trips_through_names() {
        for strategy in [Strategy::Regex, Strategy::Scanner] {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert!("ast".parse::<Strategy>().is_err());
    }

    #[test]
    fn strategies_differ_on_nested_braces() {
        let source = "`${ {a: 1}.a }`";
        let regex = Converter::new().convert(source);
        let scanner = Converter::new()
            .with_strategy(Strategy::Scanner)
            .convert(source);
        assert_eq!(regex.text, r#""" + ( {a: 1) + ".a }""#);
        assert_eq!(scanner.text, r#""" + ( {a: 1}.a )"#);
    }

    #[test]
    fn converting_twice_is_a_noop() {
        let converter = Converter::new();
        let once = converter.convert("msg = `Total: ${n}\nDone`;\n");
        assert!(once.changed());
        let twice = converter.convert(&once.text);
        assert!(!twice.changed());
        assert_eq!(twice.text, once.text);
    }

    proptest! {
        #[test]
        fn plain_single_line_content_is_quoted_unchanged(content in "[a-zA-Z0-9 .,:;!?()-]*") {
            let converter = Converter::new();
            prop_assert_eq!(converter.convert_span(&content), format!("\"{}\"", content));
        }

        #[test]
        fn text_without_backticks_passes_through(text in "[^`]*") {
            for strategy in [Strategy::Regex, Strategy::Scanner] {
                let out = Converter::new().with_strategy(strategy).convert(&text);
                prop_assert_eq!(&out.text, &text);
                prop_assert_eq!(out.spans, 0);
            }
        }
    }
}
