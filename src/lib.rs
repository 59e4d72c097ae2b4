//! # detemplate
//!
//! Rewrites JavaScript template literals (`` `Hi ${name}!` ``) into double-quoted
//! string concatenation (`"Hi " + (name) + "!"`).
//!
//! The conversion is textual. Nothing here builds a syntax tree of the surrounding
//! code and nothing checks that the output still parses.
//!
//! - [`span`]: locating template spans and interpolation holes
//! - [`convert`]: span and text conversion, with a regex and a scanner strategy
//! - [`file`]: read, convert, and write one file
//! - [`runner`]: convert a list of files, stopping at the first failure

pub mod convert;
pub mod file;
pub mod runner;
pub mod span;

pub use convert::{Conversion, Converter, Strategy};
pub use file::{convert_file, FileAccessError, OutputMode};
pub use runner::{RunReport, Runner, COMPLETION_MESSAGE};
