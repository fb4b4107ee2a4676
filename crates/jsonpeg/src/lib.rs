//! A JSON parser built on a packrat PEG engine.
//!
//! Every rule application is memoized by rule and position, which keeps
//! backtracking linear, and directly left-recursive rules are grown from a
//! seed match instead of looping forever. The engine in [`engine`] is generic
//! over any [`Grammar`]; the JSON rules live in [`grammar`].
//!
//! ```rust
//! let value = jsonpeg::parse(r#"{"a": [1, 2.5, "x"]}"#, false).unwrap();
//! assert_eq!(value.get("a").unwrap().as_array().unwrap().len(), 3);
//!
//! // Strict mode only accepts an object or array at the top level.
//! assert!(jsonpeg::parse("42", true).is_err());
//! ```

#![allow(missing_docs)]

pub mod cursor;
pub mod diagnostics;
pub mod engine;
mod error;
pub mod escape;
pub mod failure;
pub mod grammar;
pub mod memo;
pub mod node;
pub mod number;
mod options;
mod value;

#[cfg(test)]
mod tests;

pub use engine::{Grammar, Parser};
pub use error::{ErrorKind, ParseError};
pub use grammar::{Capture, JsonParser, Rule};
pub use node::{Node, Shared};
pub use options::{EscapeSyntax, ParserOptions};
pub use value::{Array, Map, Number, Value};

/// Parses a complete JSON document with default options, optionally in
/// strict mode.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the furthest point the parse reached.
pub fn parse(text: &str, strict: bool) -> Result<Value, ParseError> {
    parse_with_options(
        text,
        ParserOptions {
            strict,
            ..ParserOptions::default()
        },
    )
}

/// Parses a complete JSON document.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the furthest point the parse reached.
pub fn parse_with_options(text: &str, options: ParserOptions) -> Result<Value, ParseError> {
    JsonParser::new(text, options).parse()
}
