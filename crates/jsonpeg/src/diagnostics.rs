//! Human-readable locations and excerpts for parse failures.
use bstr::ByteSlice;

use crate::{
    error::{ErrorKind, ParseError, describe_found},
    options::ParserOptions,
};

/// A 1-based line and column. Columns count `char`s, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// Clamps `offset` into `text` and moves it back onto a char boundary.
fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Locates a byte offset. Lines are split on `\n`.
#[must_use]
pub fn locate(text: &str, offset: usize) -> Location {
    let offset = floor_boundary(text, offset);
    let before = &text.as_bytes()[..offset];
    let line_start = before.rfind_byte(b'\n').map_or(0, |i| i + 1);
    Location {
        line: before.find_iter("\n").count() + 1,
        column: text[line_start..offset].chars().count() + 1,
    }
}

/// The line containing `offset`, without its line terminator.
#[must_use]
pub fn line_text(text: &str, offset: usize) -> &str {
    let offset = floor_boundary(text, offset);
    let bytes = text.as_bytes();
    let start = bytes[..offset].rfind_byte(b'\n').map_or(0, |i| i + 1);
    let end = bytes[offset..].find_byte(b'\n').map_or(text.len(), |i| offset + i);
    text[start..end].trim_end_matches('\r')
}

/// The line containing `offset` with a `^` under the offending character.
#[must_use]
pub fn caret(text: &str, offset: usize) -> String {
    let Location { column, .. } = locate(text, offset);
    format!("{}\n{}^", line_text(text, offset), " ".repeat(column - 1))
}

/// A multi-line report of `error` against the text it came from.
///
/// ```text
/// On line 1, column 7:
/// Failed to match '"{" - "}" | "{" - object-body - "}"' (rule 'object')
/// Got: '}'
/// => {"a": }
///          ^
/// ```
#[must_use]
pub fn render(text: &str, error: &ParseError) -> String {
    render_with(text, error, &ParserOptions::default())
}

/// Like [`render`], showing rule definitions as `options` configure them.
#[must_use]
pub fn render_with(text: &str, error: &ParseError, options: &ParserOptions) -> String {
    let mut out = format!("On line {}, column {}:\n", error.line, error.column);
    match error.kind {
        ErrorKind::Syntax { rule, found } => {
            out.push_str(&format!(
                "Failed to match '{}' (rule '{}')\nGot: {}\n",
                rule.definition_with(options),
                rule.name(),
                describe_found(&found),
            ));
        }
        ErrorKind::DepthLimitExceeded(limit) => {
            out.push_str(&format!("Nesting exceeded the limit of {limit} rule invocations\n"));
        }
    }
    out.push_str(&format!(
        "=> {}\n{}^",
        line_text(text, error.position),
        " ".repeat(error.column + 2)
    ));
    out
}
