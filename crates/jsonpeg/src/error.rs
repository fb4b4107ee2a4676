use thiserror::Error;

use crate::grammar::Rule;

/// A parse that did not produce a value.
///
/// `position` is the byte offset of the furthest failure; `line` and
/// `column` locate it for humans (both 1-based, the column counted in
/// `char`s).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// The rule that failed furthest into the input, for syntax errors.
    #[must_use]
    pub fn rule(&self) -> Option<Rule> {
        match self.kind {
            ErrorKind::Syntax { rule, .. } => Some(rule),
            ErrorKind::DepthLimitExceeded(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("failed rule '{rule}', got {}", describe_found(.found))]
    Syntax { rule: Rule, found: Option<char> },
    #[error("rule nesting exceeded the limit of {0}")]
    DepthLimitExceeded(usize),
}

#[allow(clippy::ref_option)]
pub(crate) fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("{c:?}"),
        None => "end of input".to_owned(),
    }
}
