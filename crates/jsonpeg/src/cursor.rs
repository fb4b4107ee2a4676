//! Position tracking over an immutable input buffer.
//!
//! A [`Cursor`] pairs the input text with a single mutable byte offset. Every
//! matcher either advances the offset past what it matched or leaves it
//! untouched, so callers can backtrack by saving [`Cursor::pos`] and handing
//! it back to [`Cursor::reset`].
//!
//! Offsets are always on `char` boundaries: the single-unit matcher consumes a
//! whole `char`, and literals and patterns only ever match complete UTF-8
//! sequences.
use regex::Regex;

#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    input: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    #[must_use]
    pub fn new(input: &'src str) -> Self {
        Self { input, pos: 0 }
    }

    #[must_use]
    pub fn input(&self) -> &'src str {
        self.input
    }

    /// Current byte offset into the input.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Restores a position previously read from [`Cursor::pos`].
    pub fn reset(&mut self, pos: usize) {
        debug_assert!(pos <= self.input.len(), "cursor reset past end of input");
        debug_assert!(self.input.is_char_boundary(pos));
        self.pos = pos;
    }

    /// The unconsumed tail of the input.
    #[must_use]
    pub fn remaining(&self) -> &'src str {
        &self.input[self.pos..]
    }

    /// Matches `text` byte-for-byte at the current position.
    pub fn match_literal(&mut self, text: &str) -> Option<&'src str> {
        if self.remaining().starts_with(text) {
            let start = self.pos;
            self.pos += text.len();
            Some(&self.input[start..self.pos])
        } else {
            None
        }
    }

    /// Matches `pattern` anchored at the current position.
    ///
    /// Patterns are run against the remaining input and only a match that
    /// begins at its first byte counts, so they are written with a leading
    /// `^`. An empty match succeeds without moving.
    pub fn match_pattern(&mut self, pattern: &Regex) -> Option<&'src str> {
        let found = pattern.find(self.remaining())?;
        if found.start() != 0 {
            return None;
        }
        let start = self.pos;
        self.pos += found.end();
        Some(&self.input[start..self.pos])
    }

    /// Consumes a single `char`, failing only at end of input.
    pub fn consume_one(&mut self) -> Option<char> {
        let ch = self.remaining().chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Succeeds iff `matcher` fails here. The position is restored whatever
    /// `matcher` did.
    pub fn negative_lookahead<T>(&mut self, matcher: impl FnOnce(&mut Self) -> Option<T>) -> Option<()> {
        let start = self.pos;
        let matched = matcher(self).is_some();
        self.pos = start;
        if matched { None } else { Some(()) }
    }

    #[must_use]
    pub fn is_end_of_input(&self) -> bool {
        self.pos == self.input.len()
    }

    /// The text consumed between `start` and the current position.
    #[must_use]
    pub fn text_since(&self, start: usize) -> &'src str {
        &self.input[start..self.pos]
    }

    /// An arbitrary `[start, end)` slice of the input, if it is in range and on
    /// `char` boundaries.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Option<&'src str> {
        self.input.get(start..end)
    }
}
