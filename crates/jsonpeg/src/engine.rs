//! The packrat rule engine.
//!
//! A [`Grammar`] names its rules with a small `Copy` tag and supplies one
//! body function that dispatches on that tag. Bodies never call each other
//! directly: they go through [`Parser::apply`], which memoizes every
//! `(rule, args, position)` attempt, detects left recursion and grows
//! left-recursive matches to their full extent.
//!
//! Bodies are written as ordinary Rust over `Option`: a primitive or a nested
//! rule that fails yields `None`, `?` propagates it, and [`Parser::attempt`],
//! [`Parser::choice`] and [`Parser::repeat`] put the cursor back wherever a
//! failed branch left it.
//!
//! # Left recursion
//!
//! When a rule re-enters itself at the same position before the outer call
//! has returned, the inner call fails and marks the in-progress memo entry.
//! The outer call then finishes with whatever non-recursive alternative
//! matched (the seed) and re-runs its body from the same start position
//! while the memo entry holds the best result so far, so each recursive call
//! sees the previous, shorter match. Growing stops as soon as a run fails or
//! ends no further right than the best result.
use core::{fmt, hash::Hash};

use regex::Regex;
use tracing::{trace, warn};

use crate::{
    cursor::Cursor,
    failure::FailureState,
    memo::{MemoKey, MemoStore, Outcome},
};

/// Default limit on nested rule invocations.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A set of rules the engine can apply.
pub trait Grammar: Sized {
    /// Names one rule.
    type Rule: Copy + Eq + Hash + fmt::Debug;
    /// Argument type for parameterized rules.
    type Arg: Clone + Eq + Hash + fmt::Debug;
    /// What a successful rule produces.
    type Value: Clone;

    /// Runs the body of `rule` at the parser's current position.
    ///
    /// Bodies may leave the cursor anywhere when they fail; [`Parser::apply`]
    /// restores it.
    fn body(parser: &mut Parser<'_, Self>, rule: Self::Rule, args: &[Self::Arg]) -> Option<Self::Value>;
}

/// One alternative of an ordered choice.
pub type Alternative<'src, G> = fn(&mut Parser<'src, G>) -> Option<<G as Grammar>::Value>;

/// One parse of one input. Owns the cursor, memo table and failure state, so
/// a fresh `Parser` is needed for every input.
pub struct Parser<'src, G: Grammar> {
    grammar: G,
    cursor: Cursor<'src>,
    memo: MemoStore<G::Rule, G::Arg, G::Value>,
    failure: FailureState<G::Rule>,
    depth: usize,
    max_depth: usize,
    halted_at: Option<usize>,
}

impl<'src, G: Grammar> Parser<'src, G> {
    #[must_use]
    pub fn new(grammar: G, input: &'src str) -> Self {
        Self {
            grammar,
            cursor: Cursor::new(input),
            memo: MemoStore::new(),
            failure: FailureState::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            halted_at: None,
        }
    }

    /// Caps how deeply rule invocations may nest. Hitting the cap halts the
    /// parse: the offending call and every later one fails.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    #[must_use]
    pub fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    #[must_use]
    pub fn memo(&self) -> &MemoStore<G::Rule, G::Arg, G::Value> {
        &self.memo
    }

    #[must_use]
    pub fn failure(&self) -> &FailureState<G::Rule> {
        &self.failure
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether the depth limit cut this parse short.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    /// Where the depth limit was hit, if it was.
    #[must_use]
    pub fn halted_at(&self) -> Option<usize> {
        self.halted_at
    }

    #[must_use]
    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    /// Applies a rule that takes no arguments.
    pub fn apply(&mut self, rule: G::Rule) -> Option<G::Value> {
        self.apply_with_args(rule, &[])
    }

    /// Applies `rule` at the current position through the memo table.
    ///
    /// On success the cursor sits at the end of the match. On failure it is
    /// back at the start and the failure tracker has seen `(rule, start)`.
    pub fn apply_with_args(&mut self, rule: G::Rule, args: &[G::Arg]) -> Option<G::Value> {
        if self.is_halted() {
            return None;
        }

        let start = self.cursor.pos();
        let key = MemoKey::new(rule, args, start);

        if let Some(entry) = self.memo.lookup_mut(&key) {
            entry.touch();
            return match entry.outcome_mut() {
                Outcome::InProgress { left_recursive } => {
                    if !*left_recursive {
                        trace!(?rule, pos = start, "left recursion detected");
                    }
                    *left_recursive = true;
                    None
                }
                Outcome::Failed => None,
                Outcome::Succeeded { end, value } => {
                    let value = value.clone();
                    self.cursor.reset(*end);
                    Some(value)
                }
            };
        }

        if self.depth >= self.max_depth {
            warn!(?rule, pos = start, limit = self.max_depth, "rule nesting limit reached, abandoning parse");
            self.halted_at = Some(start);
            self.failure.record(rule, start);
            return None;
        }

        self.memo.begin_attempt(key.clone());
        self.depth += 1;
        let result = G::body(self, rule, args);
        self.depth -= 1;

        let resolved = result.as_ref().map(|value| (self.cursor.pos(), value.clone()));
        let left_recursive = self.memo.resolve(&key, resolved);

        match result {
            None => {
                self.cursor.reset(start);
                self.failure.record(rule, start);
                None
            }
            Some(seed) if left_recursive && !self.is_halted() => Some(self.grow(&key, seed)),
            Some(value) => Some(value),
        }
    }

    /// Re-runs a left-recursive rule from its start position until a run
    /// stops advancing, returning the longest match.
    fn grow(&mut self, key: &MemoKey<G::Rule, G::Arg>, seed: G::Value) -> G::Value {
        let mut best_end = self.cursor.pos();
        let mut best = seed;

        loop {
            self.cursor.reset(key.pos);
            self.depth += 1;
            let attempt = G::body(self, key.rule, &key.args);
            self.depth -= 1;

            let Some(value) = attempt else { break };
            let end = self.cursor.pos();
            if end <= best_end {
                break;
            }

            trace!(rule = ?key.rule, start = key.pos, from = best_end, to = end, "grew left-recursive match");
            self.memo.resolve(key, Some((end, value.clone())));
            best_end = end;
            best = value;
        }

        self.cursor.reset(best_end);
        best
    }

    /// Moves back to the start of the input so another rule can be applied
    /// there. Memoized results stay valid since the input is unchanged.
    pub fn rewind(&mut self) {
        self.cursor.reset(0);
    }

    /// Runs a sequence, restoring the cursor if it fails.
    pub fn attempt<T>(&mut self, sequence: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.cursor.pos();
        let result = sequence(self);
        if result.is_none() {
            self.cursor.reset(checkpoint);
        }
        result
    }

    /// Ordered choice: the first alternative that succeeds wins and later
    /// ones are never tried.
    pub fn choice(&mut self, alternatives: &[Alternative<'src, G>]) -> Option<G::Value> {
        alternatives
            .iter()
            .find_map(|alternative| self.attempt(*alternative))
    }

    /// Zero or more repetitions. Stops at the first failing iteration, or
    /// after one that matched without consuming anything.
    pub fn repeat<T>(&mut self, mut item: impl FnMut(&mut Self) -> Option<T>) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let before = self.cursor.pos();
            let Some(next) = self.attempt(&mut item) else {
                break;
            };
            items.push(next);
            if self.cursor.pos() == before {
                break;
            }
        }
        items
    }

    pub fn literal(&mut self, text: &str) -> Option<&'src str> {
        self.cursor.match_literal(text)
    }

    pub fn pattern(&mut self, pattern: &Regex) -> Option<&'src str> {
        self.cursor.match_pattern(pattern)
    }

    /// Consumes any single `char`.
    pub fn any(&mut self) -> Option<char> {
        self.cursor.consume_one()
    }

    /// Succeeds, consuming nothing, iff `matcher` fails here.
    pub fn not_ahead<T>(&mut self, matcher: impl FnOnce(&mut Self) -> Option<T>) -> Option<()> {
        let start = self.cursor.pos();
        let matched = matcher(self).is_some();
        self.cursor.reset(start);
        if matched { None } else { Some(()) }
    }

    #[must_use]
    pub fn at_end(&self) -> Option<()> {
        self.cursor.is_end_of_input().then_some(())
    }

    #[must_use]
    pub fn text_since(&self, start: usize) -> &'src str {
        self.cursor.text_since(start)
    }

    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Option<&'src str> {
        self.cursor.slice(start, end)
    }
}
