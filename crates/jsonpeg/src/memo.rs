//! Per-parse memoization table.
//!
//! Entries are keyed by rule, argument tuple and start position. An entry is
//! created in the in-progress state before the rule body runs and is resolved
//! exactly once afterwards; left-recursion growing may overwrite a resolved
//! success with a longer one. Nothing is ever removed while a parse is live,
//! and each new input starts from an empty store.
use std::{collections::HashMap, hash::Hash};

/// Identifies one memoized attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey<R, A> {
    pub rule: R,
    pub args: Box<[A]>,
    pub pos: usize,
}

impl<R, A: Clone> MemoKey<R, A> {
    #[must_use]
    pub fn new(rule: R, args: &[A], pos: usize) -> Self {
        Self {
            rule,
            args: args.into(),
            pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<V> {
    /// The body is still running. `left_recursive` is set when a nested call
    /// re-entered the same key.
    InProgress { left_recursive: bool },
    Failed,
    Succeeded { end: usize, value: V },
}

#[derive(Debug, Clone)]
pub struct MemoEntry<V> {
    outcome: Outcome<V>,
    uses: usize,
}

impl<V> MemoEntry<V> {
    fn in_progress() -> Self {
        Self {
            outcome: Outcome::InProgress {
                left_recursive: false,
            },
            uses: 1,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome<V> {
        &self.outcome
    }

    pub(crate) fn outcome_mut(&mut self) -> &mut Outcome<V> {
        &mut self.outcome
    }

    /// How many times this key has been requested, the first call included.
    #[must_use]
    pub fn uses(&self) -> usize {
        self.uses
    }

    pub(crate) fn touch(&mut self) {
        self.uses += 1;
    }
}

#[derive(Debug)]
pub struct MemoStore<R, A, V> {
    entries: HashMap<MemoKey<R, A>, MemoEntry<V>>,
}

impl<R, A, V> Default for MemoStore<R, A, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<R, A, V> MemoStore<R, A, V>
where
    R: Eq + Hash,
    A: Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lookup(&self, key: &MemoKey<R, A>) -> Option<&MemoEntry<V>> {
        self.entries.get(key)
    }

    pub fn lookup_mut(&mut self, key: &MemoKey<R, A>) -> Option<&mut MemoEntry<V>> {
        self.entries.get_mut(key)
    }

    /// Stores a fresh in-progress entry under `key`. The caller must follow
    /// up with [`MemoStore::resolve`].
    pub fn begin_attempt(&mut self, key: MemoKey<R, A>) -> &mut MemoEntry<V> {
        self.entries
            .entry(key)
            .insert_entry(MemoEntry::in_progress())
            .into_mut()
    }

    /// Records the final result for `key`: `Some((end, value))` on success,
    /// `None` on failure.
    ///
    /// Returns whether the entry was in progress with its left-recursion
    /// marker set. Resolving an unknown key inserts it.
    pub fn resolve(&mut self, key: &MemoKey<R, A>, result: Option<(usize, V)>) -> bool
    where
        R: Clone,
        A: Clone,
    {
        let outcome = match result {
            Some((end, value)) => Outcome::Succeeded { end, value },
            None => Outcome::Failed,
        };
        match self.entries.get_mut(key) {
            Some(entry) => {
                let previous = core::mem::replace(&mut entry.outcome, outcome);
                matches!(
                    previous,
                    Outcome::InProgress {
                        left_recursive: true
                    }
                )
            }
            None => {
                self.entries.insert(key.clone(), MemoEntry { outcome, uses: 1 });
                false
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Store = MemoStore<&'static str, u8, i32>;

    #[test]
    fn begin_then_resolve_success() {
        let mut store = Store::new();
        let key = MemoKey::new("num", &[], 3);

        let entry = store.begin_attempt(key.clone());
        assert_eq!(
            entry.outcome(),
            &Outcome::InProgress {
                left_recursive: false
            }
        );

        assert!(!store.resolve(&key, Some((5, 42))));
        let entry = store.lookup(&key).unwrap();
        assert_eq!(entry.outcome(), &Outcome::Succeeded { end: 5, value: 42 });
        assert_eq!(entry.uses(), 1);
    }

    #[test]
    fn resolve_reports_left_recursion_marker() {
        let mut store = Store::new();
        let key = MemoKey::new("expr", &[], 0);
        store.begin_attempt(key.clone());

        if let Outcome::InProgress { left_recursive } = store.lookup_mut(&key).unwrap().outcome_mut() {
            *left_recursive = true;
        }

        assert!(store.resolve(&key, Some((1, 1))));
        // A second resolve (as during growing) no longer sees the marker.
        assert!(!store.resolve(&key, Some((3, 3))));
        assert_eq!(
            store.lookup(&key).unwrap().outcome(),
            &Outcome::Succeeded { end: 3, value: 3 }
        );
    }

    #[test]
    fn keys_distinguish_args_and_positions() {
        let mut store = Store::new();
        store.resolve(&MemoKey::new("list", &[b','], 0), None);
        store.resolve(&MemoKey::new("list", &[b';'], 0), Some((2, 7)));
        store.resolve(&MemoKey::new("list", &[b','], 1), Some((2, 8)));

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.lookup(&MemoKey::new("list", &[b','], 0)).unwrap().outcome(),
            &Outcome::Failed
        );
        assert!(store.lookup(&MemoKey::new("list", &[], 0)).is_none());
    }

    #[test]
    fn touch_counts_reuse() {
        let mut store = Store::new();
        let key = MemoKey::new("value", &[], 0);
        store.begin_attempt(key.clone());
        store.resolve(&key, None);
        store.lookup_mut(&key).unwrap().touch();
        store.lookup_mut(&key).unwrap().touch();
        assert_eq!(store.lookup(&key).unwrap().uses(), 3);
    }
}
