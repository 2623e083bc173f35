//! Per-run resolution state.
//!
//! A [`ConversionContext`] is created once at the start of a run, passed by
//! `&mut` into every rewriter, and drained at the end. It owns the options and
//! the set of texts that could not be resolved; nothing here is global.

use std::collections::HashSet;

use crate::core::dictionary::{DictionaryIndex, Lookup};
use crate::core::text::lookup_form;

/// How unresolved text is treated. Fixed for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOptions {
    /// Leave unresolved text untouched instead of using it as its own key.
    pub skip_unmatched: bool,
    /// Restrict matches to `common.*` and `<scope_prefix>.*` keys.
    pub scope_prefix: Option<String>,
}

impl ResolutionOptions {
    pub fn new(skip_unmatched: bool, scope_prefix: Option<String>) -> Self {
        let scope_prefix = scope_prefix
            .map(|prefix| prefix.trim().trim_end_matches('.').to_string())
            .filter(|prefix| !prefix.is_empty());
        Self {
            skip_unmatched,
            scope_prefix,
        }
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope_prefix.as_deref()
    }
}

/// Distinct unresolved texts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct UnmatchedSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl UnmatchedSet {
    pub fn insert(&mut self, text: &str) {
        if self.seen.insert(text.to_string()) {
            self.order.push(text.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn take(&mut self) -> Vec<String> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }
}

/// Options, dictionary and unmatched accumulator for one conversion run.
#[derive(Debug)]
pub struct ConversionContext<'a> {
    index: &'a DictionaryIndex,
    options: ResolutionOptions,
    unmatched: UnmatchedSet,
}

impl<'a> ConversionContext<'a> {
    pub fn new(index: &'a DictionaryIndex, options: ResolutionOptions) -> Self {
        Self {
            index,
            options,
            unmatched: UnmatchedSet::default(),
        }
    }

    pub fn options(&self) -> &ResolutionOptions {
        &self.options
    }

    pub fn index(&self) -> &'a DictionaryIndex {
        self.index
    }

    /// Pure lookup of already-normalized text under the active scope.
    pub fn lookup(&self, text: &str) -> Lookup<'a> {
        self.index.lookup(text, self.options.scope())
    }

    /// Resolves text to a key, recording it as unmatched when no usable key exists.
    ///
    /// Returns the selected key, or on a miss either `None` (skip mode) or the
    /// normalized text itself, which then serves as a synthetic key.
    pub fn resolve(&mut self, text: &str) -> Option<String> {
        let text = lookup_form(text).body;
        match self.lookup(text).key() {
            Some(key) => Some(key.to_string()),
            None => self.miss(text),
        }
    }

    /// Records a miss and applies the unmatched policy.
    pub(crate) fn miss(&mut self, text: &str) -> Option<String> {
        tracing::debug!(text, "no dictionary key");
        self.unmatched.insert(text);
        if self.options.skip_unmatched {
            None
        } else {
            Some(text.to_string())
        }
    }

    pub fn unmatched(&self) -> &UnmatchedSet {
        &self.unmatched
    }

    /// Hands over the unmatched texts collected so far and empties the set.
    pub fn drain_unmatched(&mut self) -> Vec<String> {
        self.unmatched.take()
    }

    pub fn reset(&mut self) {
        self.unmatched.take();
    }
}
