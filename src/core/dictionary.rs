//! Dictionary index: normalized text -> candidate translation keys.
//!
//! The nested translation data is flattened once per run. Several keys may carry
//! the same text (for example `common.save` and `user.form.save`), so each text
//! maps to a [`KeyGroup`] and [`DictionaryIndex::lookup`] picks one key with a
//! fixed priority:
//!
//! 1. a `common.*` key,
//! 2. a key under the active scope prefix,
//! 3. the first key seen while flattening.

use std::collections::HashMap;

use serde_json::Value;

use crate::core::text::lookup_form;

/// Prefix of shared vocabulary keys. These win regardless of scope.
pub const COMMON_PREFIX: &str = "common.";

/// Candidate keys for one text, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyGroup {
    Single(String),
    /// Always holds at least two distinct keys.
    Multiple(Vec<String>),
}

impl KeyGroup {
    fn push(&mut self, key: String) {
        match self {
            KeyGroup::Single(first) => {
                if *first != key {
                    *self = KeyGroup::Multiple(vec![std::mem::take(first), key]);
                }
            }
            KeyGroup::Multiple(keys) => {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }

    pub fn candidates(&self) -> &[String] {
        match self {
            KeyGroup::Single(key) => std::slice::from_ref(key),
            KeyGroup::Multiple(keys) => keys,
        }
    }

    /// Picks a key by priority: `common.*`, then scope, then first-seen.
    fn select(&self, scope: Option<&str>) -> Option<&str> {
        match self {
            KeyGroup::Single(key) => Some(key),
            KeyGroup::Multiple(keys) => keys
                .iter()
                .find(|key| key.starts_with(COMMON_PREFIX))
                .or_else(|| scope.and_then(|scope| keys.iter().find(|key| is_under(key, scope))))
                .or_else(|| keys.first())
                .map(String::as_str),
        }
    }
}

/// Checks if `key` lives directly under `scope` (`pda` matches `pda.a`, not `pdax.a`).
fn is_under(key: &str, scope: &str) -> bool {
    key.strip_prefix(scope)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Checks if a key is allowed under the active scope.
///
/// With no scope every key is allowed; otherwise only `common.*` keys and keys
/// under `scope.` are.
pub fn satisfies_scope(key: &str, scope: Option<&str>) -> bool {
    match scope {
        None => true,
        Some(scope) => key.starts_with(COMMON_PREFIX) || is_under(key, scope),
    }
}

/// Outcome of a pure dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    /// No entry has this text.
    Missing,
    /// Entries exist but the selected key is outside the active scope.
    OutOfScope,
}

impl<'a> Lookup<'a> {
    pub fn key(self) -> Option<&'a str> {
        match self {
            Lookup::Found(key) => Some(key),
            Lookup::Missing | Lookup::OutOfScope => None,
        }
    }
}

/// Immutable text -> [`KeyGroup`] mapping built from nested dictionary data.
#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    entries: HashMap<String, KeyGroup>,
}

impl DictionaryIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Flattens nested dictionary data into an index.
    ///
    /// Object keys are joined with `.`; array items use their index as a path
    /// segment. Every string leaf is indexed under its normalized text with any
    /// trailing colon removed, so `"标题"` and `"标题："` share a group. Other
    /// scalars and a non-object root are ignored.
    pub fn build(dictionary: &Value) -> Self {
        let mut index = Self::empty();
        index.flatten(dictionary, String::new());
        index
    }

    fn flatten(&mut self, value: &Value, prefix: String) {
        match value {
            Value::Object(map) => {
                for (key, val) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    self.flatten(val, path);
                }
            }
            Value::Array(items) => {
                for (position, val) in items.iter().enumerate() {
                    let path = if prefix.is_empty() {
                        position.to_string()
                    } else {
                        format!("{}.{}", prefix, position)
                    };
                    self.flatten(val, path);
                }
            }
            Value::String(text) if !prefix.is_empty() => self.insert(prefix, text),
            _ => {}
        }
    }

    fn insert(&mut self, key: String, text: &str) {
        let text = lookup_form(text).body;
        if text.is_empty() {
            return;
        }
        match self.entries.get_mut(text) {
            Some(group) => group.push(key),
            None => {
                self.entries.insert(text.to_string(), KeyGroup::Single(key));
            }
        }
    }

    /// Looks up already-normalized text without recording anything.
    pub fn lookup(&self, text: &str, scope: Option<&str>) -> Lookup<'_> {
        let Some(group) = self.entries.get(text) else {
            return Lookup::Missing;
        };
        match group.select(scope) {
            Some(key) if satisfies_scope(key, scope) => Lookup::Found(key),
            Some(_) => Lookup::OutOfScope,
            None => Lookup::Missing,
        }
    }

    /// All candidate keys for a text, in first-seen order.
    pub fn keys_for(&self, text: &str) -> &[String] {
        self.entries
            .get(lookup_form(text).body)
            .map(KeyGroup::candidates)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
