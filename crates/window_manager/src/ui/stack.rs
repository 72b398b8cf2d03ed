//! Window stack
//!
//! Ordered bottom-to-top list of open or suspended windows. A name appears at
//! most once. Every background entry starts a group: the foreground entries
//! after it, up to the next background entry, are its children.
//!
//! The stack does not know which entries are backgrounds; callers pass an
//! `is_background` predicate so the rules can be exercised with plain keys.

use super::record::WindowKey;
use std::ops::Range;

/// Ordered record of open and suspended windows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStack<K = WindowKey> {
    entries: Vec<K>,
}

impl<K> Default for WindowStack<K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: Copy + PartialEq> WindowStack<K> {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries bottom to top
    pub fn as_slice(&self) -> &[K] {
        &self.entries
    }

    /// Iterate entries bottom to top
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = K> + '_ {
        self.entries.iter().copied()
    }

    /// Topmost entry
    pub fn top(&self) -> Option<K> {
        self.entries.last().copied()
    }

    /// Index of an entry
    pub fn position(&self, key: K) -> Option<usize> {
        self.entries.iter().position(|entry| *entry == key)
    }

    /// Whether the key is on the stack
    pub fn contains(&self, key: K) -> bool {
        self.position(key).is_some()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Move `key` to the top, removing any earlier occurrence
    pub fn push(&mut self, key: K) {
        self.remove(key);
        self.entries.push(key);
    }

    /// Remove `key`, returning the index it had
    pub fn remove(&mut self, key: K) -> Option<usize> {
        let index = self.position(key)?;
        self.entries.remove(index);
        Some(index)
    }

    /// Index of the first background entry after `index`
    pub fn next_background_after(&self, index: usize, is_background: impl Fn(K) -> bool) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, entry)| is_background(**entry))
            .map(|(i, _)| i)
    }

    /// Nearest background entry below `index`
    pub fn previous_background_before(&self, index: usize, is_background: impl Fn(K) -> bool) -> Option<K> {
        self.entries[..index.min(self.entries.len())]
            .iter()
            .rev()
            .copied()
            .find(|entry| is_background(*entry))
    }

    /// Topmost background entry
    pub fn current_background(&self, is_background: impl Fn(K) -> bool) -> Option<K> {
        self.entries.iter().rev().copied().find(|entry| is_background(*entry))
    }

    /// Range of the children of the entry at `index`
    pub fn children_range(&self, index: usize, is_background: impl Fn(K) -> bool) -> Range<usize> {
        let end = self
            .next_background_after(index, is_background)
            .unwrap_or(self.entries.len());
        (index + 1).min(end)..end
    }

    /// Detach the group a background window is about to leave
    ///
    /// If `key` is on the stack, it is removed together with its children.
    /// Otherwise the children of the current topmost background are detached,
    /// since the new background will sit on top of them. Entries below every
    /// background belong to no group and are never detached.
    ///
    /// Returns the detached children in their original order.
    pub fn take_group(&mut self, key: K, is_background: impl Fn(K) -> bool) -> Vec<K> {
        let (anchor, owned) = match self.position(key) {
            Some(index) => (index, true),
            None => {
                let Some(index) = self.entries.iter().rposition(|entry| is_background(*entry)) else {
                    return Vec::new();
                };
                (index, false)
            }
        };

        let range = self.children_range(anchor, is_background);
        let children: Vec<K> = self.entries.drain(range).collect();
        if owned {
            self.entries.remove(anchor);
        }
        children
    }

    /// Remove the entry at `index`; a background entry takes its children along
    ///
    /// Returns the removed children.
    pub fn remove_with_children(&mut self, index: usize, is_background: impl Fn(K) -> bool) -> Vec<K> {
        if index >= self.entries.len() {
            return Vec::new();
        }

        let children = if is_background(self.entries[index]) {
            let range = self.children_range(index, is_background);
            self.entries.drain(range).collect()
        } else {
            Vec::new()
        };
        self.entries.remove(index);
        children
    }
}
