//! Prefix view into a persistent trie.
//!
//! This module provides the `PrefixView` type, which gives read access to the
//! part of a trie found under a key prefix, and the `Keys` iterator used to
//! list stored keys.

use std::any::Any;
use std::sync::Arc;

use crate::node::TrieNode;
use crate::Trie;

/// A lightweight view into the subtrie under a key prefix.
///
/// The view borrows the trie and the node the prefix leads to, so creating
/// it costs one walk down the prefix and nothing else.
///
/// # Examples
///
/// ```
/// use persistent_trie::Trie;
///
/// let trie = Trie::new()
///     .put("hello", 1)
///     .put("help", 2)
///     .put("world", 3);
///
/// let view = trie.view_subtrie("hel");
///
/// assert!(view.exists());
/// assert!(view.contains_key("hello"));
/// assert!(!view.contains_key("world"));
///
/// let keys: Vec<Vec<u8>> = view.keys().collect();
/// assert_eq!(keys, vec![b"hello".to_vec(), b"help".to_vec()]);
/// ```
#[derive(Debug, Clone)]
pub struct PrefixView<'a> {
    /// The source trie for this view
    trie: &'a Trie,

    /// The key prefix defining this view
    prefix: Vec<u8>,

    /// The node at the prefix, if it exists
    subtrie_node: Option<&'a Arc<TrieNode>>,
}

impl<'a> PrefixView<'a> {
    /// Creates a new prefix view for the given trie and prefix.
    pub fn new(trie: &'a Trie, prefix: Vec<u8>) -> Self {
        let subtrie_node = trie.find_node(&prefix);

        PrefixView {
            trie,
            prefix,
            subtrie_node,
        }
    }

    /// Returns the key prefix for this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the underlying trie.
    pub fn trie(&self) -> &'a Trie {
        self.trie
    }

    /// Returns whether some value is stored under the prefix.
    ///
    /// Whether the trie still keeps nodes for the prefix after its values
    /// were removed makes no difference here.
    pub fn exists(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the number of values stored under the prefix.
    pub fn len(&self) -> usize {
        self.subtrie_node.map_or(0, |node| node.subtree_size())
    }

    /// Returns whether no values are stored under the prefix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if the view contains a key.
    ///
    /// Only returns true if the key starts with the prefix and holds a value.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        key.starts_with(&self.prefix) && self.trie.contains_key(key)
    }

    /// Gets the value for a key if it is in this view and holds a `T`.
    pub fn get<T: Any>(&self, key: impl AsRef<[u8]>) -> Option<&'a T> {
        let key = key.as_ref();

        if !key.starts_with(&self.prefix) {
            return None;
        }

        self.trie.get(key)
    }

    /// Returns an iterator over the full keys stored under the prefix.
    ///
    /// Keys are yielded in byte order, each one before its extensions.
    pub fn keys(&self) -> Keys<'a> {
        Keys::new(self.subtrie_node.map(|node| node.as_ref()), self.prefix.clone())
    }
}

impl<'a> IntoIterator for &PrefixView<'a> {
    type Item = Vec<u8>;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

/// An iterator over stored keys.
///
/// Performs a depth-first walk over the shared nodes, carrying the key
/// spelled so far for every node still to visit.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    /// Nodes still to visit, with the key leading to each
    stack: Vec<(&'a TrieNode, Vec<u8>)>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(start: Option<&'a TrieNode>, prefix: Vec<u8>) -> Self {
        Keys {
            stack: start.map(|node| (node, prefix)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key)) = self.stack.pop() {
            // Push in reverse so the smallest byte is visited first
            for (byte, child) in node.children().iter().rev() {
                let mut child_key = key.clone();
                child_key.push(*byte);
                self.stack.push((child.as_ref(), child_key));
            }

            if node.is_value_node() {
                return Some(key);
            }
        }

        None
    }
}
