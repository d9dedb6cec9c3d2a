//! The main trie implementation.
//!
//! This module contains the `Trie` type, which provides the primary API for working
//! with the persistent trie.

use std::any::{type_name, Any};
use std::sync::Arc;

use log::trace;

use crate::node::TrieNode;
use crate::prefix_view::{Keys, PrefixView};
use crate::{Error, Result};

/// A persistent trie mapping byte-string keys to values of any type.
///
/// Every operation that would modify the trie returns a new trie instead.
/// Only the nodes on the path to the changed key are rebuilt; everything
/// hanging off that path is shared with the original through `Arc`, so old
/// and new tries stay valid side by side and can be read from any thread.
///
/// Each key holds a single value, and different keys may hold values of
/// different types. Asking for a key with the wrong type behaves exactly as
/// if the key were absent.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    /// The root node of the trie, absent when the trie holds nothing
    pub(crate) root: Option<Arc<TrieNode>>,

    /// The number of values stored in the trie
    size: usize,
}

/// What becomes of a rebuilt node on the path of a removed key.
enum Removal {
    /// The rebuilt node holds nothing and is dropped from its parent.
    Pruned,
    /// The node is replaced by a rebuilt copy.
    Replaced(Arc<TrieNode>),
}

impl Removal {
    fn of(node: TrieNode) -> Self {
        if node.is_prunable() {
            Removal::Pruned
        } else {
            Removal::Replaced(Arc::new(node))
        }
    }
}

impl Trie {
    /// Creates a new, empty trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        Trie {
            root: None,
            size: 0,
        }
    }

    /// Returns the number of values stored in the trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new();
    /// assert_eq!(trie.len(), 0);
    ///
    /// let trie = trie.put("hello", 42);
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the trie contains no values.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if both tries share the same root node.
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new().put("a", 1u8);
    /// assert!(trie.ptr_eq(&trie.remove("missing")));
    /// assert!(!trie.ptr_eq(&trie.put("a", 1u8)));
    /// ```
    pub fn ptr_eq(&self, other: &Trie) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Follows `key` from the root and returns the node it ends at.
    pub(crate) fn find_node(&self, key: &[u8]) -> Option<&Arc<TrieNode>> {
        let mut current = self.root.as_ref()?;

        for byte in key {
            current = current.child(*byte)?;
        }

        Some(current)
    }

    /// Retrieves a reference to the value stored for `key`, if it holds a `T`.
    ///
    /// Returns `None` when the key is missing, when it is only a prefix of
    /// other keys, or when the stored value is of another type.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new().put("hello", 42u32);
    ///
    /// assert_eq!(trie.get::<u32>("hello"), Some(&42));
    /// assert_eq!(trie.get::<u64>("hello"), None);
    /// assert_eq!(trie.get::<u32>("hell"), None);
    /// ```
    pub fn get<T: Any>(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        self.find_node(key.as_ref())?.value::<T>()
    }

    /// Like [`Trie::get`], but reports why a lookup failed.
    ///
    /// ```
    /// use persistent_trie::{Error, Trie};
    ///
    /// let trie = Trie::new().put("n", 5i32);
    ///
    /// assert_eq!(trie.try_get::<i32>("n"), Ok(&5));
    /// assert_eq!(trie.try_get::<i32>("m"), Err(Error::NotFound));
    /// assert!(matches!(trie.try_get::<String>("n"), Err(Error::TypeMismatch { .. })));
    /// ```
    pub fn try_get<T: Any>(&self, key: impl AsRef<[u8]>) -> Result<&T> {
        let node = self
            .find_node(key.as_ref())
            .filter(|node| node.is_value_node())
            .ok_or(Error::NotFound)?;

        node.value::<T>().ok_or(Error::TypeMismatch {
            expected: type_name::<T>(),
        })
    }

    /// Returns `true` if `key` holds a value of any type.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.find_node(key.as_ref()).map_or(false, |node| node.is_value_node())
    }

    /// Stores `value` under `key`, returning a new trie.
    ///
    /// If the key already holds a value, of any type, it is replaced in the
    /// new trie. The receiver is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie1 = Trie::new();
    /// let trie2 = trie1.put("hello", String::from("world"));
    ///
    /// assert!(trie1.is_empty());
    /// assert_eq!(trie2.get::<String>("hello").map(String::as_str), Some("world"));
    /// ```
    pub fn put<T: Any + Send + Sync>(&self, key: impl AsRef<[u8]>, value: T) -> Self {
        let key = key.as_ref();
        let mut path = self.existing_path(key).into_iter().rev();

        // The node at the end of the key becomes value-bearing, keeping its children
        let end = path.next().flatten();
        let value_replaced = end.map_or(false, |node| node.is_value_node());
        let mut new_node = Arc::new(Self::shallow_copy(end).into_value(Arc::new(value)));

        // Missing nodes on the way up become fresh plain nodes
        for (&byte, node) in key.iter().rev().zip(path) {
            let mut copy = Self::shallow_copy(node);
            copy.set_child(byte, new_node);
            new_node = Arc::new(copy);
        }
        trace!("put key \"{}\" (replaced: {})", key.escape_ascii(), value_replaced);

        let new_size = if value_replaced { self.size } else { self.size + 1 };

        Trie {
            root: Some(new_node),
            size: new_size,
        }
    }

    /// Removes the value stored under `key`, returning a new trie.
    ///
    /// Keys that extend past `key` are kept. If `key` holds no value the
    /// returned trie shares the receiver's root.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie1 = Trie::new().put("hello", 42);
    /// let trie2 = trie1.remove("hello");
    ///
    /// assert!(trie2.is_empty());
    /// assert_eq!(trie1.get::<i32>("hello"), Some(&42));
    /// ```
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Self {
        let key = key.as_ref();
        let path = self.existing_path(key);

        let end = match path.last().copied().flatten() {
            Some(node) if node.is_value_node() => node,
            _ => {
                trace!("remove key \"{}\" (not present)", key.escape_ascii());
                return self.clone();
            }
        };

        // The end node exists, so every ancestor on the path does too.
        // Rebuilt nodes left without value and children are pruned.
        let mut removal = Removal::of(TrieNode::clone(end).into_plain());
        for (&byte, node) in key.iter().rev().zip(path.into_iter().rev().skip(1).flatten()) {
            let mut copy = TrieNode::clone(node);
            match removal {
                Removal::Pruned => copy.remove_child(byte),
                Removal::Replaced(new_child) => copy.set_child(byte, new_child),
            }
            removal = Removal::of(copy);
        }
        trace!("remove key \"{}\"", key.escape_ascii());

        let new_root = match removal {
            Removal::Pruned => None,
            Removal::Replaced(node) => Some(node),
        };

        Trie {
            root: new_root,
            size: self.size - 1,
        }
    }

    // Every node met following `key` from the root, the root first. Positions
    // past the end of the stored path are `None`.
    fn existing_path(&self, key: &[u8]) -> Vec<Option<&Arc<TrieNode>>> {
        let mut path = Vec::with_capacity(key.len() + 1);
        let mut current = self.root.as_ref();
        path.push(current);

        for byte in key {
            current = current.and_then(|node| node.child(*byte));
            path.push(current);
        }

        path
    }

    fn shallow_copy(node: Option<&Arc<TrieNode>>) -> TrieNode {
        node.map(|node| TrieNode::clone(node)).unwrap_or_default()
    }

    /// Returns the number of values stored under keys starting with `prefix`.
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new().put("te", 1).put("tea", 2).put("ted", 3).put("to", 4);
    ///
    /// assert_eq!(trie.count_with_prefix("te"), 3);
    /// assert_eq!(trie.count_with_prefix("x"), 0);
    /// assert_eq!(trie.count_with_prefix(""), 4);
    /// ```
    pub fn count_with_prefix(&self, prefix: impl AsRef<[u8]>) -> usize {
        self.find_node(prefix.as_ref()).map_or(0, |node| node.subtree_size())
    }

    /// Creates a view of the subtrie at the given key prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new().put("hello", 1).put("help", 2).put("world", 3);
    ///
    /// let view = trie.view_subtrie("hel");
    /// assert_eq!(view.len(), 2);
    /// assert_eq!(view.get::<i32>("help"), Some(&2));
    /// assert_eq!(view.get::<i32>("world"), None);
    /// ```
    pub fn view_subtrie(&self, prefix: impl AsRef<[u8]>) -> PrefixView<'_> {
        PrefixView::new(self, prefix.as_ref().to_vec())
    }

    /// Returns an iterator over every stored key in byte order.
    ///
    /// ```
    /// use persistent_trie::Trie;
    ///
    /// let trie = Trie::new().put("b", 1).put("a", 2).put("ab", 3);
    /// let keys: Vec<Vec<u8>> = trie.keys().collect();
    ///
    /// assert_eq!(keys, vec![b"a".to_vec(), b"ab".to_vec(), b"b".to_vec()]);
    /// ```
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.root.as_deref(), Vec::new())
    }
}
