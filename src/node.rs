//! Node implementation for the persistent trie.
//!
//! A `TrieNode` is one position in the key space: a map from the next key
//! byte to a shared child, plus an optional value. Nodes are always handed
//! around behind an `Arc` and are never mutated once another node or trie
//! can see them; every change goes through a clone of the node on the
//! rebuilt path.

use std::any::Any;
use std::collections::BTreeMap;
use std::mem;
use std::sync::Arc;

/// Shared, type-erased handle to a stored value.
pub type ValueHandle = Arc<dyn Any + Send + Sync>;

/// Children of a node, ordered by key byte.
pub type Children = BTreeMap<u8, Arc<TrieNode>>;

/// A node of the trie.
///
/// A node is either plain or value-bearing, and the kind is decided when
/// the node is built: a value-bearing node is exactly one holding a value
/// handle. Cloning copies the children map (the `Arc`s, not the children)
/// and the value handle, so a clone keeps both its kind and the concrete
/// type of its value without the caller knowing that type.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: Children,
    value: Option<ValueHandle>,
}

impl TrieNode {
    /// Creates a plain node with no children.
    pub fn new() -> Self {
        TrieNode {
            children: BTreeMap::new(),
            value: None,
        }
    }

    /// Creates a plain node with the given children.
    pub fn with_children(children: Children) -> Self {
        TrieNode {
            children,
            value: None,
        }
    }

    /// Creates a value-bearing node with the given children.
    pub fn with_value(children: Children, value: ValueHandle) -> Self {
        TrieNode {
            children,
            value: Some(value),
        }
    }

    /// Returns `true` if this node terminates a stored key.
    pub fn is_value_node(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the children of this node.
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Returns the child reached by `byte`, if any.
    pub fn child(&self, byte: u8) -> Option<&Arc<TrieNode>> {
        self.children.get(&byte)
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the stored value if this node carries one of type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Turns this node into a plain node keeping the same children.
    pub fn into_plain(mut self) -> Self {
        TrieNode::with_children(mem::take(&mut self.children))
    }

    /// Turns this node into a value-bearing node keeping the same children.
    pub fn into_value(mut self, value: ValueHandle) -> Self {
        TrieNode::with_value(mem::take(&mut self.children), value)
    }

    /// Replaces the child at `byte`. Only used on nodes that are not yet shared.
    pub(crate) fn set_child(&mut self, byte: u8, child: Arc<TrieNode>) {
        self.children.insert(byte, child);
    }

    /// Drops the child at `byte`. Only used on nodes that are not yet shared.
    pub(crate) fn remove_child(&mut self, byte: u8) {
        self.children.remove(&byte);
    }

    /// Returns `true` if the node holds nothing and can be dropped from its parent.
    pub fn is_prunable(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Returns the number of values stored in this subtree
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if node.is_value_node() {
                count += 1;
            }
            stack.extend(node.children.values().map(|child| &**child));
        }

        count
    }
}

// Unlinks children one level at a time so a long chain of nodes is freed
// without recursing once per level.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<Arc<TrieNode>> = mem::take(&mut self.children).into_values().collect();

        while let Some(node) = stack.pop() {
            // Nodes still shared with another trie are left to their other owners
            if let Ok(mut node) = Arc::try_unwrap(node) {
                stack.extend(mem::take(&mut node.children).into_values());
            }
        }
    }
}
