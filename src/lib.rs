//! # Persistent Trie
//!
//! A copy-on-write trie mapping byte-string keys to values of any type.
//!
//! Every modifying operation returns a new trie and leaves the receiver untouched. Only the
//! nodes on the path to the changed key are rebuilt; all other nodes are shared between the
//! old and the new trie through `Arc`, so any number of versions can be kept alive and read
//! from several threads at once.
//!
//! ## Features
//!
//! - **Immutable API**: `put` and `remove` return a new trie instance
//! - **Structural Sharing**: unchanged subtrees are shared, never copied
//! - **Heterogeneous Values**: each key holds a value of its own type; lookups name the type
//! - **Move-only Values**: stored values never need to be `Clone`
//! - **Prefix Views**: count, look up and list keys under a common prefix
//!
//! ## Example
//!
//! ```rust
//! use persistent_trie::Trie;
//!
//! // Create a new trie
//! let trie = Trie::new();
//!
//! // Insert some values (each operation returns a new trie)
//! let trie = trie.put("hello", 1u32);
//! let trie = trie.put("world", String::from("two"));
//!
//! // Lookup values
//! assert_eq!(trie.get::<u32>("hello"), Some(&1));
//! assert_eq!(trie.get::<String>("world").map(String::as_str), Some("two"));
//!
//! // A value of another type reads as absent
//! assert_eq!(trie.get::<u64>("hello"), None);
//! ```

pub mod node;
mod prefix_view;
mod trie;

use thiserror::Error;

// Re-export public types
pub use crate::node::TrieNode;
pub use crate::prefix_view::{Keys, PrefixView};
pub use crate::trie::Trie;

/// Result type alias for checked lookups
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a checked lookup can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No value is stored under the key
    #[error("key not found")]
    NotFound,
    /// A value is stored under the key, but not of the requested type
    #[error("value stored under key is not a `{expected}`")]
    TypeMismatch {
        /// Name of the requested type
        expected: &'static str,
    },
}
