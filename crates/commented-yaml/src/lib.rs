//! # commented-yaml
//!
//! Nested YAML data with comments attached to its entries, and a dumper
//! that writes each comment right before the entry it describes.
//!
//! This crate provides [`CommentedTree`], which wraps a plain
//! `yaml-rust2::Yaml` sequence or mapping and records an optional comment
//! for the tree itself and for each of its slots. Nested plain containers
//! become comment-addressable the first time they are reached through
//! [`CommentedTree::get`].
//!
//! ## Design
//!
//! Plain data stays as `Yaml` until it is touched, so wrapping a large
//! loaded document is cheap and only the paths that receive comments are
//! promoted. Dumping borrows the tree immutably and never promotes.
//!
//! ## Example
//!
//! ```rust
//! use commented_yaml::{CommentedTree, Dumper};
//!
//! let mut config = CommentedTree::new();
//! config.set("name", "demo");
//! config.set_comment_for("name", "Shown in the window title");
//!
//! let server = config.subtree("server").unwrap();
//! server.set("host", "localhost");
//! server.set("port", 8080);
//! server.set_comment("Listener settings");
//!
//! let text = Dumper::new().dump(&config, 2, 0).unwrap();
//! assert_eq!(
//!     text,
//!     concat!(
//!         "# Shown in the window title\n",
//!         "name: demo\n",
//!         "# Listener settings\n",
//!         "server:\n",
//!         "    host: localhost\n",
//!         "    port: 8080\n",
//!     )
//! );
//! ```

mod dumper;
mod error;
pub mod inline;
mod key;
mod node;
mod tree;

pub use dumper::{DumpOptions, Dumper, dump};
pub use error::{Error, Result};
pub use key::Key;
pub use node::{Node, NodeKind, NodeRef};
pub use tree::CommentedTree;

// Re-export so callers can build plain data without a direct dependency.
pub use yaml_rust2::Yaml;
