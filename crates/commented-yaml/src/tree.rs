//! Nested data with comments attached to every slot.

use crate::error::{Error, Result};
use crate::key::{Key, is_sequence_run};
use crate::node::{Node, NodeKind, yaml_kind, yaml_type_name};
use indexmap::IndexMap;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::Hash;

/// A sequence or mapping whose slots can carry comments.
///
/// Each slot holds a [`Node`]: a scalar, a plain container, or a nested
/// `CommentedTree`. Comments live in exactly one place per slot:
///
/// - a promoted child carries its comment as its own self comment;
/// - every other slot (scalar, plain container, or a key with no data yet)
///   is commented through this tree's slot-comment table.
///
/// Plain containers are promoted lazily by [`CommentedTree::get`], which
/// moves the slot comment into the new child so the two paths never both
/// hold a comment for the same key.
///
/// ## Example
///
/// ```rust
/// use commented_yaml::CommentedTree;
///
/// let mut config = CommentedTree::new();
/// config.set("name", "demo");
/// config.set_comment_for("name", "Project name");
///
/// let server = config.subtree("server").unwrap();
/// server.set("port", 8080);
/// server.set_comment("Listener settings");
///
/// assert_eq!(config.comment_for("name"), Some("Project name"));
/// assert_eq!(config.comment_for("server"), Some("Listener settings"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CommentedTree {
    /// Child slots in insertion order.
    entries: IndexMap<Key, Node>,

    /// Comment describing this node as a whole.
    comment: Option<String>,

    /// Comments for slots that are not promoted trees.
    child_comments: IndexMap<Key, String>,

    /// Shape to report while the tree has no entries.
    empty_kind: NodeKind,
}

impl Default for CommentedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentedTree {
    /// Create an empty tree that renders as a mapping until filled.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            comment: None,
            child_comments: IndexMap::new(),
            empty_kind: NodeKind::Mapping,
        }
    }

    /// Create an empty tree that renders as a sequence until filled.
    pub fn new_sequence() -> Self {
        Self {
            empty_kind: NodeKind::Sequence,
            ..Self::new()
        }
    }

    /// Wrap a plain sequence or mapping.
    ///
    /// Only the top level is wrapped; nested containers stay plain until
    /// they are reached through [`CommentedTree::get`]. Every entry is kept:
    /// a mapping with a container, alias or bad-value key is rejected with
    /// [`Error::UnsupportedKey`].
    pub fn from_yaml(data: Yaml) -> Result<Self> {
        if yaml_kind(&data) == NodeKind::Scalar {
            return Err(Error::NotAContainer {
                kind: yaml_type_name(&data),
            });
        }
        let keys = slot_keys(&data)?;
        Ok(Self::wrap(data, keys))
    }

    /// Wrap a plain container and attach initial slot comments.
    pub fn with_comments<K, S>(
        data: Yaml,
        comments: impl IntoIterator<Item = (K, S)>,
    ) -> Result<Self>
    where
        K: Into<Key>,
        S: Into<String>,
    {
        let mut tree = Self::from_yaml(data)?;
        for (key, comment) in comments {
            tree.child_comments.insert(key.into(), comment.into());
        }
        Ok(tree)
    }

    /// Build a tree from a container and the keys [`slot_keys`] produced
    /// for it, in the same order.
    fn wrap(data: Yaml, keys: Vec<Key>) -> Self {
        match data {
            Yaml::Array(items) => Self {
                entries: keys.into_iter().zip(items.into_iter().map(Node::Plain)).collect(),
                ..Self::new_sequence()
            },
            Yaml::Hash(hash) => Self {
                entries: keys
                    .into_iter()
                    .zip(hash.into_iter().map(|(_, value)| Node::Plain(value)))
                    .collect(),
                ..Self::new()
            },
            _ => Self::new(),
        }
    }

    /// Replace the data wholesale, keeping comments by key.
    ///
    /// Self comments of promoted children are moved back into the slot
    /// table first, so a key that survives the replacement keeps its
    /// comment and a key that disappears keeps a pending one.
    pub fn set_data(&mut self, data: Yaml) -> Result<()> {
        let replacement = Self::from_yaml(data)?;
        for (key, node) in self.entries.drain(..) {
            if let Node::Tree(child) = node
                && let Some(comment) = child.comment
            {
                self.child_comments.insert(key, comment);
            }
        }
        self.entries = replacement.entries;
        self.empty_kind = replacement.empty_kind;
        Ok(())
    }

    /// Get a child for reading or writing, creating or promoting it.
    ///
    /// - A missing key is filled with an empty `CommentedTree`, so nested
    ///   slots can be written without declaring their parents first.
    /// - A plain container is promoted in place to a `CommentedTree`.
    /// - A scalar is returned unchanged, and so is a plain mapping with a
    ///   non-scalar key, which has no lossless tree form.
    ///
    /// In both the first two cases any slot comment recorded for `key`
    /// becomes the new child's self comment. Promotion happens at most once:
    /// later calls return the same tree.
    pub fn get(&mut self, key: impl Into<Key>) -> &mut Node {
        let key = key.into();
        let child_comments = &mut self.child_comments;

        let slot = self.entries.entry(key.clone()).or_insert_with(|| {
            tracing::trace!(key = %key, "creating empty subtree");
            let mut child = CommentedTree::new();
            child.comment = child_comments.shift_remove(&key);
            Node::Tree(child)
        });

        if let Node::Plain(yaml @ (Yaml::Array(_) | Yaml::Hash(_))) = &mut *slot {
            match slot_keys(yaml) {
                Ok(keys) => {
                    tracing::trace!(key = %key, "promoting plain container");
                    let plain = std::mem::replace(yaml, Yaml::Null);
                    let mut child = CommentedTree::wrap(plain, keys);
                    child.comment = child_comments.shift_remove(&key);
                    *slot = Node::Tree(child);
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "leaving container plain");
                }
            }
        }

        slot
    }

    /// Get a child as a tree, creating or promoting it as [`get`](Self::get)
    /// does. Returns `None` if the slot holds a scalar or a mapping that
    /// cannot be promoted.
    pub fn subtree(&mut self, key: impl Into<Key>) -> Option<&mut CommentedTree> {
        self.get(key).as_tree_mut()
    }

    /// Read a child without creating or promoting anything.
    pub fn peek(&self, key: impl Into<Key>) -> Option<&Node> {
        self.entries.get(&key.into())
    }

    /// Assign a value to a slot.
    ///
    /// The comment already recorded for `key` is kept. If the new value is a
    /// tree, that comment becomes its self comment; a tree assigned to a
    /// slot with no comment keeps its own.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Node>) {
        let key = key.into();
        let mut value = value.into();

        let existing = match self.entries.get_mut(&key) {
            Some(Node::Tree(old)) => old.comment.take(),
            _ => self.child_comments.shift_remove(&key),
        };

        match &mut value {
            Node::Tree(tree) => {
                if existing.is_some() {
                    tree.comment = existing;
                }
            }
            Node::Plain(_) => {
                if let Some(comment) = existing {
                    self.child_comments.insert(key.clone(), comment);
                }
            }
        }

        self.entries.insert(key, value);
    }

    /// Append a value after the largest integer key (or at 0) and return
    /// the key it was stored under.
    ///
    /// Fails with [`Error::IndexOverflow`] when the largest key is
    /// `i64::MAX`; the tree is left unchanged.
    pub fn push(&mut self, value: impl Into<Node>) -> Result<Key> {
        let next = match self.entries.keys().filter_map(Key::as_index).max() {
            None => 0,
            Some(last) => last.checked_add(1).ok_or(Error::IndexOverflow { last })?,
        };
        let key = Key::Index(next);
        self.set(&key, value);
        Ok(key)
    }

    /// Remove a slot together with its comment.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Node> {
        let key = key.into();
        self.child_comments.shift_remove(&key);
        self.entries.shift_remove(&key)
    }

    /// Check whether a slot holds data. Comment-only keys do not count.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Comment describing this node as a whole.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn clear_comment(&mut self) -> Option<String> {
        self.comment.take()
    }

    /// Comment for one slot, wherever it is stored.
    ///
    /// Returns `None` when there is no comment, which is distinct from an
    /// empty comment.
    pub fn comment_for(&self, key: impl Into<Key>) -> Option<&str> {
        let key = key.into();
        match self.entries.get(&key) {
            Some(Node::Tree(child)) => child.comment(),
            _ => self.child_comments.get(&key).map(String::as_str),
        }
    }

    /// Set the comment for one slot.
    ///
    /// The slot does not need to exist yet: the comment is kept pending
    /// without creating any data, and attaches to whatever is stored under
    /// `key` later.
    pub fn set_comment_for(&mut self, key: impl Into<Key>, comment: impl Into<String>) {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(Node::Tree(child)) => child.set_comment(comment),
            _ => {
                self.child_comments.insert(key, comment.into());
            }
        }
    }

    /// Remove the comment for one slot, leaving its data alone.
    pub fn clear_comment_for(&mut self, key: impl Into<Key>) -> Option<String> {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(Node::Tree(child)) => child.clear_comment(),
            _ => self.child_comments.shift_remove(&key),
        }
    }

    /// Check if this tree is a hash rather than a 0-based sequence.
    ///
    /// False only when the keys are exactly `0, 1, ..., n-1` in order.
    pub fn is_hash(&self) -> bool {
        !is_sequence_run(self.entries.keys().map(Key::as_index))
    }

    /// Shape of this tree. An empty tree reports the shape it was created with.
    pub fn kind(&self) -> NodeKind {
        if self.entries.is_empty() {
            self.empty_kind
        } else if self.is_hash() {
            NodeKind::Mapping
        } else {
            NodeKind::Sequence
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Node)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.values()
    }

    /// Strip every comment and return the equivalent plain container.
    ///
    /// Nested trees are unwrapped recursively and order is preserved.
    pub fn to_yaml(&self) -> Yaml {
        if self.kind() == NodeKind::Sequence {
            Yaml::Array(self.entries.values().map(Node::to_yaml).collect())
        } else {
            let mut hash = Hash::new();
            for (key, node) in &self.entries {
                hash.insert(key.to_yaml(), node.to_yaml());
            }
            Yaml::Hash(hash)
        }
    }

    /// Consuming variant of [`CommentedTree::to_yaml`].
    pub fn into_yaml(self) -> Yaml {
        if self.kind() == NodeKind::Sequence {
            Yaml::Array(self.entries.into_values().map(Node::into_yaml).collect())
        } else {
            let mut hash = Hash::new();
            for (key, node) in self.entries {
                hash.insert(key.to_yaml(), node.into_yaml());
            }
            Yaml::Hash(hash)
        }
    }
}

impl TryFrom<Yaml> for CommentedTree {
    type Error = Error;

    fn try_from(data: Yaml) -> Result<Self> {
        Self::from_yaml(data)
    }
}

impl<K, V> FromIterator<(K, V)> for CommentedTree
where
    K: Into<Key>,
    V: Into<Node>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = CommentedTree::new();
        for (key, value) in iter {
            tree.set(key, value);
        }
        tree
    }
}

/// Slot keys for each entry of a plain container, in entry order.
///
/// Distinct mapping keys always give distinct slot keys, so wrapping never
/// merges entries.
fn slot_keys(data: &Yaml) -> Result<Vec<Key>> {
    match data {
        Yaml::Array(items) => Ok((0..items.len()).map(Key::from).collect()),
        Yaml::Hash(hash) => hash
            .keys()
            .map(|key| {
                Key::from_yaml(key).ok_or(Error::UnsupportedKey {
                    kind: yaml_type_name(key),
                })
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}
