//! Values stored in a commented tree.

use crate::tree::CommentedTree;
use yaml_rust2::Yaml;

/// One value held in a [`CommentedTree`] slot.
///
/// A slot either holds plain YAML data (a scalar, or a sequence/mapping
/// whose children cannot carry comments yet) or a promoted
/// [`CommentedTree`]. Plain containers are promoted in place the first time
/// they are reached through [`CommentedTree::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar, or a container that is not comment-addressable yet.
    Plain(Yaml),

    /// A comment-addressable container.
    Tree(CommentedTree),
}

/// The shape of a node, independent of whether it has been promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A borrowed view of either plain data or a commented tree.
///
/// This is what the flow renderer and the dumper walk. Borrowing keeps a
/// dump read-only: no promotion ever happens while rendering.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Plain(&'a Yaml),
    Tree(&'a CommentedTree),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Plain(yaml) => yaml_kind(yaml),
            Node::Tree(tree) => tree.kind(),
        }
    }

    /// Check if this is a scalar (neither a plain container nor a tree).
    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    /// Check if this is a sequence or mapping, promoted or not.
    pub fn is_container(&self) -> bool {
        !self.is_scalar()
    }

    /// Check if this node can carry its own comment.
    ///
    /// Only promoted trees can; scalars and plain containers are commented
    /// through the slot that holds them.
    pub fn is_commentable(&self) -> bool {
        matches!(self, Node::Tree(_))
    }

    /// Get the plain YAML value if this node has not been promoted.
    pub fn as_yaml(&self) -> Option<&Yaml> {
        match self {
            Node::Plain(yaml) => Some(yaml),
            Node::Tree(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_yaml().and_then(Yaml::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_yaml().and_then(Yaml::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_yaml().and_then(Yaml::as_bool)
    }

    pub fn as_tree(&self) -> Option<&CommentedTree> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Plain(_) => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut CommentedTree> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Plain(_) => None,
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        NodeRef::from(self)
    }

    /// Strip all comments and return the equivalent plain value.
    pub fn to_yaml(&self) -> Yaml {
        match self {
            Node::Plain(yaml) => yaml.clone(),
            Node::Tree(tree) => tree.to_yaml(),
        }
    }

    /// Consuming variant of [`Node::to_yaml`].
    pub fn into_yaml(self) -> Yaml {
        match self {
            Node::Plain(yaml) => yaml,
            Node::Tree(tree) => tree.into_yaml(),
        }
    }
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Plain(yaml) => yaml_kind(yaml),
            NodeRef::Tree(tree) => tree.kind(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    /// Check if this is a container with no children.
    ///
    /// Scalars are never empty in this sense.
    pub fn is_empty_container(&self) -> bool {
        match self {
            NodeRef::Plain(Yaml::Array(items)) => items.is_empty(),
            NodeRef::Plain(Yaml::Hash(hash)) => hash.is_empty(),
            NodeRef::Plain(_) => false,
            NodeRef::Tree(tree) => tree.is_empty(),
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Plain(yaml) => NodeRef::Plain(yaml),
            Node::Tree(tree) => NodeRef::Tree(tree),
        }
    }
}

impl<'a> From<&'a Yaml> for NodeRef<'a> {
    fn from(yaml: &'a Yaml) -> Self {
        NodeRef::Plain(yaml)
    }
}

impl<'a> From<&'a CommentedTree> for NodeRef<'a> {
    fn from(tree: &'a CommentedTree) -> Self {
        NodeRef::Tree(tree)
    }
}

impl From<Yaml> for Node {
    fn from(yaml: Yaml) -> Self {
        Node::Plain(yaml)
    }
}

impl From<CommentedTree> for Node {
    fn from(tree: CommentedTree) -> Self {
        Node::Tree(tree)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Plain(Yaml::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Plain(Yaml::String(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Plain(Yaml::Integer(i))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Plain(Yaml::Integer(i64::from(i)))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Plain(Yaml::Boolean(b))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        // Debug formatting keeps the fractional part (`1.0`, not `1`).
        Node::Plain(Yaml::Real(format!("{:?}", f)))
    }
}

pub(crate) fn yaml_kind(yaml: &Yaml) -> NodeKind {
    match yaml {
        Yaml::Array(_) => NodeKind::Sequence,
        Yaml::Hash(_) => NodeKind::Mapping,
        _ => NodeKind::Scalar,
    }
}

/// Human-readable type name used in error messages.
pub(crate) fn yaml_type_name(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::Real(_) => "real",
        Yaml::Integer(_) => "integer",
        Yaml::String(_) => "string",
        Yaml::Boolean(_) => "boolean",
        Yaml::Array(_) => "sequence",
        Yaml::Hash(_) => "mapping",
        Yaml::Alias(_) => "alias",
        Yaml::Null => "null",
        Yaml::BadValue => "bad value",
    }
}
