//! Block-style dumping with comments.

use crate::error::Result;
use crate::inline;
use crate::key::{is_sequence_run, position_index};
use crate::node::NodeRef;
use crate::tree::CommentedTree;
use serde::{Deserialize, Serialize};
use yaml_rust2::Yaml;

/// Settings for [`Dumper`] and the flow renderer.
///
/// Deserializable with every field optional, e.g. from
/// `{"indentation": 2, "exception-on-invalid-type": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DumpOptions {
    /// Spaces per nesting level in block style.
    pub indentation: usize,

    /// Fail on values the flow renderer cannot represent instead of writing
    /// `null` for them.
    pub exception_on_invalid_type: bool,

    /// Allow values that are neither scalars nor containers (aliases) to be
    /// rendered at all.
    pub object_support: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indentation: 4,
            exception_on_invalid_type: false,
            object_support: false,
        }
    }
}

/// Dumps commented trees and plain YAML values to block/flow text.
///
/// Comments are written on their own lines, at the indentation of the
/// entry they describe, immediately before it:
///
/// ```rust
/// use commented_yaml::{CommentedTree, Dumper};
///
/// let mut tree = CommentedTree::new();
/// tree.set("foo", "hello");
/// tree.set("bar", "world");
/// tree.set_comment_for("foo", "c1");
///
/// let out = Dumper::new().dump(&tree, 1, 0).unwrap();
/// assert_eq!(out, "# c1\nfoo: hello\nbar: world\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dumper {
    options: DumpOptions,
}

/// Per-level state shared by the entries of one block.
struct Block<'p> {
    prefix: &'p str,
    indent: usize,
    inline: i32,
    is_hash: bool,
}

impl Dumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DumpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DumpOptions {
        &self.options
    }

    /// Set the number of spaces used per nesting level.
    pub fn set_indentation(&mut self, num: usize) {
        self.options.indentation = num;
    }

    /// Dump a value.
    ///
    /// * `inline` - how many more levels may be written in block style
    ///   before everything below switches to flow style; at `0` or below the
    ///   input itself is written in flow style
    /// * `indent` - left margin in spaces for this level
    ///
    /// Comments are emitted by the parent of the node they belong to, so the
    /// input's own comment is not written; see [`Dumper::dump_document`].
    pub fn dump<'a>(
        &self,
        input: impl Into<NodeRef<'a>>,
        inline: i32,
        indent: usize,
    ) -> Result<String> {
        let mut output = String::new();
        self.write_node(&mut output, input.into(), inline, indent)?;
        Ok(output)
    }

    /// Dump a whole document, starting with the root's own comment.
    pub fn dump_document(&self, tree: &CommentedTree, inline: i32) -> Result<String> {
        let mut output = String::new();
        if let Some(comment) = tree.comment() {
            write_comment(&mut output, comment, "");
        }
        self.write_node(&mut output, NodeRef::Tree(tree), inline, 0)?;
        Ok(output)
    }

    fn write_node(
        &self,
        out: &mut String,
        input: NodeRef<'_>,
        inline: i32,
        indent: usize,
    ) -> Result<()> {
        let prefix = " ".repeat(indent);

        if should_inline(inline, input) {
            out.push_str(&prefix);
            out.push_str(&inline::dump(input, &self.options)?);
            return Ok(());
        }

        let block = Block {
            prefix: &prefix,
            indent,
            inline,
            is_hash: is_hash(input),
        };
        tracing::trace!(indent, inline, is_hash = block.is_hash, "dumping block");

        match input {
            NodeRef::Tree(tree) => {
                for (key, value) in tree.iter() {
                    let comment = tree.comment_for(key);
                    self.write_entry(out, &block, &key.to_yaml(), value.into(), comment)?;
                }
            }
            NodeRef::Plain(Yaml::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    let key = Yaml::Integer(position_index(index));
                    self.write_entry(out, &block, &key, item.into(), None)?;
                }
            }
            NodeRef::Plain(Yaml::Hash(hash)) => {
                for (key, value) in hash {
                    self.write_entry(out, &block, key, value.into(), None)?;
                }
            }
            // Scalars always take the inline path above.
            NodeRef::Plain(_) => {}
        }

        Ok(())
    }

    fn write_entry(
        &self,
        out: &mut String,
        block: &Block<'_>,
        key: &Yaml,
        value: NodeRef<'_>,
        comment: Option<&str>,
    ) -> Result<()> {
        let inline = block.inline.saturating_sub(1);
        let will_be_inlined = should_inline(inline, value);

        if let Some(comment) = comment {
            write_comment(out, comment, block.prefix);
        }

        out.push_str(block.prefix);
        if block.is_hash {
            out.push_str(&inline::dump(key, &self.options)?);
            out.push(':');
        } else {
            out.push('-');
        }

        if will_be_inlined {
            out.push(' ');
            self.write_node(out, value, inline, 0)?;
            out.push('\n');
        } else {
            out.push('\n');
            self.write_node(out, value, inline, block.indent + self.options.indentation)?;
        }

        Ok(())
    }
}

/// Dump a value with default options.
pub fn dump<'a>(input: impl Into<NodeRef<'a>>, inline: i32) -> Result<String> {
    Dumper::new().dump(input, inline, 0)
}

/// Check whether a value is written in flow style at this depth.
fn should_inline(inline: i32, value: NodeRef<'_>) -> bool {
    inline <= 0 || value.is_scalar() || value.is_empty_container()
}

/// Check whether a container is written as `key: value` pairs rather than
/// `-` items.
fn is_hash(input: NodeRef<'_>) -> bool {
    match input {
        NodeRef::Tree(tree) => tree.is_hash(),
        NodeRef::Plain(Yaml::Hash(hash)) => !is_sequence_run(hash.keys().map(Yaml::as_i64)),
        NodeRef::Plain(_) => false,
    }
}

/// Write a comment as `# `-prefixed lines. Empty comments write nothing.
fn write_comment(out: &mut String, comment: &str, prefix: &str) {
    if comment.is_empty() {
        return;
    }
    for line in comment.split('\n') {
        out.push_str(prefix);
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust2::YamlLoader;

    fn load(src: &str) -> Yaml {
        YamlLoader::load_from_str(src).unwrap().remove(0)
    }

    fn foo_bar() -> CommentedTree {
        let mut tree = CommentedTree::new();
        tree.set("foo", "hello");
        tree.set("bar", "world");
        tree.set_comment_for("foo", "c1");
        tree
    }

    #[test]
    fn test_comment_before_entry() {
        let out = Dumper::new().dump(&foo_bar(), 1, 0).unwrap();
        assert_eq!(out, "# c1\nfoo: hello\nbar: world\n");
    }

    #[test]
    fn test_zero_depth_is_flow() {
        let out = Dumper::new().dump(&foo_bar(), 0, 0).unwrap();
        assert_eq!(out, "{ foo: hello, bar: world }");
    }

    #[test]
    fn test_nested_block_with_comment() {
        let mut tree = CommentedTree::new();
        let bucket = tree.subtree("bucket").unwrap();
        bucket.set("a", "first");
        bucket.set("b", "second");
        bucket.set_comment("top");

        let out = Dumper::new().dump(&tree, 2, 0).unwrap();
        assert_eq!(out, "# top\nbucket:\n    a: first\n    b: second\n");
    }

    #[test]
    fn test_nested_comments_are_indented() {
        let mut tree = CommentedTree::new();
        let bucket = tree.subtree("bucket").unwrap();
        bucket.set("a", "first");
        bucket.set_comment_for("a", "line one\nline two");

        let out = Dumper::new().dump(&tree, 2, 0).unwrap();
        assert_eq!(out, "bucket:\n    # line one\n    # line two\n    a: first\n");
    }

    #[test]
    fn test_sequence_block_and_flow() {
        let seq = load("[1, 2, 3]");
        assert_eq!(Dumper::new().dump(&seq, 0, 0).unwrap(), "[1, 2, 3]");
        assert_eq!(Dumper::new().dump(&seq, 1, 0).unwrap(), "- 1\n- 2\n- 3\n");
    }

    #[test]
    fn test_inline_depth_limits_block_levels() {
        let data = load("a:\n  b:\n    c: [1, 2]\n");
        assert_eq!(dump(&data, 1).unwrap(), "a: { b: { c: [1, 2] } }\n");
        assert_eq!(dump(&data, 2).unwrap(), "a:\n    b: { c: [1, 2] }\n");
        assert_eq!(
            dump(&data, 10).unwrap(),
            "a:\n    b:\n        c:\n            - 1\n            - 2\n"
        );
    }

    #[test]
    fn test_empty_containers_are_inlined() {
        let mut tree = CommentedTree::new();
        tree.subtree("empty_map");
        tree.set("empty_list", Yaml::Array(vec![]));
        tree.set("empty_tree", CommentedTree::new_sequence());

        let out = Dumper::new().dump(&tree, 5, 0).unwrap();
        assert_eq!(out, "empty_map: {}\nempty_list: []\nempty_tree: []\n");
        assert_eq!(Dumper::new().dump(&CommentedTree::new(), 5, 0).unwrap(), "{}");
    }

    #[test]
    fn test_sequence_of_mappings() {
        let data = load("- name: a\n  id: 1\n- name: b\n  id: 2\n");
        let out = dump(&data, 3).unwrap();
        assert_eq!(out, "-\n    name: a\n    id: 1\n-\n    name: b\n    id: 2\n");
    }

    #[test]
    fn test_comments_on_sequence_items() {
        let mut tree = CommentedTree::from_yaml(load("[x, z, 'y']")).unwrap();
        tree.set_comment_for(1, "second");
        let out = Dumper::new().dump(&tree, 1, 0).unwrap();
        assert_eq!(out, "- x\n# second\n- z\n- 'y'\n");
    }

    #[test]
    fn test_plain_child_of_tree_has_no_inner_comments() {
        let mut tree = CommentedTree::from_yaml(load("outer:\n  inner: 1\n")).unwrap();
        tree.set_comment_for("outer", "slot comment on a plain child");
        let out = Dumper::new().dump(&tree, 3, 0).unwrap();
        assert_eq!(out, "# slot comment on a plain child\nouter:\n    inner: 1\n");
    }

    #[test]
    fn test_empty_comment_writes_nothing() {
        let mut tree = CommentedTree::new();
        tree.set("k", 1);
        tree.set_comment_for("k", "");
        assert_eq!(Dumper::new().dump(&tree, 1, 0).unwrap(), "k: 1\n");
    }

    #[test]
    fn test_custom_indentation() {
        let mut dumper = Dumper::new();
        dumper.set_indentation(2);
        let data = load("a:\n  b: 1\n");
        assert_eq!(dumper.dump(&data, 2, 0).unwrap(), "a:\n  b: 1\n");
        assert_eq!(dumper.options().indentation, 2);
    }

    #[test]
    fn test_starting_indent() {
        let out = Dumper::new().dump(&foo_bar(), 1, 4).unwrap();
        assert_eq!(out, "    # c1\n    foo: hello\n    bar: world\n");
    }

    #[test]
    fn test_scalar_input() {
        assert_eq!(dump(&Yaml::String("x y".into()), 3).unwrap(), "x y");
        assert_eq!(Dumper::new().dump(&Yaml::Integer(7), 3, 2).unwrap(), "  7");
    }

    #[test]
    fn test_mapping_keys_are_rendered() {
        let mut tree = CommentedTree::new();
        tree.set("needs: quoting", 1);
        tree.set("true", 2);
        tree.set(3, 3);
        let out = Dumper::new().dump(&tree, 1, 0).unwrap();
        assert_eq!(out, "'needs: quoting': 1\n'true': 2\n3: 3\n");
    }

    #[test]
    fn test_dump_document_writes_root_comment() {
        let mut tree = foo_bar();
        tree.set_comment("Generated file.\nDo not edit.");
        let out = Dumper::new().dump_document(&tree, 1).unwrap();
        assert_eq!(
            out,
            "# Generated file.\n# Do not edit.\n# c1\nfoo: hello\nbar: world\n"
        );
    }

    #[test]
    fn test_unsupported_value_propagates() {
        let strict = Dumper::with_options(DumpOptions {
            exception_on_invalid_type: true,
            ..DumpOptions::default()
        });
        let mut tree = CommentedTree::new();
        tree.set("bad", Yaml::BadValue);
        assert!(strict.dump(&tree, 1, 0).is_err());
        assert_eq!(Dumper::new().dump(&tree, 1, 0).unwrap(), "bad: null\n");
    }

    #[test]
    fn test_options_deserialize() {
        let json = r#"{"indentation": 2, "exception-on-invalid-type": true}"#;
        let options: DumpOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.indentation, 2);
        assert!(options.exception_on_invalid_type);
        assert!(!options.object_support);

        let defaults: DumpOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, DumpOptions::default());
    }
}
