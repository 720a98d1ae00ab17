/*!
 * Shared traversal for tree-shaped documents (JSON, TOML).
 *
 * A document is converted into a `Node` tree whose string leaves become
 * translation units keyed by their path (`items.sword.name`, `tips[2]`).
 * Everything that is not a string is carried through untouched as `Other`.
 */

use super::{ensure_unit_count, TranslationUnit};
use crate::errors::FormatError;

/// Format-independent document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node<O> {
    /// A string value
    Leaf(String),
    /// An ordered list
    Sequence(Vec<Node<O>>),
    /// An ordered key/value mapping
    Mapping(Vec<(String, Node<O>)>),
    /// Any non-string scalar of the source format
    Other(O),
}

impl<O> Node<O> {
    /// String leaves in document order, with their paths
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(String::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: String, out: &mut Vec<(String, &'a str)>) {
        match self {
            Node::Leaf(text) => out.push((path, text.as_str())),
            Node::Sequence(items) => {
                for (idx, item) in items.iter().enumerate() {
                    item.collect_leaves(format!("{}[{}]", path, idx), out);
                }
            }
            Node::Mapping(entries) => {
                for (key, value) in entries {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    value.collect_leaves(child, out);
                }
            }
            Node::Other(_) => {}
        }
    }

    /// Rebuild the tree, replacing every leaf in document order
    pub fn map_leaves<F>(self, replace: &mut F) -> Node<O>
    where
        F: FnMut(String) -> String,
    {
        match self {
            Node::Leaf(text) => Node::Leaf(replace(text)),
            Node::Sequence(items) => {
                Node::Sequence(items.into_iter().map(|item| item.map_leaves(replace)).collect())
            }
            Node::Mapping(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.map_leaves(replace)))
                    .collect(),
            ),
            Node::Other(other) => Node::Other(other),
        }
    }
}

/// One translatable unit per string leaf
pub(crate) fn units_from_tree<O>(root: &Node<O>) -> Vec<TranslationUnit> {
    root.leaves()
        .into_iter()
        .enumerate()
        .map(|(position, (path, text))| TranslationUnit::translatable(position, path, text, text))
        .collect()
}

/// Write the unit outputs back into the leaves of `root`
pub(crate) fn apply_units<O>(root: Node<O>, units: &[TranslationUnit]) -> Result<Node<O>, FormatError> {
    ensure_unit_count(root.leaves().len(), units)?;

    let mut outputs = units.iter().map(|unit| unit.output_text().to_string());
    Ok(root.map_leaves(&mut |original| outputs.next().unwrap_or(original)))
}

/// Line ending used after the last line of `original`, if any
pub(crate) fn trailing_newline(original: &str) -> &'static str {
    if original.ends_with("\r\n") {
        "\r\n"
    } else if original.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
