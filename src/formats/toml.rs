use toml::{Table, Value};

use super::tree::{apply_units, trailing_newline, units_from_tree, Node};
use super::{FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Adapter for `.toml` documents; every string value is a unit
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlAdapter;

fn to_node(value: Value) -> Node<Value> {
    match value {
        Value::String(text) => Node::Leaf(text),
        Value::Array(items) => Node::Sequence(items.into_iter().map(to_node).collect()),
        Value::Table(table) => Node::Mapping(table.into_iter().map(|(k, v)| (k, to_node(v))).collect()),
        other => Node::Other(other),
    }
}

fn from_node(node: Node<Value>) -> Value {
    match node {
        Node::Leaf(text) => Value::String(text),
        Node::Sequence(items) => Value::Array(items.into_iter().map(from_node).collect()),
        Node::Mapping(entries) => {
            let mut table = Table::new();
            for (key, value) in entries {
                table.insert(key, from_node(value));
            }
            Value::Table(table)
        }
        Node::Other(value) => value,
    }
}

fn parse(content: &str) -> Result<Node<Value>, FormatError> {
    let table: Table = toml::from_str(content).map_err(|e| FormatError::Parse(format!("TOML: {}", e)))?;
    Ok(to_node(Value::Table(table)))
}

impl FormatAdapter for TomlAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Toml
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        Ok(units_from_tree(&parse(content)?))
    }

    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let tree = apply_units(parse(original)?, units)?;
        let output = match from_node(tree) {
            Value::Table(table) => toml::to_string(&table),
            other => toml::to_string(&other),
        }
        .map_err(|e| FormatError::Serialize(format!("TOML: {}", e)))?;

        // toml always ends tables with a newline
        let body = output.trim_end_matches('\n');
        Ok(format!("{}{}", body, trailing_newline(original)))
    }
}
