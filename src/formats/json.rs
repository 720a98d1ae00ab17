use serde_json::{Map, Value};

use super::tree::{apply_units, trailing_newline, units_from_tree, Node};
use super::{FileFormat, FormatAdapter, TranslationUnit};
use crate::errors::FormatError;

/// Adapter for `.json` documents; every string value is a unit
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAdapter;

fn to_node(value: Value) -> Node<Value> {
    match value {
        Value::String(text) => Node::Leaf(text),
        Value::Array(items) => Node::Sequence(items.into_iter().map(to_node).collect()),
        Value::Object(map) => Node::Mapping(map.into_iter().map(|(k, v)| (k, to_node(v))).collect()),
        other => Node::Other(other),
    }
}

fn from_node(node: Node<Value>) -> Value {
    match node {
        Node::Leaf(text) => Value::String(text),
        Node::Sequence(items) => Value::Array(items.into_iter().map(from_node).collect()),
        Node::Mapping(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key, from_node(value));
            }
            Value::Object(map)
        }
        Node::Other(value) => value,
    }
}

fn parse(content: &str) -> Result<Node<Value>, FormatError> {
    let value: Value = serde_json::from_str(content).map_err(|e| FormatError::Parse(format!("JSON: {}", e)))?;
    Ok(to_node(value))
}

impl FormatAdapter for JsonAdapter {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn decompose(&self, content: &str) -> Result<Vec<TranslationUnit>, FormatError> {
        Ok(units_from_tree(&parse(content)?))
    }

    fn recompose(&self, original: &str, units: &[TranslationUnit]) -> Result<String, FormatError> {
        let tree = apply_units(parse(original)?, units)?;
        let mut output = serde_json::to_string_pretty(&from_node(tree))
            .map_err(|e| FormatError::Serialize(format!("JSON: {}", e)))?;
        output.push_str(trailing_newline(original));
        Ok(output)
    }
}
