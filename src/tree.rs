//! Thin adapter over the generic JSON tree (`serde_json::Value`).
//!
//! Everything the protocol layer needs from the tree library goes through
//! here: text to tree, tree to a fixed-size buffer, and the detach/assign
//! pair used to move nested nodes between trees and entities.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Generic tree node
pub type Node = Value;

/// Parse JSON text into a new, owned tree
pub fn parse(text: &[u8]) -> Result<Node> {
    serde_json::from_slice(text).map_err(|err| {
        tracing::debug!(error = %err, len = text.len(), "rejected malformed JSON text");
        Error::Json(err)
    })
}

/// Serialize a tree into an owned string
pub fn to_string(node: &Node) -> Result<String> {
    Ok(serde_json::to_string(node)?)
}

/// Serialize a tree into a caller-provided buffer.
///
/// Returns the number of bytes written. When the text does not fit, nothing
/// is written and the required size is reported so the caller can retry
/// with a larger buffer.
pub fn serialize_into(node: &Node, out: &mut [u8]) -> Result<usize> {
    let text = serde_json::to_vec(node)?;
    if text.len() > out.len() {
        tracing::debug!(
            required = text.len(),
            available = out.len(),
            "serialized message does not fit output buffer"
        );
        return Err(Error::BufferTooSmall {
            required: text.len(),
            available: out.len(),
        });
    }
    out[..text.len()].copy_from_slice(&text);
    Ok(text.len())
}

/// Detach a child from an object, returning ownership to the caller
pub fn detach(object: &mut Map<String, Value>, key: &str) -> Option<Node> {
    object.remove(key)
}

/// Assign a node as a named child, transferring ownership to the object
pub fn assign(object: &mut Map<String, Value>, key: &str, node: Node) {
    object.insert(key.to_string(), node);
}

/// Params nodes must be structured: an array or an object
pub fn is_structured(node: &Node) -> bool {
    node.is_array() || node.is_object()
}

/// Name of the node's JSON type, for diagnostics
pub fn type_name(node: &Node) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
