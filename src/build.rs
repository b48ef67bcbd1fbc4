//! Entity to tree conversion.
//!
//! Building never copies nested payloads (params, results, error data).
//! They are moved out of their entity into the output tree and moved back
//! once the tree has been serialized. [`Lease`] owns that round trip: it
//! holds the built tree together with a mutable borrow of every source
//! entity, and its `Drop` detaches each nested node from the tree and
//! hands it back. Whatever happens between building and dropping (a
//! successful write, a too-small buffer, a validation failure halfway
//! through a batch) the source entities end up owning exactly what they
//! owned before.

use crate::error::{Error, Result};
use crate::tree::{self, Node};
use crate::types::{ErrorObject, Outcome, Request, Response};
use crate::JSONRPC_VERSION;
use serde_json::{Map, Value};

/// Conversion of a protocol entity into a tree node
pub trait Build {
    /// Validate, then build a tree node, moving nested nodes into it.
    ///
    /// Implementations must not move anything out of `self` when they fail.
    fn lend(&mut self) -> Result<Node>;

    /// Detach the nested nodes `lend` moved into `node` and take them back.
    fn reclaim(&mut self, node: &mut Node);
}

/// A built tree whose nested nodes are on loan from their source entities
pub struct Lease<'a, T: Build> {
    owners: Vec<&'a mut T>,
    tree: Node,
}

impl<'a, T: Build> Lease<'a, T> {
    /// Build a single entity
    pub fn single(owner: &'a mut T) -> Result<Self> {
        let tree = owner.lend()?;
        Ok(Self {
            owners: vec![owner],
            tree,
        })
    }

    /// Build a batch: one array element per entity, in order.
    ///
    /// An empty batch is rejected. If any entity fails to build, the ones
    /// already built are reclaimed before the error is returned.
    pub fn batch(owners: &'a mut [T]) -> Result<Self> {
        if owners.is_empty() {
            return Err(Error::invalid_args("batch must contain at least one entry"));
        }

        let mut lease = Self {
            owners: Vec::with_capacity(owners.len()),
            tree: Value::Array(Vec::with_capacity(owners.len())),
        };
        for (index, owner) in owners.iter_mut().enumerate() {
            let node = owner.lend().inspect_err(|err| {
                tracing::debug!(
                    index,
                    error = %err,
                    "batch entry failed to build; reclaiming earlier entries"
                );
            })?;
            lease.push(owner, node);
        }
        Ok(lease)
    }

    fn push(&mut self, owner: &'a mut T, node: Node) {
        if let Value::Array(items) = &mut self.tree {
            items.push(node);
        }
        self.owners.push(owner);
    }

    /// The built tree
    pub fn node(&self) -> &Node {
        &self.tree
    }

    /// Serialize the built tree into `out`
    pub fn serialize_into(&self, out: &mut [u8]) -> Result<usize> {
        tree::serialize_into(&self.tree, out)
    }

    /// Serialize the built tree into a new string
    pub fn to_json(&self) -> Result<String> {
        tree::to_string(&self.tree)
    }
}

impl<T: Build> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        match &mut self.tree {
            Value::Array(items) => {
                for (owner, node) in self.owners.iter_mut().zip(items.iter_mut()) {
                    owner.reclaim(node);
                }
            }
            node => {
                if let Some(owner) = self.owners.first_mut() {
                    owner.reclaim(node);
                }
            }
        }
        tracing::trace!(entries = self.owners.len(), "reclaimed nested nodes from built tree");
    }
}

fn envelope() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("jsonrpc".to_string(), Value::from(JSONRPC_VERSION));
    map
}

impl Build for Request {
    fn lend(&mut self) -> Result<Node> {
        self.validate()?;

        let mut map = envelope();
        if let Some(id) = self.id.to_node() {
            tree::assign(&mut map, "id", id);
        }
        tree::assign(&mut map, "method", Value::String(self.method.clone()));
        if let Some(params) = self.params.take() {
            tree::assign(&mut map, "params", params);
        }
        Ok(Value::Object(map))
    }

    fn reclaim(&mut self, node: &mut Node) {
        if let Some(map) = node.as_object_mut()
            && let Some(params) = tree::detach(map, "params")
        {
            self.params = Some(params);
        }
    }
}

impl Build for ErrorObject {
    fn lend(&mut self) -> Result<Node> {
        self.validate()?;

        let mut map = Map::new();
        tree::assign(&mut map, "code", Value::from(self.code));
        tree::assign(&mut map, "message", Value::String(self.message.clone()));
        if let Some(data) = self.data.take() {
            tree::assign(&mut map, "data", data);
        }
        Ok(Value::Object(map))
    }

    fn reclaim(&mut self, node: &mut Node) {
        if let Some(map) = node.as_object_mut()
            && let Some(data) = tree::detach(map, "data")
        {
            self.data = Some(data);
        }
    }
}

impl Build for Response {
    fn lend(&mut self) -> Result<Node> {
        self.validate()?;

        let mut map = envelope();
        if let Some(id) = self.id.to_node() {
            tree::assign(&mut map, "id", id);
        }
        match self.outcome.as_mut() {
            // take the result, leaving a null hole that reclaim refills
            Some(Outcome::Result(result)) => {
                tree::assign(&mut map, "result", std::mem::take(result));
            }
            Some(Outcome::Error(error)) => {
                let node = error.lend()?;
                tree::assign(&mut map, "error", node);
            }
            None => return Err(Error::validation("response needs a result or an error")),
        }
        Ok(Value::Object(map))
    }

    fn reclaim(&mut self, node: &mut Node) {
        let Some(map) = node.as_object_mut() else {
            return;
        };
        match self.outcome.as_mut() {
            Some(Outcome::Result(result)) => {
                if let Some(node) = tree::detach(map, "result") {
                    *result = node;
                }
            }
            Some(Outcome::Error(error)) => {
                if let Some(mut node) = tree::detach(map, "error") {
                    error.reclaim(&mut node);
                }
            }
            None => {}
        }
    }
}
