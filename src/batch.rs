//! Request and response batches.
//!
//! A batch is parsed and serialized as one unit. Parsing is
//! all-or-nothing: if any element fails, everything materialized so far is
//! dropped and the element's error is returned.

use crate::build::Lease;
use crate::codec::Codec;
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::materialize;
use crate::tree::{self, Node};
use crate::types::{Request, Response};
use serde_json::Value;

fn expect_array(node: Node, limits: &Limits) -> Result<Vec<Value>> {
    let items = match node {
        Value::Array(items) => items,
        other => {
            return Err(Error::validation(format!(
                "batch must be an array, found {}",
                tree::type_name(&other)
            )));
        }
    };
    if limits.max_batch_len > 0 && items.len() > limits.max_batch_len {
        return Err(Error::validation(format!(
            "batch of {} entries exceeds the limit of {}",
            items.len(),
            limits.max_batch_len
        )));
    }
    Ok(items)
}

fn materialize_all<T>(
    items: Vec<Value>,
    mut materialize: impl FnMut(Value) -> Result<T>,
) -> Result<Vec<T>> {
    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match materialize(item) {
            Ok(entry) => parsed.push(entry),
            Err(err) => {
                tracing::debug!(
                    index,
                    discarded = parsed.len(),
                    error = %err,
                    "batch element rejected; rolling back batch"
                );
                return Err(err);
            }
        }
    }
    Ok(parsed)
}

/// An ordered batch of requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBatch {
    items: Vec<Request>,
}

impl RequestBatch {
    pub fn new(items: Vec<Request>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, request: Request) {
        self.items.push(request);
    }

    pub fn get(&self, index: usize) -> Option<&Request> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Request> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Request] {
        &self.items
    }

    pub fn into_inner(self) -> Vec<Request> {
        self.items
    }

    /// Number of entries that expect a response
    pub fn expected_responses(&self) -> usize {
        self.items.iter().filter(|r| r.expects_response()).count()
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn serialize_into(&mut self, out: &mut [u8]) -> Result<usize> {
        Lease::batch(&mut self.items)?.serialize_into(out)
    }

    /// Serialize into a new string
    pub fn to_json(&mut self) -> Result<String> {
        Lease::batch(&mut self.items)?.to_json()
    }

    /// Parse a request batch with default limits
    pub fn parse(text: &[u8]) -> Result<Self> {
        Codec::default().parse_request_batch(text)
    }

    pub(crate) fn from_node(node: Node, limits: &Limits) -> Result<Self> {
        let items = expect_array(node, limits)?;
        materialize_all(items, materialize::request_from_node).map(Self::new)
    }
}

impl From<Vec<Request>> for RequestBatch {
    fn from(items: Vec<Request>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for RequestBatch {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RequestBatch {
    type Item = &'a Request;
    type IntoIter = std::slice::Iter<'a, Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// An ordered batch of responses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBatch {
    items: Vec<Response>,
}

impl ResponseBatch {
    pub fn new(items: Vec<Response>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, response: Response) {
        self.items.push(response);
    }

    pub fn get(&self, index: usize) -> Option<&Response> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Response> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Response] {
        &self.items
    }

    pub fn into_inner(self) -> Vec<Response> {
        self.items
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn serialize_into(&mut self, out: &mut [u8]) -> Result<usize> {
        Lease::batch(&mut self.items)?.serialize_into(out)
    }

    /// Serialize into a new string
    pub fn to_json(&mut self) -> Result<String> {
        Lease::batch(&mut self.items)?.to_json()
    }

    /// Parse a response batch with default limits
    pub fn parse(text: &[u8]) -> Result<Self> {
        Codec::default().parse_response_batch(text)
    }

    pub(crate) fn from_node(node: Node, limits: &Limits) -> Result<Self> {
        let items = expect_array(node, limits)?;
        materialize_all(items, |item| materialize::response_from_node(item, limits))
            .map(Self::new)
    }
}

impl From<Vec<Response>> for ResponseBatch {
    fn from(items: Vec<Response>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for ResponseBatch {
    type Item = Response;
    type IntoIter = std::vec::IntoIter<Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResponseBatch {
    type Item = &'a Response;
    type IntoIter = std::slice::Iter<'a, Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
