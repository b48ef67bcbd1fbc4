//! Message kinds and the tagged message union.

use crate::batch::{RequestBatch, ResponseBatch};
use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::tree::{self, Node};
use crate::types::{Request, Response};
use serde_json::Value;
use std::fmt;

/// The shape of an inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    RequestSingle,
    ResponseSingle,
    RequestBatch,
    ResponseBatch,
    Unknown,
}

impl MessageKind {
    pub fn is_batch(self) -> bool {
        matches!(self, Self::RequestBatch | Self::ResponseBatch)
    }

    pub fn is_request(self) -> bool {
        matches!(self, Self::RequestSingle | Self::RequestBatch)
    }

    pub fn is_response(self) -> bool {
        matches!(self, Self::ResponseSingle | Self::ResponseBatch)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequestSingle => "request",
            Self::ResponseSingle => "response",
            Self::RequestBatch => "request batch",
            Self::ResponseBatch => "response batch",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// What a single classified entry looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Request,
    Response,
}

impl Shape {
    pub(crate) fn kind(self, batched: bool) -> MessageKind {
        match (self, batched) {
            (Self::Request, false) => MessageKind::RequestSingle,
            (Self::Response, false) => MessageKind::ResponseSingle,
            (Self::Request, true) => MessageKind::RequestBatch,
            (Self::Response, true) => MessageKind::ResponseBatch,
        }
    }
}

/// Decide which kind of message a parsed tree holds.
///
/// An array is classified by its first element; an empty array has no
/// element to look at and is rejected.
pub fn classify(node: &Node) -> Result<MessageKind> {
    classify_shape(node).map(|(shape, batched)| shape.kind(batched))
}

/// Entry shape of `node`, and whether it arrived as a batch
pub(crate) fn classify_shape(node: &Node) -> Result<(Shape, bool)> {
    match node {
        Value::Array(items) => match items.first() {
            Some(first) => classify_object(first).map(|shape| (shape, true)),
            None => Err(Error::validation("cannot classify an empty batch")),
        },
        single => classify_object(single).map(|shape| (shape, false)),
    }
}

fn classify_object(node: &Node) -> Result<Shape> {
    let Some(object) = node.as_object() else {
        return Err(Error::validation(format!(
            "message must be an object, found {}",
            tree::type_name(node)
        )));
    };

    let has_method = object.contains_key("method");
    let has_outcome = object.contains_key("result") || object.contains_key("error");
    match (has_method, has_outcome) {
        (true, false) => Ok(Shape::Request),
        (false, true) => Ok(Shape::Response),
        (true, true) => Err(Error::validation("message has both a method and a result or error")),
        (false, false) => Err(Error::validation(
            "message has neither a method nor a result or error",
        )),
    }
}

/// Any JSON-RPC message: a single request or response, or a batch of either
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Message {
    Request(Request),
    Response(Response),
    RequestBatch(RequestBatch),
    ResponseBatch(ResponseBatch),
    /// Holds nothing
    #[default]
    Unknown,
}

impl Message {
    /// Parse and classify `text` with default limits
    pub fn parse(text: &[u8]) -> Result<Self> {
        Codec::default().parse_message(text)
    }

    /// Classify `text` without keeping any of it
    pub fn peek_kind(text: &[u8]) -> Result<MessageKind> {
        Codec::default().peek_kind(text)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Request(_) => MessageKind::RequestSingle,
            Self::Response(_) => MessageKind::ResponseSingle,
            Self::RequestBatch(_) => MessageKind::RequestBatch,
            Self::ResponseBatch(_) => MessageKind::ResponseBatch,
            Self::Unknown => MessageKind::Unknown,
        }
    }

    pub fn is_batch(&self) -> bool {
        self.kind().is_batch()
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Self::Request(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }

    pub fn as_request_batch(&self) -> Option<&RequestBatch> {
        match self {
            Self::RequestBatch(batch) => Some(batch),
            _ => None,
        }
    }

    pub fn as_response_batch(&self) -> Option<&ResponseBatch> {
        match self {
            Self::ResponseBatch(batch) => Some(batch),
            _ => None,
        }
    }

    pub fn into_request(self) -> Option<Request> {
        match self {
            Self::Request(request) => Some(request),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }

    pub fn into_request_batch(self) -> Option<RequestBatch> {
        match self {
            Self::RequestBatch(batch) => Some(batch),
            _ => None,
        }
    }

    pub fn into_response_batch(self) -> Option<ResponseBatch> {
        match self {
            Self::ResponseBatch(batch) => Some(batch),
            _ => None,
        }
    }

    /// Drop the held entity and reset to `Unknown`.
    ///
    /// Fails if there is nothing to drop.
    pub fn clear(&mut self) -> Result<()> {
        if self.is_unknown() {
            return Err(Error::invalid_args("message holds nothing to clear"));
        }
        let previous = std::mem::take(self);
        tracing::trace!(kind = %previous.kind(), "cleared message");
        Ok(())
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<RequestBatch> for Message {
    fn from(batch: RequestBatch) -> Self {
        Self::RequestBatch(batch)
    }
}

impl From<ResponseBatch> for Message {
    fn from(batch: ResponseBatch) -> Self {
        Self::ResponseBatch(batch)
    }
}
