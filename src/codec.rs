//! Configured entry point for parsing inbound text.

use crate::batch::{RequestBatch, ResponseBatch};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::materialize;
use crate::message::{self, Message, MessageKind, Shape};
use crate::tree::{self, Node};
use crate::types::{Request, Response};

/// Parser for inbound JSON-RPC text, bounded by [`Limits`].
///
/// Every `parse_*` method is transactional: on failure nothing is returned
/// and nothing parsed so far survives.
///
/// # Example
/// ```rust
/// use ash_rpc_envelope::{Codec, Limits, MessageKind};
///
/// let codec = Codec::new(Limits::default().with_max_batch_len(16));
/// let message = codec
///     .parse_message(br#"{"jsonrpc":"2.0","id":42,"method":"echo"}"#)
///     .unwrap();
/// assert_eq!(message.kind(), MessageKind::RequestSingle);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codec {
    limits: Limits,
}

impl Codec {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    fn parse_tree(&self, text: &[u8]) -> Result<Node> {
        let limit = self.limits.max_message_size;
        if limit > 0 && text.len() > limit {
            tracing::debug!(size = text.len(), limit, "rejecting oversized message");
            return Err(Error::MessageTooLarge {
                size: text.len(),
                limit,
            });
        }
        tree::parse(text)
    }

    /// Parse a single request
    pub fn parse_request(&self, text: &[u8]) -> Result<Request> {
        let node = self.parse_tree(text)?;
        materialize::request_from_node(node).inspect_err(|err| {
            tracing::debug!(error = %err, "rejected request");
        })
    }

    /// Parse a single response
    pub fn parse_response(&self, text: &[u8]) -> Result<Response> {
        let node = self.parse_tree(text)?;
        materialize::response_from_node(node, &self.limits).inspect_err(|err| {
            tracing::debug!(error = %err, "rejected response");
        })
    }

    /// Parse a request batch; `[]` yields an empty batch
    pub fn parse_request_batch(&self, text: &[u8]) -> Result<RequestBatch> {
        let node = self.parse_tree(text)?;
        RequestBatch::from_node(node, &self.limits)
    }

    /// Parse a response batch; `[]` yields an empty batch
    pub fn parse_response_batch(&self, text: &[u8]) -> Result<ResponseBatch> {
        let node = self.parse_tree(text)?;
        ResponseBatch::from_node(node, &self.limits)
    }

    /// Classify `text` without materializing anything
    pub fn peek_kind(&self, text: &[u8]) -> Result<MessageKind> {
        let node = self.parse_tree(text)?;
        message::classify(&node)
    }

    /// Classify `text`, then materialize it as the matching message kind
    pub fn parse_message(&self, text: &[u8]) -> Result<Message> {
        let node = self.parse_tree(text)?;
        let (shape, batched) = message::classify_shape(&node).inspect_err(|err| {
            tracing::debug!(error = %err, "could not classify message");
        })?;
        tracing::trace!(kind = %shape.kind(batched), "classified message");

        let message = match (shape, batched) {
            (Shape::Request, false) => Message::Request(materialize::request_from_node(node)?),
            (Shape::Response, false) => {
                Message::Response(materialize::response_from_node(node, &self.limits)?)
            }
            (Shape::Request, true) => {
                Message::RequestBatch(RequestBatch::from_node(node, &self.limits)?)
            }
            (Shape::Response, true) => {
                Message::ResponseBatch(ResponseBatch::from_node(node, &self.limits)?)
            }
        };
        Ok(message)
    }
}
