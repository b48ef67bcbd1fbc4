//! # ash-rpc-envelope
//!
//! Typed JSON-RPC 2.0 messages: build and serialize them, parse and
//! validate them, and classify inbound payloads without guessing.
//!
//! ## Features
//!
//! - **Typed entities** - [`Request`], [`Response`], [`ErrorObject`] and [`Id`] with protocol invariants enforced at the setters
//! - **Atomic batches** - a batch parses completely or not at all
//! - **Kind detection** - [`Message::peek_kind`] and [`Codec::parse_message`] figure out what arrived
//! - **Move-only serialization** - params, results and error data are lent to the output tree, never copied
//! - **Bounded parsing** - [`Limits`] caps message size, batch length and error message length
//! - **Builders and macros** - fluent construction in the style of `rpc_success!`
//!
//! ## Quick Start
//!
//! ```rust
//! use ash_rpc_envelope::*;
//! use serde_json::json;
//!
//! let mut request = RequestBuilder::new("subtract")
//!     .params(json!([42, 23]))
//!     .id(1)
//!     .build()?;
//! let text = request.to_json()?;
//! assert_eq!(text, r#"{"jsonrpc":"2.0","id":1,"method":"subtract","params":[42,23]}"#);
//!
//! let message = Message::parse(text.as_bytes())?;
//! let request = message.into_request().unwrap();
//!
//! let mut response = Response::for_request(&request)?;
//! response.set_result(json!(19))?;
//! assert_eq!(response.to_json()?, r#"{"jsonrpc":"2.0","id":1,"result":19}"#);
//! # Ok::<(), ash_rpc_envelope::Error>(())
//! ```

pub mod batch;
pub mod build;
pub mod builders;
pub mod codec;
pub mod config;
pub mod error;
pub mod macros;
pub mod materialize;
pub mod message;
pub mod tree;
pub mod types;

pub use batch::{RequestBatch, ResponseBatch};
pub use build::{Build, Lease};
pub use builders::{ErrorBuilder, NotificationBuilder, RequestBuilder, ResponseBuilder};
pub use codec::Codec;
pub use config::Limits;
pub use error::{Error, Result};
pub use message::{Message, MessageKind};
pub use types::{ErrorObject, Id, Outcome, Request, Response, error_codes};

// Re-exported for the macros
pub use serde_json;

/// Protocol version carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Longest accepted method name, in bytes
pub const METHOD_NAME_MAX_LEN: usize = 256;
