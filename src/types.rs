//! Core JSON-RPC 2.0 types and data structures.

use crate::build::Lease;
use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::tree;
use crate::{JSONRPC_VERSION, METHOD_NAME_MAX_LEN};
use serde_json::Value;
use std::fmt;

/// Request identifier - absent, number, string, or explicit null
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Id {
    /// No identifier: the request is a notification
    #[default]
    None,
    Number(i64),
    String(String),
    /// Explicit `"id": null`
    Null,
}

impl Id {
    pub fn set_number(&mut self, value: i64) {
        *self = Id::Number(value);
    }

    /// Copy `value` in as a string identifier
    pub fn set_string(&mut self, value: &str) {
        *self = Id::String(value.to_owned());
    }

    pub fn set_null(&mut self) {
        *self = Id::Null;
    }

    /// Clear back to no identifier
    pub fn set_notification(&mut self) {
        *self = Id::None;
    }

    /// Check if this identifier marks a notification
    pub fn is_none(&self) -> bool {
        matches!(self, Id::None)
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Id::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Id::String(value) => Some(value),
            _ => None,
        }
    }

    /// Wire representation, or `None` when the field must be omitted
    pub(crate) fn to_node(&self) -> Option<Value> {
        match self {
            Id::None => None,
            Id::Number(value) => Some(Value::from(*value)),
            Id::String(value) => Some(Value::String(value.clone())),
            Id::Null => Some(Value::Null),
        }
    }

    pub(crate) fn check_attachable(&self) -> Result<()> {
        if matches!(self, Id::String(value) if value.is_empty()) {
            return Err(Error::validation("string id must not be empty"));
        }
        Ok(())
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Id::Number(value.into())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_owned())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::String(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::None => f.write_str("none"),
            Id::Number(value) => write!(f, "{value}"),
            Id::String(value) => {
                let text = serde_json::to_string(value).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
            Id::Null => f.write_str("null"),
        }
    }
}

/// JSON-RPC 2.0 request message
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub(crate) id: Id,
    pub(crate) method: String,
    pub(crate) params: Option<Value>,
}

impl Request {
    /// Create a new notification for `method`
    pub fn new(method: impl Into<String>) -> Result<Self> {
        let method = method.into();
        if method.is_empty() || method.len() > METHOD_NAME_MAX_LEN {
            return Err(Error::invalid_args(format!(
                "method name must be 1..={METHOD_NAME_MAX_LEN} bytes, got {}",
                method.len()
            )));
        }
        Ok(Self {
            id: Id::None,
            method,
            params: None,
        })
    }

    /// Create a new request carrying a copy of `id`
    pub fn with_id(method: impl Into<String>, id: &Id) -> Result<Self> {
        let mut request = Self::new(method)?;
        request.set_id(id);
        Ok(request)
    }

    /// Replace the identifier with a copy of `id`
    pub fn set_id(&mut self, id: &Id) {
        self.id = id.clone();
    }

    /// Attach parameters; only arrays and objects are accepted.
    ///
    /// On rejection the previous parameters are kept.
    pub fn set_params(&mut self, params: Value) -> Result<()> {
        if !tree::is_structured(&params) {
            return Err(Error::validation(format!(
                "params must be an array or object, found {}",
                tree::type_name(&params)
            )));
        }
        self.params = Some(params);
        Ok(())
    }

    /// Detach the parameters, handing ownership back to the caller
    pub fn take_params(&mut self) -> Option<Value> {
        self.params.take()
    }

    /// Check if this is a notification (no response expected)
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Check if this request expects a response
    pub fn expects_response(&self) -> bool {
        !self.is_notification()
    }

    pub fn version(&self) -> &'static str {
        JSONRPC_VERSION
    }

    /// Get the method name
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request ID
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Get a reference to the parameters
    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    /// Check protocol invariants before the request goes on the wire
    pub fn validate(&self) -> Result<()> {
        if self.method.is_empty() || self.method.len() > METHOD_NAME_MAX_LEN {
            return Err(Error::validation(format!(
                "method name must be 1..={METHOD_NAME_MAX_LEN} bytes, got {}",
                self.method.len()
            )));
        }
        if let Some(params) = &self.params
            && !tree::is_structured(params)
        {
            return Err(Error::validation(format!(
                "params must be an array or object, found {}",
                tree::type_name(params)
            )));
        }
        self.id.check_attachable()
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn serialize_into(&mut self, out: &mut [u8]) -> Result<usize> {
        Lease::single(self)?.serialize_into(out)
    }

    /// Serialize into a new string
    pub fn to_json(&mut self) -> Result<String> {
        Lease::single(self)?.to_json()
    }

    /// Parse a single request with default limits
    pub fn parse(text: &[u8]) -> Result<Self> {
        Codec::default().parse_request(text)
    }
}

/// The single outcome a response carries
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub(crate) id: Id,
    pub(crate) outcome: Option<Outcome>,
}

impl Response {
    /// Create an empty response carrying a copy of `id`
    pub fn with_id(id: &Id) -> Self {
        Self {
            id: id.clone(),
            outcome: None,
        }
    }

    /// Create an empty response for a numeric request id
    pub fn new(id: i64) -> Self {
        Self::with_id(&Id::Number(id))
    }

    /// Create an empty response correlated to `request`.
    ///
    /// Notifications have nothing to answer, so they are rejected.
    pub fn for_request(request: &Request) -> Result<Self> {
        if request.is_notification() {
            return Err(Error::invalid_args(format!(
                "request '{}' is a notification and takes no response",
                request.method
            )));
        }
        Ok(Self::with_id(&request.id))
    }

    /// Set the successful result; fails if an outcome is already present
    pub fn set_result(&mut self, result: Value) -> Result<()> {
        self.ensure_unset()?;
        self.outcome = Some(Outcome::Result(result));
        Ok(())
    }

    /// Set the error; fails if an outcome is already present
    pub fn set_error(&mut self, error: ErrorObject) -> Result<()> {
        self.ensure_unset()?;
        self.outcome = Some(Outcome::Error(error));
        Ok(())
    }

    fn ensure_unset(&self) -> Result<()> {
        match &self.outcome {
            Some(Outcome::Result(_)) => Err(Error::invalid_args("response already has a result")),
            Some(Outcome::Error(_)) => Err(Error::invalid_args("response already has an error")),
            None => Ok(()),
        }
    }

    /// Check if this is a successful response
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Result(_)))
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Error(_)))
    }

    pub fn version(&self) -> &'static str {
        JSONRPC_VERSION
    }

    /// Get the response ID
    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Get a reference to the result
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Some(Outcome::Result(result)) => Some(result),
            _ => None,
        }
    }

    /// Get error information
    pub fn error(&self) -> Option<&ErrorObject> {
        match &self.outcome {
            Some(Outcome::Error(error)) => Some(error),
            _ => None,
        }
    }

    /// Take ownership of the outcome, leaving the response empty
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    /// Check protocol invariants before the response goes on the wire
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::validation("response id must not be absent"));
        }
        self.id.check_attachable()?;
        match &self.outcome {
            Some(Outcome::Result(_)) => Ok(()),
            Some(Outcome::Error(error)) => error.validate(),
            None => Err(Error::validation("response needs a result or an error")),
        }
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn serialize_into(&mut self, out: &mut [u8]) -> Result<usize> {
        Lease::single(self)?.serialize_into(out)
    }

    /// Serialize into a new string
    pub fn to_json(&mut self) -> Result<String> {
        Lease::single(self)?.to_json()
    }

    /// Parse a single response with default limits
    pub fn parse(text: &[u8]) -> Result<Self> {
        Codec::default().parse_response(text)
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub(crate) code: i32,
    pub(crate) message: String,
    pub(crate) data: Option<Value>,
}

impl ErrorObject {
    /// Create a new error; the message must not be empty
    pub fn new(code: i32, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        if message.is_empty() {
            return Err(Error::invalid_args("error message must not be empty"));
        }
        Ok(Self::from_parts(code, message, None))
    }

    pub(crate) fn from_parts(code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            code,
            message,
            data,
        }
    }

    /// Attach additional data, dropping any previous data
    pub fn set_data(&mut self, data: Value) {
        self.data = Some(data);
    }

    /// Detach the data, handing ownership back to the caller
    pub fn take_data(&mut self) -> Option<Value> {
        self.data.take()
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn validate(&self) -> Result<()> {
        if self.message.is_empty() {
            return Err(Error::validation("error message must not be empty"));
        }
        Ok(())
    }

    /// Check if this is a parse error (-32700)
    pub fn is_parse_error(&self) -> bool {
        self.code == error_codes::PARSE_ERROR
    }

    /// Check if this is an invalid request error (-32600)
    pub fn is_invalid_request(&self) -> bool {
        self.code == error_codes::INVALID_REQUEST
    }

    /// Check if this is a method not found error (-32601)
    pub fn is_method_not_found(&self) -> bool {
        self.code == error_codes::METHOD_NOT_FOUND
    }

    pub fn is_invalid_params(&self) -> bool {
        self.code == error_codes::INVALID_PARAMS
    }

    pub fn is_internal_error(&self) -> bool {
        self.code == error_codes::INTERNAL_ERROR
    }

    pub fn is_server_error(&self) -> bool {
        (error_codes::SERVER_ERROR_MIN..=error_codes::SERVER_ERROR_MAX).contains(&self.code)
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn serialize_into(&mut self, out: &mut [u8]) -> Result<usize> {
        Lease::single(self)?.serialize_into(out)
    }

    /// Serialize into a new string
    pub fn to_json(&mut self) -> Result<String> {
        Lease::single(self)?.to_json()
    }
}

/// Standard JSON-RPC 2.0 error codes.
///
/// These are data values carried inside an [`ErrorObject`], not control
/// flow errors.
///
/// # Example
/// ```rust
/// use ash_rpc_envelope::{ErrorObject, error_codes};
///
/// let error = ErrorObject::new(error_codes::METHOD_NOT_FOUND, "Method not found").unwrap();
/// assert!(error.is_method_not_found());
/// ```
pub mod error_codes {
    /// Parse error - Invalid JSON was received by the server.
    pub const PARSE_ERROR: i32 = -32700;

    /// Invalid Request - The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;

    /// Method not found - The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;

    /// Invalid params - Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;

    /// Internal error - Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;

    /// Lowest code of the implementation-defined server error range
    pub const SERVER_ERROR_MIN: i32 = -32099;

    /// Highest code of the implementation-defined server error range
    pub const SERVER_ERROR_MAX: i32 = -32000;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Id tests
    #[test]
    fn test_id_default_is_none() {
        assert_eq!(Id::default(), Id::None);
        assert!(Id::default().is_none());
    }

    #[test]
    fn test_id_setters_overwrite() {
        let mut id = Id::default();
        id.set_string("abc");
        assert_eq!(id.as_str(), Some("abc"));

        id.set_number(7);
        assert_eq!(id, Id::Number(7));
        assert_eq!(id.as_str(), None);

        id.set_null();
        assert_eq!(id, Id::Null);

        id.set_notification();
        assert!(id.is_none());
    }

    #[test]
    fn test_id_clone_is_deep() {
        let original = Id::from("shared");
        let mut copy = original.clone();
        copy.set_string("changed");
        assert_eq!(original.as_str(), Some("shared"));
        assert_eq!(copy.as_str(), Some("changed"));
    }

    #[test]
    fn test_id_conversions_and_display() {
        assert_eq!(Id::from(5i32), Id::Number(5));
        assert_eq!(Id::from(String::from("x")), Id::String("x".into()));
        assert_eq!(Id::Number(-3).to_string(), "-3");
        assert_eq!(Id::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Id::from("\u{1}").to_string(), "\"\\u0001\"");
        assert_eq!(Id::from("é\n").to_string(), "\"é\\n\"");
        assert_eq!(Id::Null.to_string(), "null");
    }

    #[test]
    fn test_id_to_node() {
        assert_eq!(Id::None.to_node(), None);
        assert_eq!(Id::Null.to_node(), Some(Value::Null));
        assert_eq!(Id::Number(i64::MAX).to_node(), Some(json!(i64::MAX)));
        assert_eq!(Id::from("q").to_node(), Some(json!("q")));
    }

    // Request tests
    #[test]
    fn test_request_creation() {
        let request = Request::new("test_method").unwrap();
        assert_eq!(request.version(), "2.0");
        assert_eq!(request.method(), "test_method");
        assert!(request.params().is_none());
        assert!(request.is_notification());
        assert!(!request.expects_response());
    }

    #[test]
    fn test_request_method_name_bounds() {
        assert!(Request::new("").unwrap_err().is_invalid_args());
        assert!(Request::new("m".repeat(METHOD_NAME_MAX_LEN)).is_ok());
        assert!(
            Request::new("m".repeat(METHOD_NAME_MAX_LEN + 1))
                .unwrap_err()
                .is_invalid_args()
        );
    }

    #[test]
    fn test_request_with_id() {
        let id = Id::Number(42);
        let request = Request::with_id("method", &id).unwrap();
        assert_eq!(request.id(), &id);
        assert!(request.expects_response());
        assert!(!request.is_notification());
    }

    #[test]
    fn test_request_set_id_replaces() {
        let mut request = Request::with_id("m", &Id::from("first")).unwrap();
        request.set_id(&Id::Null);
        assert_eq!(request.id(), &Id::Null);
        assert!(!request.is_notification());
    }

    #[test]
    fn test_request_set_params_accepts_structured() {
        let mut request = Request::new("m").unwrap();
        request.set_params(json!([1, 2, 3])).unwrap();
        assert_eq!(request.params(), Some(&json!([1, 2, 3])));
        request.set_params(json!({"key": "value"})).unwrap();
        assert_eq!(request.params(), Some(&json!({"key": "value"})));
    }

    #[test]
    fn test_request_set_params_rejects_scalar_and_keeps_previous() {
        let mut request = Request::new("m").unwrap();
        request.set_params(json!({"keep": true})).unwrap();

        let err = request.set_params(json!("scalar")).unwrap_err();
        assert!(err.is_validation());
        assert!(request.set_params(Value::Null).unwrap_err().is_validation());
        assert_eq!(request.params(), Some(&json!({"keep": true})));
    }

    #[test]
    fn test_request_take_params() {
        let mut request = Request::new("m").unwrap();
        request.set_params(json!([1])).unwrap();
        assert_eq!(request.take_params(), Some(json!([1])));
        assert!(request.params().is_none());
    }

    #[test]
    fn test_request_validate() {
        let mut request = Request::new("ok").unwrap();
        assert!(request.validate().is_ok());

        request.set_id(&Id::from(""));
        assert!(request.validate().unwrap_err().is_validation());

        request.set_id(&Id::Null);
        assert!(request.validate().is_ok());

        request.method.clear();
        assert!(request.validate().unwrap_err().is_validation());
    }

    // Response tests
    #[test]
    fn test_response_constructors() {
        let response = Response::new(5);
        assert_eq!(response.id(), &Id::Number(5));
        assert!(response.outcome().is_none());

        let response = Response::with_id(&Id::from("abc"));
        assert_eq!(response.id().as_str(), Some("abc"));
        assert_eq!(response.version(), "2.0");
    }

    #[test]
    fn test_response_for_request() {
        let request = Request::with_id("sum", &Id::from("r-1")).unwrap();
        let response = Response::for_request(&request).unwrap();
        assert_eq!(response.id(), request.id());
    }

    #[test]
    fn test_response_for_notification_fails() {
        let notification = Request::new("ping").unwrap();
        let err = Response::for_request(&notification).unwrap_err();
        assert!(err.is_invalid_args());
    }

    #[test]
    fn test_response_result_then_error_fails() {
        let mut response = Response::new(1);
        response.set_result(json!({"status": "ok"})).unwrap();
        let before = response.clone();

        let error = ErrorObject::new(-32600, "Invalid request").unwrap();
        assert!(response.set_error(error).unwrap_err().is_invalid_args());
        assert!(response.set_result(json!(2)).unwrap_err().is_invalid_args());
        assert_eq!(response, before);
        assert!(response.is_success());
        assert!(!response.is_error());
    }

    #[test]
    fn test_response_error_then_result_fails() {
        let mut response = Response::new(1);
        let error = ErrorObject::new(-32600, "Invalid request").unwrap();
        response.set_error(error.clone()).unwrap();

        assert!(response.set_result(json!(true)).unwrap_err().is_invalid_args());
        assert!(response.is_error());
        assert_eq!(response.error(), Some(&error));
        assert!(response.result().is_none());
    }

    #[test]
    fn test_response_validate() {
        let mut response = Response::with_id(&Id::None);
        response.set_result(json!(1)).unwrap();
        assert!(response.validate().unwrap_err().is_validation());

        let response = Response::new(1);
        assert!(response.validate().unwrap_err().is_validation());

        let mut response = Response::with_id(&Id::from(""));
        response.set_result(json!(1)).unwrap();
        assert!(response.validate().unwrap_err().is_validation());

        let mut response = Response::with_id(&Id::Null);
        response.set_result(Value::Null).unwrap();
        assert!(response.validate().is_ok());
    }

    #[test]
    fn test_response_validate_checks_error_object() {
        let mut response = Response::new(3);
        response
            .set_error(ErrorObject::from_parts(-32000, String::new(), None))
            .unwrap();
        assert!(response.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_response_take_outcome() {
        let mut response = Response::new(1);
        response.set_result(json!("value")).unwrap();
        assert_eq!(response.take_outcome(), Some(Outcome::Result(json!("value"))));
        assert!(response.set_error(ErrorObject::new(1, "late").unwrap()).is_ok());
    }

    // ErrorObject tests
    #[test]
    fn test_error_creation() {
        let error = ErrorObject::new(-32600, "Test error").unwrap();
        assert_eq!(error.code(), -32600);
        assert_eq!(error.message(), "Test error");
        assert!(error.data().is_none());
        assert!(error.validate().is_ok());
    }

    #[test]
    fn test_error_empty_message_rejected() {
        assert!(ErrorObject::new(-32000, "").unwrap_err().is_invalid_args());
    }

    #[test]
    fn test_error_set_data_replaces() {
        let mut error = ErrorObject::new(-32000, "Error").unwrap();
        error.set_data(json!({"details": "first"}));
        error.set_data(json!("second"));
        assert_eq!(error.data(), Some(&json!("second")));
        assert_eq!(error.take_data(), Some(json!("second")));
        assert!(error.data().is_none());
    }

    #[test]
    fn test_error_type_checks() {
        let make = |code| ErrorObject::new(code, "msg").unwrap();
        assert!(make(error_codes::PARSE_ERROR).is_parse_error());
        assert!(make(error_codes::INVALID_REQUEST).is_invalid_request());
        assert!(make(error_codes::METHOD_NOT_FOUND).is_method_not_found());
        assert!(make(error_codes::INVALID_PARAMS).is_invalid_params());
        assert!(make(error_codes::INTERNAL_ERROR).is_internal_error());
        assert!(make(-32001).is_server_error());
        assert!(!make(-32700).is_server_error());
    }

    #[test]
    fn test_error_is_server_error_bounds() {
        let make = |code| ErrorObject::new(code, "msg").unwrap();
        assert!(make(-32099).is_server_error());
        assert!(make(-32000).is_server_error());
        assert!(!make(-31999).is_server_error());
        assert!(!make(-32100).is_server_error());
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(error_codes::PARSE_ERROR, -32700);
        assert_eq!(error_codes::INVALID_REQUEST, -32600);
        assert_eq!(error_codes::METHOD_NOT_FOUND, -32601);
        assert_eq!(error_codes::INVALID_PARAMS, -32602);
        assert_eq!(error_codes::INTERNAL_ERROR, -32603);
        assert_eq!(error_codes::SERVER_ERROR_MIN, -32099);
        assert_eq!(error_codes::SERVER_ERROR_MAX, -32000);
    }
}
