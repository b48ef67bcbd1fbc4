//! Builder patterns for JSON-RPC types.
//!
//! Every `build` runs the same checks as the entity constructors and
//! setters, so a builder never hands out an entity the wire would reject.

use crate::error::Result;
use crate::types::{ErrorObject, Id, Request, Response};
use serde_json::Value;

/// Builder for JSON-RPC requests
pub struct RequestBuilder {
    method: String,
    params: Option<Value>,
    id: Id,
}

impl RequestBuilder {
    /// Create a new request builder
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
            id: Id::None,
        }
    }

    /// Set request parameters
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Set request ID
    pub fn id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Result<Request> {
        let mut request = Request::new(self.method)?;
        request.id = self.id;
        if let Some(params) = self.params {
            request.set_params(params)?;
        }
        request.validate()?;
        Ok(request)
    }
}

/// Builder for JSON-RPC notifications
pub struct NotificationBuilder {
    method: String,
    params: Option<Value>,
}

impl NotificationBuilder {
    /// Create a new notification builder
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }

    /// Set notification parameters
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Build the notification
    pub fn build(self) -> Result<Request> {
        let mut request = Request::new(self.method)?;
        if let Some(params) = self.params {
            request.set_params(params)?;
        }
        Ok(request)
    }
}

/// Builder for JSON-RPC responses
#[derive(Default)]
pub struct ResponseBuilder {
    result: Option<Value>,
    error: Option<ErrorObject>,
    id: Id,
}

impl ResponseBuilder {
    /// Create a new response builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set successful result
    pub fn success(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Set error
    pub fn error(mut self, error: ErrorObject) -> Self {
        self.error = Some(error);
        self
    }

    /// Set response ID
    pub fn id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    /// Build the response.
    ///
    /// Setting both a result and an error fails the same way the response
    /// setters do.
    pub fn build(self) -> Result<Response> {
        let mut response = Response {
            id: self.id,
            outcome: None,
        };
        if let Some(result) = self.result {
            response.set_result(result)?;
        }
        if let Some(error) = self.error {
            response.set_error(error)?;
        }
        response.validate()?;
        Ok(response)
    }
}

/// Builder for JSON-RPC errors
pub struct ErrorBuilder {
    code: i32,
    message: String,
    data: Option<Value>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Add additional error data
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Build the error
    pub fn build(self) -> Result<ErrorObject> {
        let mut error = ErrorObject::new(self.code, self.message)?;
        if let Some(data) = self.data {
            error.set_data(data);
        }
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = RequestBuilder::new("add")
            .params(json!([5, 3]))
            .id(1)
            .build()
            .unwrap();
        assert_eq!(request.method(), "add");
        assert_eq!(request.params(), Some(&json!([5, 3])));
        assert_eq!(request.id(), &Id::Number(1));
    }

    #[test]
    fn test_request_builder_rejects_bad_input() {
        assert!(RequestBuilder::new("").build().unwrap_err().is_invalid_args());
        assert!(
            RequestBuilder::new("m")
                .params(json!(42))
                .build()
                .unwrap_err()
                .is_validation()
        );
        assert!(
            RequestBuilder::new("m")
                .id("")
                .build()
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn test_notification_builder() {
        let notification = NotificationBuilder::new("log")
            .params(json!({"level": "info"}))
            .build()
            .unwrap();
        assert!(notification.is_notification());
        assert_eq!(notification.params(), Some(&json!({"level": "info"})));
    }

    #[test]
    fn test_response_builder_success() {
        let response = ResponseBuilder::new()
            .success(json!({"value": 8}))
            .id("req-1")
            .build()
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.id(), &Id::from("req-1"));
    }

    #[test]
    fn test_response_builder_error() {
        let error = ErrorBuilder::new(error_codes::INVALID_PARAMS, "Invalid params")
            .data(json!({"expected": "array"}))
            .build()
            .unwrap();
        let response = ResponseBuilder::new().error(error).id(Id::Null).build().unwrap();
        assert!(response.is_error());
        assert_eq!(
            response.error().unwrap().data(),
            Some(&json!({"expected": "array"}))
        );
    }

    #[test]
    fn test_response_builder_needs_exactly_one_outcome() {
        let error = ErrorObject::new(-32000, "boom").unwrap();
        let both = ResponseBuilder::new().success(json!(1)).error(error).id(1).build();
        assert!(both.unwrap_err().is_invalid_args());

        let neither = ResponseBuilder::new().id(1).build();
        assert!(neither.unwrap_err().is_validation());
    }

    #[test]
    fn test_response_builder_needs_id() {
        let err = ResponseBuilder::new().success(json!(true)).build().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_builder_rejects_empty_message() {
        assert!(ErrorBuilder::new(-32000, "").build().unwrap_err().is_invalid_args());
    }
}
