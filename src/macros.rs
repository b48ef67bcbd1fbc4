//! Convenience macros for JSON-RPC message creation.
//!
//! Every macro expands to a builder call and yields a `Result`. Response
//! macros given no ID answer with `"id": null`, the identifier JSON-RPC
//! reserves for requests whose own ID could not be read.

/// Create a success response with a result value and optional ID
///
/// # Examples:
/// ```rust
/// use ash_rpc_envelope::{Id, rpc_success};
///
/// let response = rpc_success!(42, 1).unwrap();
/// assert_eq!(response.id(), &Id::Number(1));
///
/// let response = rpc_success!({"status": "ok"}).unwrap();
/// assert_eq!(response.id(), &Id::Null);
/// ```
#[macro_export]
macro_rules! rpc_success {
    ($result:tt, $id:expr) => {
        $crate::ResponseBuilder::new()
            .success($crate::serde_json::json!($result))
            .id($id)
            .build()
    };
    ($result:tt) => {
        $crate::ResponseBuilder::new()
            .success($crate::serde_json::json!($result))
            .id($crate::Id::Null)
            .build()
    };
}

/// Create an error response with code, message, and optional ID
///
/// # Usage:
/// ```rust
/// use ash_rpc_envelope::{error_codes, rpc_error};
///
/// let response = rpc_error!(error_codes::INVALID_PARAMS, "Invalid parameters", 1).unwrap();
/// assert!(response.error().unwrap().is_invalid_params());
///
/// let response = rpc_error!(-32601, "Method not found").unwrap();
/// assert!(response.is_error());
/// ```
#[macro_export]
macro_rules! rpc_error {
    ($code:expr, $message:expr, $id:expr) => {
        $crate::ErrorBuilder::new($code, $message)
            .build()
            .and_then(|error| $crate::ResponseBuilder::new().error(error).id($id).build())
    };
    ($code:expr, $message:expr) => {
        $crate::rpc_error!($code, $message, $crate::Id::Null)
    };
}

/// Create an error response with code, message, additional data and optional ID
///
/// # Usage:
/// ```rust
/// use ash_rpc_envelope::rpc_error_with_data;
///
/// let response =
///     rpc_error_with_data!(-32602, "Invalid parameters", {"expected": "array"}, 1).unwrap();
/// assert!(response.error().unwrap().data().is_some());
/// ```
#[macro_export]
macro_rules! rpc_error_with_data {
    ($code:expr, $message:expr, $data:tt, $id:expr) => {
        $crate::ErrorBuilder::new($code, $message)
            .data($crate::serde_json::json!($data))
            .build()
            .and_then(|error| $crate::ResponseBuilder::new().error(error).id($id).build())
    };
    ($code:expr, $message:expr, $data:tt) => {
        $crate::rpc_error_with_data!($code, $message, $data, $crate::Id::Null)
    };
}

/// Common error response shortcuts using predefined error codes
///
/// # Usage:
/// ```rust
/// use ash_rpc_envelope::{rpc_internal_error, rpc_invalid_params, rpc_method_not_found};
///
/// let id = 7;
/// assert!(rpc_invalid_params!("Expected array of two numbers", id).is_ok());
/// assert!(rpc_method_not_found!(id).is_ok());
/// assert!(rpc_internal_error!("Database connection failed").is_ok());
/// ```
#[macro_export]
macro_rules! rpc_invalid_params {
    ($message:expr, $id:expr) => {
        $crate::rpc_error!($crate::error_codes::INVALID_PARAMS, $message, $id)
    };
    ($message:expr) => {
        $crate::rpc_error!($crate::error_codes::INVALID_PARAMS, $message)
    };
}

#[macro_export]
macro_rules! rpc_method_not_found {
    ($id:expr) => {
        $crate::rpc_error!($crate::error_codes::METHOD_NOT_FOUND, "Method not found", $id)
    };
    () => {
        $crate::rpc_error!($crate::error_codes::METHOD_NOT_FOUND, "Method not found")
    };
}

#[macro_export]
macro_rules! rpc_parse_error {
    ($message:expr, $id:expr) => {
        $crate::rpc_error!($crate::error_codes::PARSE_ERROR, $message, $id)
    };
    ($message:expr) => {
        $crate::rpc_error!($crate::error_codes::PARSE_ERROR, $message)
    };
}

#[macro_export]
macro_rules! rpc_internal_error {
    ($message:expr, $id:expr) => {
        $crate::rpc_error!($crate::error_codes::INTERNAL_ERROR, $message, $id)
    };
    ($message:expr) => {
        $crate::rpc_error!($crate::error_codes::INTERNAL_ERROR, $message)
    };
}

/// Create a JSON-RPC request
///
/// # Usage:
/// ```rust
/// use ash_rpc_envelope::rpc_request;
///
/// let add = rpc_request!("add", [5, 3], 1).unwrap();
/// let ping = rpc_request!("ping", 2).unwrap();
/// let log = rpc_request!("log").unwrap();
/// assert!(log.is_notification());
/// # assert!(add.params().is_some() && ping.params().is_none());
/// ```
#[macro_export]
macro_rules! rpc_request {
    ($method:expr, $params:tt, $id:expr) => {
        $crate::RequestBuilder::new($method)
            .params($crate::serde_json::json!($params))
            .id($id)
            .build()
    };
    ($method:expr, $id:expr) => {
        $crate::RequestBuilder::new($method).id($id).build()
    };
    ($method:expr) => {
        $crate::NotificationBuilder::new($method).build()
    };
}

/// Create a JSON-RPC notification
///
/// # Usage:
/// ```rust
/// use ash_rpc_envelope::rpc_notification;
///
/// let log = rpc_notification!("log", {"level": "info", "message": "Hello"}).unwrap();
/// assert!(log.is_notification());
/// ```
#[macro_export]
macro_rules! rpc_notification {
    ($method:expr, $params:tt) => {
        $crate::NotificationBuilder::new($method)
            .params($crate::serde_json::json!($params))
            .build()
    };
    ($method:expr) => {
        $crate::NotificationBuilder::new($method).build()
    };
}

/// Create a JSON-RPC error object (not a response)
#[macro_export]
macro_rules! rpc_error_obj {
    ($code:expr, $message:expr, $data:tt) => {
        $crate::ErrorBuilder::new($code, $message)
            .data($crate::serde_json::json!($data))
            .build()
    };
    ($code:expr, $message:expr) => {
        $crate::ErrorBuilder::new($code, $message).build()
    };
}
