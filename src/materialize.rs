//! Tree to entity conversion.
//!
//! Each materializer consumes the tree it is given. Nested payloads
//! (params, result, error data) are detached from the parsed tree and
//! moved into the new entity, never copied.

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::tree::{self, Node};
use crate::types::{ErrorObject, Id, Outcome, Request, Response};
use crate::{JSONRPC_VERSION, METHOD_NAME_MAX_LEN};
use serde_json::{Map, Number, Value};

/// Tolerance used when checking that a floating-point id is integral
const INTEGRAL_TOLERANCE: f64 = 1e-10;

type Object = Map<String, Value>;

fn expect_object(node: Node, what: &str) -> Result<Object> {
    match node {
        Value::Object(map) => Ok(map),
        other => Err(Error::validation(format!(
            "{what} must be an object, found {}",
            tree::type_name(&other)
        ))),
    }
}

fn check_version(object: &Object) -> Result<()> {
    match object.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(()),
        Some(Value::String(version)) => Err(Error::validation(format!(
            "unsupported jsonrpc version \"{version}\""
        ))),
        Some(other) => Err(Error::validation(format!(
            "jsonrpc must be a string, found {}",
            tree::type_name(other)
        ))),
        None => Err(Error::validation("missing jsonrpc field")),
    }
}

/// Classify an id node
pub fn id_from_node(node: Node) -> Result<Id> {
    match node {
        Value::Null => Ok(Id::Null),
        Value::String(value) if value.is_empty() => {
            Err(Error::validation("string id must not be empty"))
        }
        Value::String(value) => Ok(Id::String(value)),
        Value::Number(number) => number_id(&number).map(Id::Number),
        other => Err(Error::validation(format!(
            "id must be a number, string or null, found {}",
            tree::type_name(&other)
        ))),
    }
}

/// Integers are taken as-is; floats must be integral and within `i64`
fn number_id(number: &Number) -> Result<i64> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    if number.is_u64() {
        return Err(Error::validation(format!(
            "id {number} is outside the 64-bit signed range"
        )));
    }

    let value = number
        .as_f64()
        .ok_or_else(|| Error::validation(format!("id {number} is not representable")))?;
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !value.is_finite() || value >= i64::MAX as f64 || value < i64::MIN as f64 {
        return Err(Error::validation(format!(
            "id {value} is outside the 64-bit signed range"
        )));
    }
    let truncated = value as i64;
    if (truncated as f64 - value).abs() >= INTEGRAL_TOLERANCE {
        return Err(Error::validation(format!("id {value} is not an integer")));
    }
    Ok(truncated)
}

/// Materialize a request
pub fn request_from_node(node: Node) -> Result<Request> {
    let mut object = expect_object(node, "request")?;
    check_version(&object)?;

    let method = match tree::detach(&mut object, "method") {
        Some(Value::String(method)) => method,
        Some(other) => {
            return Err(Error::validation(format!(
                "method must be a string, found {}",
                tree::type_name(&other)
            )));
        }
        None => return Err(Error::validation("missing method field")),
    };
    if method.is_empty() || method.len() > METHOD_NAME_MAX_LEN {
        return Err(Error::validation(format!(
            "method name must be 1..={METHOD_NAME_MAX_LEN} bytes, got {}",
            method.len()
        )));
    }

    let params = match tree::detach(&mut object, "params") {
        Some(params) if tree::is_structured(&params) => Some(params),
        Some(other) => {
            return Err(Error::validation(format!(
                "params must be an array or object, found {}",
                tree::type_name(&other)
            )));
        }
        None => None,
    };

    let id = match tree::detach(&mut object, "id") {
        Some(node) => id_from_node(node)?,
        None => Id::None,
    };

    Ok(Request { id, method, params })
}

/// Materialize an error object
pub fn error_object_from_node(node: Node, limits: &Limits) -> Result<ErrorObject> {
    let mut object = expect_object(node, "error")?;

    let code = match object.get("code") {
        Some(Value::Number(code)) => code
            .as_i64()
            .and_then(|code| i32::try_from(code).ok())
            .ok_or_else(|| {
                Error::validation(format!("error code {code} is not a 32-bit integer"))
            })?,
        Some(other) => {
            return Err(Error::validation(format!(
                "error code must be a number, found {}",
                tree::type_name(other)
            )));
        }
        None => return Err(Error::validation("missing error code")),
    };

    let message = match tree::detach(&mut object, "message") {
        Some(Value::String(message)) => message,
        Some(other) => {
            return Err(Error::validation(format!(
                "error message must be a string, found {}",
                tree::type_name(&other)
            )));
        }
        None => return Err(Error::validation("missing error message")),
    };
    if message.is_empty() {
        return Err(Error::validation("error message must not be empty"));
    }
    if message.len() > limits.max_error_message_len {
        return Err(Error::validation(format!(
            "error message of {} bytes exceeds the {} byte limit",
            message.len(),
            limits.max_error_message_len
        )));
    }

    let data = tree::detach(&mut object, "data");

    Ok(ErrorObject::from_parts(code, message, data))
}

/// Materialize a response
pub fn response_from_node(node: Node, limits: &Limits) -> Result<Response> {
    let mut object = expect_object(node, "response")?;
    check_version(&object)?;

    let id_node = tree::detach(&mut object, "id")
        .ok_or_else(|| Error::validation("missing response id"))?;

    let outcome = match (
        tree::detach(&mut object, "result"),
        tree::detach(&mut object, "error"),
    ) {
        (Some(result), None) => Outcome::Result(result),
        (None, Some(error)) => Outcome::Error(error_object_from_node(error, limits)?),
        (Some(_), Some(_)) => {
            return Err(Error::validation("response carries both result and error"));
        }
        (None, None) => return Err(Error::validation("response needs a result or an error")),
    };

    let id = id_from_node(id_node)?;

    Ok(Response {
        id,
        outcome: Some(outcome),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_with_everything() {
        let request = request_from_node(json!({
            "jsonrpc": "2.0",
            "id": 42,
            "method": "echo",
            "params": {"text": "hi"}
        }))
        .unwrap();
        assert_eq!(request.method(), "echo");
        assert_eq!(request.id(), &Id::Number(42));
        assert_eq!(request.params(), Some(&json!({"text": "hi"})));
    }

    #[test]
    fn test_request_without_id_is_notification() {
        let request = request_from_node(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap();
        assert!(request.is_notification());
        assert!(request.params().is_none());
    }

    #[test]
    fn test_request_explicit_null_id() {
        let request =
            request_from_node(json!({"jsonrpc": "2.0", "id": null, "method": "m"})).unwrap();
        assert_eq!(request.id(), &Id::Null);
        assert!(!request.is_notification());
    }

    #[test]
    fn test_version_checks() {
        for node in [
            json!({"method": "m"}),
            json!({"jsonrpc": "1.0", "method": "m"}),
            json!({"jsonrpc": 2.0, "method": "m"}),
            json!({"jsonrpc": "2.0 ", "method": "m"}),
        ] {
            assert!(request_from_node(node).unwrap_err().is_validation());
        }
    }

    #[test]
    fn test_request_method_checks() {
        assert!(request_from_node(json!({"jsonrpc": "2.0"})).unwrap_err().is_validation());
        assert!(
            request_from_node(json!({"jsonrpc": "2.0", "method": 5}))
                .unwrap_err()
                .is_validation()
        );
        assert!(
            request_from_node(json!({"jsonrpc": "2.0", "method": ""}))
                .unwrap_err()
                .is_validation()
        );
        let long = "x".repeat(METHOD_NAME_MAX_LEN + 1);
        assert!(
            request_from_node(json!({"jsonrpc": "2.0", "method": long}))
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn test_request_params_must_be_structured() {
        for params in [json!(1), json!("s"), json!(null), json!(true)] {
            let node = json!({"jsonrpc": "2.0", "method": "m", "params": params});
            assert!(request_from_node(node).unwrap_err().is_validation());
        }
    }

    #[test]
    fn test_request_not_an_object() {
        assert!(request_from_node(json!([1])).unwrap_err().is_validation());
        assert!(request_from_node(json!("x")).unwrap_err().is_validation());
    }

    #[test]
    fn test_id_classification() {
        assert_eq!(id_from_node(json!(null)).unwrap(), Id::Null);
        assert_eq!(id_from_node(json!("abc")).unwrap(), Id::from("abc"));
        assert_eq!(id_from_node(json!(-17)).unwrap(), Id::Number(-17));
        assert_eq!(id_from_node(json!(i64::MIN)).unwrap(), Id::Number(i64::MIN));
        assert!(id_from_node(json!(true)).unwrap_err().is_validation());
        assert!(id_from_node(json!({"x": 1})).unwrap_err().is_validation());
        assert!(id_from_node(json!([1])).unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_string_id_rejected() {
        assert!(id_from_node(json!("")).unwrap_err().is_validation());

        let request = json!({"jsonrpc": "2.0", "id": "", "method": "m"});
        assert!(request_from_node(request).unwrap_err().is_validation());

        let response = json!({"jsonrpc": "2.0", "id": "", "result": 1});
        let err = response_from_node(response, &Limits::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_parsed_string_id_can_be_answered() {
        let node = json!({"jsonrpc": "2.0", "id": "r", "method": "m"});
        let request = request_from_node(node).unwrap();
        assert!(request.validate().is_ok());

        let mut response = Response::for_request(&request).unwrap();
        response.set_result(json!(1)).unwrap();
        assert_eq!(
            response.to_json().unwrap(),
            r#"{"jsonrpc":"2.0","id":"r","result":1}"#
        );
    }

    #[test]
    fn test_integral_float_id_accepted() {
        assert_eq!(id_from_node(json!(3.0)).unwrap(), Id::Number(3));
        assert_eq!(id_from_node(json!(-1e3)).unwrap(), Id::Number(-1000));
    }

    #[test]
    fn test_fractional_id_rejected() {
        assert!(id_from_node(json!(1.5)).unwrap_err().is_validation());
        assert!(id_from_node(json!(-0.25)).unwrap_err().is_validation());
    }

    #[test]
    fn test_out_of_range_ids_rejected() {
        assert!(id_from_node(json!(u64::MAX)).unwrap_err().is_validation());
        assert!(id_from_node(json!(1e19)).unwrap_err().is_validation());
        assert!(id_from_node(json!(-1e19)).unwrap_err().is_validation());
        assert!(id_from_node(json!(9.3e18)).unwrap_err().is_validation());
    }

    #[test]
    fn test_large_integer_id_is_exact() {
        let node: Value = serde_json::from_str("9007199254740993").unwrap();
        assert_eq!(id_from_node(node).unwrap(), Id::Number(9_007_199_254_740_993));
    }

    #[test]
    fn test_response_result() {
        let response = response_from_node(
            json!({"jsonrpc": "2.0", "id": "abc", "result": true}),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(response.id(), &Id::from("abc"));
        assert_eq!(response.result(), Some(&json!(true)));
    }

    #[test]
    fn test_response_null_result_counts_as_present() {
        let response = response_from_node(
            json!({"jsonrpc": "2.0", "id": 1, "result": null}),
            &Limits::default(),
        )
        .unwrap();
        assert!(response.is_success());
        assert_eq!(response.result(), Some(&Value::Null));
    }

    #[test]
    fn test_response_error_with_data() {
        let response = response_from_node(
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": {"code": -32601, "message": "not found", "data": {"detail": "missing"}}
            }),
            &Limits::default(),
        )
        .unwrap();
        let error = response.error().unwrap();
        assert!(error.is_method_not_found());
        assert_eq!(error.message(), "not found");
        assert_eq!(error.data(), Some(&json!({"detail": "missing"})));
    }

    #[test]
    fn test_response_requires_id() {
        let err = response_from_node(json!({"jsonrpc": "2.0", "result": 1}), &Limits::default())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_response_outcome_xor() {
        let limits = Limits::default();
        let both = json!({
            "jsonrpc": "2.0", "id": 1, "result": 1,
            "error": {"code": 1, "message": "m"}
        });
        assert!(response_from_node(both, &limits).unwrap_err().is_validation());

        let neither = json!({"jsonrpc": "2.0", "id": 1});
        assert!(response_from_node(neither, &limits).unwrap_err().is_validation());
    }

    #[test]
    fn test_response_fractional_id_rejected() {
        let err = response_from_node(
            json!({"jsonrpc": "2.0", "id": 1.5, "result": 1}),
            &Limits::default(),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_object_checks() {
        let limits = Limits::default();
        let cases = [
            json!("not an object"),
            json!({"message": "no code"}),
            json!({"code": "1", "message": "m"}),
            json!({"code": 1.5, "message": "m"}),
            json!({"code": 4294967296i64, "message": "m"}),
            json!({"code": 1}),
            json!({"code": 1, "message": ""}),
            json!({"code": 1, "message": 7}),
        ];
        for node in cases {
            assert!(error_object_from_node(node, &limits).unwrap_err().is_validation());
        }
    }

    #[test]
    fn test_error_message_limit() {
        let limits = Limits::default().with_max_error_message_len(4);
        assert!(error_object_from_node(json!({"code": 1, "message": "four"}), &limits).is_ok());
        assert!(
            error_object_from_node(json!({"code": 1, "message": "fives"}), &limits)
                .unwrap_err()
                .is_validation()
        );
    }
}
