//! Response envelope handling shared by HTTP responses and stream frames.
//!
//! A payload is either the raw value or `{success?, data, message?, error?}`.
//! Only an object carrying a `data` key counts as an envelope; anything else
//! is passed through untouched.

use serde_json::Value;

use crate::coerce::{to_record, to_string};
use crate::error::{Error, Result};

const GENERIC_FAILURE: &str = "request failed";

/// Strip the envelope, failing with [`Error::Protocol`] on `success: false`.
///
/// An absent `success` is not a failure.
pub fn unwrap_envelope(payload: Value) -> Result<Value> {
    let Value::Object(mut map) = payload else {
        return Ok(payload);
    };
    if !map.contains_key("data") {
        return Ok(Value::Object(map));
    }
    if map.get("success") == Some(&Value::Bool(false)) {
        return Err(Error::Protocol(failure_message(&Value::Object(map))));
    }
    Ok(map.remove("data").unwrap_or(Value::Null))
}

/// `error` when it is a string, else `message`, else a generic fallback.
fn failure_message(envelope: &Value) -> String {
    let Some(map) = to_record(Some(envelope)) else {
        return GENERIC_FAILURE.to_string();
    };
    if let Some(Value::String(error)) = map.get("error") {
        return error.clone();
    }
    to_string(map.get("message")).unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
