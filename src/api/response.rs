use crate::api::ListShape;
use crate::error::{Result, TaskdeskError};
use crate::models::LoginResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract the record array from a list response according to its shape
pub fn extract_list(body: &Value, shape: ListShape) -> Result<Vec<Value>> {
    match (shape, body) {
        (ListShape::Bare, Value::Array(items)) => Ok(items.clone()),
        (_, Value::Object(map)) => match map.get("data") {
            None | Some(Value::Null) if shape == ListShape::Enveloped => Ok(vec![]),
            Some(Value::Array(items)) => Ok(items.clone()),
            _ => Err(TaskdeskError::MalformedResponse(
                "expected a \"data\" array in list response".to_string(),
            )),
        },
        _ => Err(TaskdeskError::MalformedResponse(format!(
            "unexpected list response: {}",
            kind_of(body)
        ))),
    }
}

/// Extract the single record from a `{"data": {...}}` response
pub fn extract_record(body: &Value) -> Result<Value> {
    body.get("data")
        .filter(|data| data.is_object())
        .cloned()
        .ok_or_else(|| TaskdeskError::MalformedResponse("No record in response".to_string()))
}

/// Parse a login response, requiring a non-empty token
pub fn extract_login(body: &Value) -> Result<LoginResponse> {
    let login: LoginResponse = serde_json::from_value(body.clone()).map_err(|e| {
        TaskdeskError::MalformedResponse(format!("Invalid login response: {}", e))
    })?;

    match login.token.as_deref() {
        Some(token) if !token.is_empty() => Ok(login),
        _ => Err(TaskdeskError::MalformedResponse(
            "Login response did not contain a token".to_string(),
        )),
    }
}

/// Human-readable message for a failed response body
pub fn error_message(body: &Value) -> String {
    if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
        return message.to_string();
    }

    if let Some(errors) = body.get("errors").and_then(|e| e.as_array()) {
        let messages: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }

    match body {
        Value::String(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => "request failed".to_string(),
    }
}

pub fn decode_list<T: DeserializeOwned>(body: &Value, shape: ListShape) -> Result<Vec<T>> {
    extract_list(body, shape)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(TaskdeskError::from))
        .collect()
}

pub fn decode_record<T: DeserializeOwned>(body: &Value) -> Result<T> {
    Ok(serde_json::from_value(extract_record(body)?)?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
