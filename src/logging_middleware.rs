// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, enabled, Level};

/// JSON keys whose values never reach the log
const REDACTED_KEYS: [&str; 3] = ["secretKey", "secret", "idToken"];

/// Replaces sensitive values anywhere in a JSON document
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if REDACTED_KEYS.contains(&key.as_str()) {
                    *v = Value::String("[REDACTED]".to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Renders a body for the log; non-JSON bodies are logged as is
fn printable(bytes: &[u8]) -> Option<String> {
    let body_str = std::str::from_utf8(bytes).ok()?;

    match serde_json::from_str::<Value>(body_str) {
        Ok(mut json) => {
            redact(&mut json);
            Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()))
        }
        Err(_) => Some(body_str.to_string()),
    }
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        if let Some(request_body) = printable(&bytes) {
            debug!(
                method = %parts.method,
                uri = %parts.uri,
                request_body = %request_body,
                "📥 Request"
            );
        }
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        if let Some(response_body) = printable(&bytes) {
            debug!(
                status = %parts.status,
                response_body = %response_body,
                "📤 Response"
            );
        }
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redacts_nested_secrets() {
        let mut body = json!({
            "email": "renter@example.com",
            "secretKey": "abc123",
            "grant": { "id": "K_1", "secret": "deadbeef" },
            "tokens": [{ "idToken": "eyJ..." }]
        });

        redact(&mut body);

        assert_eq!(body["email"], "renter@example.com");
        assert_eq!(body["secretKey"], "[REDACTED]");
        assert_eq!(body["grant"]["secret"], "[REDACTED]");
        assert_eq!(body["grant"]["id"], "K_1");
        assert_eq!(body["tokens"][0]["idToken"], "[REDACTED]");
    }

    #[test]
    fn test_plain_text_bodies_pass_through() {
        assert_eq!(printable(b"not json").as_deref(), Some("not json"));
        assert!(printable(&[0xff, 0xfe]).is_none());
    }
}
