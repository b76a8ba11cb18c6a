//! Data models for the messages backend.
//!
//! `ApiRequest` and `ApiResponse` mirror the proxy-event shapes exchanged with
//! the runtime adapter, so they serialize with camelCase field names.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::error;

/// Message identifier (opaque to the router)
pub type MessageId = String;

/// Resource path of the message collection
pub const MESSAGES_RESOURCE: &str = "/messages";

/// Resource path of a single message (literal placeholder, not a template)
pub const MESSAGE_RESOURCE: &str = "/messages/{message_id}";

/// Path parameter carrying the message id
pub const MESSAGE_ID_PARAM: &str = "message_id";

/// Status code for every failed request
pub const FAILURE_STATUS: u16 = 400;

/// Headers attached to every response, success or failure
pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
];

/// A stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub message: String,
}

/// Count messages response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCount {
    pub message_count: u64,
}

/// Normalized inbound request, one per invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// Resource path the request targets (e.g. `/messages/{message_id}`)
    pub resource: String,

    /// HTTP method, matched case-sensitively
    pub http_method: String,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
}

impl ApiRequest {
    pub fn new(resource: impl Into<String>, http_method: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            http_method: http_method.into(),
            body: None,
            path_parameters: None,
        }
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a path parameter (builder pattern).
    pub fn with_path_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get a path parameter by name.
    pub fn path_parameter(&self, key: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }
}

/// Normalized outbound response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,

    pub headers: BTreeMap<String, String>,

    /// JSON-serialized payload, absent when there is none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ApiResponse {
    /// Create a response with the fixed header set and no body.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: default_headers(),
            body: None,
        }
    }

    /// Create a response whose body is the JSON encoding of `payload`.
    ///
    /// A payload that fails to serialize turns the response into a failure
    /// carrying the serializer's error text.
    pub fn json<T: Serialize + ?Sized>(status_code: u16, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self {
                body: Some(body),
                ..Self::new(status_code)
            },
            Err(err) => {
                error!(error = %err, "Failed to serialize response payload");
                Self {
                    body: Some(serde_json::Value::String(err.to_string()).to_string()),
                    ..Self::new(FAILURE_STATUS)
                }
            }
        }
    }

    /// 200 OK with a JSON payload.
    pub fn ok<T: Serialize + ?Sized>(payload: &T) -> Self {
        Self::json(200, payload)
    }

    /// 201 Created with a JSON payload.
    pub fn created<T: Serialize + ?Sized>(payload: &T) -> Self {
        Self::json(201, payload)
    }
}

/// The fixed response header map
pub fn default_headers() -> BTreeMap<String, String> {
    RESPONSE_HEADERS
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_deserializes_proxy_event() {
        let event = json!({
            "resource": "/messages/{message_id}",
            "httpMethod": "GET",
            "pathParameters": { "message_id": "abc" }
        });

        let request: ApiRequest = serde_json::from_value(event).unwrap();
        assert_eq!(request.resource, MESSAGE_RESOURCE);
        assert_eq!(request.http_method, "GET");
        assert_eq!(request.body, None);
        assert_eq!(request.path_parameter(MESSAGE_ID_PARAM), Some("abc"));
    }

    #[test]
    fn request_accepts_null_fields() {
        let event = json!({
            "resource": "/messages",
            "httpMethod": "POST",
            "body": null,
            "pathParameters": null
        });

        let request: ApiRequest = serde_json::from_value(event).unwrap();
        assert!(request.body.is_none());
        assert!(request.path_parameter(MESSAGE_ID_PARAM).is_none());
    }

    #[test]
    fn response_omits_missing_body() {
        let value = serde_json::to_value(ApiResponse::new(204)).unwrap();
        assert_eq!(value["statusCode"], 204);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert!(value.get("body").is_none());
    }

    #[test]
    fn json_response_carries_fixed_headers() {
        let response = ApiResponse::created(&Message {
            id: "1".into(),
            message: "hi".into(),
        });

        assert_eq!(response.status_code, 201);
        assert_eq!(response.headers, default_headers());
        assert_eq!(response.headers.len(), 4);
        assert_eq!(
            response.body.as_deref(),
            Some(r#"{"id":"1","message":"hi"}"#)
        );
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("payload refused"))
        }
    }

    #[test]
    fn unserializable_payload_becomes_failure_with_body() {
        let response = ApiResponse::ok(&Unserializable);

        assert_eq!(response.status_code, FAILURE_STATUS);
        assert_eq!(response.headers, default_headers());
        assert_eq!(response.body.as_deref(), Some("\"payload refused\""));
    }

    #[test]
    fn string_payload_is_json_encoded() {
        let response = ApiResponse::json(400, "boom");
        assert_eq!(response.body.as_deref(), Some("\"boom\""));
    }
}
