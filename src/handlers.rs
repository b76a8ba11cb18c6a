//! HTTP adapter for the request router.
//!
//! Each handler turns an HTTP request into an `ApiRequest`, runs the router
//! on the blocking pool and converts the `ApiResponse` back into HTTP. The
//! router itself never sees axum types.

use crate::models::*;
use crate::router::{RequestRouter, RouteError};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        Path, State,
    },
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Path of the raw proxy-event endpoint
pub const INVOKE_PATH: &str = "/invoke";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
}

impl AppState {
    pub fn new(router: RequestRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}

// === Health Check ===

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// === Messages ===

/// ANY /messages - Collection resource (create, count)
pub async fn messages(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    let request = ApiRequest::new(MESSAGES_RESOURCE, method.as_str());
    invoke_with_body(&state, request, body).await
}

/// ANY /messages/:message_id - Single message resource
pub async fn message(
    State(state): State<AppState>,
    method: Method,
    Path(message_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    let request = ApiRequest::new(MESSAGE_RESOURCE, method.as_str())
        .with_path_parameter(MESSAGE_ID_PARAM, message_id);
    invoke_with_body(&state, request, body).await
}

/// Fallback - any other path is passed through literally and rejected by the router
pub async fn unmatched(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    let request = ApiRequest::new(uri.path(), method.as_str());
    invoke_with_body(&state, request, body).await
}

// === Raw Event Invocation ===

/// POST /invoke - Run a proxy-event shaped request and return the proxy response
pub async fn invoke_event(
    State(state): State<AppState>,
    event: Result<Json<ApiRequest>, JsonRejection>,
) -> Json<ApiResponse> {
    let response = match event {
        Ok(Json(event)) => invoke(&state, event).await,
        Err(rejection) => {
            let err = RouteError::MalformedInput(rejection.body_text());
            state.router.reject(INVOKE_PATH, Method::POST.as_str(), &err)
        }
    };
    Json(response)
}

/// Attach the HTTP body to `request` and run it. An unreadable body is
/// answered as malformed input without reaching dispatch.
async fn invoke_with_body(
    state: &AppState,
    mut request: ApiRequest,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    match request_body(body) {
        Ok(body) => {
            request.body = body;
            invoke(state, request).await
        }
        Err(err) => state
            .router
            .reject(&request.resource, &request.http_method, &err),
    }
}

/// Run the router off the async runtime; store calls may block.
async fn invoke(state: &AppState, request: ApiRequest) -> ApiResponse {
    debug!(
        resource = %request.resource,
        method = %request.http_method,
        "Invoking router"
    );

    let router = state.router.clone();
    match tokio::task::spawn_blocking(move || router.handle(&request)).await {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "Router task failed");
            ApiResponse::json(FAILURE_STATUS, &err.to_string())
        }
    }
}

/// Decode the HTTP body. HTTP has no null body; an empty one stands in for it.
fn request_body(body: Result<Bytes, BytesRejection>) -> Result<Option<String>, RouteError> {
    let bytes = body.map_err(|rejection| RouteError::MalformedInput(rejection.body_text()))?;
    if bytes.is_empty() {
        return Ok(None);
    }

    String::from_utf8(bytes.to_vec())
        .map(Some)
        .map_err(|_| RouteError::MalformedInput("Request body is not valid UTF-8".into()))
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let ApiResponse {
            status_code,
            headers,
            body,
        } = self;

        let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, body.unwrap_or_default()).into_response();

        let response_headers = response.headers_mut();
        for (name, value) in &headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    response_headers.insert(name, value);
                }
                _ => error!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn empty_body_is_none() {
        assert_eq!(request_body(Ok(Bytes::new())).unwrap(), None);
        assert_eq!(
            request_body(Ok(Bytes::from_static(b"x"))).unwrap(),
            Some("x".into())
        );
    }

    #[test]
    fn non_utf8_body_is_malformed_input() {
        let err = request_body(Ok(Bytes::from_static(&[0xff, 0xfe]))).unwrap_err();

        assert!(matches!(err, RouteError::MalformedInput(_)));
        assert_eq!(err.to_string(), "Request body is not valid UTF-8");
        assert_eq!(err.status_code(), FAILURE_STATUS);
    }

    #[test]
    fn api_response_converts_to_http() {
        let response = ApiResponse::json(400, "nope").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "OPTIONS,POST,GET"
        );
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            "Content-Type"
        );
    }
}
