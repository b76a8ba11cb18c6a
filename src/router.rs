//! Request router for the messages resource.
//!
//! Dispatch is a pure function of `(resource, method)`:
//!
//! | Resource | Method | Operation |
//! |----------|--------|-----------|
//! | `/messages` | POST | Create message |
//! | `/messages` | GET | Count messages |
//! | `/messages/{message_id}` | GET | Get message by id |
//!
//! Anything else is an unsupported call. `handle` never fails: every error
//! becomes a 400 response whose body is the JSON-encoded error description.

use crate::ids::IdentifierFactory;
use crate::item::ItemError;
use crate::models::*;
use crate::store::{ItemStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Operation selected by the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CreateMessage,
    CountMessages,
    GetMessage,
}

impl Route {
    /// Resolve a `(resource, method)` pair. Exact, case-sensitive matches only.
    pub fn resolve(resource: &str, method: &str) -> Option<Self> {
        match (resource, method) {
            (MESSAGES_RESOURCE, "POST") => Some(Self::CreateMessage),
            (MESSAGES_RESOURCE, "GET") => Some(Self::CountMessages),
            (MESSAGE_RESOURCE, "GET") => Some(Self::GetMessage),
            _ => None,
        }
    }
}

/// Routing errors
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Unsupported API Call: Method {method}, Resource {resource}.")]
    UnsupportedOperation { method: String, resource: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No message found with id {0}.")]
    MessageNotFound(MessageId),

    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Item(#[from] ItemError),
}

impl RouteError {
    /// HTTP status code for the error. Every failure maps to 400.
    pub fn status_code(&self) -> u16 {
        match self {
            RouteError::UnsupportedOperation { .. }
            | RouteError::Store(_)
            | RouteError::MessageNotFound(_)
            | RouteError::MalformedInput(_)
            | RouteError::Item(_) => FAILURE_STATUS,
        }
    }

    /// Package the error as a response with the description as body.
    pub fn to_response(&self) -> ApiResponse {
        ApiResponse::json(self.status_code(), &self.to_string())
    }
}

/// Strip one pair of surrounding double quotes, if present.
///
/// Only bodies of at least two characters qualify, so a lone `"` is kept.
pub fn unquote(body: &str) -> &str {
    body.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(body)
}

/// Routes requests for the messages resource to the item store
#[derive(Clone)]
pub struct RequestRouter {
    store: Arc<dyn ItemStore>,
    ids: Arc<dyn IdentifierFactory>,
}

impl RequestRouter {
    pub fn new(store: Arc<dyn ItemStore>, ids: Arc<dyn IdentifierFactory>) -> Self {
        Self { store, ids }
    }

    /// Handle one request. Failures are returned as 400 responses.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => self.reject(&request.resource, &request.http_method, &err),
        }
    }

    /// Package a failure for a request that never reached dispatch, or failed in it.
    pub fn reject(&self, resource: &str, method: &str, err: &RouteError) -> ApiResponse {
        warn!(
            resource = %resource,
            method = %method,
            error = %err,
            "Request failed"
        );
        err.to_response()
    }

    fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, RouteError> {
        let route = Route::resolve(&request.resource, &request.http_method).ok_or_else(|| {
            RouteError::UnsupportedOperation {
                method: request.http_method.clone(),
                resource: request.resource.clone(),
            }
        })?;

        debug!(?route, "Dispatching request");

        match route {
            Route::CreateMessage => {
                let body = request
                    .body
                    .as_deref()
                    .ok_or_else(|| RouteError::MalformedInput("Missing request body".into()))?;
                let message = self.create_message(body)?;
                Ok(ApiResponse::created(&message))
            }
            Route::CountMessages => Ok(ApiResponse::ok(&self.count_messages()?)),
            Route::GetMessage => {
                let id = request.path_parameter(MESSAGE_ID_PARAM).ok_or_else(|| {
                    RouteError::MalformedInput(format!(
                        "Missing path parameter: {MESSAGE_ID_PARAM}"
                    ))
                })?;
                Ok(ApiResponse::ok(&self.get_message(id)?))
            }
        }
    }

    /// Store a new message under a freshly generated id.
    pub fn create_message(&self, body: &str) -> Result<Message, RouteError> {
        let message = Message {
            id: self.ids.generate(),
            message: unquote(body).to_string(),
        };

        self.store.put(message.to_item())?;

        info!(
            id = %message.id,
            len = message.message.len(),
            "Message stored"
        );

        Ok(message)
    }

    /// Count all stored messages.
    pub fn count_messages(&self) -> Result<MessageCount, RouteError> {
        let message_count = self.store.count()?;
        Ok(MessageCount { message_count })
    }

    /// Fetch one message by id.
    pub fn get_message(&self, id: &str) -> Result<Message, RouteError> {
        let item = self
            .store
            .get(id)?
            .ok_or_else(|| RouteError::MessageNotFound(id.to_string()))?;

        Ok(Message::try_from(&item)?)
    }
}
