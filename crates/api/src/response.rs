//! Shared response envelope types for API handlers.
//!
//! Navigation endpoints return a [`ViewResponse`] (template key plus view
//! data). Mutating endpoints return an [`ActionResult`] to asynchronous
//! callers or a `303 See Other` redirect to normal navigation, wrapped
//! together as [`ActionResponse`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

/// `{ "view": "<template key>", "data": T }` for a rendered admin screen.
#[derive(Debug, Serialize)]
pub struct ViewResponse<T: Serialize> {
    pub view: &'static str,
    pub data: T,
}

impl<T: Serialize> ViewResponse<T> {
    pub fn new(view: &'static str, data: T) -> Self {
        Self { view, data }
    }
}

/// What the client should do after a successful action.
///
/// Serializes as `"refresh"` or `{ "redirect": "<uri>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultAction {
    Refresh,
    Redirect(String),
}

/// Structured `{status, message?, action?}` result for asynchronous callers.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ResultAction>,
}

impl ActionResult {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            message: None,
            action: None,
        }
    }

    /// `200` with a message.
    pub fn ok(message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::new(StatusCode::OK)
        }
    }

    pub fn refresh(mut self) -> Self {
        self.action = Some(ResultAction::Refresh);
        self
    }

    pub fn redirect(mut self, uri: impl Into<String>) -> Self {
        self.action = Some(ResultAction::Redirect(uri.into()));
        self
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Either shape a mutating action may answer with.
#[derive(Debug)]
pub enum ActionResponse {
    Result(ActionResult),
    Redirect(String),
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        match self {
            ActionResponse::Result(result) => result.into_response(),
            ActionResponse::Redirect(uri) => Redirect::to(&uri).into_response(),
        }
    }
}
