use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Category of a failed request, independent of the HTTP status it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field constraint or request shape was violated.
    Validation,
    /// A referenced id does not exist.
    NotFound,
    /// Duplicate assignment, missing assignment, or delete-while-assigned.
    Conflict,
    /// An assignment would push a class past its student limit.
    CapacityExceeded,
    /// The underlying store failed.
    Store,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Store, StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, StatusCode::NOT_FOUND, err)
    }

    /// A missing reference inside a request body (e.g. an unknown teacher on class creation).
    pub fn missing_reference<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, StatusCode::BAD_REQUEST, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Validation, StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Conflict, StatusCode::BAD_REQUEST, err)
    }

    pub fn capacity_exceeded<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::CapacityExceeded, StatusCode::BAD_REQUEST, err)
    }

    /// The human-readable message sent to the client.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = ?self.error, "request failed");
        }

        let body = Json(json!({
            "message": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
