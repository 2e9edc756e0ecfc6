use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Header carrying the machine-readable error code on every error response.
pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Store,
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { code: &'static str, message: String },
    #[error("{message}")]
    NotFound { code: &'static str, message: String },
    /// Any failure reported by the relational store. Surfaces as 400, not 500.
    #[error("{message}")]
    Store { code: &'static str, message: String },
}

impl ApiError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self { Self::Validation { code, message: message.into() } }
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self { Self::NotFound { code, message: message.into() } }
    pub fn store<C: Display, E: Display>(context: C, e: E) -> Self { Self::Store { code: "store_error", message: format!("{context}: {e}") } }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Store { .. } => ErrorKind::Store,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. } | ApiError::NotFound { code, .. } | ApiError::Store { code, .. } => *code,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } | ApiError::Store { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let error_code = self.code();
        let message = match self {
            ApiError::Validation { message, .. } | ApiError::NotFound { message, .. } | ApiError::Store { message, .. } => message,
        };
        let body = ErrorBody { kind, code: error_code.into(), message };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
