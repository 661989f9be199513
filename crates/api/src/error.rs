//! Domain-error-to-HTTP translation (spec.md §7).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use casino_core::{DomainError, ErrorKind};
use serde::Serialize;

use crate::locale::translate;

/// Wraps a [`DomainError`] with the locale it should be rendered in.
/// `Default` renders in English, matching `DomainError`'s own detail.
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ErrorKind,
    detail: String,
    locale: String,
}

impl ApiError {
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.detail = translate(self.kind, locale, &self.detail);
        self.locale = locale.to_string();
        self
    }

    /// A 403 carrying a caller-supplied detail, used by infra-level
    /// rejections (host/IP allowlist) that aren't a [`DomainError`] variant.
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::PlayerIdMismatch,
            detail: detail.into(),
            locale: "en".to_string(),
        }
    }
}

impl From<casino_store::StoreError> for ApiError {
    fn from(err: casino_store::StoreError) -> Self {
        ApiError::from(DomainError::internal(err.to_string()))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from(DomainError::internal(err.to_string()))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.detail().to_string(),
            locale: "en".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: ErrorKind,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if matches!(self.kind, ErrorKind::InternalServerError) {
            tracing::error!(detail = %self.detail, locale = %self.locale, "internal server error");
        }
        let body = ErrorBody {
            status: "error",
            error: self.kind,
            detail: self.detail,
        };
        (status, Json(body)).into_response()
    }
}
