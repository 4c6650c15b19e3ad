use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use longlist_core::StoreError;
use longlist_core::error::ErrorCode;
use longlist_core::model::ErrorBody;
use tracing::{error, warn};

/// An error returned from a handler, rendered as `{error, code, hint?}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    pub fn invalid_query(rejection: &QueryRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidQuery,
            rejection.body_text(),
        )
    }

    /// Bodies over the configured limit get 413; anything else that fails
    /// to decode is a 400.
    pub fn invalid_body(rejection: &JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorCode::BodyTooLarge,
                rejection.body_text(),
            );
        }
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidPatch,
            rejection.body_text(),
        )
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalUnexpected,
            err.to_string(),
        )
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::VersionConflict { .. } => StatusCode::CONFLICT,
            StoreError::ItemOutOfRange(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = %self.code, detail = %self.detail, "request failed");
        } else {
            warn!(status = self.status.as_u16(), code = %self.code, detail = %self.detail, "request rejected");
        }
        let body = ErrorBody {
            error: self.detail,
            code: self.code.code().to_owned(),
            hint: self.code.hint().map(str::to_owned),
        };
        (self.status, Json(body)).into_response()
    }
}
