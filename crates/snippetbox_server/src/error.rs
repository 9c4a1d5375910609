//! HTTP error mapping for API handlers.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use snippetbox_core::AppError;

/// Error returned by handlers, rendered as a JSON `{"error": ...}` body.
#[derive(Debug)]
pub enum HttpError {
    /// Domain or storage failure.
    App(AppError),
    /// Request that could not be extracted (bad path, query, or body).
    Rejected { status: StatusCode, body: String },
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            body: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            body: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            body: rejection.body_text(),
        }
    }
}

impl HttpError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::App(AppError::NotFound) => StatusCode::NOT_FOUND,
            Self::App(AppError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::App(AppError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::App(AppError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::App(
                AppError::Database(_) | AppError::StorageMessage(_) | AppError::Serialization(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            Self::App(AppError::NotFound) => "Not found".to_string(),
            Self::App(AppError::Unauthorized) => "Authentication required".to_string(),
            Self::App(AppError::Forbidden(msg) | AppError::Validation(msg)) => msg,
            Self::App(internal) => {
                tracing::error!("Internal error: {}", internal);
                "Internal server error".to_string()
            }
            Self::Rejected { body, .. } => body,
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let internal = StatusCode::INTERNAL_SERVER_ERROR;
        let cases = [
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::StorageMessage("disk".into()), internal),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn rejections_keep_their_status() {
        let err = HttpError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            body: "Expected request with `Content-Type: application/json`".into(),
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }
}
