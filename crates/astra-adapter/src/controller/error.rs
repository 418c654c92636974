//! HTTP error responses
//!
//! Every failure leaves the server as `{ error, message, fields? }`.

use astra_usecase::{FieldError, ServiceError};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Option<Vec<FieldError>>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Request body that is not JSON or does not fit the expected shape
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_JSON", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvalidStateTransition(_)
            | ServiceError::InvalidArgument(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let fields = match &err {
            ServiceError::Validation(errors) => Some(errors.fields().to_vec()),
            _ => None,
        };

        Self {
            status,
            code: err.kind(),
            message: err.to_string(),
            fields,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_json(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PATH", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "Request failed");
        } else {
            debug!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                "Request rejected"
            );
        }

        let body = ErrorBody {
            error: self.code,
            message: self.message,
            fields: self.fields,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_usecase::ValidationErrors;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::not_found("Mission", 1), StatusCode::NOT_FOUND),
            (
                ServiceError::InvalidStateTransition("no".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::InvalidArgument("no".to_string()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("no".to_string()), StatusCode::CONFLICT),
            (
                ServiceError::Repository("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_validation_carries_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "must not be blank");

        let api = ApiError::from(ServiceError::Validation(errors));
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code, "VALIDATION_FAILED");
        assert_eq!(api.fields.as_ref().map(Vec::len), Some(1));
    }
}
