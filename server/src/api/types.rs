//! Shared API types
//!
//! The error envelope every endpoint renders on failure.

use axum::Json;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::data::DataError;
use crate::domain::DecodeError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn unknown_dataset(slug: &str) -> Self {
        Self::not_found("UNKNOWN_DATASET", format!("Unknown dataset '{}'", slug))
    }

    pub fn from_decode(e: DecodeError) -> Self {
        tracing::debug!(error = %e, "Rejected request parameters");
        Self::bad_request(e.code(), e.to_string())
    }

    pub fn from_data(e: DataError) -> Self {
        if e.is_transient() {
            tracing::warn!(error = %e, backend = e.backend(), "Transient data error");
        } else {
            tracing::error!(error = %e, backend = e.backend(), "Data error");
        }
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        Self::from_decode(e)
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        Self::from_data(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("QUERY_PARSE_ERROR", rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::bad_request("FORM_PARSE_ERROR", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wells::FilterName;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_decode_error_is_bad_request() {
        let err = ApiError::from(DecodeError::UnsupportedFilter {
            dataset: "alberta".to_string(),
            filter: FilterName::Taste,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "bad_request");
        assert_eq!(json["code"], "UNSUPPORTED_FILTER");
        assert_eq!(
            json["message"],
            "Filter 'taste' is not supported by dataset 'alberta'"
        );
    }

    #[tokio::test]
    async fn test_data_error_hides_details() {
        let err = ApiError::from(DataError::Config("password=hunter2".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INTERNAL");
        assert_eq!(json["message"], "Database operation failed");
    }

    #[tokio::test]
    async fn test_unknown_dataset_is_not_found() {
        let response = ApiError::unknown_dataset("manitoba").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNKNOWN_DATASET");
    }
}
