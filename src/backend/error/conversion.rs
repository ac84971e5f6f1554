/**
 * Error Conversion
 *
 * Renders `ApiError` as a JSON response:
 *
 * ```json
 * { "message": "Validation failed", "error": "Validation error in field 'price': ..." }
 * ```
 *
 * The `error` key is present only when there is a public detail. For 500
 * responses the cause is attached as an `ErrorDetail` extension instead;
 * `middleware::error_detail` decides whether it reaches the client.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::{ApiError, ErrorDetail};

/// JSON body shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            message: self.message(),
            error: self.public_detail(),
        };
        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = self.private_detail() {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::SharedError;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_response_has_detail() {
        let response = ApiError::from(SharedError::validation("price", "must not be negative"))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert!(body["error"].as_str().unwrap().contains("price"));
    }

    #[tokio::test]
    async fn test_internal_response_hides_cause() {
        let response = ApiError::internal("connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<ErrorDetail>().is_some());
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "message": "Something went wrong!" }));
    }
}
