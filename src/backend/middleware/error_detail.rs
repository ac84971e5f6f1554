//! Development error details
//!
//! 500 responses carry their cause in an `ErrorDetail` extension. In
//! development mode this outermost middleware copies it into the `error`
//! field of the body; in every other mode the body stays generic.
//!
//! Panics are turned into the same 500 response by `handle_panic`, which is
//! installed through `tower_http::catch_panic`.

use std::any::Any;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::{ApiError, ErrorBody, ErrorDetail, INTERNAL_ERROR_MESSAGE};
use crate::backend::server::state::AppState;

/// Expose `ErrorDetail` in the response body when running in development
pub async fn expose_error_details(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if !app_state.config.environment.is_development() {
        return response;
    }

    let body = ErrorBody {
        message: INTERNAL_ERROR_MESSAGE.to_string(),
        error: Some(detail),
    };
    (response.status(), Json(body)).into_response()
}

/// Render a caught panic as a 500 `ApiError`
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}
