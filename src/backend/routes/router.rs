/**
 * Router Configuration
 *
 * Combines the welcome route, the API routes and the 404 fallback into a
 * single Axum router, then wraps it in the shared middleware stack.
 *
 * # Layer Order (outermost first)
 *
 * 1. CORS (permissive)
 * 2. Security headers
 * 3. Request tracing
 * 4. Development error details
 * 5. Per-IP rate limiting
 * 6. Panic catching
 *
 * Rate limiting keys on the peer address, so the router must be served with
 * `into_make_service_with_connect_info::<SocketAddr>()`.
 */

use axum::{
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::ApiError;
use crate::backend::middleware::{
    expose_error_details, handle_panic, rate_limit, security_headers,
};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to HomeShare - Senior Housing Companion API";

async fn welcome() -> impl IntoResponse {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route")
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/", get(welcome));
    let router = configure_api_routes(router, &app_state);
    with_middleware(router, app_state)
}

/// Add the 404 fallback and the shared middleware stack to `router`
pub fn with_middleware(router: Router<AppState>, app_state: AppState) -> Router<()> {
    let router = router
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic));
    let router = rate_limit(router, &app_state.config.rate_limit)
        .layer(from_fn_with_state(app_state.clone(), expose_error_details))
        .layer(TraceLayer::new_for_http());

    security_headers(router)
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
