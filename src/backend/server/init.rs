/**
 * Server Initialization
 *
 * Builds the store selected by the configuration, wraps it in `AppState`
 * and assembles the router. The caller keeps the returned state so it can
 * close the store once the server has stopped.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::Config;
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PgStore, Store, StoreError};

/// Create and configure the Axum application
///
/// # Returns
///
/// The router ready to serve, plus the state it was built with
///
/// # Errors
///
/// Fails if `DATABASE_URL` is set but the database cannot be reached or
/// migrated. A missing `DATABASE_URL` is not an error: the in-memory store
/// is used instead.
pub async fn create_app(config: Config) -> Result<(Router, AppState), StoreError> {
    tracing::info!("Initializing HomeShare backend server");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url, config.database_max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(store, config);
    let app = create_router(app_state.clone());

    tracing::info!("Router configured");
    Ok((app, app_state))
}
