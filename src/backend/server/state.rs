/**
 * Application State Management
 *
 * `AppState` is the explicit context handed to every handler: the document
 * store, the token keys and the resolved configuration. It is built once in
 * `create_app` and cloned per request (all fields are reference counted).
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers and middleware extract only
 * the part they need, e.g. `State(store): State<Arc<dyn Store>>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::server::config::Config;
use crate::backend::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store (PostgreSQL or in-memory)
    pub store: Arc<dyn Store>,
    /// Bearer token signing and verification keys
    pub tokens: TokenKeys,
    /// Resolved configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_expires_in);
        Self {
            store,
            tokens,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
