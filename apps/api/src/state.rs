use std::sync::Arc;

use crate::config::Config;
use crate::store::RecordsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordsStore>,
    pub config: Config,
}
