use std::sync::Arc;

use crate::config::Config;
use crate::orientation::repository::OrientationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam. Default: `PgOrientationStore`; tests swap in an in-memory store.
    pub store: Arc<dyn OrientationStore>,
    #[allow(dead_code)]
    pub config: Config,
}
