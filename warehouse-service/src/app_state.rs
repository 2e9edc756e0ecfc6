use std::sync::Arc;
use common_http_errors::ApiError;
use common_observability::ServiceMetrics;
use sqlx::PgPool;

pub const SERVICE_NAME: &str = "warehouse-service";

/// Shared application state handed to every handler. The pool is the only
/// path to persisted state; handlers keep nothing between requests.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self { db, metrics: Arc::new(ServiceMetrics::new(SERVICE_NAME)) }
    }

    /// Logs and counts a store failure, then converts it into the 400 envelope.
    pub(crate) fn store_error(
        &self,
        operation: &'static str,
        context: String,
        err: sqlx::Error,
    ) -> ApiError {
        tracing::warn!(?err, operation, "{context}");
        self.metrics.record_store_error(operation);
        ApiError::store(context, err)
    }
}
