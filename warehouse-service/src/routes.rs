use crate::app_state::AppState;
use crate::config::ServiceConfig;
use crate::inventory_handlers::{
    create_inventory_item, delete_inventory_item, get_inventory_item, list_inventory,
    patch_inventory_item,
};
use crate::warehouse_handlers::{
    create_warehouse, delete_warehouse, get_warehouse, list_warehouse_inventory, list_warehouses,
    patch_warehouse, replace_warehouse,
};
use axum::{
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    routing::get,
    Router,
};
use common_observability::error_metrics_mw;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics.render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        ),
    }
}

/// Every resource route plus `/healthz` and `/metrics`, wrapped in the
/// error-metrics middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route(
            "/warehouses/:id",
            get(get_warehouse)
                .put(replace_warehouse)
                .patch(patch_warehouse)
                .delete(delete_warehouse),
        )
        .route("/warehouses/:id/inventories", get(list_warehouse_inventory))
        .route("/inventories", get(list_inventory).post(create_inventory_item))
        .route(
            "/inventories/:id",
            get(get_inventory_item)
                .patch(patch_inventory_item)
                .delete(delete_inventory_item),
        )
        .layer(middleware::from_fn_with_state(state.metrics.clone(), error_metrics_mw))
        .with_state(state)
}

pub fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    let origins = if config.cors_allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .cors_allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        )
    };
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE])
}
