pub mod app_state;
pub mod config;
pub mod inventory_handlers;
pub mod models;
pub mod routes;
pub mod warehouse_handlers;

pub use crate::app_state::{AppState, SERVICE_NAME};
pub use crate::config::{ConfigError, ServiceConfig};
pub use crate::routes::{build_router, cors_layer};
pub use common_http_errors::ApiError;
