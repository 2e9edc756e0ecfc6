use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use prometheus::{Encoder, IntCounterVec, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct ServiceMetrics {
    pub service: &'static str,
    pub registry: Registry,
    pub http_errors_total: IntCounterVec,
    pub store_errors_total: IntCounterVec,
}

impl ServiceMetrics {
    pub fn new(service: &'static str) -> Self {
        let registry = Registry::new();
        let http_errors_total = IntCounterVec::new(
            prometheus::Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)"
            ),
            &["service", "code", "status"]
        ).expect("static http_errors_total opts are valid");
        let store_errors_total = IntCounterVec::new(
            prometheus::Opts::new(
                "store_errors_total",
                "Relational store failures surfaced to clients, by operation"
            ),
            &["service", "operation"]
        ).expect("static store_errors_total opts are valid");
        let _ = registry.register(Box::new(http_errors_total.clone()));
        let _ = registry.register(Box::new(store_errors_total.clone()));
        ServiceMetrics { service, registry, http_errors_total, store_errors_total }
    }

    pub fn record_store_error(&self, operation: &str) {
        self.store_errors_total
            .with_label_values(&[self.service, operation])
            .inc();
    }

    /// Prometheus text exposition of everything in the registry.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&families, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

/// Counts every response with status >= 400, labelled by the `X-Error-Code` header.
pub async fn error_metrics_mw(
    State(metrics): State<Arc<ServiceMetrics>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        metrics
            .http_errors_total
            .with_label_values(&[metrics.service, code, status.as_str()])
            .inc();
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn teapot() -> Response {
        Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("X-Error-Code", "missing_fields")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn error_responses_are_counted_by_code() {
        let metrics = Arc::new(ServiceMetrics::new("test-svc"));
        let app = Router::new()
            .route("/err", get(teapot))
            .route("/ok", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(metrics.clone(), error_metrics_mw));

        for uri in ["/err", "/err", "/ok"] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            app.clone().oneshot(req).await.unwrap();
        }

        let count = metrics
            .http_errors_total
            .with_label_values(&["test-svc", "missing_fields", "400"])
            .get();
        assert_eq!(count, 2);
    }

    #[test]
    fn render_includes_store_errors() {
        let metrics = ServiceMetrics::new("test-svc");
        metrics.record_store_error("list_warehouses");
        let text = metrics.render().expect("encode");
        assert!(text.contains("store_errors_total"), "metrics were: {text}");
        assert!(text.contains("list_warehouses"));
    }
}
