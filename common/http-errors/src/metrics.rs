use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::ERROR_CODE_HEADER;

/// Counts error responses (status >= 400) by service, error code and status.
#[derive(Clone)]
pub struct HttpErrorMetrics {
    service: &'static str,
    errors: IntCounterVec,
}

impl HttpErrorMetrics {
    pub fn new(service: &'static str, registry: &Registry) -> prometheus::Result<Self> {
        let errors = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)",
            ),
            &["service", "code", "status"],
        )?;
        registry.register(Box::new(errors.clone()))?;
        Ok(Self { service, errors })
    }

    pub fn observe(&self, response: &Response) {
        let status = response.status();
        if status.as_u16() < 400 {
            return;
        }
        let code = response
            .headers()
            .get(ERROR_CODE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown");
        self.errors
            .with_label_values(&[self.service, code, status.as_str()])
            .inc();
    }

    pub fn count(&self, code: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.errors
            .with_label_values(&[self.service, code, status.as_str()])
            .get()
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn track_http_errors(
    State(metrics): State<Arc<HttpErrorMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    metrics.observe(&response);
    response
}
