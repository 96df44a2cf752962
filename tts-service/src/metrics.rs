use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct TtsMetrics {
    registry: Registry,
    login_attempts: IntCounterVec,
    synthesis_requests: IntCounterVec,
    synthesis_seconds: Histogram,
}

impl TtsMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let login_attempts = IntCounterVec::new(
            Opts::new(
                "tts_login_attempts_total",
                "Count of login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        let synthesis_requests = IntCounterVec::new(
            Opts::new(
                "tts_synthesis_requests_total",
                "Count of synthesis requests grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(synthesis_requests.clone()))?;

        let synthesis_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "tts_synthesis_seconds",
                "Wall time spent in the model per successful synthesis",
            )
            .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        )?;
        registry.register(Box::new(synthesis_seconds.clone()))?;

        Ok(Self {
            registry,
            login_attempts,
            synthesis_requests,
            synthesis_seconds,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn login_attempts(&self, outcome: &str) -> u64 {
        self.login_attempts.with_label_values(&[outcome]).get()
    }

    pub fn synthesis(&self, outcome: &str) {
        self.synthesis_requests.with_label_values(&[outcome]).inc();
    }

    pub fn synthesis_count(&self, outcome: &str) -> u64 {
        self.synthesis_requests.with_label_values(&[outcome]).get()
    }

    pub fn observe_synthesis_seconds(&self, seconds: f64) {
        self.synthesis_seconds.observe(seconds);
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
