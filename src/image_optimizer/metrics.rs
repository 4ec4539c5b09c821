// Resize Prometheus metrics
//
// Counters are process-wide and never influence request handling; each
// invocation still recomputes everything it needs from its own input.
// They live in the prometheus default registry: a host exposes them through
// `prometheus::gather()` or `ResizeMetrics::render_text`.

use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::sync::OnceLock;
use std::time::Duration;

use super::params::OutputFormat;

/// Global metrics for the response transformer
pub struct ResizeMetrics {
    /// Responses handled, by terminal outcome
    pub outcomes: IntCounterVec,

    /// Transform primitive duration (in seconds), by output format
    pub transform_duration: HistogramVec,

    /// Bytes in and out of successful transforms
    pub bytes: IntCounterVec,
}

static METRICS: OnceLock<ResizeMetrics> = OnceLock::new();

impl ResizeMetrics {
    /// Initialize and return the global metrics instance
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let outcomes = register_int_counter_vec!(
                "edge_resizer_responses_total",
                "Responses handled by the transformer, by outcome",
                &["outcome"]
            )
            .expect("Failed to register edge_resizer_responses_total metric");

            let transform_duration = register_histogram_vec!(
                "edge_resizer_transform_duration_seconds",
                "Duration of decode+resize+encode in seconds",
                &["format"],
                vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
            )
            .expect("Failed to register edge_resizer_transform_duration_seconds metric");

            let bytes = register_int_counter_vec!(
                "edge_resizer_transform_bytes_total",
                "Bytes consumed and produced by successful transforms",
                &["direction"] // source, output
            )
            .expect("Failed to register edge_resizer_transform_bytes_total metric");

            ResizeMetrics {
                outcomes,
                transform_duration,
                bytes,
            }
        })
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.outcomes.with_label_values(&[outcome]).inc();
    }

    pub fn record_transform(
        &self,
        format: OutputFormat,
        elapsed: Duration,
        source_bytes: usize,
        output_bytes: usize,
    ) {
        self.transform_duration
            .with_label_values(&[format.as_str()])
            .observe(elapsed.as_secs_f64());
        self.bytes
            .with_label_values(&["source"])
            .inc_by(source_bytes as u64);
        self.bytes
            .with_label_values(&["output"])
            .inc_by(output_bytes as u64);
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.outcomes.with_label_values(&[outcome]).get()
    }

    /// Default registry in Prometheus text exposition format
    pub fn render_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
