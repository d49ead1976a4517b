use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, warn};

use crate::error::PredictError;

/// Request counters for one prediction service
pub struct Metrics {
    /// Service name used as the `service` label
    service: &'static str,
    /// When the service started
    started_at: DateTime<Utc>,
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Requests rejected as invalid input
    pub client_errors: AtomicU64,
    /// Requests that failed inside the service
    pub server_errors: AtomicU64,
}

impl Metrics {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            started_at: Utc::now(),
            predictions: AtomicU64::new(0),
            client_errors: AtomicU64::new(0),
            server_errors: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// Count the outcome of one prediction request and log failures.
    pub fn record<T>(&self, outcome: &Result<T, PredictError>) {
        match outcome {
            Ok(_) => {
                self.predictions.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) if e.is_client_error() => {
                self.client_errors.fetch_add(1, Ordering::Relaxed);
                warn!(service = self.service, error = %e, "rejected prediction request");
            }
            Err(e) => {
                self.server_errors.fetch_add(1, Ordering::Relaxed);
                error!(service = self.service, error = %e, "prediction failed");
            }
        }
    }

    /// Export metrics in Prometheus format
    pub fn prometheus(&self) -> String {
        let service = self.service;
        format!(
            r#"# HELP predictd_uptime_seconds Uptime in seconds
# TYPE predictd_uptime_seconds counter
predictd_uptime_seconds{{service="{service}"}} {}

# HELP predictd_predictions_total Successful predictions
# TYPE predictd_predictions_total counter
predictd_predictions_total{{service="{service}"}} {}

# HELP predictd_client_errors_total Requests rejected as invalid input
# TYPE predictd_client_errors_total counter
predictd_client_errors_total{{service="{service}"}} {}

# HELP predictd_server_errors_total Requests that failed inside the service
# TYPE predictd_server_errors_total counter
predictd_server_errors_total{{service="{service}"}} {}
"#,
            self.uptime_seconds(),
            self.predictions.load(Ordering::Relaxed),
            self.client_errors.load(Ordering::Relaxed),
            self.server_errors.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_client_and_server_failures() {
        let metrics = Metrics::new("breast_cancer");
        metrics.record(&Ok::<_, PredictError>(()));
        metrics.record::<()>(&Err(PredictError::InvalidImage("bad".into())));
        metrics.record::<()>(&Err(PredictError::UnknownLabel {
            stage: "label map",
            label: 7,
        }));

        assert_eq!(metrics.predictions.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.client_errors.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.server_errors.load(Ordering::Relaxed), 1);

        let text = metrics.prometheus();
        assert!(text.contains(r#"predictd_predictions_total{service="breast_cancer"} 1"#));
    }
}
