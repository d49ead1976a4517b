use std::sync::Arc;

use crate::services::Metrics;

/// Shared application state for API handlers.
///
/// `S` is the loaded prediction service; it is built once at startup and
/// only ever read afterwards.
pub struct AppState<S> {
    pub service: Arc<S>,
    pub metrics: Arc<Metrics>,
    /// Liveness message returned by `GET /`
    pub banner: &'static str,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            metrics: Arc::clone(&self.metrics),
            banner: self.banner,
        }
    }
}

impl<S> AppState<S> {
    pub fn new(service: S, service_name: &'static str, banner: &'static str) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(Metrics::new(service_name)),
            banner,
        }
    }
}
