use std::sync::Arc;
use std::time::Instant;

use supermango_core::advisory::AdvisoryTable;
use supermango_core::classifier::SeverityClassifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the classifier and advisory table are loaded once at
/// startup and only ever read.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Leaf severity model.
    pub classifier: Arc<dyn SeverityClassifier>,
    /// Validated advisory table.
    pub advisories: Arc<AdvisoryTable>,
    /// Process start, for the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        classifier: Arc<dyn SeverityClassifier>,
        advisories: AdvisoryTable,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            advisories: Arc::new(advisories),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
