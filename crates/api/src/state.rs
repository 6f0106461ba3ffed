use std::sync::Arc;

use linguist_db::{ProjectStore, SegmentSource};
use linguist_events::EventBus;

use crate::config::ServerConfig;
use crate::engine::{BulkCoordinator, ClaimService, StatsService};

/// Shared application state available to all handlers via Axum's `State` extractor.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Project records, read directly by the list and detail handlers.
    pub projects: Arc<dyn ProjectStore>,
    /// Sole writer of project lifecycle state.
    pub claims: Arc<ClaimService>,
    /// Per-project progress aggregation with retry and degraded fallback.
    pub stats: Arc<StatsService>,
    /// Applies one lifecycle command to many projects.
    pub bulk: Arc<BulkCoordinator>,
    /// Lifecycle events, one per committed transition.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Wire the services on top of the given stores.
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        segments: Arc<dyn SegmentSource>,
        config: &ServerConfig,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let claims = Arc::new(ClaimService::new(
            Arc::clone(&projects),
            Arc::clone(&event_bus),
        ));
        let stats = Arc::new(StatsService::new(
            Arc::clone(&projects),
            segments,
            std::time::Duration::from_millis(config.stats_retry_delay_ms),
        ));
        let bulk = Arc::new(BulkCoordinator::new(Arc::clone(&claims)));

        Self {
            projects,
            claims,
            stats,
            bulk,
            event_bus,
        }
    }
}
