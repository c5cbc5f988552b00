use crate::aws::{LoadBalancerOperations, ServiceOperations};
use crate::warmup::WarmupOrchestrator;
use std::sync::Arc;

pub type SharedOrchestrator =
    Arc<WarmupOrchestrator<dyn ServiceOperations, dyn LoadBalancerOperations>>;

/// Application state shared across all handlers
///
/// The orchestrator is stored behind trait objects so the router can be
/// built over either the AWS client or the in-memory mock.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: SharedOrchestrator,
    pub refresh_interval_secs: u64,
}

impl AppState {
    pub fn new(orchestrator: SharedOrchestrator, refresh_interval_secs: u64) -> Self {
        Self {
            orchestrator,
            refresh_interval_secs,
        }
    }
}
