use std::sync::Arc;

use tokio::sync::RwLock;

use crate::generation::orchestrator::Orchestrator;
use crate::profile::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub profile: Arc<RwLock<ProfileStore>>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            profile: Arc::new(RwLock::new(ProfileStore::new())),
            orchestrator: Arc::new(orchestrator),
        }
    }
}
