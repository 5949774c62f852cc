use std::sync::Arc;

use crate::session::{Orchestrator, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub flow: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(sessions: SessionStore, flow: Orchestrator) -> Self {
        Self {
            sessions,
            flow: Arc::new(flow),
        }
    }
}
