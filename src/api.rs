//! HTTP API for the concierge
//!
//! A chat endpoint that drives conversations, plus record listing and
//! deletion endpoints.

mod handlers;
mod menu;
mod types;

pub use handlers::create_router;

use crate::db::Database;
use crate::engine::{ConversationEngine, ProductionRegistry};
use crate::store::DatabaseStore;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ProductionRegistry>,
}

impl AppState {
    pub fn new(db: Database, session_idle: Option<Duration>) -> Self {
        let engine = ConversationEngine::new(DatabaseStore::new(db));
        Self {
            sessions: Arc::new(ProductionRegistry::new(engine, session_idle)),
        }
    }

    pub fn store(&self) -> &DatabaseStore {
        self.sessions.engine().store()
    }
}
