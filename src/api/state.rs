use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::services::{Artifacts, Catalog, MetadataGateway, MetadataProvider, Recommender};

use super::SessionStore;

/// Shared application state
///
/// Catalog, vectors and index are read-only and shared without locking;
/// only the session store and the metadata cache mutate.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub recommender: Recommender,
    pub metadata: MetadataGateway,
    pub sessions: SessionStore,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(artifacts: &Artifacts, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            catalog: artifacts.catalog.clone(),
            recommender: Recommender::from_artifacts(artifacts),
            metadata: MetadataGateway::new(provider),
            sessions: SessionStore::new(),
            loaded_at: artifacts.loaded_at,
        }
    }

    /// Replaces the default session store, e.g. one built with configured limits
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }
}
