//! API shared state containing actor handles

use crate::{actors::StoreHandle, broadcast::AlertBroadcaster, ingest::Ingestor};

/// Shared state passed to all API handlers
#[derive(Clone, Debug)]
pub struct ApiState {
    /// Handle to the store actor for queries and plain writes
    pub store: StoreHandle,

    /// Registry of live WebSocket subscribers
    pub broadcaster: AlertBroadcaster,

    /// Ingestion service for check results and alerts
    pub ingestor: Ingestor,
}

impl ApiState {
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            store: ingestor.store().clone(),
            broadcaster: ingestor.broadcaster().clone(),
            ingestor,
        }
    }
}
