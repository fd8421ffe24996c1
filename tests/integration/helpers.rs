//! Helper functions for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use alertify::{
    actors::StoreHandle,
    broadcast::AlertBroadcaster,
    ingest::{Ingestor, MonitorSubmission},
    storage::MemoryStore,
};

pub fn create_ingestor() -> Ingestor {
    Ingestor::new(StoreHandle::spawn(), AlertBroadcaster::new())
}

pub fn create_ingestor_with_store(store: MemoryStore) -> Ingestor {
    Ingestor::new(StoreHandle::spawn_with_store(store, 8), AlertBroadcaster::new())
}

pub fn monitor_submission(site_id: u64, status_code: Option<u16>) -> MonitorSubmission {
    MonitorSubmission {
        site_id: Some(site_id),
        url: Some("https://x.test".to_string()),
        status_code,
        response_time: Some(150),
        error: None,
    }
}

/// Start a hub on a random local port and return its address
#[cfg(feature = "api")]
pub async fn spawn_test_hub(ingestor: Ingestor) -> SocketAddr {
    use alertify::api::{ApiConfig, ApiState, spawn_api_server};

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: true,
    };

    spawn_api_server(config, ApiState::new(ingestor)).await.unwrap()
}

/// Wait until `expected` subscribers are open, panicking after two seconds
pub async fn wait_for_open_subscribers(broadcaster: &AlertBroadcaster, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while broadcaster.open_count().await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscribers did not open in time");
}
