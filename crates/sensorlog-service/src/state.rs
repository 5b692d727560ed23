//! Application state shared across handlers.

use std::sync::Arc;

use sensorlog_store::Store;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The store wraps a single SQLite connection, so all database access goes
/// through the mutex. Each append runs as one INSERT inside the critical
/// section, which keeps concurrent writes atomic without any further
/// application-level coordination.
pub struct AppState {
    /// The data store (wrapped in Mutex for thread-safe access).
    pub store: Mutex<Store>,
}

impl AppState {
    /// Create new application state owning the given store.
    pub fn new(store: Store) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorlog_store::NewReading;

    #[tokio::test]
    async fn test_app_state_store_access() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        let store = state.store.lock().await;
        assert_eq!(store.count_readings(None).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_app_state_store_operations() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::new(store);

        {
            let store = state.store.lock().await;
            store
                .append(&NewReading {
                    sensor_id: "test".to_string(),
                    value: 1.0,
                    timestamp: "2024-01-01T10:00:00Z".to_string(),
                })
                .unwrap();
        }

        let store = state.store.lock().await;
        assert_eq!(store.count_readings(Some("test")).unwrap(), 1);
    }
}
