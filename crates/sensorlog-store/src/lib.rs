//! Durable append-only storage for sensor readings.
//!
//! This crate provides SQLite-based persistence for time-stamped numeric
//! readings from heterogeneous sensors. Readings are immutable once
//! written: there is no update or delete path, only appends and reads.
//!
//! # Features
//!
//! - Append readings with a server-assigned, monotonically increasing id
//! - Filtered, limited history queries (newest first)
//! - Latest-reading-per-sensor snapshot
//! - Per-sensor aggregate statistics (count/average/min/max)
//!
//! # Example
//!
//! ```no_run
//! use sensorlog_store::{HistoryFilter, NewReading, Store};
//!
//! let store = Store::open_default()?;
//!
//! let id = store.append(&NewReading {
//!     sensor_id: "temp-01".to_string(),
//!     value: 23.5,
//!     timestamp: "2024-01-01T10:00:00Z".to_string(),
//! })?;
//!
//! let filter = HistoryFilter::new().sensor("temp-01").limit(10);
//! let readings = store.query_history(&filter)?;
//! # Ok::<(), sensorlog_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{NewReading, SensorStats, StoredReading};
pub use queries::HistoryFilter;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/sensorlog/data.db`
/// - macOS: `~/Library/Application Support/sensorlog/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\sensorlog\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("sensorlog")
        .join("data.db")
}
