//! HTTP ingestion and query API for sensor readings.
//!
//! This crate provides a service that:
//! - Accepts readings from sensors over HTTP and persists them
//! - Exposes a REST API for querying stored data
//!
//! # REST API Endpoints
//!
//! - `POST /api/sensor/data` - Ingest one reading
//! - `GET /api/sensor/readings` - Reading history, newest first
//! - `GET /api/sensor/latest` - Most recent reading per sensor
//! - `GET /api/sensor/stats/{sensorId}` - Per-sensor count/average/min/max
//! - `GET /api/health` - Service health check
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/sensorlog/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [storage]
//! path = "~/.local/share/sensorlog/data.db"
//! ```

pub mod api;
pub mod config;
pub mod state;

pub use config::{Config, ConfigError, ServerConfig, StorageConfig};
pub use state::AppState;
