//! Query builder for reading history.
//!
//! [`HistoryFilter`] follows the builder pattern for ergonomic construction
//! of filtered, limited history queries.
//!
//! # Example
//!
//! ```
//! use sensorlog_store::{HistoryFilter, Store};
//!
//! let store = Store::open_in_memory()?;
//!
//! // Last 50 readings for one sensor, newest first
//! let filter = HistoryFilter::new().sensor("temp-01").limit(50);
//! let readings = store.query_history(&filter)?;
//! # Ok::<(), sensorlog_store::Error>(())
//! ```

/// Default number of rows returned when no limit is chosen.
pub const DEFAULT_LIMIT: u32 = 100;

/// Fluent filter for history queries.
///
/// Use this to construct queries for
/// [`Store::query_history`](crate::Store::query_history). Results are
/// always ordered by `timestamp` descending (newest first), with `id`
/// descending as the tie-break so equal timestamps come back in a
/// deterministic order.
///
/// A limit is always applied; [`HistoryFilter::new`] starts at
/// [`DEFAULT_LIMIT`].
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    /// Restrict to one sensor.
    pub sensor_id: Option<String>,
    /// Maximum number of results.
    pub limit: u32,
}

impl HistoryFilter {
    /// Create a new filter: all sensors, limited to [`DEFAULT_LIMIT`] rows.
    pub fn new() -> Self {
        Self {
            sensor_id: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Only include readings from the specified sensor.
    pub fn sensor(mut self, sensor_id: &str) -> Self {
        self.sensor_id = Some(sensor_id.to_string());
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        let where_clause = match self.sensor_id {
            Some(ref sensor_id) => {
                params.push(Box::new(sensor_id.clone()));
                "WHERE sensor_id = ?".to_string()
            }
            None => String::new(),
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();

        format!(
            "SELECT id, sensor_id, value, timestamp, recorded_at \
             FROM readings {} ORDER BY timestamp DESC, id DESC LIMIT {}",
            where_clause, self.limit
        )
    }
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_new_defaults() {
        let filter = HistoryFilter::new();
        assert!(filter.sensor_id.is_none());
        assert_eq!(filter.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_filter_sensor() {
        let filter = HistoryFilter::new().sensor("temp-01");
        assert_eq!(filter.sensor_id, Some("temp-01".to_string()));
    }

    #[test]
    fn test_filter_limit() {
        let filter = HistoryFilter::new().limit(25);
        assert_eq!(filter.limit, 25);
    }

    #[test]
    fn test_build_where_empty() {
        let filter = HistoryFilter::new();
        let (where_clause, params) = filter.build_where();
        assert_eq!(where_clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_sensor() {
        let filter = HistoryFilter::new().sensor("temp-01");
        let (where_clause, params) = filter.build_where();
        assert_eq!(where_clause, "WHERE sensor_id = ?");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_build_sql_basic() {
        let sql = HistoryFilter::new().build_sql();

        assert!(sql.contains("FROM readings"));
        assert!(sql.contains("ORDER BY timestamp DESC, id DESC"));
        assert!(sql.contains(&format!("LIMIT {}", DEFAULT_LIMIT)));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_build_sql_with_sensor_and_limit() {
        let sql = HistoryFilter::new().sensor("temp-01").limit(10).build_sql();

        assert!(sql.contains("WHERE sensor_id = ?"));
        assert!(sql.contains("LIMIT 10"));
    }
}
