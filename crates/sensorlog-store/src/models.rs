//! Data models for stored readings.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A reading stored in the database.
///
/// Serializes with camelCase field names to match the wire format consumed
/// by polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReading {
    /// Database row ID, assigned on insert.
    pub id: i64,
    /// Identifier of the reporting sensor.
    pub sensor_id: String,
    /// Measured value.
    pub value: f64,
    /// Observation time as supplied by the client. Sorted lexically.
    pub timestamp: String,
    /// When the row was written. Audit only, never filtered on.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

/// A validated reading ready to be appended.
///
/// Constructed at the ingestion boundary after field validation; the store
/// assumes its invariants (non-empty sensor id and timestamp, finite value)
/// already hold.
#[derive(Debug, Clone)]
pub struct NewReading {
    /// Identifier of the reporting sensor.
    pub sensor_id: String,
    /// Measured value.
    pub value: f64,
    /// Observation time as supplied by the client.
    pub timestamp: String,
}

/// Aggregate statistics over one sensor's readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorStats {
    /// Number of readings for the sensor.
    pub count: u64,
    /// Mean value, or `None` when the sensor has no readings.
    pub average: Option<f64>,
    /// Smallest value, or `None` when the sensor has no readings.
    pub min: Option<f64>,
    /// Largest value, or `None` when the sensor has no readings.
    pub max: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_stored_reading_serializes_camel_case() {
        let reading = StoredReading {
            id: 7,
            sensor_id: "temp-01".to_string(),
            value: 23.5,
            timestamp: "2024-01-01T10:00:00Z".to_string(),
            recorded_at: datetime!(2024-01-01 10:00:05 UTC),
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["sensorId"], "temp-01");
        assert_eq!(json["recordedAt"], "2024-01-01T10:00:05Z");
        assert_eq!(json["value"], 23.5);
        assert!(json.get("sensor_id").is_none());
    }

    #[test]
    fn test_sensor_stats_absent_values_are_null() {
        let stats = SensorStats {
            count: 0,
            average: None,
            min: None,
            max: None,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["average"].is_null());
        assert!(json["min"].is_null());
        assert!(json["max"].is_null());
    }
}
