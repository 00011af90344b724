use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Wire model for a single wearable telemetry event
///
/// This is the payload shape the telemetry source delivers, both over the
/// realtime channel and from history queries. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalReadingRecord {
    /// Unique identifier assigned by the telemetry source
    pub id: Uuid,

    /// When the reading was observed by the device
    pub created_at: DateTime<Utc>,

    /// Patient display name as configured on the device, if any
    #[serde(default)]
    pub patient_name: Option<String>,

    /// Heart rate in beats per minute
    #[serde(deserialize_with = "parse_f64")]
    pub heart_rate: f64,

    /// Blood oxygen saturation percentage
    #[serde(deserialize_with = "parse_f64")]
    pub spo2: f64,

    /// Wearable battery percentage, if reported
    #[serde(default, deserialize_with = "parse_f64_option")]
    pub battery: Option<f64>,

    /// GPS latitude in decimal degrees
    #[serde(deserialize_with = "parse_f64")]
    pub latitude: f64,

    /// GPS longitude in decimal degrees
    #[serde(deserialize_with = "parse_f64")]
    pub longitude: f64,

    /// True when the device's fall-detection algorithm fired
    pub fall_detected: bool,
}

// Gateway firmware versions differ on whether numeric fields arrive as JSON
// numbers or numeric strings; accept both.
fn parse_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::Float(f) => Ok(f),
        StringOrFloat::String(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

fn parse_f64_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    let v: Option<StringOrFloat> = Option::deserialize(deserializer)?;
    match v {
        Some(StringOrFloat::Float(f)) => Ok(Some(f)),
        Some(StringOrFloat::String(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_fields() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-03-14T10:30:00Z",
            "patient_name": "John Doe",
            "heart_rate": 72.0,
            "spo2": 98.0,
            "battery": 87.0,
            "latitude": 40.7128,
            "longitude": -74.0060,
            "fall_detected": false
        }"#;

        let record: VitalReadingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.heart_rate, 72.0);
        assert_eq!(record.spo2, 98.0);
        assert_eq!(record.battery, Some(87.0));
        assert!(!record.fall_detected);
    }

    #[test]
    fn test_deserialize_stringly_numeric_fields() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-03-14T10:30:00Z",
            "heart_rate": "140",
            "spo2": "90.5",
            "battery": "12",
            "latitude": "40.71",
            "longitude": "-74.00",
            "fall_detected": true
        }"#;

        let record: VitalReadingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.heart_rate, 140.0);
        assert_eq!(record.spo2, 90.5);
        assert_eq!(record.battery, Some(12.0));
        assert_eq!(record.latitude, 40.71);
        assert!(record.fall_detected);
    }

    #[test]
    fn test_missing_optional_fields_default_to_none() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-03-14T10:30:00Z",
            "heart_rate": 72,
            "spo2": 98,
            "latitude": 40.7128,
            "longitude": -74.0060,
            "fall_detected": false
        }"#;

        let record: VitalReadingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.patient_name, None);
        assert_eq!(record.battery, None);
    }

    #[test]
    fn test_empty_battery_string_is_none() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-03-14T10:30:00Z",
            "heart_rate": 72,
            "spo2": 98,
            "battery": "",
            "latitude": 40.7128,
            "longitude": -74.0060,
            "fall_detected": false
        }"#;

        let record: VitalReadingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.battery, None);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-03-14T10:30:00Z",
            "spo2": 98,
            "latitude": 40.7128,
            "longitude": -74.0060,
            "fall_detected": false
        }"#;

        let result: Result<VitalReadingRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "created_at": "2025-03-14T10:30:00Z",
            "heart_rate": "fast",
            "spo2": 98,
            "latitude": 40.7128,
            "longitude": -74.0060,
            "fall_detected": false
        }"#;

        let result: Result<VitalReadingRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
