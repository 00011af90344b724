use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Domain model for a single vital-sign observation
///
/// Immutable once received. The validation ranges double as the ingestion
/// boundary: a reading that fails them never touches patient state. The
/// range checks also reject NaN and infinities.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalReading {
    /// Identifier assigned by the telemetry source
    pub source_id: Uuid,

    /// When the device observed these vitals
    pub observed_at: DateTime<Utc>,

    /// Patient display name carried by the reading, if any
    pub patient_name: Option<String>,

    /// Heart rate in beats per minute
    #[validate(range(min = 1.0, max = 300.0, message = "Heart rate must be between 1 and 300"))]
    pub heart_rate: f64,

    /// Blood oxygen saturation percentage
    #[validate(range(min = 0.0, max = 100.0, message = "SpO2 must be between 0 and 100"))]
    pub spo2: f64,

    /// Wearable battery percentage, if reported
    #[validate(range(min = 0.0, max = 100.0, message = "Battery must be between 0 and 100"))]
    pub battery: Option<f64>,

    /// GPS latitude in decimal degrees
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    /// GPS longitude in decimal degrees
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,

    /// True when the device's fall-detection algorithm fired
    pub fall_detected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_reading() -> VitalReading {
        VitalReading {
            source_id: Uuid::new_v4(),
            observed_at: Utc::now(),
            patient_name: None,
            heart_rate: 72.0,
            spo2: 98.0,
            battery: Some(87.0),
            latitude: 40.7128,
            longitude: -74.0060,
            fall_detected: false,
        }
    }

    #[test]
    fn test_valid_reading_passes() {
        assert!(base_reading().validate().is_ok());
    }

    #[test]
    fn test_zero_heart_rate_is_rejected() {
        let mut reading = base_reading();
        reading.heart_rate = 0.0;
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_nan_heart_rate_is_rejected() {
        let mut reading = base_reading();
        reading.heart_rate = f64::NAN;
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_spo2_above_hundred_is_rejected() {
        let mut reading = base_reading();
        reading.spo2 = 101.0;
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_missing_battery_is_fine() {
        let mut reading = base_reading();
        reading.battery = None;
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let mut reading = base_reading();
        reading.latitude = 95.0;
        assert!(reading.validate().is_err());

        let mut reading = base_reading();
        reading.longitude = -200.0;
        assert!(reading.validate().is_err());
    }
}
