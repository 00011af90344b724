use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Heart rate above this many bpm renders in the warning zone
pub const HEART_RATE_WARNING_ABOVE: f64 = 100.0;

/// SpO2 below this percentage renders in the warning zone
pub const SPO2_WARNING_BELOW: f64 = 94.0;

/// Wearable battery below this percentage renders in the warning zone
pub const BATTERY_WARNING_BELOW: f64 = 20.0;

/// Display zone for a single vital sign
///
/// Zones drive presentation only. They never raise alerts; the alert
/// lifecycle is keyed exclusively on the fall flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VitalZone {
    /// Value within the unremarkable display range
    Normal,

    /// Value outside the display range, highlighted for the caretaker
    Warning,
}

/// Classify a heart rate in bpm. Strictly above the threshold warns.
pub fn heart_rate_zone(heart_rate: f64) -> VitalZone {
    if heart_rate > HEART_RATE_WARNING_ABOVE {
        VitalZone::Warning
    } else {
        VitalZone::Normal
    }
}

/// Classify a blood oxygen saturation percentage. Strictly below warns.
pub fn spo2_zone(spo2: f64) -> VitalZone {
    if spo2 < SPO2_WARNING_BELOW {
        VitalZone::Warning
    } else {
        VitalZone::Normal
    }
}

/// Classify a wearable battery percentage. Strictly below warns.
pub fn battery_zone(battery: f64) -> VitalZone {
    if battery < BATTERY_WARNING_BELOW {
        VitalZone::Warning
    } else {
        VitalZone::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_zone_boundaries() {
        assert_eq!(heart_rate_zone(72.0), VitalZone::Normal);
        assert_eq!(heart_rate_zone(100.0), VitalZone::Normal);
        assert_eq!(heart_rate_zone(100.1), VitalZone::Warning);
        assert_eq!(heart_rate_zone(140.0), VitalZone::Warning);
    }

    #[test]
    fn test_spo2_zone_boundaries() {
        assert_eq!(spo2_zone(98.0), VitalZone::Normal);
        assert_eq!(spo2_zone(94.0), VitalZone::Normal);
        assert_eq!(spo2_zone(93.9), VitalZone::Warning);
    }

    #[test]
    fn test_battery_zone_boundaries() {
        assert_eq!(battery_zone(87.0), VitalZone::Normal);
        assert_eq!(battery_zone(20.0), VitalZone::Normal);
        assert_eq!(battery_zone(19.9), VitalZone::Warning);
    }

    #[test]
    fn test_zone_serializes_lowercase() {
        let json = serde_json::to_string(&VitalZone::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
