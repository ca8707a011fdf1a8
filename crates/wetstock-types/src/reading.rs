//! Tank telemetry readings.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A single tank inventory reading.
///
/// Timestamps are UTC at the service boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the reading was taken.
    pub read_time: DateTime<Utc>,
    /// When the reading was recorded by the monitor.
    pub run_time: DateTime<Utc>,
    /// Store the tank belongs to.
    pub store_number: String,
    /// Tank identifier within the store.
    pub tank_id: String,
    /// Measured volume.
    pub volume: f64,
    /// Measured temperature.
    pub temperature: f64,
}

impl Reading {
    /// Converts the reading's timestamps into the given zone, dropping the
    /// zone marker after conversion.
    #[must_use]
    pub fn localize(&self, zone: Tz) -> LocalReading {
        LocalReading {
            read_time: localize_utc(self.read_time, zone),
            run_time: localize_utc(self.run_time, zone),
            store_number: self.store_number.clone(),
            tank_id: self.tank_id.clone(),
            volume: self.volume,
            temperature: self.temperature,
        }
    }
}

/// A reading whose timestamps have been converted to a display zone.
///
/// The zone marker is intentionally dropped, so these timestamps are only
/// meaningful relative to the zone they were localized to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalReading {
    /// Localized read time, no zone marker.
    pub read_time: NaiveDateTime,
    /// Localized run time, no zone marker.
    pub run_time: NaiveDateTime,
    /// Store the tank belongs to.
    pub store_number: String,
    /// Tank identifier within the store.
    pub tank_id: String,
    /// Measured volume.
    pub volume: f64,
    /// Measured temperature.
    pub temperature: f64,
}

/// The reading closest to a target instant for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestReading {
    /// Site (store number on the wire).
    #[serde(rename = "store_number")]
    pub site: String,
    /// Tank identifier within the site.
    pub tank_id: String,
    /// When the reading was taken (UTC).
    pub read_time: DateTime<Utc>,
    /// Measured volume.
    pub volume: f64,
    /// Milliseconds off the target instant.
    pub diff: i64,
}

fn localize_utc(at: DateTime<Utc>, zone: Tz) -> NaiveDateTime {
    zone.from_utc_datetime(&at.naive_utc()).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Chicago;

    fn reading(read_time: DateTime<Utc>) -> Reading {
        Reading {
            read_time,
            run_time: read_time,
            store_number: "S001".into(),
            tank_id: "1".into(),
            volume: 5000.0,
            temperature: 61.5,
        }
    }

    #[test]
    fn test_localize_shifts_by_offset() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let local = reading(utc).localize(Chicago);

        // Chicago is UTC-6 in January
        assert_eq!(
            local.read_time,
            Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap().naive_utc()
        );
    }

    #[test]
    fn test_localize_round_trip() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap();
        let local = reading(utc).localize(Chicago);

        let back = Chicago
            .from_local_datetime(&local.read_time)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(back, utc);
    }

    #[test]
    fn test_nearest_reading_wire_name() {
        let row = serde_json::json!({
            "store_number": "S042",
            "tank_id": "2",
            "read_time": "2024-01-15T12:00:00Z",
            "volume": 1234.5,
            "diff": -1500,
        });
        let nearest: NearestReading = serde_json::from_value(row).unwrap();
        assert_eq!(nearest.site, "S042");
        assert_eq!(nearest.diff, -1500);
    }
}
