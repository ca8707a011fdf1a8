//! Forecast service models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Instant the forecast applies to.
    pub date: DateTime<Utc>,
    /// Lower confidence bound, when the model provides one.
    #[serde(default)]
    pub lower: Option<f64>,
    /// Upper confidence bound, when the model provides one.
    #[serde(default)]
    pub upper: Option<f64>,
    /// Forecast value.
    pub value: f64,
}

/// Forecast horizon selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastKind {
    /// Short-horizon forecast.
    Near,
    /// Long-horizon forecast.
    Far,
}

impl ForecastKind {
    /// Wire name of the forecast kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Near => "near",
            Self::Far => "far",
        }
    }
}

impl std::fmt::Display for ForecastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version metadata for the latest forecast of a tank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastVersion {
    /// Monotonic forecast version, 0 when none exists.
    #[serde(default)]
    pub version: u64,
    /// When the forecast was created, when one exists.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One labelled demand period for a period-demand query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPeriod {
    /// Caller-chosen period label, echoed back in the result mapping.
    pub period: String,
    /// Period start.
    pub start: DateTime<Utc>,
    /// Period end.
    pub end: DateTime<Utc>,
}

/// Demand query for one tank over a set of periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankDemand {
    /// Store number; uppercased on the wire.
    pub store: String,
    /// Tank identifier.
    pub tank: String,
    /// Periods to query demand for.
    pub periods: Vec<DemandPeriod>,
}

/// Forecast configuration for one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    /// Store the tank belongs to.
    pub store_number: String,
    /// Tank identifier within the store.
    pub tank_id: String,
    /// Market the store trades in.
    #[serde(default)]
    pub market: Option<String>,
    /// Product stored in the tank.
    #[serde(default)]
    pub product: Option<String>,
    /// Maximum age of input readings before the forecast is stale.
    #[serde(default)]
    pub max_age_hours: Option<i64>,
    /// Whether forecasting is disabled for this tank.
    #[serde(default)]
    pub disabled: Option<bool>,
    /// Display timezone for the store.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Estimated daily lifting volume.
    #[serde(default)]
    pub daily_lifting_estimate: Option<i64>,
    /// Standard deviation of daily lifting volume.
    #[serde(default)]
    pub daily_lifting_std: Option<i64>,
    /// Maximum storage volume.
    #[serde(default)]
    pub storage_max: Option<i64>,
    /// Volume replenishment strategy.
    #[serde(default)]
    pub volume_strategy: Option<String>,
    /// Target volume for replenishment.
    #[serde(default)]
    pub target_volume: Option<i64>,
    /// Supply island the store belongs to.
    #[serde(default)]
    pub island: Option<String>,
    /// Days to turn over the target volume at the estimated lifting rate.
    /// Derived client-side, not sent by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_time: Option<f64>,
    /// Days to empty the tank from storage max at the estimated lifting
    /// rate. Derived client-side, not sent by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_time: Option<f64>,
}

impl TankConfig {
    /// Fills in `turn_time` and `empty_time` from the lifting estimate.
    ///
    /// A missing or zero estimate leaves both unset.
    #[must_use]
    pub fn with_derived_rates(mut self) -> Self {
        if let Some(dle) = self.daily_lifting_estimate.filter(|dle| *dle != 0) {
            let dle = dle as f64;
            self.turn_time = Some(self.target_volume.unwrap_or(0) as f64 / dle);
            self.empty_time = Some(self.storage_max.unwrap_or(0) as f64 / dle);
        }
        self
    }
}

/// Partial update to a tank's forecast configuration.
///
/// Unset fields serialize as nulls, matching what the service expects for
/// "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankConfigUpdate {
    /// Store the tank belongs to.
    pub store_number: String,
    /// Tank identifier within the store.
    pub tank_id: String,
    /// Market the store trades in.
    #[serde(default)]
    pub market: Option<String>,
    /// Product stored in the tank.
    #[serde(default)]
    pub product: Option<String>,
    /// Maximum age of input readings before the forecast is stale.
    #[serde(default)]
    pub max_age_hours: Option<i64>,
    /// Whether forecasting is disabled for this tank.
    #[serde(default)]
    pub disabled: Option<bool>,
    /// Display timezone for the store.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Estimated daily lifting volume.
    #[serde(default)]
    pub daily_lifting_estimate: Option<i64>,
    /// Standard deviation of daily lifting volume.
    #[serde(default)]
    pub daily_lifting_std: Option<i64>,
    /// Maximum storage volume.
    #[serde(default)]
    pub storage_max: Option<i64>,
    /// Volume replenishment strategy.
    #[serde(default)]
    pub volume_strategy: Option<String>,
    /// Target volume for replenishment.
    #[serde(default)]
    pub target_volume: Option<i64>,
    /// Supply island the store belongs to.
    #[serde(default)]
    pub island: Option<String>,
}
