//! Forecast service client.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{error, info, warn};
use wetstock_client::{HttpTransport, Transport};
use wetstock_types::{
    DemandPeriod, Forecast, ForecastKind, ForecastVersion, Result, TankConfig, TankConfigUpdate,
    TankDemand, WetstockError,
};

/// Environment variable holding the Forecast service base address.
pub const FC_URL_ENV: &str = "FC_URL";

const LATEST_NEAR: &str = "/forecast/latest_near";
const LATEST_FAR: &str = "/forecast/latest_far";
const VERSION: &str = "/forecast/version";
const PERIOD_DEMAND: &str = "/forecast/period_demand";
const PERIOD_DEMAND_MANY: &str = "/forecast/period_demand_many";
const FORECAST_LIST: &str = "/forecast/list";
const CONFIG_LIST: &str = "/tank_config/list";
const CONFIG_CREATE: &str = "/tank_config/create";
const CONFIG_DISABLE: &str = "/tank_config/disable_tank";
const CONFIG_UPDATE_MANY: &str = "/tank_config/update_many";

/// Client for the Forecast service.
///
/// Reads are best-effort: a non-success status yields an empty result
/// rather than an error. Configuration writes are strict.
#[derive(Clone)]
pub struct ForecastClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ForecastClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastClient").finish_non_exhaustive()
    }
}

impl ForecastClient {
    /// Creates a client over an explicitly shared transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a client from `FC_URL` and `SYSTEM_PSK`.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(HttpTransport::from_env(FC_URL_ENV)?.into_shared()))
    }

    /// Fetches the latest short-horizon forecast for one tank.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn near(&self, store: &str, tank: &str) -> Result<Vec<Forecast>> {
        self.latest_points(LATEST_NEAR, store, tank).await
    }

    /// Fetches the latest long-horizon forecast for one tank.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn far(&self, store: &str, tank: &str) -> Result<Vec<Forecast>> {
        self.latest_points(LATEST_FAR, store, tank).await
    }

    async fn latest_points(&self, endpoint: &str, store: &str, tank: &str) -> Result<Vec<Forecast>> {
        let body = json!({"store": store.to_uppercase(), "tank": tank});
        let response = self.transport.post(endpoint, &[], Some(&body)).await?;
        if !response.is_success() {
            warn!(status = response.status, store, tank, "no forecast returned");
            return Ok(Vec::new());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Returns version metadata for the latest forecast of a tank.
    ///
    /// Best-effort: a non-success status yields the zero version.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn version(
        &self,
        store: &str,
        tank: &str,
        kind: ForecastKind,
    ) -> Result<ForecastVersion> {
        let body = json!({
            "store": store.to_uppercase(),
            "tank": tank,
            "type": kind.as_str(),
        });
        let response = self.transport.post(VERSION, &[], Some(&body)).await?;
        if !response.is_success() {
            return Ok(ForecastVersion::default());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: VERSION.to_string(),
            source,
        })
    }

    /// Queries forecast demand for one tank over labelled periods,
    /// returning a mapping keyed by period label.
    ///
    /// Best-effort: a non-success status or a null body yields an empty
    /// map.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn period_demand(
        &self,
        store: &str,
        tank: &str,
        periods: &[DemandPeriod],
    ) -> Result<Map<String, Value>> {
        let body = json!({"store": store, "tank": tank, "periods": periods});
        let response = self.transport.post(PERIOD_DEMAND, &[], Some(&body)).await?;
        if !response.is_success() {
            info!(store, tank, "no demand data");
            return Ok(Map::new());
        }
        let demand: Option<Map<String, Value>> =
            response.json().map_err(|source| WetstockError::Decode {
                endpoint: PERIOD_DEMAND.to_string(),
                source,
            })?;
        Ok(demand.unwrap_or_default())
    }

    /// Queries forecast demand for many tanks at once, optionally in
    /// chunks of `chunk_size` tanks per request, merging the partial
    /// results.
    ///
    /// Best-effort per request: a failed chunk contributes nothing to the
    /// merged map.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn period_demand_many(
        &self,
        queries: &[TankDemand],
        chunk_size: Option<usize>,
    ) -> Result<Map<String, Value>> {
        let Some(chunk_size) = chunk_size else {
            return self.period_demand_batch(queries).await;
        };

        let mut merged = Map::new();
        for (index, chunk) in queries.chunks(chunk_size).enumerate() {
            info!(
                from = chunk_size * index,
                to = chunk_size * index + chunk.len(),
                of = queries.len(),
                "period demand many"
            );
            merged.extend(self.period_demand_batch(chunk).await?);
        }
        Ok(merged)
    }

    async fn period_demand_batch(&self, queries: &[TankDemand]) -> Result<Map<String, Value>> {
        let body = Value::Array(queries.iter().map(demand_body).collect());
        let response = self
            .transport
            .post(PERIOD_DEMAND_MANY, &[], Some(&body))
            .await?;
        if !response.is_success() {
            error!(status = response.status, "period demand batch failed");
            return Ok(Map::new());
        }
        let demand: Option<Map<String, Value>> =
            response.json().map_err(|source| WetstockError::Decode {
                endpoint: PERIOD_DEMAND_MANY.to_string(),
                source,
            })?;
        Ok(demand.unwrap_or_default())
    }

    /// Lists tank forecast configurations, optionally filtered, with the
    /// derived turn/empty rates filled in.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn tank_configs(
        &self,
        store: Option<&str>,
        tank: Option<&str>,
    ) -> Result<Vec<TankConfig>> {
        let mut params = Vec::new();
        if let Some(store) = store {
            params.push(("store", store.to_string()));
        }
        if let Some(tank) = tank {
            params.push(("tank", tank.to_string()));
        }
        let response = self.transport.post(CONFIG_LIST, &params, None).await?;
        if !response.is_success() {
            error!(status = response.status, "tank config request failed");
            return Ok(Vec::new());
        }
        let configs: Vec<TankConfig> =
            response.json().map_err(|source| WetstockError::Decode {
                endpoint: CONFIG_LIST.to_string(),
                source,
            })?;
        Ok(configs
            .into_iter()
            .map(TankConfig::with_derived_rates)
            .collect())
    }

    /// Creates a forecast configuration for a tank.
    ///
    /// # Errors
    ///
    /// Errors on a non-success status; configuration is a write.
    pub async fn create_tank_config(
        &self,
        store: &str,
        tank: &str,
        near_frequency: u32,
    ) -> Result<Value> {
        let body = json!({"store": store, "tank": tank, "near_frequency": near_frequency});
        self.strict_json(CONFIG_CREATE, Some(&body)).await
    }

    /// Disables forecasting for a tank.
    ///
    /// # Errors
    ///
    /// Errors on a non-success status; configuration is a write.
    pub async fn disable_tank_config(&self, store: &str, tank: &str) -> Result<Value> {
        let body = json!({"store": store, "tank": tank});
        self.strict_json(CONFIG_DISABLE, Some(&body)).await
    }

    /// Applies partial configuration updates to many tanks.
    ///
    /// Best-effort: a non-success status yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn update_tank_configs(
        &self,
        updates: &[TankConfigUpdate],
    ) -> Result<Map<String, Value>> {
        let body = serde_json::to_value(updates).expect("updates serialize");
        let response = self
            .transport
            .post(CONFIG_UPDATE_MANY, &[], Some(&body))
            .await?;
        if !response.is_success() {
            warn!(status = response.status, "tank config update failed");
            return Ok(Map::new());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: CONFIG_UPDATE_MANY.to_string(),
            source,
        })
    }

    /// Lists stored forecasts, optionally filtered by kind.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn forecast_list(&self, kind: Option<ForecastKind>) -> Result<Vec<Value>> {
        let body = kind.map_or_else(|| json!({}), |kind| json!({"type": kind.as_str()}));
        let response = self.transport.post(FORECAST_LIST, &[], Some(&body)).await?;
        if !response.is_success() {
            warn!(status = response.status, "forecast list unavailable");
            return Ok(Vec::new());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: FORECAST_LIST.to_string(),
            source,
        })
    }

    async fn strict_json(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let response = self.transport.post(endpoint, &[], body).await?;
        if !response.is_success() {
            return Err(WetstockError::UnexpectedStatus {
                status: response.status,
                endpoint: endpoint.to_string(),
            });
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

fn demand_body(query: &TankDemand) -> Value {
    json!({
        "store": query.store.to_uppercase(),
        "tank": query.tank,
        "periods": query.periods,
    })
}
