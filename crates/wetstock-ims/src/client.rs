//! Inventory Management service client.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use tracing::{info, warn};
use wetstock_client::{HttpTransport, Transport};
use wetstock_types::{
    LocalReading, NearestReading, Reading, RegisterTankMonitor, Result, Tank, WetstockError,
};

/// Environment variable holding the IMS base address.
pub const IMS_URL_ENV: &str = "IMS_URL";

const READINGS: &str = "/tank_inventory/readings";
const NEAREST: &str = "/tank_inventory/nearest";
const TANKS: &str = "/tank/tanks";
const TANK_CONNECTION: &str = "/tank/tank_connection_information";
const STORE_CONNECTION: &str = "/tank/store_connection_information";
const REGISTER_MONITOR: &str = "/tank/register/create";

/// Parameters for a readings query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingsQuery {
    /// Earliest read time to include.
    pub start: DateTime<Utc>,
    /// Latest read time to include; open-ended when unset.
    pub end: Option<DateTime<Utc>>,
    /// Whether manually entered readings are included.
    pub include_manual: bool,
    /// Maximum rows to return; service default when unset.
    pub limit: Option<u64>,
}

impl ReadingsQuery {
    /// Queries all readings from `start` onward.
    #[must_use]
    pub const fn since(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: None,
            include_manual: true,
            limit: None,
        }
    }

    /// Bounds the query at `end`.
    #[must_use]
    pub const fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Excludes manually entered readings.
    #[must_use]
    pub const fn automatic_only(mut self) -> Self {
        self.include_manual = false;
        self
    }

    /// Caps the number of rows returned.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Client for the Inventory Management service.
///
/// All operations are best-effort reads unless documented otherwise: a
/// non-success status yields an empty collection rather than an error, so
/// callers cannot distinguish "no data" from a service hiccup. The
/// replication and archival operations live in their own modules.
#[derive(Clone)]
pub struct ImsClient {
    pub(crate) transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ImsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImsClient").finish_non_exhaustive()
    }
}

impl ImsClient {
    /// Creates a client over an explicitly shared transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a client from `IMS_URL` and `SYSTEM_PSK`.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(HttpTransport::from_env(IMS_URL_ENV)?.into_shared()))
    }

    /// Fetches inventory readings for one tank.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn readings(
        &self,
        store: &str,
        tank: &str,
        query: &ReadingsQuery,
    ) -> Result<Vec<Reading>> {
        let mut params = vec![
            ("store_number", store.to_string()),
            ("tank_id", tank.to_string()),
            ("start_date", query.start.to_rfc3339()),
            ("include_manual", query.include_manual.to_string()),
        ];
        if let Some(end) = query.end {
            params.push(("end_date", end.to_rfc3339()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let response = self.transport.post(READINGS, &params, None).await?;
        if !response.is_success() {
            warn!(status = response.status, store, tank, "no readings returned");
            return Ok(Vec::new());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: READINGS.to_string(),
            source,
        })
    }

    /// Fetches readings and converts their timestamps into `zone`,
    /// dropping the zone marker after conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone name is unknown, plus whatever
    /// [`readings`](Self::readings) can return.
    pub async fn localized_readings(
        &self,
        zone: &str,
        store: &str,
        tank: &str,
        query: &ReadingsQuery,
    ) -> Result<Vec<LocalReading>> {
        let zone: Tz = zone
            .parse()
            .map_err(|_| WetstockError::UnknownZone(zone.to_string()))?;
        let readings = self.readings(store, tank, query).await?;
        Ok(readings.iter().map(|reading| reading.localize(zone)).collect())
    }

    /// Looks up tank metadata. Both filters may be empty to list
    /// everything.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn tanks(&self, store: &str, tank: &str) -> Result<Vec<Tank>> {
        let params = [
            ("store_number", store.to_string()),
            ("tank_id", tank.to_string()),
        ];
        let response = self.transport.post(TANKS, &params, None).await?;
        if !response.is_success() {
            warn!(status = response.status, "unable to get any tanks");
            return Ok(Vec::new());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: TANKS.to_string(),
            source,
        })
    }

    /// Finds, for each store, the reading closest to `date`.
    ///
    /// Best-effort: a non-success status yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn nearest_readings(
        &self,
        stores: &[String],
        date: DateTime<Utc>,
    ) -> Result<Vec<NearestReading>> {
        let params = [("date", date.to_rfc3339())];
        let body = serde_json::to_value(stores).expect("string list serializes");
        let response = self.transport.post(NEAREST, &params, Some(&body)).await?;
        if !response.is_success() {
            warn!(status = response.status, "no nearest readings returned");
            return Ok(Vec::new());
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: NEAREST.to_string(),
            source,
        })
    }

    /// Returns connection details for one tank's monitor.
    ///
    /// # Errors
    ///
    /// Unlike the reads above this errors on a non-success status: absent
    /// connection details are not representable as an empty result.
    pub async fn tank_connection_information(&self, store: &str, tank: &str) -> Result<Value> {
        let params = [
            ("store_number", store.to_string()),
            ("tank_id", tank.to_string()),
        ];
        self.strict_json(TANK_CONNECTION, &params, None).await
    }

    /// Returns connection details for every monitor at a store.
    ///
    /// # Errors
    ///
    /// Errors on a non-success status, like
    /// [`tank_connection_information`](Self::tank_connection_information).
    pub async fn store_connection_information(&self, store: &str) -> Result<Value> {
        let params = [("store_number", store.to_string())];
        self.strict_json(STORE_CONNECTION, &params, None).await
    }

    /// Registers a tank monitor with the service.
    ///
    /// # Errors
    ///
    /// Errors on a non-success status; registration is a write.
    pub async fn register_tank_monitor(&self, request: &RegisterTankMonitor) -> Result<Value> {
        info!(store = %request.store_number, "registering tank monitor");
        let body = serde_json::to_value(request).expect("register request serializes");
        self.strict_json(REGISTER_MONITOR, &[], Some(&body)).await
    }

    async fn strict_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let response = self.transport.post(endpoint, params, body).await?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wetstock_client::MockTransport;

    fn reading_row(read_time: &str) -> Value {
        json!({
            "read_time": read_time,
            "run_time": read_time,
            "store_number": "S001",
            "tank_id": "1",
            "volume": 5000.0,
            "temperature": 61.5,
        })
    }

    fn client() -> (Arc<MockTransport>, ImsClient) {
        let transport = Arc::new(MockTransport::new());
        (transport.clone(), ImsClient::new(transport))
    }

    #[tokio::test]
    async fn test_readings_query_params() {
        let (transport, client) = client();
        transport.push_json(READINGS, 200, json!([reading_row("2024-01-15T12:00:00Z")]));

        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        let query = ReadingsQuery::since(start).until(end).limit(50);
        let readings = client.readings("S001", "1", &query).await.unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].volume, 5000.0);

        let call = &transport.calls_to(READINGS)[0];
        assert_eq!(call.param("store_number"), Some("S001"));
        assert_eq!(call.param("tank_id"), Some("1"));
        assert_eq!(call.param("include_manual"), Some("true"));
        assert_eq!(call.param("limit"), Some("50"));
        assert!(call.param("start_date").unwrap().starts_with("2024-01-15"));
        assert!(call.param("end_date").unwrap().starts_with("2024-01-16"));
    }

    #[tokio::test]
    async fn test_readings_best_effort_on_failure() {
        let (transport, client) = client();
        transport.push_response(READINGS, 503, "unavailable");

        let query = ReadingsQuery::since(Utc::now());
        let readings = client.readings("S001", "1", &query).await.unwrap();
        assert!(readings.is_empty());
    }

    #[tokio::test]
    async fn test_tanks_best_effort_on_failure() {
        let (transport, client) = client();
        transport.push_response(TANKS, 500, "boom");

        let tanks = client.tanks("", "").await.unwrap();
        assert!(tanks.is_empty());
    }

    #[tokio::test]
    async fn test_localized_readings_shift() {
        let (transport, client) = client();
        transport.push_json(READINGS, 200, json!([reading_row("2024-01-15T12:00:00Z")]));

        let query = ReadingsQuery::since(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        let readings = client
            .localized_readings("America/Chicago", "S001", "1", &query)
            .await
            .unwrap();

        // Chicago is UTC-6 in January
        assert_eq!(
            readings[0].read_time,
            Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap().naive_utc()
        );
    }

    #[tokio::test]
    async fn test_localized_readings_unknown_zone() {
        let (_, client) = client();
        let query = ReadingsQuery::since(Utc::now());
        let result = client
            .localized_readings("Not/AZone", "S001", "1", &query)
            .await;
        assert!(matches!(result, Err(WetstockError::UnknownZone(_))));
    }

    #[tokio::test]
    async fn test_nearest_readings_body_and_rename() {
        let (transport, client) = client();
        transport.push_json(
            NEAREST,
            200,
            json!([{
                "store_number": "S042",
                "tank_id": "2",
                "read_time": "2024-01-15T12:00:00Z",
                "volume": 1234.5,
                "diff": 250,
            }]),
        );

        let stores = vec!["S042".to_string(), "S043".to_string()];
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let nearest = client.nearest_readings(&stores, date).await.unwrap();

        assert_eq!(nearest[0].site, "S042");
        let call = &transport.calls_to(NEAREST)[0];
        assert_eq!(call.body, Some(json!(["S042", "S043"])));
    }

    #[tokio::test]
    async fn test_connection_information_errors_on_failure() {
        let (transport, client) = client();
        transport.push_response(TANK_CONNECTION, 404, "not found");

        let result = client.tank_connection_information("S001", "1").await;
        assert!(matches!(
            result,
            Err(WetstockError::UnexpectedStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_register_monitor_renames_host() {
        let (transport, client) = client();
        transport.push_json(REGISTER_MONITOR, 200, json!({"created": true}));

        let request = RegisterTankMonitor {
            store_number: "S001".into(),
            host: "10.1.2.3".into(),
            port: 10001,
            monitor_type: "veeder".into(),
        };
        client.register_tank_monitor(&request).await.unwrap();

        let call = &transport.calls_to(REGISTER_MONITOR)[0];
        assert_eq!(call.body.as_ref().unwrap()["ip_address"], "10.1.2.3");
    }
}
