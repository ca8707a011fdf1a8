//! Tank metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata for a monitored tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    /// Service-assigned tank record id.
    pub id: String,
    /// Monitor hardware type.
    pub monitor_type: String,
    /// Monitor-specific payload, passed through opaquely.
    #[serde(default)]
    pub payload: Value,
    /// Product stored in the tank, if configured.
    pub product: Option<String>,
    /// Polling interval for the monitor.
    pub sample_rate: i64,
    /// Tank status as reported by the service.
    pub status: String,
    /// Store the tank belongs to.
    pub store_number: String,
    /// Tank identifier within the store.
    pub tank_id: String,
    /// Last reported temperature, if any.
    pub temperature: Option<f64>,
    /// When the record was last updated.
    pub updated: DateTime<Utc>,
    /// Last reported volume.
    pub volume: f64,
}

/// Request to register a tank monitor with the service.
///
/// The service expects the host under the wire name `ip_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTankMonitor {
    /// Store the monitor serves.
    pub store_number: String,
    /// Monitor host.
    #[serde(rename = "ip_address")]
    pub host: String,
    /// Monitor port.
    pub port: u16,
    /// Monitor hardware type.
    pub monitor_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_wire_rename() {
        let req = RegisterTankMonitor {
            store_number: "S001".into(),
            host: "10.1.2.3".into(),
            port: 10001,
            monitor_type: "veeder".into(),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["ip_address"], "10.1.2.3");
        assert!(body.get("host").is_none());
    }

    #[test]
    fn test_tank_deserialize() {
        let row = serde_json::json!({
            "id": "abc123",
            "monitor_type": "veeder",
            "payload": {"port": 10001},
            "product": "regular",
            "sample_rate": 300,
            "status": "active",
            "store_number": "S001",
            "tank_id": "1",
            "temperature": 61.2,
            "updated": "2024-01-15T12:00:00Z",
            "volume": 5100.0,
        });
        let tank: Tank = serde_json::from_value(row).unwrap();
        assert_eq!(tank.store_number, "S001");
        assert_eq!(tank.payload["port"], 10001);
    }
}
