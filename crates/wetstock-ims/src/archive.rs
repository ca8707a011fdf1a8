//! Batched archival of old records.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{info, warn};
use wetstock_types::{Result, WetstockError};

use crate::ImsClient;

const ARCHIVE: &str = "/archive/archive_dangerous";

/// Options for an archive-all run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Maximum records archived per batch.
    pub limit: u64,
    /// Age threshold in days; interpretation is owned by the service.
    pub days_back: u64,
    /// Pause between batches. Cooperative: the task yields to the
    /// scheduler for the whole interval.
    pub sleep: Duration,
    /// Whether to report progress after each batch.
    pub log_progress: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            limit: 500,
            days_back: 30,
            sleep: Duration::from_secs(10),
            log_progress: false,
        }
    }
}

impl ImsClient {
    /// Asks the service to archive one bounded batch of old records.
    ///
    /// Returns `true` if a batch was archived and more may remain,
    /// `false` if nothing was eligible. A non-success status is absorbed
    /// into `false` with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable success
    /// body.
    pub async fn archive(&self, limit: u64, days_back: u64) -> Result<bool> {
        let params = [
            ("limit", limit.to_string()),
            ("days_back", days_back.to_string()),
        ];
        let response = self.transport.post(ARCHIVE, &params, None).await?;
        if !response.is_success() {
            warn!(status = response.status, "archive batch refused");
            return Ok(false);
        }
        let signal: Value = response.json().map_err(|source| WetstockError::Decode {
            endpoint: ARCHIVE.to_string(),
            source,
        })?;
        Ok(is_truthy(&signal))
    }

    /// Archives batches until the service reports nothing left, pausing
    /// between batches.
    ///
    /// There is no iteration bound or timeout: termination is always the
    /// service's `false` signal. Callers needing a hard stop should wrap
    /// this in their own cancellation (e.g. `tokio::select!`).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`archive`](Self::archive).
    pub async fn archive_all(&self, options: &ArchiveOptions) -> Result<bool> {
        let started = Instant::now();
        let mut batches: u64 = 0;

        while self.archive(options.limit, options.days_back).await? {
            batches += 1;
            if options.log_progress {
                info!(
                    batches,
                    archived = batches * options.limit,
                    elapsed_secs = started.elapsed().as_secs(),
                    "archive progress"
                );
            }
            tokio::time::sleep(options.sleep).await;
        }

        if options.log_progress {
            info!(
                batches,
                elapsed_secs = started.elapsed().as_secs(),
                "archive complete"
            );
        }
        Ok(true)
    }
}

/// The archive endpoint answers with truthy/falsy JSON rather than a
/// strict boolean.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use wetstock_client::MockTransport;

    fn client() -> (Arc<MockTransport>, ImsClient) {
        let transport = Arc::new(MockTransport::new());
        (transport.clone(), ImsClient::new(transport))
    }

    fn quick_options() -> ArchiveOptions {
        ArchiveOptions {
            sleep: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_archive_all_runs_until_false() {
        let (transport, client) = client();
        transport.push_json(ARCHIVE, 200, json!(true));
        transport.push_json(ARCHIVE, 200, json!(true));
        transport.push_json(ARCHIVE, 200, json!(false));

        let done = client.archive_all(&quick_options()).await.unwrap();
        assert!(done);
        assert_eq!(transport.calls_to(ARCHIVE).len(), 3);
    }

    #[tokio::test]
    async fn test_archive_absorbs_failure_status() {
        let (transport, client) = client();
        transport.push_response(ARCHIVE, 500, "boom");

        let archived = client.archive(500, 30).await.unwrap();
        assert!(!archived);
    }

    #[tokio::test]
    async fn test_archive_params() {
        let (transport, client) = client();
        transport.push_json(ARCHIVE, 200, json!(false));

        client.archive(250, 60).await.unwrap();
        let call = &transport.calls_to(ARCHIVE)[0];
        assert_eq!(call.param("limit"), Some("250"));
        assert_eq!(call.param("days_back"), Some("60"));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("more")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!([])));
    }
}
