//! Paginated replication-log retrieval.
//!
//! Replication rows for a time window are pulled in bounded pages: one
//! count query up front, then chunk queries that advance a skip cursor
//! until the server-declared total is reached or a page comes back empty.

use chrono::{DateTime, Utc};
use futures::Stream;
use futures::stream;
use tracing::debug;
use wetstock_types::{
    ReplicationChunk, ReplicationCount, Result, Row, TimeWindow, WetstockError,
};

use crate::ImsClient;

const REPLICATION_COUNT: &str = "/logs/replication_count";
const REPLICATION_DATA: &str = "/logs/replication_data";

/// Parameters for a replication pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationQuery {
    /// Window start; defaults to two days before the pull begins.
    pub window_start: Option<DateTime<Utc>>,
    /// Page size, and the optimistic total placeholder until the service
    /// reports a real one.
    pub limit: u64,
    /// Passed through verbatim; its semantics are owned by the service.
    pub force: bool,
}

impl Default for ReplicationQuery {
    fn default() -> Self {
        Self {
            window_start: None,
            limit: 1000,
            force: false,
        }
    }
}

/// Cursor state for one pagination run.
struct PageCursor {
    count: u64,
    total: u64,
    first: bool,
}

impl ImsClient {
    /// Counts replication rows created within the window.
    ///
    /// # Errors
    ///
    /// A non-success status or an undecodable body is fatal here: a
    /// defaulted zero would be indistinguishable from a legitimately
    /// empty window.
    pub async fn replication_count(
        &self,
        window: &TimeWindow,
        force: bool,
    ) -> Result<ReplicationCount> {
        let params = window_params(window, force);
        let response = self
            .transport
            .post(REPLICATION_COUNT, &params, Some(&serde_json::json!({})))
            .await?;
        if !response.is_success() {
            return Err(WetstockError::UnexpectedStatus {
                status: response.status,
                endpoint: REPLICATION_COUNT.to_string(),
            });
        }
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: REPLICATION_COUNT.to_string(),
            source,
        })
    }

    /// Retrieves all replication rows in the query's window as a lazy
    /// sequence of pages.
    ///
    /// The window end is fixed to "now" when the call starts and holds for
    /// the whole run. The cursor advances by the requested `limit` each
    /// page, not by the rows actually received; the final short page is
    /// followed by one empty probe, which ends the sequence. A chunk that
    /// fails to arrive or decode also ends the sequence: everything
    /// yielded so far is valid partial output.
    ///
    /// The sequence is finite for any window and not restartable;
    /// re-invoking re-runs the count query with a fresh window end.
    ///
    /// # Errors
    ///
    /// Only the up-front count query can fail; see
    /// [`replication_count`](Self::replication_count).
    pub async fn replication_data(
        &self,
        query: ReplicationQuery,
    ) -> Result<impl Stream<Item = Vec<Row>> + '_> {
        let window = match query.window_start {
            Some(start) => TimeWindow::ending_now(start)?,
            None => TimeWindow::trailing_days(2),
        };
        let total = self
            .replication_count(&window, query.force)
            .await?
            .total_or(query.limit);

        let ReplicationQuery { limit, force, .. } = query;
        let cursor = PageCursor {
            count: 0,
            total,
            first: true,
        };

        Ok(stream::unfold(cursor, move |mut cursor| async move {
            if cursor.count >= cursor.total {
                return None;
            }
            debug!(
                skip = cursor.count,
                total = cursor.total,
                "fetching replication page"
            );

            // Any failure to produce a decodable chunk truncates the
            // sequence; partial results are valid output.
            let chunk = self
                .replication_chunk(&window, cursor.count, limit, force)
                .await
                .ok()?;

            if cursor.first {
                if let Some(total) = chunk.total {
                    cursor.total = total;
                }
                cursor.first = false;
            }
            if chunk.data.is_empty() {
                return None;
            }
            cursor.count += limit;
            Some((chunk.data, cursor))
        }))
    }

    async fn replication_chunk(
        &self,
        window: &TimeWindow,
        skip: u64,
        limit: u64,
        force: bool,
    ) -> Result<ReplicationChunk> {
        let mut params = window_params(window, force);
        params.push(("skip", skip.to_string()));
        params.push(("limit", limit.to_string()));

        let response = self
            .transport
            .post(REPLICATION_DATA, &params, Some(&serde_json::json!({})))
            .await?;
        response.json().map_err(|source| WetstockError::Decode {
            endpoint: REPLICATION_DATA.to_string(),
            source,
        })
    }
}

fn window_params(window: &TimeWindow, force: bool) -> Vec<(&'static str, String)> {
    vec![
        ("window_start", window.start.to_rfc3339()),
        ("window_end", window.end.to_rfc3339()),
        ("force", force.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Arc;
    use wetstock_client::MockTransport;

    fn client() -> (Arc<MockTransport>, ImsClient) {
        let transport = Arc::new(MockTransport::new());
        (transport.clone(), ImsClient::new(transport))
    }

    async fn collect(client: &ImsClient, query: ReplicationQuery) -> Vec<Vec<Row>> {
        let stream = client.replication_data(query).await.unwrap();
        stream.collect().await
    }

    #[tokio::test]
    async fn test_empty_window_never_fetches_chunks() {
        let (transport, client) = client();
        transport.push_json(REPLICATION_COUNT, 200, json!({"total": 0}));

        let pages = collect(&client, ReplicationQuery::default()).await;
        assert!(pages.is_empty());
        assert!(transport.calls_to(REPLICATION_DATA).is_empty());
    }

    #[tokio::test]
    async fn test_count_failure_is_an_error() {
        let (transport, client) = client();
        transport.push_response(REPLICATION_COUNT, 502, "bad gateway");

        let result = client.replication_data(ReplicationQuery::default()).await;
        assert!(matches!(
            result.err(),
            Some(WetstockError::UnexpectedStatus { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_count_decode_failure_is_an_error() {
        let (transport, client) = client();
        transport.push_response(REPLICATION_COUNT, 200, "<html>oops</html>");

        let result = client.replication_data(ReplicationQuery::default()).await;
        assert!(matches!(result.err(), Some(WetstockError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_short_final_page_terminates() {
        let (transport, client) = client();
        transport.push_json(REPLICATION_COUNT, 200, json!({"total": 3}));
        transport.push_json(
            REPLICATION_DATA,
            200,
            json!({"count": 2, "data": ["A", "B"]}),
        );
        transport.push_json(REPLICATION_DATA, 200, json!({"data": ["C"]}));
        // Must never be consumed: the cursor overshoots the total first.
        transport.push_json(REPLICATION_DATA, 200, json!({"data": []}));

        let query = ReplicationQuery {
            limit: 2,
            ..Default::default()
        };
        let pages = collect(&client, query).await;

        assert_eq!(pages, vec![vec![json!("A"), json!("B")], vec![json!("C")]]);
        let calls = transport.calls_to(REPLICATION_DATA);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].param("skip"), Some("0"));
        assert_eq!(calls[1].param("skip"), Some("2"));
    }

    #[tokio::test]
    async fn test_empty_page_terminates_cleanly() {
        let (transport, client) = client();
        transport.push_json(REPLICATION_COUNT, 200, json!({"total": 10}));
        transport.push_json(
            REPLICATION_DATA,
            200,
            json!({"count": 2, "data": ["A", "B"]}),
        );
        transport.push_json(REPLICATION_DATA, 200, json!({"data": []}));

        let query = ReplicationQuery {
            limit: 2,
            ..Default::default()
        };
        let pages = collect(&client, query).await;

        assert_eq!(pages, vec![vec![json!("A"), json!("B")]]);
        assert_eq!(transport.calls_to(REPLICATION_DATA).len(), 2);
    }

    #[tokio::test]
    async fn test_cursor_advances_by_limit_not_rows() {
        let (transport, client) = client();
        transport.push_json(REPLICATION_COUNT, 200, json!({"total": 5}));
        // Single-row pages: the cursor still strides by the page limit.
        transport.push_json(REPLICATION_DATA, 200, json!({"data": ["A"]}));
        transport.push_json(REPLICATION_DATA, 200, json!({"data": ["B"]}));
        transport.push_json(REPLICATION_DATA, 200, json!({"data": ["C"]}));

        let query = ReplicationQuery {
            limit: 2,
            ..Default::default()
        };
        let pages = collect(&client, query).await;

        assert_eq!(pages.len(), 3);
        let skips: Vec<_> = transport
            .calls_to(REPLICATION_DATA)
            .iter()
            .map(|call| call.param("skip").unwrap().to_string())
            .collect();
        assert_eq!(skips, ["0", "2", "4"]);
    }

    #[tokio::test]
    async fn test_first_chunk_total_overrides_count() {
        let (transport, client) = client();
        // Count body lacks a total: the page limit stands in.
        transport.push_json(REPLICATION_COUNT, 200, json!({}));
        transport.push_json(
            REPLICATION_DATA,
            200,
            json!({"total": 4, "count": 2, "data": ["A", "B"]}),
        );
        transport.push_json(
            REPLICATION_DATA,
            200,
            json!({"count": 2, "data": ["C", "D"]}),
        );

        let query = ReplicationQuery {
            limit: 2,
            ..Default::default()
        };
        let pages = collect(&client, query).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(transport.calls_to(REPLICATION_DATA).len(), 2);
    }

    #[tokio::test]
    async fn test_chunk_decode_failure_truncates_gracefully() {
        let (transport, client) = client();
        transport.push_json(REPLICATION_COUNT, 200, json!({"total": 4}));
        transport.push_json(
            REPLICATION_DATA,
            200,
            json!({"count": 2, "data": ["A", "B"]}),
        );
        transport.push_response(REPLICATION_DATA, 200, "not json");

        let query = ReplicationQuery {
            limit: 2,
            ..Default::default()
        };
        let pages = collect(&client, query).await;

        assert_eq!(pages, vec![vec![json!("A"), json!("B")]]);
    }

    #[tokio::test]
    async fn test_window_is_stable_across_pages() {
        let (transport, client) = client();
        transport.push_json(REPLICATION_COUNT, 200, json!({"total": 4}));
        transport.push_json(REPLICATION_DATA, 200, json!({"data": ["A", "B"]}));
        transport.push_json(REPLICATION_DATA, 200, json!({"data": ["C", "D"]}));

        let query = ReplicationQuery {
            limit: 2,
            ..Default::default()
        };
        let _ = collect(&client, query).await;

        let count_call = &transport.calls_to(REPLICATION_COUNT)[0];
        let window_start = count_call.param("window_start").unwrap().to_string();
        let window_end = count_call.param("window_end").unwrap().to_string();
        for call in transport.calls_to(REPLICATION_DATA) {
            assert_eq!(call.param("window_start"), Some(window_start.as_str()));
            assert_eq!(call.param("window_end"), Some(window_end.as_str()));
            assert_eq!(call.param("force"), Some("false"));
        }
    }
}
