//! Replication log wire shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque replication log row. The paginator counts and forwards rows
/// without interpreting their fields.
pub type Row = Value;

/// One page of replication data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationChunk {
    /// Authoritative total for the window, when the service reports one.
    #[serde(default)]
    pub total: Option<u64>,
    /// Number of rows the service says are in this page.
    #[serde(default)]
    pub count: u64,
    /// The rows themselves.
    #[serde(default)]
    pub data: Vec<Row>,
}

/// Response body of the replication count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationCount {
    /// Total rows in the window, when reported.
    #[serde(default)]
    pub total: Option<u64>,
}

impl ReplicationCount {
    /// Returns the reported total, or `placeholder` when the body carried
    /// none. The placeholder is the requested page limit; the first data
    /// chunk's own total overrides it once observed.
    #[must_use]
    pub const fn total_or(&self, placeholder: u64) -> u64 {
        match self.total {
            Some(total) => total,
            None => placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_defaults() {
        let chunk: ReplicationChunk = serde_json::from_str("{}").unwrap();
        assert_eq!(chunk.total, None);
        assert_eq!(chunk.count, 0);
        assert!(chunk.data.is_empty());
    }

    #[test]
    fn test_chunk_full() {
        let chunk: ReplicationChunk =
            serde_json::from_value(serde_json::json!({
                "total": 3,
                "count": 2,
                "data": [{"op": "a"}, {"op": "b"}],
            }))
            .unwrap();
        assert_eq!(chunk.total, Some(3));
        assert_eq!(chunk.count, 2);
        assert_eq!(chunk.data.len(), 2);
    }

    #[test]
    fn test_count_placeholder() {
        let count: ReplicationCount = serde_json::from_str("{}").unwrap();
        assert_eq!(count.total_or(1000), 1000);

        let count: ReplicationCount = serde_json::from_str(r#"{"total": 7}"#).unwrap();
        assert_eq!(count.total_or(1000), 7);
    }
}
