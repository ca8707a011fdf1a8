//! Typed async clients for the wetstock Forecast and Inventory
//! Management services.
//!
//! This is a facade crate that re-exports the workspace crates for
//! convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use wetstock_lib::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ims = ImsClient::from_env()?;
//!
//!     let mut pages = std::pin::pin!(ims.replication_data(ReplicationQuery::default()).await?);
//!     while let Some(rows) = pages.next().await {
//!         println!("pulled {} rows", rows.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/capspire/wetstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use wetstock_types::*;

// Re-export the transport layer
pub use wetstock_client::{
    ClientConfig, HttpTransport, MockTransport, PSK_ENV, RawResponse, RecordedCall, RetryPolicy,
    Transport,
};

// Re-export the service clients
pub use wetstock_forecast::{FC_URL_ENV, ForecastClient};
pub use wetstock_ims::{ArchiveOptions, IMS_URL_ENV, ImsClient, ReadingsQuery, ReplicationQuery};

/// Prelude module for convenient imports.
///
/// ```
/// use wetstock_lib::prelude::*;
/// ```
pub mod prelude {
    pub use wetstock_client::{ClientConfig, HttpTransport, RetryPolicy, Transport};
    pub use wetstock_forecast::ForecastClient;
    pub use wetstock_ims::{ArchiveOptions, ImsClient, ReadingsQuery, ReplicationQuery};
    pub use wetstock_types::{
        Forecast, ForecastKind, LocalReading, Reading, Result, Tank, TankConfig, TimeWindow,
        WetstockError,
    };
}
