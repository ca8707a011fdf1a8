//! Core types for the wetstock service clients.
//!
//! This crate provides the data structures shared by the client crates:
//!
//! - [`TimeWindow`] - A closed time interval bounding a query
//! - [`Reading`] / [`LocalReading`] - Tank telemetry readings
//! - [`Tank`] - Tank metadata
//! - [`ReplicationChunk`] - One page of replication log data
//! - [`Forecast`] / [`TankConfig`] - Forecast service models
//! - [`WetstockError`] - The workspace error type

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/capspire/wetstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod forecast;
mod reading;
mod replication;
mod tank;
mod window;

pub use error::{Result, WetstockError, WindowError};
pub use forecast::{
    DemandPeriod, Forecast, ForecastKind, ForecastVersion, TankConfig, TankConfigUpdate,
    TankDemand,
};
pub use reading::{LocalReading, NearestReading, Reading};
pub use replication::{ReplicationChunk, ReplicationCount, Row};
pub use tank::{RegisterTankMonitor, Tank};
pub use window::TimeWindow;
