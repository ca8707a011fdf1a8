//! Client for the Inventory Management service.
//!
//! This crate provides [`ImsClient`], a typed wrapper around the IMS
//! JSON-over-HTTP endpoints:
//!
//! - [`ImsClient::readings`] / [`ImsClient::tanks`] - telemetry reads
//! - [`ImsClient::replication_data`] - paginated replication-log pull
//! - [`ImsClient::archive_all`] - batched archival loop

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/capspire/wetstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod client;
mod replication;

pub use archive::ArchiveOptions;
pub use client::{IMS_URL_ENV, ImsClient, ReadingsQuery};
pub use replication::ReplicationQuery;
