//! HTTP transport, retry policy, and configuration for the wetstock
//! service clients.
//!
//! This crate provides the shared plumbing the service clients build on:
//!
//! - [`Transport`] - The seam between clients and the network
//! - [`HttpTransport`] - The production implementation over reqwest
//! - [`RetryPolicy`] - Bounded retry-with-fixed-delay around each send
//! - [`ClientConfig`] - Base address, shared secret, timeout
//! - [`MockTransport`] - Scripted transport for tests

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/capspire/wetstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod http;
mod retry;
mod transport;

pub use config::{ClientConfig, PSK_ENV};
pub use http::HttpTransport;
pub use retry::RetryPolicy;
pub use transport::{MockTransport, RawResponse, RecordedCall, Transport};
