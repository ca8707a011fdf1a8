//! Client for the tank demand Forecast service.
//!
//! This crate provides [`ForecastClient`], a typed wrapper around the
//! Forecast service JSON-over-HTTP endpoints: latest forecasts, period
//! demand queries, and tank forecast configuration.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/capspire/wetstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;

pub use client::{FC_URL_ENV, ForecastClient};
