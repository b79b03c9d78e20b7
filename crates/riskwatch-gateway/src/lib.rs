#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Backend access for the risk dashboard: a typed REST client and the polling
//! controller that keeps each page's snapshot fresh.
//!
//! Layout:
//! - `client.rs`: typed calls, headers, and transport configuration
//! - `endpoints.rs`: route table and base-URL resolution
//! - `error.rs`: gateway error type
//! - `poll.rs`: snapshot store, sequence guard, and refresh loop
//! - `sources.rs`: per-page view sources and default intervals
//! - `fallback.rs`: placeholder datasets shown during outages

pub mod client;
pub mod endpoints;
pub mod error;
pub mod fallback;
pub mod poll;
pub mod sources;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GatewayClient, GatewayConfig};
pub use endpoints::Endpoint;
pub use error::{GatewayError, GatewayResult};
pub use poll::{
    ApplyOutcome, PollHandle, PollPhase, PollingController, ViewSnapshot, ViewSource, ViewStore,
    fetch_cycle,
};
pub use reqwest::Method;
pub use sources::{
    AlertsSource, AnalyticsSource, DashboardSource, EntitiesSource, PollIntervals,
    RealTimeRiskSource, RealTimeStatsSource, RiskAnalysisSource, ThreatSource,
};
