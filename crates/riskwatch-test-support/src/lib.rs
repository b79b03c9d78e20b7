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

//! Shared test helpers used across the workspace test suites.
//! Layout: fixtures.rs (record builders), network.rs (address helpers).

pub mod fixtures;
pub mod network;

pub use network::unreachable_base_url;
