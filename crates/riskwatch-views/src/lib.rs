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

//! Derived view state shared by every page.
//!
//! Everything here is a pure, synchronous function of (collection, filter state),
//! so the same inputs always render the same page.
//!
//! Layout:
//! - `filter.rs`: text and categorical filters
//! - `pagination.rs`: page slicing and the filter-aware `ListView`
//! - `aggregate.rs`: counts, averages, and breakdowns
//! - `normalize.rs`: keyed-object to list projection
//! - `bands.rs`: display-only score bands
//! - `pages.rs`: per-page view models with local optimistic edits
//! - `router.rs`: page identifiers and navigation

pub mod aggregate;
pub mod bands;
pub mod filter;
pub mod normalize;
pub mod pages;
pub mod pagination;
pub mod router;

pub use filter::{
    AlertFilter, Choice, EntityFilter, ItemFilter, Searchable, TextFilter, ThreatFilter,
};
pub use pagination::{ListView, PAGE_SIZE, PageBounds, page_count};
pub use router::{Page, Router};
