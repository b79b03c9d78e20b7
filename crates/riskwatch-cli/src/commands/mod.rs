//! Command handlers grouped by concern.

pub(crate) mod actions;
pub(crate) mod health;
pub(crate) mod report;
pub(crate) mod views;
