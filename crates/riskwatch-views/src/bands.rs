//! Display-only score bands.
//!
//! These never override or validate a server-supplied `riskLevel`; the two are
//! independent and a row may legitimately show a level that disagrees with its
//! band.

use riskwatch_api_models::RiskLevel;

/// Lower bound of the `CRITICAL` band.
pub const CRITICAL_FROM: f64 = 40.0;
/// Lower bound of the `HIGH` band.
pub const HIGH_FROM: f64 = 30.0;
/// Lower bound of the `MEDIUM` band.
pub const MEDIUM_FROM: f64 = 20.0;

/// Band a raw score falls into.
#[must_use]
pub fn band_for_score(score: f64) -> RiskLevel {
    if score >= CRITICAL_FROM {
        RiskLevel::Critical
    } else if score >= HIGH_FROM {
        RiskLevel::High
    } else if score >= MEDIUM_FROM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Short marker for terminal tables.
#[must_use]
pub const fn marker(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "!!",
        RiskLevel::High => "! ",
        RiskLevel::Medium => "~ ",
        RiskLevel::Low => "  ",
    }
}
