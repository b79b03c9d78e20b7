//! Backend route table and URL resolution.
//!
//! Endpoints are resolved underneath the configured base URL, so a base such as
//! `http://host:8080/api` keeps its `/api` prefix. Identifier segments are
//! percent-encoded as they are appended.

use std::fmt::{self, Display, Formatter};

use reqwest::Method;
use url::Url;

pub(crate) const HEALTH: &str = "/health";
pub(crate) const DASHBOARD_STATS: &str = "/dashboard/stats";
pub(crate) const ENTITIES: &str = "/entities";
pub(crate) const USERS_ACTIVE: &str = "/users/active";
pub(crate) const REAL_TIME_STATS: &str = "/real-time/stats";
pub(crate) const REAL_TIME_RISK_DATA: &str = "/real-time/risk-data";
pub(crate) const REAL_TIME_RISK_EVENTS: &str = "/real-time/risk-events";
pub(crate) const ASSESSMENT_RUN_FULL: &str = "/assessment/run-full";
pub(crate) const MODELS_UPDATE: &str = "/models/update";
pub(crate) const REPORTS_GENERATE: &str = "/reports/generate";
pub(crate) const REPORTS_GENERATE_PDF: &str = "/reports/generate-pdf";
pub(crate) const RISK_SCORES: &str = "/risk-analysis/scores";
pub(crate) const MODEL_ACCURACY: &str = "/risk-analysis/model-accuracy";
pub(crate) const PATTERNS: &str = "/risk-analysis/patterns";
pub(crate) const RECOMMENDATIONS: &str = "/risk-analysis/recommendations";
pub(crate) const ALERTS: &str = "/alerts";
pub(crate) const THREATS_ACTIVE: &str = "/threats/active";
pub(crate) const THREATS_DETECT: &str = "/threats/detect";
pub(crate) const THREATS_ANALYTICS: &str = "/threats/analytics";

/// A method plus a decoded path, resolved lazily against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: Method,
    segments: Vec<String>,
    query: Option<String>,
}

impl Endpoint {
    /// Parse a raw path such as `/entities` or `alerts?limit=5`.
    ///
    /// Leading and repeated slashes are ignored. Each segment is percent-encoded
    /// when the URL is built, so callers pass decoded text.
    #[must_use]
    pub fn new(method: Method, raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (raw, None),
        };
        Self {
            method,
            segments: split_path(path),
            query,
        }
    }

    /// `GET` shorthand.
    #[must_use]
    pub fn get(raw: &str) -> Self {
        Self::new(Method::GET, raw)
    }

    /// `POST` shorthand.
    #[must_use]
    pub fn post(raw: &str) -> Self {
        Self::new(Method::POST, raw)
    }

    /// Build `{prefix}/{id}{suffix}` with `id` kept as a single segment.
    #[must_use]
    pub fn with_id(method: Method, prefix: &str, id: &str, suffix: &str) -> Self {
        let mut segments = split_path(prefix);
        segments.push(id.to_string());
        segments.extend(split_path(suffix));
        Self {
            method,
            segments,
            query: None,
        }
    }

    /// HTTP method for the call.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Resolve against `base`, keeping any path prefix the base carries.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when `base` cannot carry a path (e.g. `mailto:`).
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty();
            for segment in &self.segments {
                path.push(segment);
            }
        }
        if let Some(query) = &self.query {
            url.set_query(Some(query));
        }
        Ok(url)
    }
}

impl Display for Endpoint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(formatter, "/{segment}")?;
        }
        if self.segments.is_empty() {
            formatter.write_str("/")?;
        }
        if let Some(query) = &self.query {
            write!(formatter, "?{query}")?;
        }
        Ok(())
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
