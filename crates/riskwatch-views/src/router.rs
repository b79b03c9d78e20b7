//! Page identifiers and single-active-page navigation.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use riskwatch_api_models::UnknownLabel;
use serde::{Deserialize, Serialize};

/// Top-level pages, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    /// Summary cards and live panes.
    #[default]
    Dashboard,
    /// Paginated entity table.
    Entities,
    /// Model scores, accuracy, patterns, and recommendations.
    RiskAnalysis,
    /// Active threats and threat analytics.
    ThreatDetection,
    /// Department and distribution breakdowns.
    Analytics,
    /// Alert panel.
    Alerts,
}

impl Page {
    /// Sidebar order.
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Entities,
        Self::RiskAnalysis,
        Self::ThreatDetection,
        Self::Analytics,
        Self::Alerts,
    ];

    /// Stable identifier used on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Entities => "entities",
            Self::RiskAnalysis => "risk-analysis",
            Self::ThreatDetection => "threat-detection",
            Self::Analytics => "analytics",
            Self::Alerts => "alerts",
        }
    }

    /// Human-readable heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Risk Dashboard",
            Self::Entities => "Entity Management",
            Self::RiskAnalysis => "Risk Analysis",
            Self::ThreatDetection => "Threat Detection",
            Self::Analytics => "Analytics",
            Self::Alerts => "Security Alerts",
        }
    }

    /// Page for `raw`, or [`Page::Dashboard`] when nothing matches.
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl Display for Page {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|page| page.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLabel {
                kind: "page",
                value: value.to_string(),
            })
    }
}

/// Holds the single active page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Router {
    active: Page,
}

impl Router {
    /// Router starting on `page`.
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { active: page }
    }

    /// Currently active page.
    #[must_use]
    pub const fn active(&self) -> Page {
        self.active
    }

    /// Make `page` active; returns the page it replaced.
    pub const fn navigate(&mut self, page: Page) -> Page {
        let previous = self.active;
        self.active = page;
        previous
    }

    /// Resolve `raw` leniently and navigate to it.
    pub fn navigate_to(&mut self, raw: &str) -> Page {
        let page = Page::resolve(raw);
        self.navigate(page);
        page
    }
}
