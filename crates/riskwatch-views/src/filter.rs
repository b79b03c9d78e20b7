//! Text and categorical filters.
//!
//! A combined filter is the logical AND of its parts, so applying it twice yields
//! the same result as applying it once.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use riskwatch_api_models::{Alert, AlertStatus, Entity, RiskLevel, Severity, Threat};

/// Sentinel accepted by [`Choice::parse`] for "no restriction".
pub const ALL: &str = "all";

/// Records that expose a fixed set of text fields to search.
pub trait Searchable {
    /// Fields the text filter inspects.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Entity {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.entity_id, &self.department]
    }
}

impl Searchable for Alert {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.summary(), self.entity_id.as_str()];
        if let Some(name) = &self.entity_name {
            fields.push(name);
        }
        fields
    }
}

impl Searchable for Threat {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.threat_type, &self.entity_id, &self.threat_id]
    }
}

/// Case-insensitive substring filter over [`Searchable::search_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    /// Filter for `term`; blank terms match everything.
    #[must_use]
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
        }
    }

    /// `true` when the filter places no restriction.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Normalised search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.needle
    }

    /// `true` when any field contains the term.
    #[must_use]
    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        self.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Categorical filter value: everything, or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice<T> {
    /// No restriction.
    #[default]
    All,
    /// Exact match on one value.
    Only(T),
}

impl<T: FromStr> Choice<T> {
    /// Parse `all` (any case) or a value of `T`.
    ///
    /// # Errors
    ///
    /// Returns `T`'s parse error for anything else.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        if raw.trim().eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            raw.parse().map(Self::Only)
        }
    }
}

impl<T: PartialEq> Choice<T> {
    /// `true` for [`Choice::All`] or an exact match.
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T: Display> Display for Choice<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => formatter.write_str(ALL),
            Self::Only(value) => value.fmt(formatter),
        }
    }
}

/// Predicate over a record type.
pub trait ItemFilter<T> {
    /// `true` when `item` passes every active filter.
    fn matches(&self, item: &T) -> bool;

    /// Items passing the filter, in input order.
    fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Entity list filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityFilter {
    /// Text over name, id, and department.
    pub search: TextFilter,
    /// Risk level restriction.
    pub level: Choice<RiskLevel>,
}

impl ItemFilter<Entity> for EntityFilter {
    fn matches(&self, item: &Entity) -> bool {
        self.level.matches(&item.risk_level) && self.search.matches(item)
    }
}

/// Alert panel filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertFilter {
    /// Text over title, entity id, and entity name.
    pub search: TextFilter,
    /// Severity restriction.
    pub severity: Choice<Severity>,
    /// Lifecycle restriction, using the alert's effective status.
    pub status: Choice<AlertStatus>,
}

impl ItemFilter<Alert> for AlertFilter {
    fn matches(&self, item: &Alert) -> bool {
        self.severity.matches(&item.severity)
            && self.status.matches(&item.status())
            && self.search.matches(item)
    }
}

/// Threat board filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreatFilter {
    /// Text over threat type, entity id, and threat id.
    pub search: TextFilter,
    /// Severity restriction.
    pub severity: Choice<Severity>,
}

impl ItemFilter<Threat> for ThreatFilter {
    fn matches(&self, item: &Threat) -> bool {
        self.severity.matches(&item.severity) && self.search.matches(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskwatch_test_support::fixtures::{alert, entities_with_levels, entity, threat};

    #[test]
    fn blank_search_matches_everything() {
        let entities = entities_with_levels(12, 3);
        let filter = EntityFilter {
            search: TextFilter::new("   "),
            ..EntityFilter::default()
        };
        assert_eq!(filter.apply(&entities).len(), 12);
    }

    #[test]
    fn search_is_case_insensitive_over_any_field() {
        let entities = vec![
            entity("USER001", "Admin Account", "IT", RiskLevel::High, 33.0),
            entity("ADMIN-SVC", "Batch runner", "Ops", RiskLevel::Low, 4.0),
            entity("USER003", "Carol", "Administration", RiskLevel::Low, 8.0),
            entity("USER004", "Dave", "Sales", RiskLevel::Medium, 21.0),
        ];
        let upper = EntityFilter {
            search: TextFilter::new("ADMIN"),
            ..EntityFilter::default()
        };
        let lower = EntityFilter {
            search: TextFilter::new("admin"),
            ..EntityFilter::default()
        };
        let upper_ids: Vec<_> = upper.apply(&entities).iter().map(|e| &e.entity_id).collect();
        let lower_ids: Vec<_> = lower.apply(&entities).iter().map(|e| &e.entity_id).collect();
        assert_eq!(upper_ids, lower_ids);
        assert_eq!(upper_ids, vec!["USER001", "ADMIN-SVC", "USER003"]);
    }

    #[test]
    fn combined_filter_is_idempotent() {
        let entities = entities_with_levels(45, 25);
        let filter = EntityFilter {
            search: TextFilter::new("user 0"),
            level: Choice::Only(RiskLevel::High),
        };
        let once: Vec<Entity> = filter.apply(&entities).into_iter().cloned().collect();
        let twice: Vec<Entity> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert!(once.iter().all(|e| e.risk_level == RiskLevel::High));
    }

    #[test]
    fn choice_parses_all_sentinel_and_values() {
        assert_eq!(Choice::<RiskLevel>::parse("all"), Ok(Choice::All));
        assert_eq!(Choice::<RiskLevel>::parse("ALL"), Ok(Choice::All));
        assert_eq!(
            Choice::<RiskLevel>::parse("critical"),
            Ok(Choice::Only(RiskLevel::Critical))
        );
        assert!(Choice::<Severity>::parse("urgent").is_err());
        assert_eq!(Choice::Only(Severity::High).to_string(), "high");
        assert_eq!(Choice::<Severity>::All.to_string(), "all");
    }

    #[test]
    fn alert_filter_uses_effective_status() {
        let alerts = vec![
            alert("1", Severity::Critical, AlertStatus::Active),
            alert("2", Severity::High, AlertStatus::Acknowledged),
            alert("3", Severity::Critical, AlertStatus::Resolved),
        ];
        let filter = AlertFilter {
            severity: Choice::Only(Severity::Critical),
            status: Choice::Only(AlertStatus::Active),
            ..AlertFilter::default()
        };
        let ids: Vec<_> = filter.apply(&alerts).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn threat_filter_matches_severity_and_text() {
        let threats = vec![
            threat("THREAT-001", Severity::High),
            threat("THREAT-002", Severity::Medium),
        ];
        let filter = ThreatFilter {
            search: TextFilter::new("threat-00"),
            severity: Choice::Only(Severity::Medium),
        };
        let ids: Vec<_> = filter
            .apply(&threats)
            .iter()
            .map(|t| t.threat_id.as_str())
            .collect();
        assert_eq!(ids, vec!["THREAT-002"]);
    }
}
