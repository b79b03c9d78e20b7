//! Record builders with predictable contents.

use riskwatch_api_models::{Alert, AlertStatus, Entity, RiskLevel, Severity, Threat, Timestamp};

/// Departments cycled through by [`entities_with_levels`].
pub const DEPARTMENTS: [&str; 6] = ["IT", "Finance", "HR", "Marketing", "Sales", "Engineering"];

/// Single entity with the given attributes.
#[must_use]
pub fn entity(entity_id: &str, name: &str, department: &str, level: RiskLevel, score: f64) -> Entity {
    Entity {
        entity_id: entity_id.to_string(),
        name: name.to_string(),
        kind: "USER".to_string(),
        department: department.to_string(),
        role: "Analyst".to_string(),
        risk_score: score,
        risk_level: level,
        last_access_time: Timestamp::iso("2024-05-01T10:00:00"),
        is_active: true,
        isolation_forest_score: None,
        random_forest_score: None,
        confidence: None,
    }
}

/// `total` entities, exactly `high` of which are `HIGH`, spread evenly through
/// the list. The rest alternate between `LOW` and `MEDIUM`.
///
/// Ids run `USER001..`, names `User 001..`, and departments cycle through
/// [`DEPARTMENTS`].
#[must_use]
pub fn entities_with_levels(total: usize, high: usize) -> Vec<Entity> {
    let high = high.min(total);
    let mut others = 0_usize;
    (0..total)
        .map(|index| {
            let is_high = total > 0 && ((index + 1) * high) / total > (index * high) / total;
            let (level, base) = if is_high {
                (RiskLevel::High, 30.0)
            } else {
                others += 1;
                if others % 2 == 0 {
                    (RiskLevel::Medium, 20.0)
                } else {
                    (RiskLevel::Low, 5.0)
                }
            };
            let number = index + 1;
            let offset = f64::from(u32::try_from(number % 10).unwrap_or(0));
            entity(
                &format!("USER{number:03}"),
                &format!("User {number:03}"),
                DEPARTMENTS[index % DEPARTMENTS.len()],
                level,
                base + offset,
            )
        })
        .collect()
}

/// Alert with an explicit status.
#[must_use]
pub fn alert(id: &str, severity: Severity, status: AlertStatus) -> Alert {
    Alert {
        id: id.to_string(),
        title: Some(format!("Alert {id}")),
        description: Some(format!("Synthetic alert {id}")),
        message: None,
        alert_type: Some("BRUTE_FORCE".to_string()),
        severity,
        status: Some(status),
        is_acknowledged: status != AlertStatus::Active,
        entity_id: format!("USER{id}"),
        entity_name: Some(format!("user{id}@example.com")),
        risk_score: Some(30.0),
        timestamp: Timestamp::iso("2024-05-01T10:00:00"),
    }
}

/// Active threat.
#[must_use]
pub fn threat(threat_id: &str, severity: Severity) -> Threat {
    Threat {
        threat_id: threat_id.to_string(),
        entity_id: "USER001".to_string(),
        threat_type: "BRUTE_FORCE_ATTEMPT".to_string(),
        severity,
        confidence: Some(90.0),
        ip_address: Some("192.168.1.100".to_string()),
        location: Some("New York, US".to_string()),
        timestamp: Timestamp::iso("2024-05-01T10:00:00"),
        description: Some("Repeated failed logins".to_string()),
        risk_score: Some(40.0),
        status: "ACTIVE".to_string(),
        mitigation_actions: vec!["Temporarily block IP address".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_with_levels_hits_requested_counts() {
        let entities = entities_with_levels(45, 25);
        assert_eq!(entities.len(), 45);
        let high = entities
            .iter()
            .filter(|entity| entity.risk_level == RiskLevel::High)
            .count();
        assert_eq!(high, 25);
        assert_eq!(entities[0].entity_id, "USER001");
        assert_eq!(entities[44].entity_id, "USER045");
    }

    #[test]
    fn entities_with_levels_handles_edges() {
        assert!(entities_with_levels(0, 5).is_empty());
        assert!(
            entities_with_levels(3, 9)
                .iter()
                .all(|entity| entity.risk_level == RiskLevel::High)
        );
    }
}
