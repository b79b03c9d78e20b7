//! Static placeholder datasets shown while the backend is unreachable.
//!
//! These are substituted only when a view has never loaded live data.

use std::collections::BTreeMap;

use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use riskwatch_api_models::{
    Alert, AlertStatus, AnalyticsData, DashboardData, DashboardStats, DepartmentSummary,
    ModelAccuracy, PatternsResponse, Recommendation, RecommendationsResponse, RiskAnalysisData,
    RiskLevel, RiskPattern, RiskScoreRecord, RiskScoresResponse, Severity, Threat,
    ThreatAnalytics, ThreatBoardData, Timestamp,
};

fn minutes_ago(minutes: i64) -> Timestamp {
    let at = Utc::now() - ChronoDuration::minutes(minutes);
    Timestamp::iso(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn now() -> Timestamp {
    minutes_ago(0)
}

/// Dashboard summary counters.
#[must_use]
pub fn dashboard() -> DashboardData {
    DashboardData {
        stats: DashboardStats {
            total_entities: 1247,
            high_risk_entities: 23,
            average_risk_score: 18.5,
            threats_detected: 156,
            false_positive_rate: 2.3,
            accuracy_rate: 97.7,
            backend_status: Some("DISCONNECTED".to_string()),
            ..DashboardStats::default()
        },
        ..DashboardData::default()
    }
}

/// Model evaluation metrics.
#[must_use]
pub fn model_accuracy() -> ModelAccuracy {
    ModelAccuracy {
        isolation_forest_accuracy: 94.2,
        random_forest_accuracy: 96.8,
        combined_accuracy: 97.7,
        false_positive_rate: 2.1,
        true_positive_rate: 95.3,
        last_updated: now(),
    }
}

/// Risk analysis page: ten scored users, six patterns, four recommendations.
#[must_use]
pub fn risk_analysis() -> RiskAnalysisData {
    const SCORES: [(f64, f64); 10] = [
        (0.18, 9.4),
        (0.42, 21.7),
        (0.15, 7.2),
        (0.81, 44.5),
        (0.22, 12.8),
        (0.37, 18.3),
        (0.12, 6.1),
        (0.55, 28.9),
        (0.27, 10.6),
        (0.19, 8.8),
    ];

    let stamp = now();
    let risk_scores: Vec<RiskScoreRecord> = SCORES
        .iter()
        .enumerate()
        .map(|(index, (isolation, forest))| {
            let combined = ((isolation * 25.0 + forest * 0.5) * 100.0).round() / 100.0;
            RiskScoreRecord {
                entity_id: format!("USER{:03}", index + 1),
                isolation_forest_score: *isolation,
                random_forest_score: *forest,
                combined_risk_score: combined,
                risk_level: band_for(combined),
                timestamp: stamp.clone(),
            }
        })
        .collect();

    let count = |level: RiskLevel| {
        risk_scores
            .iter()
            .filter(|record| record.risk_level == level)
            .count() as u64
    };
    let high_risk_count = count(RiskLevel::High) + count(RiskLevel::Critical);
    let medium_risk_count = count(RiskLevel::Medium);
    let low_risk_count = count(RiskLevel::Low);
    let average_score = risk_scores
        .iter()
        .map(|record| record.combined_risk_score)
        .sum::<f64>()
        / SCORES.len() as f64;

    let patterns = [
        ("UNUSUAL_LOGIN_TIME", 12, 91.0, "HIGH", 14),
        ("MULTIPLE_FAILED_ATTEMPTS", 18, 94.0, "HIGH", 32),
        ("SUSPICIOUS_IP_ADDRESS", 9, 88.0, "MEDIUM", 57),
        ("UNUSUAL_ACCESS_PATTERN", 15, 86.0, "MEDIUM", 71),
        ("PRIVILEGED_ACCOUNT_ABUSE", 6, 97.0, "HIGH", 95),
        ("DATA_EXFILTRATION_ATTEMPT", 7, 90.0, "MEDIUM", 112),
    ]
    .into_iter()
    .map(
        |(pattern_type, detection_count, confidence, severity, age)| RiskPattern {
            pattern_type: pattern_type.to_string(),
            detection_count,
            confidence,
            severity: severity.to_string(),
            last_detected: minutes_ago(age),
        },
    )
    .collect::<Vec<_>>();

    let recommendations = [
        (
            "1",
            "Implement Multi-Factor Authentication",
            "Enable MFA for all high-risk accounts to prevent unauthorized access.",
            "HIGH",
            "Authentication",
            85.0,
            false,
        ),
        (
            "2",
            "Update Firewall Rules",
            "Review and update firewall configurations to block suspicious IP addresses.",
            "MEDIUM",
            "Network Security",
            70.0,
            true,
        ),
        (
            "3",
            "Enhance Logging",
            "Implement comprehensive logging for all user activities and system events.",
            "HIGH",
            "Monitoring",
            90.0,
            false,
        ),
        (
            "4",
            "Conduct Security Training",
            "Provide cybersecurity awareness training to all employees.",
            "MEDIUM",
            "Education",
            60.0,
            false,
        ),
    ]
    .into_iter()
    .map(
        |(id, title, description, priority, category, expected_impact, is_implemented)| {
            Recommendation {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                priority: priority.to_string(),
                category: category.to_string(),
                expected_impact,
                is_implemented,
            }
        },
    )
    .collect::<Vec<_>>();

    RiskAnalysisData {
        scores: RiskScoresResponse {
            risk_scores,
            average_score,
            high_risk_count,
            medium_risk_count,
            low_risk_count,
        },
        accuracy: model_accuracy(),
        patterns: PatternsResponse {
            total_patterns: patterns.len() as u64,
            patterns,
        },
        recommendations: RecommendationsResponse {
            total_recommendations: recommendations.len() as u64,
            recommendations,
        },
    }
}

fn band_for(score: f64) -> RiskLevel {
    if score >= 40.0 {
        RiskLevel::Critical
    } else if score >= 30.0 {
        RiskLevel::High
    } else if score >= 20.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Aggregate threat metrics.
#[must_use]
pub fn threat_analytics() -> ThreatAnalytics {
    let threat_type_distribution = [
        ("BRUTE_FORCE_ATTEMPT", 25),
        ("SUSPICIOUS_LOGIN_LOCATION", 20),
        ("UNUSUAL_ACCESS_PATTERN", 18),
        ("MULTIPLE_FAILED_LOGINS", 15),
        ("AFTER_HOURS_ACCESS", 12),
        ("PRIVILEGED_ACCOUNT_ABUSE", 10),
    ]
    .into_iter()
    .map(|(label, count)| (label.to_string(), count))
    .collect();
    let severity_distribution = [("HIGH", 35), ("MEDIUM", 45), ("LOW", 20)]
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();

    ThreatAnalytics {
        threat_type_distribution,
        severity_distribution,
        total_threats_today: 156,
        average_response_time: Some("2.3 seconds".to_string()),
        false_positive_rate: Some("2.1%".to_string()),
        detection_accuracy: Some("97.9%".to_string()),
    }
}

/// Threat page: a single placeholder threat plus static analytics.
#[must_use]
pub fn threat_board() -> ThreatBoardData {
    ThreatBoardData {
        threats: vec![Threat {
            threat_id: "FALLBACK-001".to_string(),
            entity_id: "USER001".to_string(),
            threat_type: "BRUTE_FORCE_ATTEMPT".to_string(),
            severity: Severity::High,
            confidence: Some(95.0),
            ip_address: Some("192.168.1.100".to_string()),
            location: Some("New York, US".to_string()),
            timestamp: now(),
            description: Some(
                "Multiple failed login attempts detected from same IP address".to_string(),
            ),
            risk_score: Some(45.0),
            status: "ACTIVE".to_string(),
            mitigation_actions: vec![
                "Temporarily block IP address".to_string(),
                "Enable additional authentication".to_string(),
            ],
        }],
        analytics: threat_analytics(),
    }
}

/// Analytics page with precomputed breakdowns.
#[must_use]
pub fn analytics() -> AnalyticsData {
    let departments = [
        ("IT", 38.5, 15),
        ("Finance", 42.1, 12),
        ("HR", 25.3, 8),
        ("Marketing", 31.7, 10),
        ("Sales", 35.2, 14),
        ("Engineering", 28.9, 18),
    ]
    .into_iter()
    .map(|(department, average_risk, count)| DepartmentSummary {
        department: department.to_string(),
        average_risk,
        count,
    })
    .collect();

    let level_distribution: BTreeMap<RiskLevel, u64> = [
        (RiskLevel::Low, 35),
        (RiskLevel::Medium, 28),
        (RiskLevel::High, 22),
        (RiskLevel::Critical, 15),
    ]
    .into_iter()
    .collect();

    AnalyticsData {
        entities: Vec::new(),
        accuracy: ModelAccuracy {
            isolation_forest_accuracy: 96.5,
            random_forest_accuracy: 98.2,
            combined_accuracy: 98.7,
            false_positive_rate: 1.3,
            true_positive_rate: 97.8,
            last_updated: now(),
        },
        threats: threat_analytics(),
        departments: Some(departments),
        level_distribution: Some(level_distribution),
    }
}

/// Eight representative alerts across every severity and status.
#[must_use]
pub fn alerts() -> Vec<Alert> {
    [
        (
            "Suspicious Login Attempt Detected",
            "Multiple failed login attempts from IP 192.168.1.100 for user admin@company.com",
            Severity::Critical,
            AlertStatus::Active,
            "admin@company.com",
            5,
            45.0,
        ),
        (
            "Unusual Data Access Pattern",
            "User john.doe@company.com accessing sensitive files outside business hours",
            Severity::High,
            AlertStatus::Acknowledged,
            "john.doe@company.com",
            15,
            38.0,
        ),
        (
            "Privilege Escalation Attempt",
            "User service.account@company.com attempting to access admin privileges",
            Severity::Critical,
            AlertStatus::Active,
            "service.account@company.com",
            10,
            42.0,
        ),
        (
            "Geographic Anomaly Detected",
            "Login attempt from unusual location (Moscow, RU) for user sales@company.com",
            Severity::High,
            AlertStatus::Active,
            "sales@company.com",
            20,
            35.0,
        ),
        (
            "Database Connection Anomaly",
            "Unusual database queries detected from development server",
            Severity::Medium,
            AlertStatus::Resolved,
            "dev-server-01",
            30,
            28.0,
        ),
        (
            "Network Traffic Spike",
            "Abnormal network activity detected from marketing department",
            Severity::Medium,
            AlertStatus::Acknowledged,
            "marketing-dept",
            40,
            22.0,
        ),
        (
            "File Access Violation",
            "Unauthorized access attempt to confidential HR documents",
            Severity::Critical,
            AlertStatus::Active,
            "temp.user@company.com",
            3,
            48.0,
        ),
        (
            "API Rate Limit Exceeded",
            "Excessive API calls detected from external service",
            Severity::Low,
            AlertStatus::Resolved,
            "external-api-service",
            60,
            18.0,
        ),
    ]
    .into_iter()
    .enumerate()
    .map(
        |(index, (title, description, severity, status, entity_name, age, risk_score))| {
            let id = (index + 1).to_string();
            Alert {
                id: id.clone(),
                title: Some(title.to_string()),
                description: Some(description.to_string()),
                message: None,
                alert_type: None,
                severity,
                status: Some(status),
                is_acknowledged: status != AlertStatus::Active,
                entity_id: id,
                entity_name: Some(entity_name.to_string()),
                risk_score: Some(risk_score),
                timestamp: minutes_ago(age),
            }
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_fallback_matches_published_counters() {
        let data = dashboard();
        assert_eq!(data.stats.total_entities, 1247);
        assert_eq!(data.stats.high_risk_entities, 23);
        assert!((data.stats.average_risk_score - 18.5).abs() < f64::EPSILON);
        assert_eq!(data.stats.threats_detected, 156);
    }

    #[test]
    fn alert_fallback_covers_every_status() {
        let alerts = alerts();
        assert_eq!(alerts.len(), 8);
        let active = alerts
            .iter()
            .filter(|alert| alert.status() == AlertStatus::Active)
            .count();
        assert_eq!(active, 4);
        assert!(alerts.iter().any(|alert| alert.status() == AlertStatus::Resolved));
        assert_eq!(alerts[6].risk_score, Some(48.0));
    }

    #[test]
    fn risk_analysis_counts_agree_with_records() {
        let data = risk_analysis();
        let scores = &data.scores;
        assert_eq!(scores.risk_scores.len(), 10);
        assert_eq!(
            scores.high_risk_count + scores.medium_risk_count + scores.low_risk_count,
            10
        );
        assert_eq!(data.patterns.total_patterns, 6);
        assert_eq!(data.recommendations.total_recommendations, 4);
    }

    #[test]
    fn threat_fallback_has_single_placeholder() {
        let board = threat_board();
        assert_eq!(board.threats.len(), 1);
        assert_eq!(board.analytics.total_threats_today, 156);
        assert_eq!(
            board.analytics.threat_type_distribution.get("BRUTE_FORCE_ATTEMPT"),
            Some(&25)
        );
    }

    #[test]
    fn analytics_fallback_carries_precomputed_breakdowns() {
        let data = analytics();
        assert_eq!(data.departments.as_ref().map(Vec::len), Some(6));
        let shares: u64 = data
            .level_distribution
            .as_ref()
            .map(|levels| levels.values().sum())
            .unwrap_or_default();
        assert_eq!(shares, 100);
    }
}
