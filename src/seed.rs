//! Demo dataset for the dashboard
//!
//! Everything goes through the regular store operations, so ids and ordering
//! behave exactly as they would for client-created data.

use chrono::{Duration, Utc};
use tracing::debug;

use crate::storage::{
    MemoryStore,
    schema::{
        AlertSeverity, AlertStatus, InsightKind, InsightStatus, NewAiInsight, NewAlert, NewSite,
        NewUptimeStat, SiteType, UptimePeriod,
    },
};

struct DemoSite {
    name: &'static str,
    url: &'static str,
    site_type: SiteType,
    check_frequency: u32,
    uptime_percentage: f64,
    avg_response_time: f64,
    error_rate: f64,
}

const DEMO_SITES: [DemoSite; 5] = [
    DemoSite {
        name: "Main E-commerce Website",
        url: "https://ecommerce-app.com",
        site_type: SiteType::Website,
        check_frequency: 5,
        uptime_percentage: 98.2,
        avg_response_time: 452.0,
        error_rate: 1.8,
    },
    DemoSite {
        name: "Mobile Banking App",
        url: "https://banking-app.io",
        site_type: SiteType::MobileApp,
        check_frequency: 3,
        uptime_percentage: 99.9,
        avg_response_time: 189.0,
        error_rate: 0.1,
    },
    DemoSite {
        name: "Content Delivery API",
        url: "https://content-delivery-api.com",
        site_type: SiteType::Api,
        check_frequency: 2,
        uptime_percentage: 100.0,
        avg_response_time: 752.0,
        error_rate: 0.0,
    },
    DemoSite {
        name: "Analytics Dashboard",
        url: "https://analytics-dashboard.app",
        site_type: SiteType::Website,
        check_frequency: 5,
        uptime_percentage: 99.7,
        avg_response_time: 612.0,
        error_rate: 0.3,
    },
    DemoSite {
        name: "CRM System",
        url: "https://crm-system.io",
        site_type: SiteType::Website,
        check_frequency: 5,
        uptime_percentage: 97.5,
        avg_response_time: 831.0,
        error_rate: 2.5,
    },
];

/// Daily checks assumed for the seeded roll-ups (one per minute)
const CHECKS_PER_DAY: u64 = 1440;

/// (site index, minutes ago, severity, message, assignee)
const DEMO_ALERTS: [(usize, i64, AlertSeverity, &str, Option<u64>); 4] = [
    (0, 2, AlertSeverity::Error, "HTTP 500 Error", Some(1)),
    (3, 15, AlertSeverity::Warning, "Slow Response Time", None),
    (4, 34, AlertSeverity::Error, "Database Connection Error", Some(1)),
    (2, 60, AlertSeverity::Warning, "Memory Usage High", Some(1)),
];

/// Build a store pre-populated with the demo dataset
pub fn demo_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    let now = Utc::now();

    let site_ids: Vec<u64> = DEMO_SITES
        .iter()
        .map(|demo| {
            let site = store.create_site(NewSite {
                site_type: demo.site_type,
                check_frequency: demo.check_frequency,
                ..NewSite::new(demo.name, demo.url)
            });

            let failed = (CHECKS_PER_DAY as f64 * demo.error_rate / 100.0).round() as u64;
            store.create_uptime_stat(NewUptimeStat {
                site_id: site.id,
                timestamp: Some(now),
                period: UptimePeriod::Daily,
                uptime_percentage: demo.uptime_percentage,
                avg_response_time: demo.avg_response_time,
                checks_count: CHECKS_PER_DAY,
                failed_checks_count: failed,
            });

            site.id
        })
        .collect();

    for (index, minutes_ago, severity, message, assignee) in DEMO_ALERTS {
        store.alerts.create(NewAlert {
            site_id: site_ids[index],
            timestamp: Some(now - Duration::minutes(minutes_ago)),
            severity,
            message: message.to_string(),
            status: AlertStatus::Active,
            details: assignee.map(|user| serde_json::json!({ "assignedTo": user })),
            acknowledged_by: None,
        });
    }

    store.create_ai_insight(NewAiInsight {
        site_id: site_ids[2],
        timestamp: Some(now),
        kind: InsightKind::Prediction,
        message: "Content Delivery API might experience increased response times in the next 2 hours based on current traffic patterns.".to_string(),
        confidence: 0.82,
        related_metrics: Some(serde_json::json!(["responseTime"])),
        details: None,
        status: InsightStatus::New,
    });
    store.create_ai_insight(NewAiInsight {
        site_id: site_ids[0],
        timestamp: Some(now),
        kind: InsightKind::Suggestion,
        message: "For HTTP 500 Error on ecommerce-app.com/api/products, check database connection pool settings. Current pool may be exhausted under high load.".to_string(),
        confidence: 0.74,
        related_metrics: Some(serde_json::json!(["errorRate", "statusCode"])),
        details: None,
        status: InsightStatus::New,
    });

    debug!("seeded demo store: {:?}", store.counts());
    store
}
