//! Request and response shapes that are not plain entities

use serde::{Deserialize, Serialize};

use crate::storage::schema::{Alert, AlertStatus, CheckResult, Site, UptimeStat};

/// Number of check results included in a site's detail view
pub const SITE_DETAIL_CHECK_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Dashboard summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub websites_count: usize,
    /// Mean of each site's latest uptime percentage, one decimal
    pub average_uptime: f64,
    /// Active alerts
    pub alerts_count: usize,
    /// Mean of each site's latest average response time, rounded
    pub avg_response_time: u64,
    /// Open WebSocket subscribers
    pub subscribers: usize,
}

impl StatsResponse {
    /// Aggregate the latest uptime stat of every site that has one
    pub fn from_latest(
        websites_count: usize,
        latest: &[UptimeStat],
        alerts_count: usize,
        subscribers: usize,
    ) -> Self {
        let (average_uptime, avg_response_time) = if latest.is_empty() {
            (0.0, 0)
        } else {
            let n = latest.len() as f64;
            let uptime = latest.iter().map(|s| s.uptime_percentage).sum::<f64>() / n;
            let response = latest.iter().map(|s| s.avg_response_time).sum::<f64>() / n;
            ((uptime * 10.0).round() / 10.0, response.round() as u64)
        };

        Self {
            websites_count,
            average_uptime,
            alerts_count,
            avg_response_time,
            subscribers,
        }
    }
}

/// A site with its most recent uptime roll-up
#[derive(Debug, Clone, Serialize)]
pub struct SiteWithStats {
    #[serde(flatten)]
    pub site: Site,
    pub stats: Option<UptimeStat>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetails {
    pub site: Site,
    pub stats: Option<UptimeStat>,
    pub active_alerts: Vec<Alert>,
    pub check_results: Vec<CheckResult>,
}

/// Response of `POST /monitor`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorResponse {
    pub success: bool,
    pub check_result: CheckResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    pub status: Option<AlertStatus>,
    pub limit: Option<usize>,
}
