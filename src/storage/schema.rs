//! Entity definitions for the hub's data store
//!
//! Every entity comes in up to three shapes:
//!
//! - the **row** (`Site`, `Alert`, ...) as stored and served, carrying its id
//! - the **insert** shape (`NewSite`, `NewAlert`, ...) accepted on creation
//! - the **patch** shape (`SitePatch`, ...) for shallow updates
//!
//! All wire names are camelCase to match the dashboard client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::monitors::check::CheckStatus;

/// Behaviour shared by every stored row
pub trait Record: Clone {
    fn id(&self) -> u64;

    /// Ordering key for listings. Rows without one keep insertion order.
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// An insert shape that becomes a row once an id is allocated
pub trait Insert {
    type Row: Record;

    fn into_row(self, id: u64) -> Self::Row;
}

/// A partial update merged field-by-field into an existing row
pub trait Patch<T> {
    fn apply(self, row: &mut T);
}

// ============================================================================
// Sites
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    #[default]
    Website,
    MobileApp,
    Api,
}

/// A monitored target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: u64,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub site_type: SiteType,
    /// Check interval in minutes
    pub check_frequency: u32,
    pub active: bool,
    pub settings: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Record for Site {
    fn id(&self) -> u64 {
        self.id
    }
}

fn default_check_frequency() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSite {
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub site_type: SiteType,
    #[serde(default = "default_check_frequency")]
    pub check_frequency: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl NewSite {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            site_type: SiteType::default(),
            check_frequency: default_check_frequency(),
            active: true,
            settings: Map::new(),
        }
    }
}

impl Insert for NewSite {
    type Row = Site;

    fn into_row(self, id: u64) -> Site {
        Site {
            id,
            name: self.name,
            url: self.url,
            site_type: self.site_type,
            check_frequency: self.check_frequency,
            active: self.active,
            settings: self.settings,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePatch {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub site_type: Option<SiteType>,
    pub check_frequency: Option<u32>,
    pub active: Option<bool>,
    /// Replaces the whole settings object, keys are not merged
    pub settings: Option<Map<String, Value>>,
}

impl Patch<Site> for SitePatch {
    fn apply(self, row: &mut Site) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(url) = self.url {
            row.url = url;
        }
        if let Some(site_type) = self.site_type {
            row.site_type = site_type;
        }
        if let Some(check_frequency) = self.check_frequency {
            row.check_frequency = check_frequency;
        }
        if let Some(active) = self.active {
            row.active = active;
        }
        if let Some(settings) = self.settings {
            row.settings = settings;
        }
    }
}

// ============================================================================
// Check results
// ============================================================================

/// One observation of a site's health. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: u64,
    pub site_id: u64,
    pub timestamp: DateTime<Utc>,
    pub status_code: Option<u16>,
    /// Response time in milliseconds
    pub response_time: Option<u64>,
    pub success: bool,
    pub error: Option<String>,
    pub status: CheckStatus,
}

impl Record for CheckResult {
    fn id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckResult {
    pub site_id: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub status_code: Option<u16>,
    pub response_time: Option<u64>,
    pub success: bool,
    pub error: Option<String>,
    pub status: CheckStatus,
}

impl Insert for NewCheckResult {
    type Row = CheckResult;

    fn into_row(self, id: u64) -> CheckResult {
        CheckResult {
            id,
            site_id: self.site_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            status_code: self.status_code,
            response_time: self.response_time,
            success: self.success,
            error: self.error,
            status: self.status,
        }
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Critical => write!(f, "critical"),
            AlertSeverity::Error => write!(f, "error"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Whether an alert may move from `self` to `next`
    ///
    /// ```text
    /// active -> acknowledged -> resolved
    ///    \__________________________/^
    /// ```
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Active, AlertStatus::Acknowledged)
                | (AlertStatus::Active, AlertStatus::Resolved)
                | (AlertStatus::Acknowledged, AlertStatus::Resolved)
        )
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notable condition requiring attention
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u64,
    pub site_id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub severity: AlertSeverity,
    pub message: String,
    pub status: AlertStatus,
    pub details: Option<Value>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<u64>,
}

impl Record for Alert {
    fn id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

/// Alert produced by the synthesis rule, not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub severity: AlertSeverity,
    pub message: String,
    pub status: AlertStatus,
}

impl AlertDraft {
    pub fn for_site(self, site_id: u64) -> NewAlert {
        NewAlert {
            site_id,
            timestamp: None,
            severity: self.severity,
            message: self.message,
            status: self.status,
            details: None,
            acknowledged_by: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub site_id: u64,
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type", alias = "severity")]
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub acknowledged_by: Option<u64>,
}

impl Insert for NewAlert {
    type Row = Alert;

    fn into_row(self, id: u64) -> Alert {
        Alert {
            id,
            site_id: self.site_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            severity: self.severity,
            message: self.message,
            status: self.status,
            details: self.details,
            resolved_at: None,
            acknowledged_by: self.acknowledged_by,
        }
    }
}

/// Status change applied to an alert
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTransition {
    pub status: AlertStatus,
    #[serde(default)]
    pub acknowledged_by: Option<u64>,
}

impl Patch<Alert> for AlertTransition {
    fn apply(self, row: &mut Alert) {
        row.status = self.status;
        match self.status {
            AlertStatus::Acknowledged => row.acknowledged_by = self.acknowledged_by,
            AlertStatus::Resolved => {
                row.resolved_at = Some(Utc::now());
                if self.acknowledged_by.is_some() {
                    row.acknowledged_by = self.acknowledged_by;
                }
            }
            AlertStatus::Active => {}
        }
    }
}

// ============================================================================
// Uptime statistics
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UptimePeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

/// Periodic roll-up of a site's availability
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UptimeStat {
    pub id: u64,
    pub site_id: u64,
    pub timestamp: DateTime<Utc>,
    pub period: UptimePeriod,
    pub uptime_percentage: f64,
    pub avg_response_time: f64,
    pub checks_count: u64,
    pub failed_checks_count: u64,
}

impl Record for UptimeStat {
    fn id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUptimeStat {
    pub site_id: u64,
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
    pub period: UptimePeriod,
    pub uptime_percentage: f64,
    pub avg_response_time: f64,
    pub checks_count: u64,
    pub failed_checks_count: u64,
}

impl Insert for NewUptimeStat {
    type Row = UptimeStat;

    fn into_row(self, id: u64) -> UptimeStat {
        UptimeStat {
            id,
            site_id: self.site_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            period: self.period,
            uptime_percentage: self.uptime_percentage,
            avg_response_time: self.avg_response_time,
            checks_count: self.checks_count,
            failed_checks_count: self.failed_checks_count,
        }
    }
}

// ============================================================================
// AI insights
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Prediction,
    Anomaly,
    Trend,
    Optimization,
    Suggestion,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InsightStatus {
    #[default]
    New,
    Reviewed,
    Implemented,
    Dismissed,
}

/// Advisory message supplied from outside the hub
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub id: u64,
    pub site_id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub confidence: f64,
    pub related_metrics: Option<Value>,
    pub details: Option<Value>,
    pub status: InsightStatus,
}

impl Record for AiInsight {
    fn id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAiInsight {
    pub site_id: u64,
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub confidence: f64,
    #[serde(default)]
    pub related_metrics: Option<Value>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub status: InsightStatus,
}

impl Insert for NewAiInsight {
    type Row = AiInsight;

    fn into_row(self, id: u64) -> AiInsight {
        AiInsight {
            id,
            site_id: self.site_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            kind: self.kind,
            message: self.message,
            confidence: self.confidence,
            related_metrics: self.related_metrics,
            details: self.details,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPatch {
    pub status: Option<InsightStatus>,
    pub message: Option<String>,
    pub confidence: Option<f64>,
    pub details: Option<Value>,
}

impl Patch<AiInsight> for InsightPatch {
    fn apply(self, row: &mut AiInsight) {
        if let Some(status) = self.status {
            row.status = status;
        }
        if let Some(message) = self.message {
            row.message = message;
        }
        if let Some(confidence) = self.confidence {
            row.confidence = confidence;
        }
        if let Some(details) = self.details {
            row.details = Some(details);
        }
    }
}
