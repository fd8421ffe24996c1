//! Message types for actor communication
//!
//! Every command carries a oneshot `respond_to` channel; the store actor answers
//! each one before it looks at the next, so commands never interleave.

use tokio::sync::oneshot;

use crate::storage::{
    StorageResult, StoreCounts,
    schema::{
        AiInsight, Alert, AlertStatus, AlertTransition, CheckResult, InsightPatch, NewAiInsight,
        NewAlert, NewCheckResult, NewSite, NewUptimeStat, Site, SitePatch, UptimeStat,
    },
};

/// Commands that can be sent to the StoreActor
#[derive(Debug)]
pub enum StoreCommand {
    CreateSite {
        site: NewSite,
        respond_to: oneshot::Sender<Site>,
    },

    GetSite {
        id: u64,
        respond_to: oneshot::Sender<Option<Site>>,
    },

    ListSites {
        respond_to: oneshot::Sender<Vec<Site>>,
    },

    UpdateSite {
        id: u64,
        patch: SitePatch,
        respond_to: oneshot::Sender<Option<Site>>,
    },

    /// Remove a site. Its children are left in place.
    DeleteSite {
        id: u64,
        respond_to: oneshot::Sender<bool>,
    },

    GetCheckResult {
        id: u64,
        respond_to: oneshot::Sender<Option<CheckResult>>,
    },

    CheckResultsBySite {
        site_id: u64,
        limit: Option<usize>,
        respond_to: oneshot::Sender<Vec<CheckResult>>,
    },

    /// Persist a check result and its synthesized alert in one actor turn
    RecordCheck {
        check: NewCheckResult,
        alert: Option<NewAlert>,
        respond_to: oneshot::Sender<(CheckResult, Option<Alert>)>,
    },

    CreateAlert {
        alert: NewAlert,
        respond_to: oneshot::Sender<Alert>,
    },

    GetAlert {
        id: u64,
        respond_to: oneshot::Sender<Option<Alert>>,
    },

    ListAlerts {
        status: Option<AlertStatus>,
        limit: Option<usize>,
        respond_to: oneshot::Sender<Vec<Alert>>,
    },

    AlertsBySite {
        site_id: u64,
        status: Option<AlertStatus>,
        respond_to: oneshot::Sender<Vec<Alert>>,
    },

    TransitionAlert {
        id: u64,
        transition: AlertTransition,
        respond_to: oneshot::Sender<StorageResult<Option<Alert>>>,
    },

    CreateUptimeStat {
        stat: NewUptimeStat,
        respond_to: oneshot::Sender<UptimeStat>,
    },

    UptimeStatsBySite {
        site_id: u64,
        respond_to: oneshot::Sender<Vec<UptimeStat>>,
    },

    CreateAiInsight {
        insight: NewAiInsight,
        respond_to: oneshot::Sender<AiInsight>,
    },

    ListAiInsights {
        limit: Option<usize>,
        respond_to: oneshot::Sender<Vec<AiInsight>>,
    },

    AiInsightsBySite {
        site_id: u64,
        respond_to: oneshot::Sender<Vec<AiInsight>>,
    },

    UpdateAiInsight {
        id: u64,
        patch: InsightPatch,
        respond_to: oneshot::Sender<Option<AiInsight>>,
    },

    /// Row counts per entity type
    Counts {
        respond_to: oneshot::Sender<StoreCounts>,
    },

    /// Gracefully shut down the store actor
    Shutdown,
}
