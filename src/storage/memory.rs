//! In-memory data store
//!
//! One [`Table`] per entity type, each with its own id allocator. Ids start at 1,
//! increase strictly and are never reused, even after a delete.
//!
//! ## Limitations
//!
//! - **No persistence**: all data is lost on restart
//! - **No synchronization**: the store is owned by the store actor, which
//!   serializes every access (see `actors::store`)
//! - **No referential integrity**: deleting a site leaves its check results,
//!   alerts, uptime stats and insights in place

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use super::error::{StorageError, StorageResult};
use super::schema::{
    AiInsight, Alert, AlertStatus, AlertTransition, CheckResult, Insert, NewAiInsight, NewAlert,
    NewCheckResult, NewSite, NewUptimeStat, Patch, Record, Site, UptimeStat,
};

/// Rows of a single entity type keyed by id
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    pub fn create<N: Insert<Row = T>>(&mut self, new: N) -> T {
        let id = self.next_id;
        self.next_id += 1;

        let row = new.into_row(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    /// Matching rows, newest first
    ///
    /// Rows with equal timestamps are ordered by descending id. Rows without a
    /// timestamp come back in insertion order.
    pub fn list(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self.rows.values().filter(|r| filter(r)).cloned().collect();

        rows.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
            (Some(ta), Some(tb)) => tb.cmp(&ta).then_with(|| b.id().cmp(&a.id())),
            _ => a.id().cmp(&b.id()),
        });

        rows
    }

    pub fn update<P: Patch<T>>(&mut self, id: u64, patch: P) -> Option<T> {
        let row = self.rows.get_mut(&id)?;
        patch.apply(row);
        Some(row.clone())
    }

    pub fn delete(&mut self, id: u64) -> bool {
        self.rows.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn take<T>(mut rows: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// Number of stored rows per entity type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub sites: usize,
    pub check_results: usize,
    pub alerts: usize,
    pub uptime_stats: usize,
    pub ai_insights: usize,
}

impl StoreCounts {
    pub fn total(&self) -> usize {
        self.sites + self.check_results + self.alerts + self.uptime_stats + self.ai_insights
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub sites: Table<Site>,
    pub check_results: Table<CheckResult>,
    pub alerts: Table<Alert>,
    pub uptime_stats: Table<UptimeStat>,
    pub ai_insights: Table<AiInsight>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            sites: self.sites.len(),
            check_results: self.check_results.len(),
            alerts: self.alerts.len(),
            uptime_stats: self.uptime_stats.len(),
            ai_insights: self.ai_insights.len(),
        }
    }

    pub fn create_site(&mut self, site: NewSite) -> Site {
        let site = self.sites.create(site);
        trace!("created site {} ({})", site.id, site.url);
        site
    }

    pub fn all_sites(&self) -> Vec<Site> {
        self.sites.list(|_| true)
    }

    pub fn check_results_by_site(&self, site_id: u64, limit: Option<usize>) -> Vec<CheckResult> {
        take(self.check_results.list(|r| r.site_id == site_id), limit)
    }

    /// Write a check result and, if given, the alert synthesized from it
    ///
    /// Both rows are written in the same call so no other command can observe
    /// the check result without its alert.
    pub fn record_check(
        &mut self,
        check: NewCheckResult,
        alert: Option<NewAlert>,
    ) -> (CheckResult, Option<Alert>) {
        let check = self.check_results.create(check);
        let alert = alert.map(|a| self.alerts.create(a));

        trace!(
            "recorded check result {} for site {} (status: {}, alert: {:?})",
            check.id,
            check.site_id,
            check.status,
            alert.as_ref().map(|a| a.id)
        );

        (check, alert)
    }

    pub fn alerts_by_site(&self, site_id: u64, status: Option<AlertStatus>) -> Vec<Alert> {
        self.alerts
            .list(|a| a.site_id == site_id && status.is_none_or(|s| a.status == s))
    }

    pub fn alerts(&self, status: Option<AlertStatus>, limit: Option<usize>) -> Vec<Alert> {
        take(
            self.alerts.list(|a| status.is_none_or(|s| a.status == s)),
            limit,
        )
    }

    pub fn active_alerts(&self, limit: Option<usize>) -> Vec<Alert> {
        self.alerts(Some(AlertStatus::Active), limit)
    }

    /// Apply a status change to an alert
    ///
    /// Returns `Ok(None)` for an unknown id and `InvalidTransition` when the
    /// alert's lifecycle does not allow the move.
    pub fn transition_alert(
        &mut self,
        id: u64,
        transition: AlertTransition,
    ) -> StorageResult<Option<Alert>> {
        let Some(current) = self.alerts.get(id) else {
            return Ok(None);
        };

        if !current.status.can_transition_to(transition.status) {
            return Err(StorageError::InvalidTransition {
                id,
                from: current.status,
                to: transition.status,
            });
        }

        Ok(self.alerts.update(id, transition))
    }

    pub fn uptime_stats_by_site(&self, site_id: u64) -> Vec<UptimeStat> {
        self.uptime_stats.list(|s| s.site_id == site_id)
    }

    pub fn create_uptime_stat(&mut self, stat: NewUptimeStat) -> UptimeStat {
        self.uptime_stats.create(stat)
    }

    pub fn ai_insights(&self, limit: Option<usize>) -> Vec<AiInsight> {
        take(self.ai_insights.list(|_| true), limit)
    }

    pub fn ai_insights_by_site(&self, site_id: u64) -> Vec<AiInsight> {
        self.ai_insights.list(|i| i.site_id == site_id)
    }

    pub fn create_ai_insight(&mut self, insight: NewAiInsight) -> AiInsight {
        self.ai_insights.create(insight)
    }
}
