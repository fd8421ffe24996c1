//! StoreActor - Owns the hub's in-memory data store
//!
//! ## Architecture
//!
//! The [`MemoryStore`] has no locking of its own. Instead it lives inside a
//! single task that processes [`StoreCommand`]s one at a time:
//!
//! ```text
//! handler ─┐
//! handler ─┼─ mpsc ──▶ StoreActor (owns MemoryStore) ──▶ oneshot reply
//! handler ─┘
//! ```
//!
//! Every command runs to completion before the next is read, which gives one
//! writer at a time without a mutex. A handle whose actor has stopped reports
//! `StorageError::Unavailable`.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, trace};

use super::messages::StoreCommand;
use crate::storage::{
    MemoryStore, StorageResult, StoreCounts,
    schema::{
        AiInsight, Alert, AlertStatus, AlertTransition, CheckResult, InsightPatch, NewAiInsight,
        NewAlert, NewCheckResult, NewSite, NewUptimeStat, Site, SitePatch, UptimeStat,
    },
};

/// Default capacity of the command channel
pub const DEFAULT_COMMAND_BUFFER: usize = 32;

pub struct StoreActor {
    store: MemoryStore,
    command_rx: mpsc::Receiver<StoreCommand>,
}

impl StoreActor {
    pub fn new(store: MemoryStore, command_rx: mpsc::Receiver<StoreCommand>) -> Self {
        Self { store, command_rx }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting store actor ({:?})", self.store.counts());

        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }

        debug!("store actor stopped");
    }

    /// Handle a command, returning `false` once the actor should stop
    ///
    /// Send failures on `respond_to` mean the caller went away; they are ignored.
    fn handle_command(&mut self, cmd: StoreCommand) -> bool {
        let store = &mut self.store;

        match cmd {
            StoreCommand::CreateSite { site, respond_to } => {
                let _ = respond_to.send(store.create_site(site));
            }
            StoreCommand::GetSite { id, respond_to } => {
                let _ = respond_to.send(store.sites.get(id));
            }
            StoreCommand::ListSites { respond_to } => {
                let _ = respond_to.send(store.all_sites());
            }
            StoreCommand::UpdateSite {
                id,
                patch,
                respond_to,
            } => {
                let _ = respond_to.send(store.sites.update(id, patch));
            }
            StoreCommand::DeleteSite { id, respond_to } => {
                let deleted = store.sites.delete(id);
                if deleted {
                    debug!("deleted site {id} (children are kept)");
                }
                let _ = respond_to.send(deleted);
            }
            StoreCommand::GetCheckResult { id, respond_to } => {
                let _ = respond_to.send(store.check_results.get(id));
            }
            StoreCommand::CheckResultsBySite {
                site_id,
                limit,
                respond_to,
            } => {
                let _ = respond_to.send(store.check_results_by_site(site_id, limit));
            }
            StoreCommand::RecordCheck {
                check,
                alert,
                respond_to,
            } => {
                let _ = respond_to.send(store.record_check(check, alert));
            }
            StoreCommand::CreateAlert { alert, respond_to } => {
                let _ = respond_to.send(store.alerts.create(alert));
            }
            StoreCommand::GetAlert { id, respond_to } => {
                let _ = respond_to.send(store.alerts.get(id));
            }
            StoreCommand::ListAlerts {
                status,
                limit,
                respond_to,
            } => {
                let _ = respond_to.send(store.alerts(status, limit));
            }
            StoreCommand::AlertsBySite {
                site_id,
                status,
                respond_to,
            } => {
                let _ = respond_to.send(store.alerts_by_site(site_id, status));
            }
            StoreCommand::TransitionAlert {
                id,
                transition,
                respond_to,
            } => {
                let _ = respond_to.send(store.transition_alert(id, transition));
            }
            StoreCommand::CreateUptimeStat { stat, respond_to } => {
                let _ = respond_to.send(store.create_uptime_stat(stat));
            }
            StoreCommand::UptimeStatsBySite {
                site_id,
                respond_to,
            } => {
                let _ = respond_to.send(store.uptime_stats_by_site(site_id));
            }
            StoreCommand::CreateAiInsight {
                insight,
                respond_to,
            } => {
                let _ = respond_to.send(store.create_ai_insight(insight));
            }
            StoreCommand::ListAiInsights { limit, respond_to } => {
                let _ = respond_to.send(store.ai_insights(limit));
            }
            StoreCommand::AiInsightsBySite {
                site_id,
                respond_to,
            } => {
                let _ = respond_to.send(store.ai_insights_by_site(site_id));
            }
            StoreCommand::UpdateAiInsight {
                id,
                patch,
                respond_to,
            } => {
                let _ = respond_to.send(store.ai_insights.update(id, patch));
            }
            StoreCommand::Counts { respond_to } => {
                let _ = respond_to.send(store.counts());
            }
            StoreCommand::Shutdown => {
                debug!("store actor shutting down");
                return false;
            }
        }

        trace!("store command handled");
        true
    }
}

/// Handle for talking to the store actor
#[derive(Clone, Debug)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    /// Spawn a store actor owning an empty store
    pub fn spawn() -> Self {
        Self::spawn_with_store(MemoryStore::new(), DEFAULT_COMMAND_BUFFER)
    }

    /// Spawn a store actor owning `store`
    pub fn spawn_with_store(store: MemoryStore, command_buffer: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(command_buffer.max(1));

        let actor = StoreActor::new(store, cmd_rx);
        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> StorageResult<T> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(command(tx)).await?;
        Ok(rx.await?)
    }

    pub async fn create_site(&self, site: NewSite) -> StorageResult<Site> {
        self.request(|respond_to| StoreCommand::CreateSite { site, respond_to })
            .await
    }

    pub async fn get_site(&self, id: u64) -> StorageResult<Option<Site>> {
        self.request(|respond_to| StoreCommand::GetSite { id, respond_to })
            .await
    }

    pub async fn list_sites(&self) -> StorageResult<Vec<Site>> {
        self.request(|respond_to| StoreCommand::ListSites { respond_to })
            .await
    }

    pub async fn update_site(&self, id: u64, patch: SitePatch) -> StorageResult<Option<Site>> {
        self.request(|respond_to| StoreCommand::UpdateSite {
            id,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn delete_site(&self, id: u64) -> StorageResult<bool> {
        self.request(|respond_to| StoreCommand::DeleteSite { id, respond_to })
            .await
    }

    pub async fn get_check_result(&self, id: u64) -> StorageResult<Option<CheckResult>> {
        self.request(|respond_to| StoreCommand::GetCheckResult { id, respond_to })
            .await
    }

    pub async fn check_results_by_site(
        &self,
        site_id: u64,
        limit: Option<usize>,
    ) -> StorageResult<Vec<CheckResult>> {
        self.request(|respond_to| StoreCommand::CheckResultsBySite {
            site_id,
            limit,
            respond_to,
        })
        .await
    }

    pub async fn record_check(
        &self,
        check: NewCheckResult,
        alert: Option<NewAlert>,
    ) -> StorageResult<(CheckResult, Option<Alert>)> {
        self.request(|respond_to| StoreCommand::RecordCheck {
            check,
            alert,
            respond_to,
        })
        .await
    }

    pub async fn create_alert(&self, alert: NewAlert) -> StorageResult<Alert> {
        self.request(|respond_to| StoreCommand::CreateAlert { alert, respond_to })
            .await
    }

    pub async fn get_alert(&self, id: u64) -> StorageResult<Option<Alert>> {
        self.request(|respond_to| StoreCommand::GetAlert { id, respond_to })
            .await
    }

    pub async fn list_alerts(
        &self,
        status: Option<AlertStatus>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<Alert>> {
        self.request(|respond_to| StoreCommand::ListAlerts {
            status,
            limit,
            respond_to,
        })
        .await
    }

    pub async fn alerts_by_site(
        &self,
        site_id: u64,
        status: Option<AlertStatus>,
    ) -> StorageResult<Vec<Alert>> {
        self.request(|respond_to| StoreCommand::AlertsBySite {
            site_id,
            status,
            respond_to,
        })
        .await
    }

    pub async fn transition_alert(
        &self,
        id: u64,
        transition: AlertTransition,
    ) -> StorageResult<Option<Alert>> {
        self.request(|respond_to| StoreCommand::TransitionAlert {
            id,
            transition,
            respond_to,
        })
        .await?
    }

    pub async fn create_uptime_stat(&self, stat: NewUptimeStat) -> StorageResult<UptimeStat> {
        self.request(|respond_to| StoreCommand::CreateUptimeStat { stat, respond_to })
            .await
    }

    pub async fn uptime_stats_by_site(&self, site_id: u64) -> StorageResult<Vec<UptimeStat>> {
        self.request(|respond_to| StoreCommand::UptimeStatsBySite {
            site_id,
            respond_to,
        })
        .await
    }

    pub async fn create_ai_insight(&self, insight: NewAiInsight) -> StorageResult<AiInsight> {
        self.request(|respond_to| StoreCommand::CreateAiInsight {
            insight,
            respond_to,
        })
        .await
    }

    pub async fn list_ai_insights(&self, limit: Option<usize>) -> StorageResult<Vec<AiInsight>> {
        self.request(|respond_to| StoreCommand::ListAiInsights { limit, respond_to })
            .await
    }

    pub async fn ai_insights_by_site(&self, site_id: u64) -> StorageResult<Vec<AiInsight>> {
        self.request(|respond_to| StoreCommand::AiInsightsBySite {
            site_id,
            respond_to,
        })
        .await
    }

    pub async fn update_ai_insight(
        &self,
        id: u64,
        patch: InsightPatch,
    ) -> StorageResult<Option<AiInsight>> {
        self.request(|respond_to| StoreCommand::UpdateAiInsight {
            id,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn counts(&self) -> StorageResult<StoreCounts> {
        self.request(|respond_to| StoreCommand::Counts { respond_to })
            .await
    }

    /// Shut down the actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(StoreCommand::Shutdown).await;
    }
}
