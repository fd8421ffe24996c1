//! Check result ingestion
//!
//! ```text
//! submission ─▶ validate ─▶ evaluate status ─▶ classify
//!                                                 │
//!                 store actor (check + alert, one turn)
//!                                                 │
//!                              broadcaster.publish(alert)
//! ```
//!
//! Invalid submissions are rejected before anything is written. If the store
//! cannot be reached nothing is written and nothing is published. Delivery
//! problems on the broadcast side never reach the caller.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::{
    actors::StoreHandle,
    broadcast::AlertBroadcaster,
    monitors::check::{CheckStatus, classify, classify_at},
    storage::{
        StorageError,
        schema::{Alert, AlertDraft, CheckResult, NewAlert, NewCheckResult},
    },
};

/// Body of `POST /check-results`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSubmission {
    pub site_id: Option<u64>,
    pub status_code: Option<u16>,
    pub response_time: Option<u64>,
    pub success: Option<bool>,
    pub error: Option<String>,
}

/// Body of `POST /monitor`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSubmission {
    pub site_id: Option<u64>,
    pub url: Option<String>,
    pub status_code: Option<u16>,
    pub response_time: Option<u64>,
    pub error: Option<String>,
}

/// What an accepted submission produced
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub check_result: CheckResult,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Missing or malformed field; nothing was written
    InvalidInput(String),

    /// The store could not be reached
    Storage(StorageError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            IngestError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Storage(err) => Some(err),
            IngestError::InvalidInput(_) => None,
        }
    }
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        IngestError::Storage(err)
    }
}

fn require_site_id(site_id: Option<u64>) -> Result<u64, IngestError> {
    match site_id {
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(IngestError::InvalidInput(
            "siteId must be a positive integer".to_string(),
        )),
        None => Err(IngestError::InvalidInput(
            "missing required field: siteId".to_string(),
        )),
    }
}

/// Turns check submissions into stored check results and alerts
#[derive(Clone, Debug)]
pub struct Ingestor {
    store: StoreHandle,
    broadcaster: AlertBroadcaster,
}

impl Ingestor {
    pub fn new(store: StoreHandle, broadcaster: AlertBroadcaster) -> Self {
        Self { store, broadcaster }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn broadcaster(&self) -> &AlertBroadcaster {
        &self.broadcaster
    }

    /// Ingest a check result reported with an explicit success flag
    #[instrument(skip(self))]
    pub async fn submit_check(&self, submission: CheckSubmission) -> Result<IngestOutcome, IngestError> {
        let site_id = require_site_id(submission.site_id)?;
        let success = submission.success.ok_or_else(|| {
            IngestError::InvalidInput("missing required field: success".to_string())
        })?;

        let status = CheckStatus::evaluate(
            submission.status_code,
            submission.response_time,
            submission.error.as_deref(),
            Some(success),
        );

        let check = NewCheckResult {
            site_id,
            timestamp: None,
            status_code: submission.status_code,
            response_time: submission.response_time,
            success,
            error: submission.error,
            status,
        };
        let draft = classify(&check);

        self.persist(check, draft).await
    }

    /// Ingest a raw observation from a monitoring script
    ///
    /// The success flag is derived from the evaluated status.
    #[instrument(skip(self))]
    pub async fn submit_monitor(
        &self,
        submission: MonitorSubmission,
    ) -> Result<IngestOutcome, IngestError> {
        let site_id = require_site_id(submission.site_id)?;
        let url = submission
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| IngestError::InvalidInput("missing required field: url".to_string()))?;

        let status = CheckStatus::evaluate(
            submission.status_code,
            submission.response_time,
            submission.error.as_deref(),
            None,
        );

        let check = NewCheckResult {
            site_id,
            timestamp: None,
            status_code: submission.status_code,
            response_time: submission.response_time,
            success: status == CheckStatus::Success,
            error: submission.error,
            status,
        };
        let draft = classify_at(&check, &url);

        self.persist(check, draft).await
    }

    /// Store a manually raised alert and publish it
    #[instrument(skip(self))]
    pub async fn create_alert(&self, alert: NewAlert) -> Result<Alert, IngestError> {
        require_site_id(Some(alert.site_id))?;
        if alert.message.trim().is_empty() {
            return Err(IngestError::InvalidInput(
                "missing required field: message".to_string(),
            ));
        }

        let alert = self.store.create_alert(alert).await?;
        info!(
            "alert {} ({}) raised for site {}: {}",
            alert.id, alert.severity, alert.site_id, alert.message
        );

        self.broadcaster.publish(&alert).await;
        Ok(alert)
    }

    async fn persist(
        &self,
        check: NewCheckResult,
        draft: Option<AlertDraft>,
    ) -> Result<IngestOutcome, IngestError> {
        let site_id = check.site_id;
        let alert = draft.map(|draft| draft.for_site(site_id));

        let (check_result, alert) = self.store.record_check(check, alert).await?;
        debug!(
            "check result {} for site {} stored ({})",
            check_result.id, site_id, check_result.status
        );

        if let Some(alert) = &alert {
            info!(
                "alert {} ({}) synthesized for site {}: {}",
                alert.id, alert.severity, site_id, alert.message
            );
            self.broadcaster.publish(alert).await;
        }

        Ok(IngestOutcome {
            check_result,
            alert,
        })
    }
}
