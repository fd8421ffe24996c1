//! Check result classification and alert synthesis
//!
//! ```text
//! error text | no status code | code >= 500      -> Error
//! code >= 400 | response time > 1000ms          -> Warning
//! anything else                                  -> Success
//! ```
//!
//! `Warning` and `Error` produce an [`AlertDraft`]; `Success` produces nothing.

use serde::{Deserialize, Serialize};

use crate::storage::schema::{AlertDraft, AlertSeverity, AlertStatus, CheckResult, NewCheckResult};

/// Response times above this many milliseconds count as degraded
pub const SLOW_RESPONSE_THRESHOLD_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Warning,
    Error,
}

impl CheckStatus {
    pub fn evaluate(
        status_code: Option<u16>,
        response_time: Option<u64>,
        error: Option<&str>,
        success: Option<bool>,
    ) -> CheckStatus {
        let has_error = error.is_some_and(|e| !e.is_empty());

        let Some(code) = status_code else {
            return CheckStatus::Error;
        };

        if has_error || code >= 500 {
            return CheckStatus::Error;
        }

        if code >= 400 || response_time.is_some_and(|ms| ms > SLOW_RESPONSE_THRESHOLD_MS) {
            return CheckStatus::Warning;
        }

        // the monitor says it failed even though nothing above explains it
        if success == Some(false) {
            return CheckStatus::Warning;
        }

        CheckStatus::Success
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Success => "success",
            CheckStatus::Warning => "warning",
            CheckStatus::Error => "error",
        }
    }

    fn severity(self) -> Option<AlertSeverity> {
        match self {
            CheckStatus::Success => None,
            CheckStatus::Warning => Some(AlertSeverity::Warning),
            CheckStatus::Error => Some(AlertSeverity::Error),
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to a check result, stored or not
pub trait Observation {
    fn status(&self) -> CheckStatus;
    fn status_code(&self) -> Option<u16>;
    fn error(&self) -> Option<&str>;
}

impl Observation for CheckResult {
    fn status(&self) -> CheckStatus {
        self.status
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Observation for NewCheckResult {
    fn status(&self) -> CheckStatus {
        self.status
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

fn status_code_text(code: Option<u16>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

fn error_text(result: &impl Observation) -> Option<String> {
    result
        .error()
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

/// Build an alert draft for an unhealthy check result
///
/// The message is the reported error text, or `"<Error|Warning>: Status code <code>"`.
pub fn classify(result: &impl Observation) -> Option<AlertDraft> {
    let severity = result.status().severity()?;

    let message = error_text(result).unwrap_or_else(|| {
        let label = match severity {
            AlertSeverity::Error => "Error",
            _ => "Warning",
        };
        format!("{label}: Status code {}", status_code_text(result.status_code()))
    });

    Some(AlertDraft {
        severity,
        message,
        status: AlertStatus::Active,
    })
}

/// Like [`classify`], but names the checked URL in the fallback message
pub fn classify_at(result: &impl Observation, url: &str) -> Option<AlertDraft> {
    let severity = result.status().severity()?;

    let message = error_text(result).unwrap_or_else(|| {
        format!(
            "HTTP {} error at {url}",
            status_code_text(result.status_code())
        )
    });

    Some(AlertDraft {
        severity,
        message,
        status: AlertStatus::Active,
    })
}
