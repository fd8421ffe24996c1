//! Health evaluation for incoming check results

pub mod check;

pub use check::{CheckStatus, Observation, SLOW_RESPONSE_THRESHOLD_MS, classify, classify_at};
