//! Route handlers grouped by resource

pub mod alerts;
pub mod checks;
pub mod health;
pub mod insights;
pub mod sites;
pub mod stats;
pub mod uptime;
