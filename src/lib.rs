pub mod actors;
pub mod api;
pub mod broadcast;
pub mod config;
pub mod ingest;
pub mod monitors;
pub mod seed;
pub mod storage;
pub mod util;
