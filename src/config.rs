use std::net::SocketAddr;

use tracing::trace;

use crate::actors::store::DEFAULT_COMMAND_BUFFER;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Address the API server binds to
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Allow cross-origin requests from the dashboard
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Pre-populate the store with the demo dataset
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,

    /// Capacity of the store actor's command channel
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            enable_cors: true,
            seed_demo_data: true,
            command_buffer: default_command_buffer(),
        }
    }
}

impl Config {
    /// Apply `ALERTIFY_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(addr) = crate::util::get_addr() {
            self.bind.set_ip(addr);
        }
        if let Some(port) = crate::util::get_port() {
            self.bind.set_port(port);
        }
        if let Some(seed) = crate::util::get_seed() {
            self.seed_demo_data = seed;
        }
        self
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], crate::util::get_default_port()))
}

fn default_true() -> bool {
    true
}

fn default_command_buffer() -> usize {
    DEFAULT_COMMAND_BUFFER
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
