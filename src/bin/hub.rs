use alertify::{
    actors::StoreHandle,
    api::{ApiConfig, ApiState, spawn_api_server},
    broadcast::AlertBroadcaster,
    config::{Config, read_config_file},
    ingest::Ingestor,
    seed::demo_store,
    storage::MemoryStore,
};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (JSON); defaults apply when omitted
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("alertify", LevelFilter::DEBUG),
        ("alertify_hub", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    }
    .with_env_overrides();

    let store = if config.seed_demo_data {
        demo_store()
    } else {
        MemoryStore::new()
    };

    let store = StoreHandle::spawn_with_store(store, config.command_buffer);
    let ingestor = Ingestor::new(store.clone(), AlertBroadcaster::new());

    let addr = spawn_api_server(ApiConfig::from(&config), ApiState::new(ingestor)).await?;
    info!("alertify hub ready on http://{addr} (WebSocket at ws://{addr}/ws)");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    store.shutdown().await;

    Ok(())
}
