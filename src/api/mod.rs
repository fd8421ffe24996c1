//! REST API and WebSocket server for the hub
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/stats` - Dashboard summary
//! - `GET|POST /api/sites`, `GET|PUT|DELETE /api/sites/{id}` - Site management
//! - `GET /api/sites/{id}/{alerts,check-results,uptime-stats,ai-insights}`
//! - `GET|POST /api/alerts`, `PATCH /api/alerts/{id}` - Alerts and transitions
//! - `POST /api/check-results`, `POST /api/monitor` - Check ingestion
//! - `POST /api/uptime-stats` - Uptime roll-ups
//! - `GET|POST /api/ai-insights`, `PATCH /api/ai-insights/{id}` - Insights
//! - `WS /ws` - Real-time alert stream

#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod routes;
#[cfg(feature = "api")]
pub mod state;
#[cfg(feature = "api")]
pub mod types;
#[cfg(feature = "api")]
pub mod websocket;

#[cfg(feature = "api")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "api")]
pub use state::ApiState;
#[cfg(feature = "api")]
pub use types::{HealthResponse, MonitorResponse, SiteDetails, SiteWithStats, StatsResponse};

#[cfg(feature = "api")]
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::net::SocketAddr;
#[cfg(feature = "api")]
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:5000")
    pub bind_addr: SocketAddr,

    /// Enable CORS for dashboard
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], crate::util::get_default_port())),
            enable_cors: true,
        }
    }
}

impl From<&crate::config::Config> for ApiConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            bind_addr: config.bind,
            enable_cors: config.enable_cors,
        }
    }
}

/// Build the router with all routes and layers
#[cfg(feature = "api")]
pub fn router(config: &ApiConfig, state: ApiState) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/stats", get(routes::stats::get_stats))
        .route(
            "/sites",
            get(routes::sites::list_sites).post(routes::sites::create_site),
        )
        .route(
            "/sites/:id",
            get(routes::sites::get_site)
                .put(routes::sites::update_site)
                .delete(routes::sites::delete_site),
        )
        .route("/sites/:id/alerts", get(routes::sites::site_alerts))
        .route(
            "/sites/:id/check-results",
            get(routes::sites::site_check_results),
        )
        .route(
            "/sites/:id/uptime-stats",
            get(routes::uptime::site_uptime_stats),
        )
        .route(
            "/sites/:id/ai-insights",
            get(routes::insights::site_ai_insights),
        )
        .route(
            "/alerts",
            get(routes::alerts::list_alerts).post(routes::alerts::create_alert),
        )
        .route("/alerts/:id", patch(routes::alerts::update_alert))
        .route("/check-results", post(routes::checks::submit_check_result))
        .route("/monitor", post(routes::checks::submit_monitor))
        .route("/uptime-stats", post(routes::uptime::create_uptime_stat))
        .route(
            "/ai-insights",
            get(routes::insights::list_ai_insights).post(routes::insights::create_ai_insight),
        )
        .route(
            "/ai-insights/:id",
            patch(routes::insights::update_ai_insight),
        );

    let mut app = Router::new()
        .nest("/api", api)
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
#[cfg(feature = "api")]
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(&config, state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
