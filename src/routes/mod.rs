// HTTP routes

mod http;

use std::path::Path;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::aggregator::MetricsAggregator;
use crate::config::AppConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: Arc<MetricsAggregator>,
}

pub fn app(aggregator: Arc<MetricsAggregator>, config: &AppConfig) -> Router {
    let state = AppState { aggregator };
    let router = Router::new()
        .route("/api/health", get(http::health_handler)) // GET /api/health
        .route("/api/system", get(http::system_handler)) // GET /api/system
        .route("/api/metrics", get(http::metrics_handler)) // GET /api/metrics
        .route("/api/metrics/history", get(http::history_handler)) // GET /api/metrics/history
        .route("/api/processes", get(http::processes_handler)) // GET /api/processes?limit=N
        .route("/api/network", get(http::network_handler)) // GET /api/network
        .route("/api/thermal", get(http::thermal_handler)) // GET /api/thermal
        .route("/api/disk", get(http::disk_handler)) // GET /api/disk?path=/
        .route("/api/{*rest}", get(http::not_found_handler));

    let router = match &config.frontend.static_dir {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(http::not_found_handler),
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
