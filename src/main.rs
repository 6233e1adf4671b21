use anyhow::Result;
use rpi5_monitor::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let aggregator = Arc::new(aggregator::MetricsAggregator::new(
        aggregator::AggregatorDeps {
            sysinfo_repo: Arc::new(sysinfo_repo::SysinfoRepo::new()),
            sensors: Arc::new(sensors::SensorReader::new(app_config.sensors.clone())),
            rates: Arc::new(rates::RateCalculator::new()),
            history: Arc::new(history::HistoryBuffer::new(
                app_config.monitoring.history_capacity,
            )),
        },
        &app_config.monitoring,
    ));

    let system = aggregator.system_report().await?;
    tracing::info!(
        version = version::VERSION,
        is_raspberry_pi = system.is_raspberry_pi,
        model = %system.info.model,
        memory_gb = system.info.memory_gb,
        cpu_count = system.info.cpu_count,
        "{} starting",
        version::NAME
    );
    if let Some(dir) = &app_config.frontend.static_dir {
        tracing::info!(static_dir = %dir, "serving frontend");
    }

    let app = routes::app(aggregator, &app_config);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
