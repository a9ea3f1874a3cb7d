//! API server entry point.

use api::config::Config;
use store::InMemoryBookingStore;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Create store and application state
    let config = Config::from_env();
    let store = InMemoryBookingStore::new();
    let state = api::create_default_state(store, config.collaborator_timeout());

    // 4. Start the housekeeping sweep (booking expiry + stay completion)
    {
        let state = state.clone();
        let period = config.housekeeping_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it so the sweep
            // starts one full period after boot.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match state
                    .booking_service
                    .run_housekeeping(chrono::Utc::now())
                    .await
                {
                    Ok(report) if report.expired > 0 || report.completed > 0 => {
                        tracing::info!(
                            expired = report.expired,
                            completed = report.completed,
                            "housekeeping sweep finished"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "housekeeping sweep failed"),
                }
            }
        });
    }

    // 5. Build the application
    let app = api::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
