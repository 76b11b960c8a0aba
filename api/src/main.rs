use api::app;
use migration::{Migrator, MigratorTrait};
use std::net::SocketAddr;
use tracing_appender::rolling;
use util::{config::AppConfig, state::AppState, ws::WebSocketManager};

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let config = AppConfig::global().clone();
    let _log_guard = init_logging(&config.log_file, &config.log_level, config.log_to_stdout);
    if let Err(e) = config.check() {
        tracing::error!(error = %e, env = %config.env, "Invalid configuration");
        std::process::exit(1);
    }

    // Set up dependencies
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, path = %config.database_path, "Failed to connect to database");
            std::process::exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!(error = %e, "Failed to apply migrations");
        std::process::exit(1);
    }
    let app_state = AppState::new(db, WebSocketManager::new());

    // Build app router
    let app = app(app_state);

    // Start server
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, host = %config.host, port = config.port, "Invalid listen address");
            std::process::exit(1);
        }
    };

    println!(
        "Starting {} on http://{}:{}",
        config.project_name, config.host, config.port
    );
    tracing::info!(%addr, env = %config.env, "Server starting");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "Server crashed");
    }
}

fn init_logging(
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
