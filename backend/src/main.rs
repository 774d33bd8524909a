use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use langdetect_server::config::{Config, LoggingConfig};
use langdetect_server::{AppState, build_router};

#[derive(Debug, Parser)]
#[command(name = "langdetect-server", version, about = "AI language detection service")]
struct Args {
    /// Path to a TOML config file (default: conf/config.toml or config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be in the environment before config overrides are applied
    let dotenv_path = dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::load_at_startup(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _log_guard = init_tracing(&config.logging)?;
    if let Some(path) = dotenv_path {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("{}", "=".repeat(60));
    tracing::info!("AI Language Detection - Starting Server");
    tracing::info!("Gemini API key configured: {}", config.gemini.is_configured());
    tracing::info!("Gemini model: {}", config.gemini.model);
    tracing::info!("Server running at: http://{}", addr);
    tracing::info!("API docs at: http://{}/swagger-ui", addr);
    tracing::info!("{}", "=".repeat(60));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Console logging plus an optional daily-rolling log file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|e| {
        eprintln!("Invalid logging.level '{}': {} (falling back to info)", logging.level, e);
        EnvFilter::new("info")
    });

    let Some(file) = logging.file.as_deref() else {
        tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
        return Ok(None);
    };

    let path = Path::new(file);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name().context("logging.file has no file name")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(Some(guard))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
