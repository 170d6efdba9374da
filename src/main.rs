// src/main.rs
// Back-office hook service: record saves with status notifications, price display

use backoffice_hooks::api::{self, AppState};
use backoffice_hooks::config::AppConfig;
use chrono::Utc;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "backoffice_hooks", about = "Status change hooks and currency display service")]
struct Cli {
    /// Overrides SERVER_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Directory for rolling log files
    #[arg(long, default_value = "logs")]
    log_dir: String,
}

fn init_logging(log_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "backoffice_hooks");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_level(true)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()?;

    println!("📋 Logging initialized:");
    println!("   📄 Daily logs: {}/backoffice_hooks.YYYY-MM-DD", log_dir);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenv::dotenv() {
        println!("Warning: Could not load .env file: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_dir) {
        eprintln!("Failed to initialize logging: {}", e);
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .init();
    }

    info!("🚀 Starting back-office hook service at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));

    let mut config = AppConfig::from_env()?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    config.log_summary();

    let state = match AppState::connect(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to connect to Redis at {}: {}", config.redis_url, e);
            std::process::exit(1);
        }
    };

    let app = api::router(state);

    let address = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&address).await?;
    info!("🌐 Listening on http://{}", address);
    info!("   PUT  /api/orders/:id");
    info!("   PUT  /api/donations/:id");
    info!("   PUT  /api/applications/:id");
    info!("   GET  /api/prices/convert?amount=");
    info!("   POST /api/prices/convert");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
