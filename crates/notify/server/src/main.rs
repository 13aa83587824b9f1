//! Notify Server - push notification ingestion over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr as _;
use notify_storage::ContextStore as _;
use tower_http::trace::TraceLayer;

#[derive(Parser)]
#[command(name = "notify-server")]
#[command(about = "Push notification ingestion server", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(notify_server::log_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
        ))
        .init();

    let cli = Cli::parse();
    let config =
        notify_server::Config::load(cli.config.as_deref()).wrap_err("failed to load config")?;

    tracing::info!(database_url = %config.database_url, "notify-server starting");

    // Initialize storage
    let storage = notify_storage::SqliteStorage::with_pool_size(&config.database_url, config.pool_size)
        .wrap_err("failed to initialize storage")?
        .with_batch_size(config.batch_size);

    storage
        .run_migrations()
        .wrap_err("failed to run migrations")?;

    for context in &config.contexts {
        storage
            .store_context(&context.context, &context.token)
            .wrap_err_with(|| format!("failed to register context {}", context.context))?;
        tracing::info!(context_id = %context.context, "registered context");
    }

    let service = notify_service::Ingestor::from_storage(storage);

    let app = notify_http::notification_router(service).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", config.bind_addr))?;
    tracing::info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app).await.wrap_err("server error")?;

    Ok(())
}
