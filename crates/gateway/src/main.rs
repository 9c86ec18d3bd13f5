use std::net::SocketAddr;

use {
    clap::Parser,
    sqlx::SqlitePool,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use gatehouse_gateway::{server, state::AppState};

#[derive(Parser)]
#[command(name = "gatehouse", about = "Gatehouse — request authentication gateway")]
struct Cli {
    /// Address to bind to (overrides config value).
    #[arg(long, env = "API_HOST")]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long, env = "API_PORT")]
    port: Option<u16>,

    /// Path to the SQLite database file.
    #[arg(long, env = "GATEHOUSE_DB", default_value = "gatehouse.db")]
    db: std::path::PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "gatehouse starting");

    let mut config = gatehouse_config::discover_and_load();
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if config.auth.exempt_paths.is_empty() {
        config.auth.exempt_paths = server::default_exempt_paths();
    }

    let db_url = format!("sqlite:{}?mode=rwc", cli.db.display());
    let pool = SqlitePool::connect(&db_url).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let state = AppState::new(pool, config).await?;

    server::run(state, addr).await
}
