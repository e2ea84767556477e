//! Covenant sync server — application entry point.
//!
//! Loads configuration, opens the database with the elevated service
//! credential, and serves the Clerk webhook receiver.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cov_config::CovConfig;
use cov_db::CovDb;
use cov_sync::AppState;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "covd", about = "Covenant identity sync server", version)]
struct Cli {
    /// Bind address override (defaults to config `server.bind_addr`).
    #[arg(long)]
    bind: Option<String>,

    /// Local database file override (skips the remote Turso connection).
    #[arg(long)]
    db: Option<String>,

    /// Only log errors.
    #[arg(long, short)]
    quiet: bool,

    /// Log debug detail.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("covd error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let config = CovConfig::load_with_dotenv().context("failed to load configuration")?;
    if !config.clerk.can_verify_webhooks() {
        anyhow::bail!(
            "COVENANT_CLERK__WEBHOOK_SECRET is not configured — refusing to accept unverifiable webhooks"
        );
    }

    let db = open_database(&cli, &config).await?;

    let bind_addr = cli.bind.unwrap_or_else(|| config.server.bind_addr.clone());
    let state = Arc::new(AppState {
        db,
        webhook_secret: config.clerk.webhook_secret.clone(),
    });
    let app = cov_sync::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "covenant sync server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Open the directory database.
///
/// Remote Turso with the service token when configured; a local file for
/// development. The service connection runs migrations so the schema exists
/// before the first delivery arrives.
async fn open_database(cli: &Cli, config: &CovConfig) -> anyhow::Result<CovDb> {
    if let Some(path) = cli.db.as_deref() {
        tracing::info!(path, "using local database override");
        return CovDb::open_local(path)
            .await
            .context("failed to open local database");
    }

    if config.turso.is_configured() {
        let db = CovDb::open_remote(&config.turso.url, &config.turso.auth_token)
            .await
            .context("failed to connect to Turso")?;
        db.migrate().await.context("failed to run migrations")?;
        tracing::info!(url = %config.turso.url, "connected to Turso with service credential");
        return Ok(db);
    }

    if config.turso.has_local_path() {
        tracing::info!(path = %config.turso.local_path, "using configured local database");
        return CovDb::open_local(&config.turso.local_path)
            .await
            .context("failed to open local database");
    }

    anyhow::bail!(
        "no database configured — set COVENANT_TURSO__URL and COVENANT_TURSO__AUTH_TOKEN, \
         or COVENANT_TURSO__LOCAL_PATH for development"
    )
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("covd={level},cov_sync={level},cov_db={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
