//! markcheck-ui - IC Marking Verification Dashboard
//!
//! Serves the operator console, datasheet admin, review queue, and settings
//! views over the shared markcheck database. Detection itself (imaging, OCR,
//! reference matching) happens in an external pipeline that submits its
//! results through the intake endpoints.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use markcheck_ui::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "markcheck-ui", about = "IC marking verification dashboard")]
struct Args {
    /// Root folder holding markcheck.db (overrides MARKCHECK_ROOT and config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, default_value_t = 5810)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting markcheck Dashboard (markcheck-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = markcheck_common::config::resolve_root_folder(args.root_folder.as_deref());
    let db_path = markcheck_common::config::ensure_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = markcheck_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("markcheck-ui listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
