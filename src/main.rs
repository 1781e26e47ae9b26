use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use swarm_dashboard::api::{router, AppState};
use swarm_dashboard::config::Args;

/// Read-only dashboard API
/// Never writes the tracker data file, only reads it
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = AppState {
        data_path: args.data.clone(),
        default_window: args.default_window,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!(
        addr = %args.addr,
        data = %args.data.display(),
        default_window = args.default_window,
        "swarm dashboard listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
