use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Serves tracker swarm statistics for the dashboard charts
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Tracker data file to read on every request
    #[arg(long, env = "SWARM_DASHBOARD_DATA", default_value = "data.json")]
    pub data: PathBuf,

    /// Address the HTTP API listens on
    #[arg(long, env = "SWARM_DASHBOARD_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Trailing window in seconds when a request names none
    #[arg(long, env = "SWARM_DASHBOARD_WINDOW", default_value_t = 86_400.0)]
    pub default_window: f64,
}
