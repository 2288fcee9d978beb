//! Serve command: the dashboard server.

use anyhow::{Context, Result};
use larder_dashboard::{DashboardServer, DashboardService};
use larder_protocol::defaults::DEFAULT_DASHBOARD_ADDR;
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "LARDER_DASHBOARD_ADDR", default_value = DEFAULT_DASHBOARD_ADDR)]
    pub addr: String,
}

pub fn run(args: ServeArgs) -> Result<()> {
    let data_dir = larder_logging::ensure_data_dir()?;
    info!("Serving snapshots from {}", data_dir.display());
    // The per-file locks only cover this process. A scan loop writing the
    // same file from another process can still race the dashboard.
    info!("Run at most one writer per snapshot file");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build dashboard runtime")?;

    runtime.block_on(async {
        let server = DashboardServer::bind(&args.addr, DashboardService::new(data_dir)).await?;
        server.run().await
    })
}
