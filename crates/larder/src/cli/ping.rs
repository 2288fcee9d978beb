//! Ping command: check that a dashboard server is up.

use anyhow::Result;
use larder_dashboard::DashboardClient;
use larder_protocol::defaults::DEFAULT_DASHBOARD_ADDR;

#[derive(Debug, clap::Args)]
pub struct PingArgs {
    /// Dashboard address
    #[arg(long, env = "LARDER_DASHBOARD_ADDR", default_value = DEFAULT_DASHBOARD_ADDR)]
    pub addr: String,
}

pub fn run(args: PingArgs) -> Result<()> {
    let mut client = DashboardClient::connect(&args.addr)?;
    client.ping()?;
    println!("Dashboard at {} is up", args.addr);
    Ok(())
}
