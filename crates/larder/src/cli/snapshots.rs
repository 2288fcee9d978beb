//! Snapshots command: enumerate snapshot files in the data directory.

use anyhow::Result;
use larder_dashboard::DashboardService;

#[derive(Debug, clap::Args)]
pub struct SnapshotsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SnapshotsArgs) -> Result<()> {
    let service = DashboardService::new(larder_logging::data_dir());
    let files = service.list_snapshots()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("(no snapshot files)");
        return Ok(());
    }
    for file in files {
        println!("{}", file);
    }
    Ok(())
}
