//! Config command: show resolved paths and defaults.

use anyhow::Result;
use larder_protocol::defaults::{DEFAULT_DASHBOARD_ADDR, DEFAULT_SNAPSHOT_FILE};

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let home = larder_logging::larder_home();
    let data = larder_logging::data_dir();
    let logs = larder_logging::logs_dir();

    if args.json {
        let config = serde_json::json!({
            "home": home.to_string_lossy(),
            "data": {
                "path": data.to_string_lossy(),
                "exists": data.exists(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
            "default_snapshot_file": DEFAULT_SNAPSHOT_FILE,
            "dashboard_addr": DEFAULT_DASHBOARD_ADDR,
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("LARDER CONFIGURATION");
    println!("====================");
    println!();
    println!("Home:     {}", home.display());
    println!();
    println!("Data:     {}", data.display());
    println!(
        "          exists: {}",
        if data.exists() { "yes" } else { "no" }
    );
    println!();
    println!("Logs:     {}", logs.display());
    println!(
        "          exists: {}",
        if logs.exists() { "yes" } else { "no" }
    );
    println!();
    println!("Default snapshot file: {}", DEFAULT_SNAPSHOT_FILE);
    println!("Dashboard address:     {}", DEFAULT_DASHBOARD_ADDR);
    Ok(())
}
