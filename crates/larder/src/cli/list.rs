//! List command: print a snapshot file as a table or JSON.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use larder_protocol::defaults::DEFAULT_SNAPSHOT_FILE;
use larder_protocol::Snapshot;
use larder_store::{FileBackend, LoadOutcome, SnapshotBackend};

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Snapshot file to print (name only, lives in the data dir)
    #[arg(short = 'f', long, default_value = DEFAULT_SNAPSHOT_FILE)]
    pub file: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ListArgs) -> Result<()> {
    let path = super::snapshot_path(&args.file)?;
    let snapshot = match FileBackend::new(&path).load()? {
        LoadOutcome::Loaded(snapshot) => snapshot,
        LoadOutcome::Missing | LoadOutcome::Malformed => Snapshot::default(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("(inventory is empty)");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Code", "Name", "Quantity", "Category"]);
    for (code, item) in snapshot.sorted() {
        table.add_row(vec![
            Cell::new(code),
            Cell::new(item.display_name()),
            Cell::new(item.quantity),
            Cell::new(item.category.as_str()),
        ]);
    }
    println!("{table}");
    println!("{} item(s)", snapshot.len());
    Ok(())
}
