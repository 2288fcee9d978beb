//! Scan command: the interactive loop the barcode scanner drives.

use anyhow::Result;
use larder_engine::{ScanLoop, StdinSource};
use larder_protocol::defaults::DEFAULT_SNAPSHOT_FILE;
use larder_store::{InventoryStore, NameResolver, NoLookup, Prompter};
use std::io::{self, BufRead, Write};
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct ScanArgs {
    /// Snapshot file to work against (name only, lives in the data dir)
    #[arg(short = 'f', long, default_value = DEFAULT_SNAPSHOT_FILE)]
    pub file: String,
}

/// Prompter reading answers from stdin. The scanner types into the same
/// terminal, so name and category questions share the scan channel.
struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

pub fn run(args: ScanArgs) -> Result<()> {
    let path = super::snapshot_path(&args.file)?;
    info!("Scanning into {}", path.display());

    let store = InventoryStore::open(path);
    let mut resolver = NameResolver::new(NoLookup, StdinPrompter);
    let mut source = StdinSource::new();

    println!("larder scan loop (Ctrl-D to exit)");
    ScanLoop::new(&store, &mut resolver).run(&mut source)
}
