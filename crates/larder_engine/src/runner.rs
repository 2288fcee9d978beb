//! Interactive scan loop.
//!
//! Single-threaded and synchronous: each token is processed to completion
//! (including the durable write) before the next token is read. The loop
//! runs until the scan source is exhausted.

use anyhow::Result;
use larder_protocol::defaults::DEFAULT_ACTION_QUANTITY;
use larder_protocol::vocab::{ActionCode, FunctionCode, Mode};
use larder_store::{InventoryStore, ResolveName};
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::machine::{Effect, ScanState};

/// Sequential source of newline-terminated scan tokens. The scanner acts
/// as a keyboard, so follow-up questions go over the same channel.
pub trait ScanSource {
    /// Next token; `None` when the source is exhausted.
    fn next_token(&mut self) -> Result<Option<String>>;
    /// Ask a follow-up question; `None` when the source is exhausted.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Scan source reading lines from stdin.
#[derive(Debug, Default)]
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl ScanSource for StdinSource {
    fn next_token(&mut self) -> Result<Option<String>> {
        self.read_line("scan> ")
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.read_line(prompt)
    }
}

/// Drives the state machine and the inventory store from a scan source.
pub struct ScanLoop<'a> {
    store: &'a InventoryStore,
    resolver: &'a mut dyn ResolveName,
    state: ScanState,
}

impl<'a> ScanLoop<'a> {
    pub fn new(store: &'a InventoryStore, resolver: &'a mut dyn ResolveName) -> Self {
        Self {
            store,
            resolver,
            state: ScanState::new(),
        }
    }

    /// Interpreter state after the most recent token, for inspection.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Consume the source until it is exhausted.
    pub fn run(&mut self, source: &mut dyn ScanSource) -> Result<()> {
        while let Some(token) = source.next_token()? {
            let code = token.trim();
            if code.is_empty() {
                continue;
            }
            self.step(code, source)?;
        }
        Ok(())
    }

    /// Process a single scanned token.
    pub fn step(&mut self, code: &str, source: &mut dyn ScanSource) -> Result<()> {
        match self.state.apply(code) {
            Effect::Function(FunctionCode::PrintInventory) => self.print_inventory(),
            Effect::ModeSet(mode) => {
                info!("Mode set to {}", mode);
                Ok(())
            }
            Effect::ActionArmed(action) => {
                info!("{} armed; the next scan is its target", action);
                Ok(())
            }
            Effect::RunAction { action, code } => self.run_action(action, &code, source),
            Effect::Dispatch { mode, code } => self.dispatch(mode, &code),
        }
    }

    fn run_action(
        &mut self,
        action: ActionCode,
        code: &str,
        source: &mut dyn ScanSource,
    ) -> Result<()> {
        match action {
            ActionCode::Delete => self.store.delete(code),
            ActionCode::AddQuantity => {
                let qty = ask_quantity(source)?;
                self.store.add(code, qty, self.resolver)
            }
            ActionCode::RemoveQuantity => {
                let qty = ask_quantity(source)?;
                self.store.remove(code, qty)
            }
            ActionCode::Rename => {
                let name = source.ask("New display name: ")?.unwrap_or_default();
                self.store.rename(code, &name)
            }
        }
    }

    fn dispatch(&mut self, mode: Mode, code: &str) -> Result<()> {
        match mode {
            Mode::Add => self.store.add(code, 1, self.resolver),
            Mode::Remove => self.store.remove(code, 1),
            Mode::PrintQuantity => {
                match self.store.quantity(code)? {
                    Some(quantity) => println!("{}: {}", code, quantity),
                    None => println!("{}: not in the inventory", code),
                }
                Ok(())
            }
        }
    }

    fn print_inventory(&self) -> Result<()> {
        let listing = self.store.list()?;
        if listing.is_empty() {
            println!("(inventory is empty)");
            return Ok(());
        }
        for (code, item) in listing {
            println!("{:>5}  {}  [{}]", item.quantity, item.display_name(), code);
        }
        Ok(())
    }
}

/// Follow-up quantity for ADD_QUANTITY / REMOVE_QUANTITY. Empty, invalid,
/// or exhausted input defaults to 1.
fn ask_quantity(source: &mut dyn ScanSource) -> Result<u64> {
    let answer = source.ask(&format!("Quantity [{}]: ", DEFAULT_ACTION_QUANTITY))?;
    Ok(answer
        .and_then(|line| line.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_ACTION_QUANTITY))
}
