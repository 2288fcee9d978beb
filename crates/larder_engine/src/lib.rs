//! Scan interpreter: the mode/action state machine and the interactive
//! loop that drives the inventory store from a sequential scan source.

pub mod machine;
pub mod runner;

pub use machine::{Effect, ScanState};
pub use runner::{ScanLoop, ScanSource, StdinSource};
