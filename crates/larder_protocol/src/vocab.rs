//! Control barcode vocabulary.
//!
//! Reserved codes change interpreter state or trigger a function call
//! instead of naming an inventory item. The table is fixed configuration
//! data printed on the control sheet next to the scanner; classification
//! performs no I/O and has no error cases. Any code not in the table is an
//! ordinary inventory code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sticky scanning mode: stays in effect for all ordinary scans until
/// explicitly changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Each ordinary scan adds one to the item (creating it if unknown)
    #[default]
    Add,
    /// Each ordinary scan removes one from the item
    Remove,
    /// Each ordinary scan prints the item's quantity
    PrintQuantity,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Add => "ADD",
            Mode::Remove => "REMOVE",
            Mode::PrintQuantity => "PRINT_QUANTITY",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One-shot action: affects exactly the next ordinary scan, then reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionCode {
    /// Remove the next scanned item's entry entirely
    Delete,
    /// Add a prompted quantity to the next scanned item
    AddQuantity,
    /// Remove a prompted quantity from the next scanned item
    RemoveQuantity,
    /// Set a new display name on the next scanned item
    Rename,
}

impl ActionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCode::Delete => "DELETE",
            ActionCode::AddQuantity => "ADD_QUANTITY",
            ActionCode::RemoveQuantity => "REMOVE_QUANTITY",
            ActionCode::Rename => "RENAME",
        }
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Function call: runs immediately, interpreter state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionCode {
    /// Print the whole inventory listing
    PrintInventory,
}

/// Classification of a reserved code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCode {
    Mode(Mode),
    Action(ActionCode),
    Function(FunctionCode),
}

// Reserved codes on the control sheet. The 99 prefix keeps them outside
// normal UPC/EAN space.
pub const CODE_MODE_ADD: &str = "9901";
pub const CODE_MODE_REMOVE: &str = "9902";
pub const CODE_MODE_PRINT_QUANTITY: &str = "9903";
pub const CODE_ACTION_DELETE: &str = "9911";
pub const CODE_ACTION_ADD_QUANTITY: &str = "9912";
pub const CODE_ACTION_REMOVE_QUANTITY: &str = "9913";
pub const CODE_ACTION_RENAME: &str = "9914";
pub const CODE_PRINT_INVENTORY: &str = "9921";

/// Classify a scanned code against the reserved table.
pub fn classify(code: &str) -> Option<ControlCode> {
    match code {
        CODE_MODE_ADD => Some(ControlCode::Mode(Mode::Add)),
        CODE_MODE_REMOVE => Some(ControlCode::Mode(Mode::Remove)),
        CODE_MODE_PRINT_QUANTITY => Some(ControlCode::Mode(Mode::PrintQuantity)),
        CODE_ACTION_DELETE => Some(ControlCode::Action(ActionCode::Delete)),
        CODE_ACTION_ADD_QUANTITY => Some(ControlCode::Action(ActionCode::AddQuantity)),
        CODE_ACTION_REMOVE_QUANTITY => Some(ControlCode::Action(ActionCode::RemoveQuantity)),
        CODE_ACTION_RENAME => Some(ControlCode::Action(ActionCode::Rename)),
        CODE_PRINT_INVENTORY => Some(ControlCode::Function(FunctionCode::PrintInventory)),
        _ => None,
    }
}

/// True when `code` is reserved and must never be stored as an item key.
pub fn is_control(code: &str) -> bool {
    classify(code).is_some()
}

/// All reserved codes, for diagnostics and tests.
pub fn reserved_codes() -> &'static [&'static str] {
    &[
        CODE_MODE_ADD,
        CODE_MODE_REMOVE,
        CODE_MODE_PRINT_QUANTITY,
        CODE_ACTION_DELETE,
        CODE_ACTION_ADD_QUANTITY,
        CODE_ACTION_REMOVE_QUANTITY,
        CODE_ACTION_RENAME,
        CODE_PRINT_INVENTORY,
    ]
}
