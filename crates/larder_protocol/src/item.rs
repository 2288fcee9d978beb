//! Snapshot payload types.
//!
//! Field names follow the durable JSON format: a snapshot is an object
//! keyed by barcode, each value a record with `Name`, `Display Name`,
//! `Quantity` and `Category`. Unknown extra fields are ignored on load.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Classification tag assigned when an item is first created.
/// This is the CANONICAL definition - use this everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "other" => Ok(Category::Other),
            _ => Err(format!("Invalid category: '{}'. Expected: Food or Other", s)),
        }
    }
}

// Unrecognized category strings in a snapshot degrade to Other rather
// than failing the whole load.
impl From<String> for Category {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Category::Other)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// One inventory entry as persisted in a snapshot.
///
/// The barcode is the mapping key, not part of the record. `name` is set
/// once at creation and never mutated; `display_name` is the user-editable
/// label and falls back to `name` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Display Name", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "Quantity", default)]
    pub quantity: u64,
    #[serde(rename = "Category", default)]
    pub category: Category,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: u64, category: Category) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            quantity,
            category,
        }
    }

    /// Label shown to users: the explicit display name, or `name`.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Complete durable inventory mapping at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub items: BTreeMap<String, Item>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, code: &str) -> Option<&Item> {
        self.items.get(code)
    }

    /// Entries ordered by display name (case-insensitive), ties broken by
    /// barcode.
    pub fn sorted(&self) -> Vec<(&str, &Item)> {
        let mut entries: Vec<(&str, &Item)> = self
            .items
            .iter()
            .map(|(code, item)| (code.as_str(), item))
            .collect();
        entries.sort_by(|(a_code, a), (b_code, b)| {
            let a_name = a.display_name().to_lowercase();
            let b_name = b.display_name().to_lowercase();
            match a_name.cmp(&b_name) {
                Ordering::Equal => a_code.cmp(b_code),
                other => other,
            }
        });
        entries
    }
}
