//! Name resolution for codes the store has never seen.
//!
//! Tries the external lookup collaborator first; any failure or empty
//! result degrades to an interactive prompt, never to a hard error.

use anyhow::Result;
use larder_protocol::defaults::FALLBACK_ITEM_NAME;
use larder_protocol::Category;
use tracing::debug;

/// External product-name lookup collaborator. May fail or return nothing.
pub trait NameLookup {
    fn lookup(&mut self, code: &str) -> Result<Option<String>>;
}

/// Lookup that never finds anything; the shipped default when no external
/// service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl NameLookup for NoLookup {
    fn lookup(&mut self, _code: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Line-oriented question/answer channel for manual resolution.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// A resolved name and category for a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub name: String,
    pub category: Category,
}

/// Resolution seam used by the store when creating items.
pub trait ResolveName {
    fn resolve(&mut self, code: &str) -> Result<Resolved>;
}

/// Lookup-then-prompt resolver.
pub struct NameResolver<L, P> {
    lookup: L,
    prompter: P,
}

impl<L: NameLookup, P: Prompter> NameResolver<L, P> {
    pub fn new(lookup: L, prompter: P) -> Self {
        Self { lookup, prompter }
    }

    fn prompt_name(&mut self, code: &str) -> Result<String> {
        let answer = self.prompter.ask(&format!("Name for {}: ", code))?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            Ok(FALLBACK_ITEM_NAME.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    fn prompt_category(&mut self, name: &str) -> Result<Category> {
        let answer = self.prompter.ask(&format!("Is {} food? [y/N]: ", name))?;
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Category::Food),
            _ => Ok(Category::Other),
        }
    }
}

impl<L: NameLookup, P: Prompter> ResolveName for NameResolver<L, P> {
    fn resolve(&mut self, code: &str) -> Result<Resolved> {
        let name = match self.lookup.lookup(code) {
            Ok(Some(name)) if !name.trim().is_empty() => name.trim().to_string(),
            Ok(_) => self.prompt_name(code)?,
            Err(err) => {
                // Unreachable collaborator is treated as "not found".
                debug!("Name lookup failed for {}: {:#}", code, err);
                self.prompt_name(code)?
            }
        };
        // The lookup service knows names, not pantry categories, so the
        // food/other question is asked on both paths.
        let category = self.prompt_category(&name)?;
        Ok(Resolved { name, category })
    }
}
