//! Decklist loader (JSON array of card names)

use crate::loader::CardCatalog;
use crate::zones::Deck;
use crate::{DcbError, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Decklist loader for .json files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a decklist; the deck is named after the file stem
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("deck")
            .to_string();
        Self::parse(name, &content)
    }

    /// Parse a decklist from its JSON content
    pub fn parse(name: impl Into<String>, content: &str) -> Result<DeckList> {
        let cards: Vec<String> =
            serde_json::from_str(content).map_err(|e| DcbError::InvalidDeckFormat(e.to_string()))?;

        if cards.is_empty() {
            return Err(DcbError::InvalidDeckFormat("Empty deck".to_string()));
        }
        if let Some(blank) = cards.iter().position(|c| c.trim().is_empty()) {
            return Err(DcbError::InvalidDeckFormat(format!("Blank card name at position {blank}")));
        }

        Ok(DeckList {
            name: name.into(),
            cards,
        })
    }
}

/// An ordered list of card names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckList {
    pub name: String,
    pub cards: Vec<String>,
}

impl DeckList {
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Distinct card names (case-insensitive), sorted
    pub fn unique_card_names(&self) -> BTreeSet<String> {
        self.cards.iter().map(|c| crate::core::card_key(c)).collect()
    }

    /// Resolve the decklist into a playable deck
    pub fn build(&self, catalog: &Arc<CardCatalog>) -> Result<Deck> {
        Deck::from_names(Arc::clone(catalog), &self.cards)
    }
}
