//! Card zones: the deck (draw pile) and the DP stack

use crate::core::{Card, UnitCard};
use crate::loader::CardCatalog;
use crate::{DcbError, Result};
use std::sync::Arc;

/// A player's private draw pile
///
/// The last element is the top of the deck. The deck remembers the decklist
/// it was built from so it can be rebuilt between battles.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    decklist: Vec<String>,
    catalog: Arc<CardCatalog>,
}

impl Deck {
    /// Build a deck from already-resolved cards
    pub fn new(catalog: Arc<CardCatalog>, cards: &[Card]) -> Self {
        Deck {
            cards: cards.to_vec(),
            decklist: cards.iter().map(|c| c.name().as_str().to_string()).collect(),
            catalog,
        }
    }

    /// Resolve a decklist against the catalog. Fails without building
    /// anything if any name is unknown.
    pub fn from_names<S: AsRef<str>>(catalog: Arc<CardCatalog>, names: &[S]) -> Result<Self> {
        let cards = catalog.get_many(names)?;
        Ok(Deck {
            cards,
            decklist: names.iter().map(|n| n.as_ref().to_string()).collect(),
            catalog,
        })
    }

    /// Shuffle the deck in place
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    /// Draw the top card
    pub fn draw(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(DcbError::DeckEmpty)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Cards from bottom to top
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn decklist(&self) -> &[String] {
        &self.decklist
    }

    pub fn catalog(&self) -> &Arc<CardCatalog> {
        &self.catalog
    }

    /// Rebuild the deck from its decklist, discarding the current order and
    /// contents
    pub fn reset(&mut self) -> Result<()> {
        self.cards = self.catalog.get_many(&self.decklist)?;
        Ok(())
    }
}

/// Units sacrificed for passive power
#[derive(Debug, Clone, Default)]
pub struct DpStack {
    stack: Vec<Arc<UnitCard>>,
}

impl DpStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of PP across all stacked units
    pub fn get_value(&self) -> i32 {
        self.stack.iter().map(|unit| unit.pp).sum()
    }

    pub fn push(&mut self, unit: Arc<UnitCard>) {
        self.stack.push(unit);
    }

    pub fn pop(&mut self) -> Result<Arc<UnitCard>> {
        self.stack.pop().ok_or(DcbError::StackEmpty)
    }

    pub fn peek(&self) -> Result<&Arc<UnitCard>> {
        self.stack.last().ok_or(DcbError::StackEmpty)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<UnitCard>> {
        self.stack.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Level, OptionCard};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn test_catalog() -> Arc<CardCatalog> {
        let mut catalog = CardCatalog::new();
        catalog.add_card(UnitCard::new(1, "Agumon", Level::Rookie, 30, 10, 5).into());
        catalog.add_card(UnitCard::new(2, "Greymon", Level::Champion, 40, 20, 10).into());
        catalog.add_card(OptionCard::new(100, "Trap", "").into());
        Arc::new(catalog)
    }

    #[test]
    fn test_draw_from_top() {
        let catalog = test_catalog();
        let mut deck = Deck::from_names(catalog, &["Agumon", "Greymon", "Trap"]).unwrap();

        assert_eq!(deck.len(), 3);
        assert_eq!(deck.draw().unwrap().name().as_str(), "Trap");
        assert_eq!(deck.draw().unwrap().name().as_str(), "Greymon");
        assert_eq!(deck.draw().unwrap().name().as_str(), "Agumon");
        assert!(deck.is_empty());
        assert!(matches!(deck.draw(), Err(DcbError::DeckEmpty)));
    }

    #[test]
    fn test_from_names_is_atomic() {
        let catalog = test_catalog();
        let result = Deck::from_names(catalog, &["Agumon", "Missingmon"]);
        assert!(matches!(result, Err(DcbError::CardNotFound(name)) if name == "Missingmon"));
    }

    #[test]
    fn test_new_copies_cards() {
        let catalog = test_catalog();
        let cards = catalog.get_many(&["agumon", "trap"]).unwrap();
        let mut deck = Deck::new(catalog, &cards);
        deck.draw().unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.decklist(), &["Agumon".to_string(), "Trap".to_string()]);
    }

    #[test]
    fn test_reset_rebuilds_decklist() {
        let catalog = test_catalog();
        let names = ["Agumon", "Agumon", "Greymon", "Trap"];
        let mut deck = Deck::from_names(catalog, &names).unwrap();

        let mut rng = ChaCha12Rng::seed_from_u64(7);
        deck.shuffle(&mut rng);
        deck.draw().unwrap();
        deck.draw().unwrap();
        deck.reset().unwrap();

        let rebuilt: Vec<&str> = deck.cards().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(rebuilt, names);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let catalog = test_catalog();
        let names: Vec<&str> = std::iter::repeat(["Agumon", "Greymon", "Trap"])
            .take(10)
            .flatten()
            .collect();
        let mut deck = Deck::from_names(catalog, &names).unwrap();

        let mut rng = ChaCha12Rng::seed_from_u64(42);
        deck.shuffle(&mut rng);

        let mut shuffled: Vec<&str> = deck.cards().iter().map(|c| c.name().as_str()).collect();
        let mut original = names.clone();
        shuffled.sort_unstable();
        original.sort_unstable();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_dp_stack() {
        let catalog = test_catalog();
        let agumon = catalog.get("agumon").unwrap().as_unit().unwrap().clone();
        let greymon = catalog.get("greymon").unwrap().as_unit().unwrap().clone();

        let mut dp = DpStack::new();
        assert_eq!(dp.get_value(), 0);
        assert!(matches!(dp.peek(), Err(DcbError::StackEmpty)));
        assert!(matches!(dp.pop(), Err(DcbError::StackEmpty)));

        dp.push(agumon);
        dp.push(greymon);
        assert_eq!(dp.len(), 2);
        assert_eq!(dp.get_value(), 15);
        assert_eq!(dp.peek().unwrap().name.as_str(), "Greymon");

        let top = dp.pop().unwrap();
        assert_eq!(top.name.as_str(), "Greymon");
        assert_eq!(dp.get_value(), 5);
    }
}
