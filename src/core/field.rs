//! A player's play area: hand, discard pile, active unit and DP stack

use crate::core::{Card, Level, UnitCard};
use crate::zones::{Deck, DpStack};
use crate::{DcbError, Result};
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of cards drawn into hand
pub const HAND_SIZE: usize = 4;

pub type Hand = SmallVec<[Card; HAND_SIZE]>;

/// Selects a card in hand, either by identity or by (case-insensitive) name
#[derive(Debug, Clone, Copy)]
pub enum CardPick<'a> {
    Card(&'a Card),
    Unit(&'a Arc<UnitCard>),
    Name(&'a str),
}

impl CardPick<'_> {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            CardPick::Card(pick) => pick.same_card(card),
            CardPick::Unit(pick) => card.as_unit().is_some_and(|unit| Arc::ptr_eq(unit, pick)),
            CardPick::Name(name) => card.name().matches(name),
        }
    }

    fn describe(&self) -> String {
        match self {
            CardPick::Card(card) => card.name().to_string(),
            CardPick::Unit(unit) => unit.name.to_string(),
            CardPick::Name(name) => name.to_string(),
        }
    }
}

impl<'a> From<&'a Card> for CardPick<'a> {
    fn from(card: &'a Card) -> Self {
        CardPick::Card(card)
    }
}

impl<'a> From<&'a Arc<UnitCard>> for CardPick<'a> {
    fn from(unit: &'a Arc<UnitCard>) -> Self {
        CardPick::Unit(unit)
    }
}

impl<'a> From<&'a str> for CardPick<'a> {
    fn from(name: &'a str) -> Self {
        CardPick::Name(name)
    }
}

impl<'a> From<&'a String> for CardPick<'a> {
    fn from(name: &'a String) -> Self {
        CardPick::Name(name.as_str())
    }
}

/// The unit currently in play.
///
/// Hit points live here rather than on the catalog card, so damage never
/// leaks into other fields or later battles.
#[derive(Debug, Clone)]
pub struct ActiveUnit {
    card: Arc<UnitCard>,
    hp: i32,
}

impl ActiveUnit {
    pub fn new(card: Arc<UnitCard>) -> Self {
        let hp = card.hp;
        ActiveUnit { card, hp }
    }

    pub fn card(&self) -> &Arc<UnitCard> {
        &self.card
    }

    pub fn name(&self) -> &str {
        self.card.name.as_str()
    }

    pub fn level(&self) -> Level {
        self.card.level
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }
}

/// Everything a player has on the table during one battle
#[derive(Debug, Clone)]
pub struct Field {
    deck: Deck,
    hand: Hand,
    discard: Vec<Card>,
    unit: Option<ActiveUnit>,
    dp: DpStack,
}

impl Field {
    pub fn new(deck: Deck) -> Self {
        Field {
            deck,
            hand: SmallVec::new(),
            discard: Vec::new(),
            unit: None,
            dp: DpStack::new(),
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn unit(&self) -> Option<&ActiveUnit> {
        self.unit.as_ref()
    }

    pub fn unit_hp(&self) -> Option<i32> {
        self.unit.as_ref().map(ActiveUnit::hp)
    }

    pub fn dp(&self) -> &DpStack {
        &self.dp
    }

    /// Move up to `n` cards from the deck into hand.
    ///
    /// Returns how many cards were actually drawn; running out of deck is
    /// not an error.
    pub fn draw(&mut self, n: usize) -> usize {
        let mut drawn = 0;
        while drawn < n {
            let Ok(card) = self.deck.draw() else {
                break;
            };
            self.hand.push(card);
            drawn += 1;
        }
        drawn
    }

    pub fn draw_til_full(&mut self) -> usize {
        self.draw(HAND_SIZE.saturating_sub(self.hand.len()))
    }

    pub fn discard(&mut self, index: usize) -> Result<()> {
        if index >= self.hand.len() {
            return Err(DcbError::IndexOutOfRange {
                index,
                len: self.hand.len(),
            });
        }
        let card = self.hand.remove(index);
        self.discard.push(card);
        Ok(())
    }

    pub fn discard_hand(&mut self) {
        self.discard.extend(self.hand.drain(..));
    }

    pub fn has_unit(&self) -> bool {
        self.unit.is_some()
    }

    pub fn has_unit_in_hand(&self) -> bool {
        self.hand.iter().any(Card::is_unit)
    }

    pub fn get_units_in_hand(&self) -> Vec<Arc<UnitCard>> {
        self.hand.iter().filter_map(|c| c.as_unit().cloned()).collect()
    }

    /// Put a unit from hand into the empty unit slot
    pub fn play_unit<'a>(&mut self, pick: impl Into<CardPick<'a>>) -> Result<()> {
        if self.unit.is_some() {
            return Err(DcbError::UnitAlreadyActive);
        }
        let unit = self.take_unit_from_hand(pick.into())?;
        self.unit = Some(ActiveUnit::new(unit));
        Ok(())
    }

    pub fn discard_unit(&mut self) -> Result<()> {
        let unit = self.unit.take().ok_or(DcbError::NoActiveUnit)?;
        self.discard.push(Card::Unit(unit.card));
        Ok(())
    }

    /// Move a unit from hand onto the DP stack
    pub fn boost_dp<'a>(&mut self, pick: impl Into<CardPick<'a>>) -> Result<()> {
        let unit = self.take_unit_from_hand(pick.into())?;
        self.dp.push(unit);
        Ok(())
    }

    pub fn get_evolution_targets(&self) -> Result<Vec<Arc<UnitCard>>> {
        let level = self.unit.as_ref().ok_or(DcbError::NoActiveUnit)?.level();
        Ok(self
            .hand
            .iter()
            .filter_map(Card::as_unit)
            .filter(|unit| level.can_evolve_into(unit.level))
            .cloned()
            .collect())
    }

    /// Replace the active unit with a unit from hand.
    ///
    /// The new unit keeps the higher of the old unit's current HP and its
    /// own printed HP.
    pub fn evolve_unit<'a>(&mut self, pick: impl Into<CardPick<'a>>) -> Result<()> {
        let pick = pick.into();
        let current = self.unit.as_ref().ok_or(DcbError::NoActiveUnit)?;
        let index = self.position(&pick)?;
        let target = self.hand[index]
            .as_unit()
            .ok_or_else(|| DcbError::NotAUnit(self.hand[index].name().to_string()))?;
        if !current.level().can_evolve_into(target.level) {
            return Err(DcbError::InvalidEvolution {
                from: current.level(),
                to: target.level,
            });
        }

        let target = target.clone();
        self.hand.remove(index);
        let hp = current.hp.max(target.hp);
        if let Some(previous) = self.unit.take() {
            self.discard.push(Card::Unit(previous.card));
        }
        self.unit = Some(ActiveUnit { card: target, hp });
        Ok(())
    }

    /// Apply damage to the active unit, returning its remaining HP
    pub fn damage_unit(&mut self, amount: i32) -> Result<i32> {
        let unit = self.unit.as_mut().ok_or(DcbError::NoActiveUnit)?;
        unit.hp = unit.hp.saturating_sub(amount);
        Ok(unit.hp)
    }

    /// Remove any card from hand and put it in the discard pile
    pub fn take_from_hand<'a>(&mut self, pick: impl Into<CardPick<'a>>) -> Result<Card> {
        let index = self.position(&pick.into())?;
        let card = self.hand.remove(index);
        self.discard.push(card.clone());
        Ok(card)
    }

    /// Send the top card of the deck to the discard pile
    pub fn gamble(&mut self) -> Option<Card> {
        let card = self.deck.draw().ok()?;
        self.discard.push(card.clone());
        Some(card)
    }

    /// Names of every card this field holds, across all zones, sorted
    pub fn zone_census(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .deck
            .cards()
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .map(|c| c.name().as_str().to_string())
            .chain(self.unit.iter().map(|u| u.name().to_string()))
            .chain(self.dp.iter().map(|u| u.name.as_str().to_string()))
            .collect();
        names.sort_unstable();
        names
    }

    fn position(&self, pick: &CardPick<'_>) -> Result<usize> {
        self.hand
            .iter()
            .position(|card| pick.matches(card))
            .ok_or_else(|| DcbError::CardNotInHand(pick.describe()))
    }

    fn take_unit_from_hand(&mut self, pick: CardPick<'_>) -> Result<Arc<UnitCard>> {
        let index = self.position(&pick)?;
        let unit = self.hand[index]
            .as_unit()
            .cloned()
            .ok_or_else(|| DcbError::NotAUnit(self.hand[index].name().to_string()))?;
        self.hand.remove(index);
        Ok(unit)
    }
}
