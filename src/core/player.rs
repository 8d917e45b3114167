//! Player representation

use crate::core::{Field, PlayerName};
use crate::game::BattleController;
use crate::zones::Deck;
use crate::Result;
use std::fmt;

/// A battle participant.
///
/// The player owns its field (and through it, its deck) but only borrows its
/// controller, which outlives the player and may be reused across battles.
pub struct Player<'c> {
    /// Player name
    pub name: PlayerName,

    /// Play area for the current battle
    pub field: Field,

    /// Decision policy
    pub controller: &'c mut dyn BattleController,
}

impl<'c> Player<'c> {
    pub fn new(name: impl Into<PlayerName>, deck: Deck, controller: &'c mut dyn BattleController) -> Self {
        Player {
            name: name.into(),
            field: Field::new(deck),
            controller,
        }
    }

    pub fn deck(&self) -> &Deck {
        self.field.deck()
    }

    /// Start over with a fresh field and a deck rebuilt from its decklist
    pub fn new_field(&mut self) -> Result<()> {
        let mut deck = self.field.deck().clone();
        deck.reset()?;
        self.field = Field::new(deck);
        Ok(())
    }
}

impl fmt::Debug for Player<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("controller", &self.controller.name())
            .field("field", &self.field)
            .finish()
    }
}
