//! Battle controller trait and battle view
//!
//! This module defines the interface between the battle engine and the
//! players (AI, scripted or human). The engine calls the controller whenever
//! a decision is needed and hands it a read-only view of both fields. The
//! controller only returns decisions; every mutation is done by the engine.

use crate::core::{ActiveUnit, AttackKind, Card, Field, UnitCard};
use crate::game::BattleOutcome;
use std::fmt;
use std::sync::Arc;

/// Read-only view of the battle from one player's seat
#[derive(Clone, Copy)]
pub struct BattleView<'a> {
    field: &'a Field,
    opponent: &'a Field,
}

impl<'a> BattleView<'a> {
    pub fn new(field: &'a Field, opponent: &'a Field) -> Self {
        BattleView { field, opponent }
    }

    /// The deciding player's own field
    pub fn field(&self) -> &'a Field {
        self.field
    }

    pub fn opponent(&self) -> &'a Field {
        self.opponent
    }

    pub fn hand(&self) -> &'a [Card] {
        self.field.hand()
    }

    pub fn unit(&self) -> Option<&'a ActiveUnit> {
        self.field.unit()
    }

    pub fn opponent_unit(&self) -> Option<&'a ActiveUnit> {
        self.opponent.unit()
    }

    pub fn deck_size(&self) -> usize {
        self.field.deck().len()
    }

    /// Current DP total of the deciding player
    pub fn dp(&self) -> i32 {
        self.field.dp().get_value()
    }
}

/// Answer to the confirm-hand prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandDecision {
    Mulligan,
    KeepHand,
}

/// A support played during the battle phase
#[derive(Debug, Clone)]
pub enum SupportOption {
    /// A card from hand
    Card(Card),
    /// The top card of the deck, sight unseen
    Gamble,
}

impl SupportOption {
    /// Support options for a field: every hand card, then Gamble
    pub fn for_field(field: &Field) -> Vec<SupportOption> {
        field
            .hand()
            .iter()
            .cloned()
            .map(SupportOption::Card)
            .chain(std::iter::once(SupportOption::Gamble))
            .collect()
    }
}

impl fmt::Display for SupportOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportOption::Card(card) => write!(f, "{}", card.name()),
            SupportOption::Gamble => write!(f, "Gamble"),
        }
    }
}

/// Decision policy for one player.
///
/// Candidate lists handed to `choose_unit` are never empty. Returning a card
/// that is not among the candidates is a contract violation and surfaces as
/// an error from the engine.
pub trait BattleController {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Keep the freshly drawn hand or mulligan it
    fn confirm_hand(&mut self, view: &BattleView) -> HandDecision;

    /// Pick the unit to put into play. `None` means no unit is played and the
    /// turn ends with `NoUnit`.
    fn choose_unit(&mut self, view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>>;

    /// Optionally move a hand unit onto the DP stack
    fn choose_dp_booster(&mut self, view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>>;

    /// Optionally evolve the active unit into one of the candidates
    fn choose_evolution(&mut self, view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>>;

    /// Pick one of the active unit's attacks
    fn choose_attack(&mut self, view: &BattleView, unit: &UnitCard, options: &[AttackKind]) -> AttackKind;

    /// Pick a support card from hand or gamble on the top of the deck
    fn choose_support(&mut self, view: &BattleView, options: &[SupportOption]) -> SupportOption;

    /// Called once when the battle ends. `None` means the turn limit was hit.
    fn on_battle_end(&mut self, _view: &BattleView, _outcome: Option<BattleOutcome>) {}
}
