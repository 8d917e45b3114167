//! First-choice controller for testing and automation
//!
//! This controller always keeps its hand, takes the first candidate when a
//! choice is required and passes on every optional pick. Battles driven by it
//! are fully deterministic for a given deck order.

use crate::core::{AttackKind, UnitCard};
use crate::game::controller::{BattleController, BattleView, HandDecision, SupportOption};
use std::sync::Arc;

/// A controller that always chooses the first available option (index 0)
///
/// This is useful for:
/// - Automated testing
/// - Running battles without interaction
/// - Benchmarking the battle engine
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoiceController;

impl FirstChoiceController {
    pub fn new() -> Self {
        FirstChoiceController
    }
}

impl BattleController for FirstChoiceController {
    fn name(&self) -> &str {
        "first"
    }

    fn confirm_hand(&mut self, _view: &BattleView) -> HandDecision {
        HandDecision::KeepHand
    }

    fn choose_unit(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        candidates.first().cloned()
    }

    fn choose_dp_booster(&mut self, _view: &BattleView, _candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        None
    }

    fn choose_evolution(&mut self, _view: &BattleView, _candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        None
    }

    fn choose_attack(&mut self, _view: &BattleView, _unit: &UnitCard, options: &[AttackKind]) -> AttackKind {
        options.first().copied().unwrap_or(AttackKind::C)
    }

    fn choose_support(&mut self, _view: &BattleView, options: &[SupportOption]) -> SupportOption {
        options.first().cloned().unwrap_or(SupportOption::Gamble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Field, Level, OptionCard};
    use crate::loader::CardCatalog;
    use crate::zones::Deck;

    fn empty_field() -> Field {
        Field::new(Deck::new(Arc::new(CardCatalog::new()), &[]))
    }

    #[test]
    fn test_first_choice_takes_first_unit() {
        let field = empty_field();
        let view = BattleView::new(&field, &field);
        let agumon = Arc::new(UnitCard::new(1, "Agumon", Level::Rookie, 30, 10, 5));
        let gabumon = Arc::new(UnitCard::new(2, "Gabumon", Level::Rookie, 30, 10, 5));

        let mut controller = FirstChoiceController::new();
        let choice = controller.choose_unit(&view, &[agumon.clone(), gabumon.clone()]);
        assert!(Arc::ptr_eq(&choice.unwrap(), &agumon));

        assert!(controller.choose_dp_booster(&view, &[gabumon.clone()]).is_none());
        assert!(controller.choose_evolution(&view, &[gabumon]).is_none());
        assert_eq!(controller.confirm_hand(&view), HandDecision::KeepHand);
    }

    #[test]
    fn test_first_choice_attack_and_support() {
        let field = empty_field();
        let view = BattleView::new(&field, &field);
        let agumon = UnitCard::new(1, "Agumon", Level::Rookie, 30, 10, 5);

        let mut controller = FirstChoiceController::new();
        assert_eq!(controller.choose_attack(&view, &agumon, &AttackKind::ALL), AttackKind::C);

        let trap = Card::from(OptionCard::new(9, "Trap", ""));
        let options = [SupportOption::Card(trap.clone()), SupportOption::Gamble];
        match controller.choose_support(&view, &options) {
            SupportOption::Card(card) => assert!(card.same_card(&trap)),
            SupportOption::Gamble => panic!("expected the hand card"),
        }
        assert!(matches!(controller.choose_support(&view, &[SupportOption::Gamble]), SupportOption::Gamble));
    }
}
