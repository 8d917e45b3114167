//! One player's turn: the Prep, Upgrade and Battle phases in order

use crate::core::Player;
use crate::game::combat;
use crate::game::controller::{BattleView, HandDecision};
use crate::game::logger::BattleLogger;
use crate::game::phase::{run_pipeline, Phase, Step, TurnResult};
use crate::Result;

/// A single turn for the acting `player` against `opponent`.
///
/// Turns are transient: the battle loop builds one per turn and drops it
/// once `run` returns.
pub struct Turn<'a, 'c> {
    player: &'a mut Player<'c>,
    opponent: &'a mut Player<'c>,
    logger: &'a BattleLogger,
}

impl<'a, 'c> Turn<'a, 'c> {
    pub fn new(player: &'a mut Player<'c>, opponent: &'a mut Player<'c>, logger: &'a BattleLogger) -> Self {
        Turn {
            player,
            opponent,
            logger,
        }
    }

    /// Run every phase, stopping at the first non-`Continue` result
    pub fn run(&mut self) -> Result<TurnResult> {
        run_pipeline(Phase::TURN, |phase| self.run_phase(phase))
    }

    pub fn run_phase(&mut self, phase: Phase) -> Result<TurnResult> {
        log_if_verbose!(self.logger, verbose, "{}: {}", self.player.name, phase);
        run_pipeline(phase.steps().iter().copied(), |step| self.run_step(step))
    }

    pub fn run_step(&mut self, step: Step) -> Result<TurnResult> {
        match step {
            Step::DrawCards => self.draw_cards(),
            Step::PlayUnit => self.prep_play_unit(),
            Step::BoostDp => self.choose_dp_booster(),
            Step::Evolve => self.choose_evolution(),
            Step::Combat => combat::resolve(self.player, self.opponent, self.logger),
        }
    }

    fn draw_cards(&mut self) -> Result<TurnResult> {
        let drawn = self.player.field.draw_til_full();
        log_if_verbose!(self.logger, verbose, "{} draws {} card(s)", self.player.name, drawn);
        self.confirm_hand()
    }

    /// Keep or mulligan the hand until it is kept or the deck runs out.
    ///
    /// Every mulligan draws from the deck, so this terminates within
    /// `deck / HAND_SIZE` cycles.
    fn confirm_hand(&mut self) -> Result<TurnResult> {
        loop {
            let field = &self.player.field;
            if field.deck().is_empty() {
                if !field.has_unit() {
                    self.logger.normal(&format!("{} has no unit and no cards left", self.player.name));
                    return Ok(TurnResult::NoUnit);
                }
                return Ok(TurnResult::Continue);
            }

            let decision = if field.has_unit_in_hand() {
                let view = BattleView::new(field, &self.opponent.field);
                let decision = self.player.controller.confirm_hand(&view);
                if decision == HandDecision::Mulligan {
                    self.logger.controller_choice(
                        self.player.controller.name(),
                        &format!("{} mulligans", self.player.name),
                    );
                }
                decision
            } else {
                log_if_verbose!(self.logger, verbose, "{} has no unit in hand, mulligan", self.player.name);
                HandDecision::Mulligan
            };

            match decision {
                HandDecision::KeepHand => return Ok(TurnResult::Continue),
                HandDecision::Mulligan => {
                    self.player.field.discard_hand();
                    let drawn = self.player.field.draw_til_full();
                    log_if_verbose!(self.logger, verbose, "{} draws {} card(s)", self.player.name, drawn);
                }
            }
        }
    }

    fn prep_play_unit(&mut self) -> Result<TurnResult> {
        if self.player.field.has_unit() {
            log_if_verbose!(self.logger, verbose, "{} already has a unit in play", self.player.name);
            return Ok(TurnResult::Continue);
        }

        let candidates = self.player.field.get_units_in_hand();
        if candidates.is_empty() {
            self.logger.normal(&format!("{} has no unit to play", self.player.name));
            return Ok(TurnResult::NoUnit);
        }

        let view = BattleView::new(&self.player.field, &self.opponent.field);
        let Some(unit) = self.player.controller.choose_unit(&view, &candidates) else {
            self.logger.normal(&format!("{} plays no unit", self.player.name));
            return Ok(TurnResult::NoUnit);
        };

        self.player.field.play_unit(&unit)?;
        self.logger.controller_choice(
            self.player.controller.name(),
            &format!("{} plays {} ({} HP)", self.player.name, unit.name, unit.hp),
        );
        Ok(TurnResult::Continue)
    }

    fn choose_dp_booster(&mut self) -> Result<TurnResult> {
        let candidates = self.player.field.get_units_in_hand();
        if candidates.is_empty() {
            return Ok(TurnResult::Continue);
        }

        let view = BattleView::new(&self.player.field, &self.opponent.field);
        if let Some(unit) = self.player.controller.choose_dp_booster(&view, &candidates) {
            self.player.field.boost_dp(&unit)?;
            self.logger.controller_choice(
                self.player.controller.name(),
                &format!(
                    "{} boosts DP with {} (DP {})",
                    self.player.name,
                    unit.name,
                    self.player.field.dp().get_value()
                ),
            );
        }
        Ok(TurnResult::Continue)
    }

    fn choose_evolution(&mut self) -> Result<TurnResult> {
        let candidates = self.player.field.get_evolution_targets()?;
        if candidates.is_empty() {
            return Ok(TurnResult::Continue);
        }

        let view = BattleView::new(&self.player.field, &self.opponent.field);
        if let Some(unit) = self.player.controller.choose_evolution(&view, &candidates) {
            self.player.field.evolve_unit(&unit)?;
            let hp = self.player.field.unit_hp().unwrap_or_default();
            self.logger.controller_choice(
                self.player.controller.name(),
                &format!("{} evolves into {} ({hp} HP)", self.player.name, unit.name),
            );
        }
        Ok(TurnResult::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttackKind, Card, Level, OptionCard, UnitCard};
    use crate::game::controller::{BattleController, SupportOption};
    use crate::game::FirstChoiceController;
    use crate::loader::CardCatalog;
    use crate::zones::Deck;
    use std::sync::Arc;

    fn catalog() -> Arc<CardCatalog> {
        let mut catalog = CardCatalog::new();
        catalog.add_card(UnitCard::new(1, "Agumon", Level::Rookie, 30, 10, 5).into());
        catalog.add_card(UnitCard::new(2, "Greymon", Level::Champion, 40, 20, 10).into());
        catalog.add_card(OptionCard::new(3, "Trap", "Discard the opponent's support").into());
        catalog.add_card(UnitCard::new(4, "Gabumon", Level::Rookie, 20, 10, 7).into());
        catalog.add_card(UnitCard::new(5, "Birdramon", Level::Champion, 25, 20, 10).into());
        Arc::new(catalog)
    }

    /// Boosts with Gabumon and evolves into the first target, counting calls
    #[derive(Default)]
    struct UpgradePicker {
        boosts: usize,
        evolutions: usize,
    }

    impl BattleController for UpgradePicker {
        fn name(&self) -> &str {
            "upgrade"
        }

        fn confirm_hand(&mut self, _view: &BattleView) -> HandDecision {
            HandDecision::KeepHand
        }

        fn choose_unit(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
            candidates.first().cloned()
        }

        fn choose_dp_booster(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
            self.boosts += 1;
            candidates.iter().find(|u| u.name.as_str() == "Gabumon").cloned()
        }

        fn choose_evolution(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
            self.evolutions += 1;
            candidates.first().cloned()
        }

        fn choose_attack(&mut self, _view: &BattleView, _unit: &UnitCard, _options: &[AttackKind]) -> AttackKind {
            AttackKind::C
        }

        fn choose_support(&mut self, _view: &BattleView, _options: &[SupportOption]) -> SupportOption {
            SupportOption::Gamble
        }
    }

    #[test]
    fn test_prep_plays_first_unit() {
        let catalog = catalog();
        // Drawn from the end: hand becomes [Agumon, Trap]
        let deck = Deck::from_names(Arc::clone(&catalog), &["Trap", "Agumon"]).unwrap();
        let opp_deck = Deck::new(Arc::clone(&catalog), &[]);

        let mut c1 = FirstChoiceController::new();
        let mut c2 = FirstChoiceController::new();
        let mut player = Player::new("Tai", deck, &mut c1);
        let mut opponent = Player::new("Matt", opp_deck, &mut c2);
        let logger = BattleLogger::capturing();

        player.field.draw(2);
        let mut turn = Turn::new(&mut player, &mut opponent, &logger);
        assert_eq!(turn.run_step(Step::PlayUnit).unwrap(), TurnResult::Continue);

        assert_eq!(player.field.unit().unwrap().name(), "Agumon");
        let hand: Vec<&str> = player.field.hand().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(hand, ["Trap"]);
    }

    #[test]
    fn test_empty_deck_without_unit_is_no_unit() {
        let catalog = catalog();
        let deck = Deck::new(Arc::clone(&catalog), &[]);
        let opp_deck = Deck::new(Arc::clone(&catalog), &[]);

        let mut c1 = FirstChoiceController::new();
        let mut c2 = FirstChoiceController::new();
        let mut player = Player::new("Tai", deck, &mut c1);
        let mut opponent = Player::new("Matt", opp_deck, &mut c2);
        let logger = BattleLogger::capturing();

        let result = Turn::new(&mut player, &mut opponent, &logger).run().unwrap();
        assert_eq!(result, TurnResult::NoUnit);
    }

    #[test]
    fn test_upgrade_skipped_without_candidates() {
        let catalog = catalog();
        let trap = catalog.get("Trap").unwrap();
        let agumon = catalog.get("Agumon").unwrap();
        let deck = Deck::new(Arc::clone(&catalog), &[trap, agumon]);
        let opp_deck = Deck::new(Arc::clone(&catalog), &[]);

        let mut c1 = FirstChoiceController::new();
        let mut c2 = FirstChoiceController::new();
        let mut player = Player::new("Tai", deck, &mut c1);
        let mut opponent = Player::new("Matt", opp_deck, &mut c2);
        let logger = BattleLogger::capturing();

        player.field.draw(2);
        player.field.play_unit("Agumon").unwrap();
        let mut turn = Turn::new(&mut player, &mut opponent, &logger);
        assert_eq!(turn.run_phase(Phase::Upgrade).unwrap(), TurnResult::Continue);
        assert!(player.field.dp().is_empty());
        assert!(matches!(player.field.hand()[0], Card::Option(_)));
    }

    #[test]
    fn test_upgrade_boosts_and_evolves_once_each() {
        let catalog = catalog();
        let cards = catalog.get_many(&["Birdramon", "Gabumon", "Agumon"]).unwrap();
        let deck = Deck::new(Arc::clone(&catalog), &cards);
        let opp_deck = Deck::new(Arc::clone(&catalog), &[]);

        let mut picker = UpgradePicker::default();
        let mut idle = FirstChoiceController::new();
        let mut player = Player::new("Tai", deck, &mut picker);
        let mut opponent = Player::new("Matt", opp_deck, &mut idle);
        let logger = BattleLogger::capturing();

        // Hand: Agumon, Gabumon, Birdramon
        player.field.draw(3);
        player.field.play_unit("Agumon").unwrap();
        assert_eq!(player.field.dp().get_value(), 0);

        let mut turn = Turn::new(&mut player, &mut opponent, &logger);
        assert_eq!(turn.run_phase(Phase::Upgrade).unwrap(), TurnResult::Continue);

        assert_eq!(player.field.dp().get_value(), 7);
        let unit = player.field.unit().unwrap();
        assert_eq!(unit.name(), "Birdramon");
        // Agumon's 30 HP beats Birdramon's printed 25
        assert_eq!(unit.hp(), 30);
        assert!(player.field.hand().is_empty());
        assert_eq!(player.field.discard_pile()[0].name().as_str(), "Agumon");

        drop(player);
        assert_eq!(picker.boosts, 1);
        assert_eq!(picker.evolutions, 1);
    }
}
