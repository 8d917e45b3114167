//! Random AI controller for testing and baseline play
//!
//! Makes uniform random choices among the available options. Optional picks
//! treat "pass" as one more option.

use crate::core::{AttackKind, UnitCard};
use crate::game::controller::{BattleController, BattleView, HandDecision, SupportOption};
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::Arc;

/// A controller that makes random choices
pub struct RandomController {
    rng: Box<dyn RngCore>,
}

impl RandomController {
    /// Create a new random controller with default RNG
    pub fn new() -> Self {
        RandomController {
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(seed: u64) -> Self {
        RandomController {
            rng: Box::new(Xoshiro256PlusPlus::seed_from_u64(seed)),
        }
    }

    fn pick<T: Clone>(&mut self, options: &[T]) -> Option<T> {
        if options.is_empty() {
            None
        } else {
            let index = self.rng.gen_range(0..options.len());
            Some(options[index].clone())
        }
    }

    /// Uniform over the candidates plus "pass"
    fn pick_optional<T: Clone>(&mut self, candidates: &[T]) -> Option<T> {
        let index = self.rng.gen_range(0..=candidates.len());
        candidates.get(index).cloned()
    }
}

impl Default for RandomController {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleController for RandomController {
    fn name(&self) -> &str {
        "random"
    }

    fn confirm_hand(&mut self, _view: &BattleView) -> HandDecision {
        if self.rng.gen_bool(0.5) {
            HandDecision::KeepHand
        } else {
            HandDecision::Mulligan
        }
    }

    fn choose_unit(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        self.pick(candidates)
    }

    fn choose_dp_booster(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        self.pick_optional(candidates)
    }

    fn choose_evolution(&mut self, _view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        self.pick_optional(candidates)
    }

    fn choose_attack(&mut self, _view: &BattleView, _unit: &UnitCard, options: &[AttackKind]) -> AttackKind {
        self.pick(options).unwrap_or(AttackKind::C)
    }

    fn choose_support(&mut self, _view: &BattleView, options: &[SupportOption]) -> SupportOption {
        self.pick(options).unwrap_or(SupportOption::Gamble)
    }
}
