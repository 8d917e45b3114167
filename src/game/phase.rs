//! Turn phases, steps and turn results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Major phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Prep,
    Upgrade,
    Battle,
}

/// Specific steps within phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    // Prep Phase
    DrawCards,
    PlayUnit,

    // Upgrade Phase
    BoostDp,
    Evolve,

    // Battle Phase
    Combat,
}

impl Phase {
    /// A turn runs these phases in order
    pub const TURN: [Phase; 3] = [Phase::Prep, Phase::Upgrade, Phase::Battle];

    /// Steps of this phase, in order
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Phase::Prep => &[Step::DrawCards, Step::PlayUnit],
            Phase::Upgrade => &[Step::BoostDp, Step::Evolve],
            Phase::Battle => &[Step::Combat],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Prep => write!(f, "Prep Phase"),
            Phase::Upgrade => write!(f, "Upgrade Phase"),
            Phase::Battle => write!(f, "Battle Phase"),
        }
    }
}

/// Outcome of a battle from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    Win,
    Loss,
    Tie,
}

impl BattleOutcome {
    /// The same outcome seen from the other side
    pub fn flip(self) -> Self {
        match self {
            BattleOutcome::Win => BattleOutcome::Loss,
            BattleOutcome::Loss => BattleOutcome::Win,
            BattleOutcome::Tie => BattleOutcome::Tie,
        }
    }

    /// Decide an exchange from whether each unit is down
    pub fn from_defeats(self_defeated: bool, opponent_defeated: bool) -> Option<Self> {
        match (self_defeated, opponent_defeated) {
            (true, true) => Some(BattleOutcome::Tie),
            (true, false) => Some(BattleOutcome::Loss),
            (false, true) => Some(BattleOutcome::Win),
            (false, false) => None,
        }
    }
}

/// Result of a step, phase or whole turn.
///
/// Anything other than `Continue` stops the pipeline that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnResult {
    Continue,
    /// The acting player has no unit and cannot get one
    NoUnit,
    Win,
    Loss,
    Tie,
}

impl TurnResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnResult::Continue)
    }

    /// The battle outcome this result implies for the acting player
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            TurnResult::Continue => None,
            TurnResult::NoUnit | TurnResult::Loss => Some(BattleOutcome::Loss),
            TurnResult::Win => Some(BattleOutcome::Win),
            TurnResult::Tie => Some(BattleOutcome::Tie),
        }
    }
}

impl From<BattleOutcome> for TurnResult {
    fn from(outcome: BattleOutcome) -> Self {
        match outcome {
            BattleOutcome::Win => TurnResult::Win,
            BattleOutcome::Loss => TurnResult::Loss,
            BattleOutcome::Tie => TurnResult::Tie,
        }
    }
}

impl fmt::Display for TurnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TurnResult::Continue => "continue",
            TurnResult::NoUnit => "no unit",
            TurnResult::Win => "win",
            TurnResult::Loss => "loss",
            TurnResult::Tie => "tie",
        };
        write!(f, "{text}")
    }
}

/// Run steps in order, stopping at the first non-`Continue` result
pub fn run_pipeline<T, E>(
    items: impl IntoIterator<Item = T>,
    mut run: impl FnMut(T) -> Result<TurnResult, E>,
) -> Result<TurnResult, E> {
    for item in items {
        let result = run(item)?;
        if result.is_terminal() {
            return Ok(result);
        }
    }
    Ok(TurnResult::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_step_order() {
        let flattened: Vec<Step> = Phase::TURN.iter().flat_map(|p| p.steps().iter().copied()).collect();
        assert_eq!(
            flattened,
            [Step::DrawCards, Step::PlayUnit, Step::BoostDp, Step::Evolve, Step::Combat]
        );
    }

    #[test]
    fn test_outcome_flip() {
        assert_eq!(BattleOutcome::Win.flip(), BattleOutcome::Loss);
        assert_eq!(BattleOutcome::Loss.flip(), BattleOutcome::Win);
        assert_eq!(BattleOutcome::Tie.flip(), BattleOutcome::Tie);
        for outcome in [BattleOutcome::Win, BattleOutcome::Loss, BattleOutcome::Tie] {
            assert_eq!(outcome.flip().flip(), outcome);
        }
    }

    #[test]
    fn test_outcome_from_defeats() {
        assert_eq!(BattleOutcome::from_defeats(true, true), Some(BattleOutcome::Tie));
        assert_eq!(BattleOutcome::from_defeats(true, false), Some(BattleOutcome::Loss));
        assert_eq!(BattleOutcome::from_defeats(false, true), Some(BattleOutcome::Win));
        assert_eq!(BattleOutcome::from_defeats(false, false), None);
    }

    #[test]
    fn test_pipeline_short_circuits() {
        let mut ran = Vec::new();
        let result: Result<TurnResult, ()> = run_pipeline(
            [TurnResult::Continue, TurnResult::NoUnit, TurnResult::Win],
            |r| {
                ran.push(r);
                Ok(r)
            },
        );
        assert_eq!(result, Ok(TurnResult::NoUnit));
        assert_eq!(ran, [TurnResult::Continue, TurnResult::NoUnit]);
    }

    #[test]
    fn test_pipeline_propagates_errors() {
        let result = run_pipeline([1, 2, 3], |n| if n == 2 { Err("boom") } else { Ok(TurnResult::Continue) });
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_turn_result_outcome() {
        assert_eq!(TurnResult::Continue.outcome(), None);
        assert_eq!(TurnResult::NoUnit.outcome(), Some(BattleOutcome::Loss));
        assert_eq!(TurnResult::from(BattleOutcome::Tie), TurnResult::Tie);
        assert!(!TurnResult::Continue.is_terminal());
        assert!(TurnResult::Win.is_terminal());
    }
}
