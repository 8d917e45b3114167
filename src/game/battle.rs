//! Battle loop implementation
//!
//! Sets up both fields, flips a coin for turn order and alternates turns
//! until one of them ends the battle or the turn limit is reached.

use crate::core::Player;
use crate::game::controller::BattleView;
use crate::game::logger::{BattleLogger, VerbosityLevel};
use crate::game::phase::{BattleOutcome, TurnResult};
use crate::game::turn::Turn;
use crate::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default ceiling on individual player turns
pub const DEFAULT_MAX_TURNS: u32 = 6;

/// Battle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Maximum number of player turns before the battle is called off
    pub max_turns: u32,
    pub verbosity: VerbosityLevel,
    /// RNG seed for shuffles and the turn-order coin flip; `None` seeds from
    /// entropy
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            max_turns: DEFAULT_MAX_TURNS,
            verbosity: VerbosityLevel::default(),
            seed: None,
        }
    }
}

/// Seat at the table, independent of who moves first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::One => write!(f, "Player 1"),
            PlayerSlot::Two => write!(f, "Player 2"),
        }
    }
}

/// Reason the battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEndReason {
    /// One unit fell in combat
    UnitDefeated,
    /// A player had no unit and could not get one
    NoUnit,
    /// Both units fell in the same exchange
    Tie,
    /// The turn limit was reached without a result
    TurnLimit,
}

/// Result of running a battle to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    /// Winner of the battle (None for a tie or the turn limit)
    pub winner: Option<PlayerSlot>,
    /// Total number of player turns played
    pub turns_played: u32,
    pub first_player: PlayerSlot,
    /// The turn that ended the battle, from the acting player's perspective
    pub deciding_turn: Option<(PlayerSlot, TurnResult)>,
    pub end_reason: BattleEndReason,
}

impl BattleResult {
    fn from_turns(first_player: PlayerSlot, turns_played: u32, deciding_turn: Option<(PlayerSlot, TurnResult)>) -> Self {
        let (winner, end_reason) = match deciding_turn {
            Some((slot, TurnResult::Win)) => (Some(slot), BattleEndReason::UnitDefeated),
            Some((slot, TurnResult::Loss)) => (Some(slot.other()), BattleEndReason::UnitDefeated),
            Some((slot, TurnResult::NoUnit)) => (Some(slot.other()), BattleEndReason::NoUnit),
            Some((_, TurnResult::Tie)) => (None, BattleEndReason::Tie),
            Some((_, TurnResult::Continue)) | None => (None, BattleEndReason::TurnLimit),
        };
        BattleResult {
            winner,
            turns_played,
            first_player,
            deciding_turn,
            end_reason,
        }
    }

    /// The outcome for one seat, or `None` if the turn limit was reached
    pub fn outcome_for(&self, slot: PlayerSlot) -> Option<BattleOutcome> {
        let (acting, result) = self.deciding_turn?;
        let outcome = result.outcome()?;
        Some(if acting == slot { outcome } else { outcome.flip() })
    }
}

/// Battle runner
///
/// Owns the battle RNG and logger; players are passed in per battle so the
/// same runner can play many battles in a row.
pub struct Battle {
    config: BattleConfig,
    rng: ChaCha12Rng,
    logger: BattleLogger,
}

impl Battle {
    pub fn new(config: BattleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        let logger = BattleLogger::with_verbosity(config.verbosity);
        Battle { config, rng, logger }
    }

    /// Set the maximum number of player turns
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.config.max_turns = max_turns;
        self
    }

    /// Set verbosity level for output
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.config.verbosity = verbosity;
        self.logger.set_verbosity(verbosity);
        self
    }

    /// Reseed the battle RNG (for deterministic testing)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.rng = ChaCha12Rng::seed_from_u64(seed);
        self
    }

    /// Replace the logger, e.g. with a capturing one
    pub fn with_logger(mut self, logger: BattleLogger) -> Self {
        self.config.verbosity = logger.verbosity();
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut BattleLogger {
        &mut self.logger
    }

    /// Play one battle between two players.
    ///
    /// Log entries captured during an earlier battle are discarded first.
    pub fn battle<'c>(&mut self, player_one: &mut Player<'c>, player_two: &mut Player<'c>) -> Result<BattleResult> {
        self.logger.clear_logs();
        player_one.new_field()?;
        player_two.new_field()?;
        player_one.field.deck_mut().shuffle(&mut self.rng);
        player_two.field.deck_mut().shuffle(&mut self.rng);

        let first_player = if self.rng.gen_bool(0.5) {
            PlayerSlot::One
        } else {
            PlayerSlot::Two
        };
        let order = [first_player, first_player.other()];
        let first_name = match first_player {
            PlayerSlot::One => &player_one.name,
            PlayerSlot::Two => &player_two.name,
        };
        self.logger.normal(&format!("{first_name} goes first"));

        let mut index = 0;
        let mut turns_played = 0;
        let mut deciding_turn = None;
        while turns_played < self.config.max_turns {
            let slot = order[index];
            let (player, opponent) = match slot {
                PlayerSlot::One => (&mut *player_one, &mut *player_two),
                PlayerSlot::Two => (&mut *player_two, &mut *player_one),
            };

            turns_played += 1;
            self.logger.normal(&format!("Turn {turns_played}: {}", player.name));
            let result = Turn::new(player, opponent, &self.logger).run()?;
            if result.is_terminal() {
                deciding_turn = Some((slot, result));
                break;
            }
            index = (index + 1) % order.len();
        }

        let result = BattleResult::from_turns(first_player, turns_played, deciding_turn);
        self.log_result(&result, player_one, player_two);

        let outcome_one = result.outcome_for(PlayerSlot::One);
        let outcome_two = result.outcome_for(PlayerSlot::Two);
        let view = BattleView::new(&player_one.field, &player_two.field);
        player_one.controller.on_battle_end(&view, outcome_one);
        let view = BattleView::new(&player_two.field, &player_one.field);
        player_two.controller.on_battle_end(&view, outcome_two);

        Ok(result)
    }

    fn log_result(&self, result: &BattleResult, player_one: &Player<'_>, player_two: &Player<'_>) {
        let name = |slot: PlayerSlot| match slot {
            PlayerSlot::One => player_one.name.as_str(),
            PlayerSlot::Two => player_two.name.as_str(),
        };
        let message = match (result.winner, result.end_reason) {
            (Some(winner), BattleEndReason::NoUnit) => {
                format!("{} wins, {} has no unit ({} turns)", name(winner), name(winner.other()), result.turns_played)
            }
            (Some(winner), _) => format!("{} wins ({} turns)", name(winner), result.turns_played),
            (None, BattleEndReason::Tie) => format!("Battle ends in a tie ({} turns)", result.turns_played),
            (None, _) => format!("Turn limit reached after {} turns", result.turns_played),
        };
        self.logger.minimal(&message);
    }
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}
