//! Tournament mode for running many battles in parallel and collecting statistics
//!
//! Battles are independent: each one builds its own players, controllers and
//! RNGs from the tournament seed and its game index, so results do not depend
//! on thread scheduling.

use crate::core::Player;
use crate::game::{
    Battle, BattleConfig, BattleController, BattleEndReason, BattleResult, FirstChoiceController, PlayerSlot,
    RandomController, VerbosityLevel,
};
use crate::loader::{CardCatalog, DeckList};
use crate::{DcbError, Result};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Controller type for tournament battles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    First,
    Random,
}

impl ControllerType {
    fn build(self, seed: u64) -> Box<dyn BattleController> {
        match self {
            ControllerType::First => Box::new(FirstChoiceController::new()),
            ControllerType::Random => Box::new(RandomController::with_seed(seed)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub games: usize,
    pub p1: ControllerType,
    pub p2: ControllerType,
    pub seed: u64,
    pub max_turns: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            games: 100,
            p1: ControllerType::Random,
            p2: ControllerType::Random,
            seed: 42,
            max_turns: BattleConfig::default().max_turns,
        }
    }
}

/// Statistics collected during a tournament
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TournamentStats {
    pub games_played: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub ties: usize,
    /// Battles that hit the turn limit
    pub turn_limits: usize,
    pub failed_games: usize,
    pub deck_wins: BTreeMap<String, usize>,
    pub deck_games: BTreeMap<String, usize>,
}

impl TournamentStats {
    fn record(&mut self, deck1: &str, deck2: &str, result: &BattleResult) {
        self.games_played += 1;
        *self.deck_games.entry(deck1.to_string()).or_insert(0) += 1;
        *self.deck_games.entry(deck2.to_string()).or_insert(0) += 1;

        match (result.winner, result.end_reason) {
            (Some(PlayerSlot::One), _) => {
                self.p1_wins += 1;
                *self.deck_wins.entry(deck1.to_string()).or_insert(0) += 1;
            }
            (Some(PlayerSlot::Two), _) => {
                self.p2_wins += 1;
                *self.deck_wins.entry(deck2.to_string()).or_insert(0) += 1;
            }
            (None, BattleEndReason::TurnLimit) => self.turn_limits += 1,
            (None, _) => self.ties += 1,
        }
    }

    pub fn win_rate(&self, deck: &str) -> Option<f64> {
        let games = *self.deck_games.get(deck)?;
        let wins = self.deck_wins.get(deck).copied().unwrap_or(0);
        (games > 0).then(|| wins as f64 / games as f64)
    }
}

impl fmt::Display for TournamentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |n: usize| {
            if self.games_played == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.games_played as f64
            }
        };
        writeln!(f, "=== Player Position Statistics ===")?;
        writeln!(f, "Player 1 wins: {} ({:.1}%)", self.p1_wins, pct(self.p1_wins))?;
        writeln!(f, "Player 2 wins: {} ({:.1}%)", self.p2_wins, pct(self.p2_wins))?;
        writeln!(f, "Ties:          {} ({:.1}%)", self.ties, pct(self.ties))?;
        writeln!(f, "Turn limit:    {} ({:.1}%)", self.turn_limits, pct(self.turn_limits))?;
        if self.failed_games > 0 {
            writeln!(f, "Failed games:  {}", self.failed_games)?;
        }
        writeln!(f)?;
        writeln!(f, "=== Deck Statistics ===")?;
        for (deck, games) in &self.deck_games {
            let wins = self.deck_wins.get(deck).copied().unwrap_or(0);
            let rate = self.win_rate(deck).unwrap_or(0.0) * 100.0;
            writeln!(f, "{deck}: {wins}/{games} wins ({rate:.1}%)")?;
        }
        Ok(())
    }
}

/// Play `config.games` battles between randomly paired decks
pub fn run_tournament(catalog: &Arc<CardCatalog>, decks: &[DeckList], config: &TournamentConfig) -> Result<TournamentStats> {
    if decks.is_empty() {
        return Err(DcbError::InvalidAction("Tournament requires at least 1 deck".to_string()));
    }

    let outcomes: Vec<(usize, usize, Result<BattleResult>)> = (0..config.games)
        .into_par_iter()
        .map(|game_idx| {
            // Deterministic deck selection from master seed + game index
            let mut deck_rng = Xoshiro256PlusPlus::seed_from_u64(config.seed.wrapping_add(game_idx as u64));
            let deck1 = deck_rng.gen_range(0..decks.len());
            let deck2 = deck_rng.gen_range(0..decks.len());
            let result = play_game(catalog, &decks[deck1], &decks[deck2], config, game_idx);
            (deck1, deck2, result)
        })
        .collect();

    let mut stats = TournamentStats::default();
    for (game_idx, (deck1, deck2, result)) in outcomes.into_iter().enumerate() {
        match result {
            Ok(result) => stats.record(&decks[deck1].name, &decks[deck2].name, &result),
            Err(e) => {
                eprintln!("Warning: Game {game_idx} failed: {e}");
                stats.failed_games += 1;
            }
        }
    }
    Ok(stats)
}

fn play_game(
    catalog: &Arc<CardCatalog>,
    deck1: &DeckList,
    deck2: &DeckList,
    config: &TournamentConfig,
    game_idx: usize,
) -> Result<BattleResult> {
    let game_seed = config
        .seed
        .wrapping_add((game_idx as u64).wrapping_mul(0x9E3779B97F4A7C15));

    // Derive controller seeds
    let mut controller1 = config.p1.build(game_seed.wrapping_add(0x1234_5678_9ABC_DEF0));
    let mut controller2 = config.p2.build(game_seed.wrapping_add(0xFEDC_BA98_7654_3210));

    let mut player1 = Player::new("Player 1", deck1.build(catalog)?, &mut *controller1);
    let mut player2 = Player::new("Player 2", deck2.build(catalog)?, &mut *controller2);

    let mut battle = Battle::new(BattleConfig {
        max_turns: config.max_turns,
        verbosity: VerbosityLevel::Silent,
        seed: Some(game_seed),
    });
    battle.battle(&mut player1, &mut player2)
}
