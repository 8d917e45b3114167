//! Battle phase resolution
//!
//! Both players pick an attack and a support. The acting player strikes
//! first; the opponent strikes back only if its unit is still standing.

use crate::core::{AttackKind, Field, Player};
use crate::game::controller::{BattleView, SupportOption};
use crate::game::logger::BattleLogger;
use crate::game::phase::{BattleOutcome, TurnResult};
use crate::{DcbError, Result};
use std::sync::Arc;

/// Resolve the battle phase for the acting `player`.
///
/// Skipped entirely (no choices, no damage) when the opponent has no active
/// unit.
pub fn resolve(player: &mut Player<'_>, opponent: &mut Player<'_>, logger: &BattleLogger) -> Result<TurnResult> {
    if !opponent.field.has_unit() {
        log_if_verbose!(logger, verbose, "{} has no unit in play, battle skipped", opponent.name);
        return Ok(TurnResult::Continue);
    }

    let attack = choose_attack(player, opponent, logger)?;
    let counter = choose_attack(opponent, player, logger)?;

    // The defending player commits a support first
    choose_support(opponent, player, logger)?;
    choose_support(player, opponent, logger)?;

    let remaining = opponent.field.damage_unit(attack.1)?;
    logger.normal(&format!(
        "{} hits with {} for {} ({} HP left)",
        player.name, attack.0, attack.1, remaining
    ));

    if remaining > 0 {
        let remaining = player.field.damage_unit(counter.1)?;
        logger.normal(&format!(
            "{} strikes back with {} for {} ({} HP left)",
            opponent.name, counter.0, counter.1, remaining
        ));
    }

    let result = determine_outcome(&player.field, &opponent.field);
    log_if_verbose!(logger, verbose, "{} battle result: {}", player.name, result);
    Ok(result)
}

/// Outcome of an exchange from the acting player's point of view
pub fn determine_outcome(field: &Field, opponent: &Field) -> TurnResult {
    let defeated = |f: &Field| f.unit().is_some_and(|u| u.is_defeated());
    BattleOutcome::from_defeats(defeated(field), defeated(opponent))
        .map(TurnResult::from)
        .unwrap_or(TurnResult::Continue)
}

/// Ask `chooser` for an attack; returns the attack name and its damage
fn choose_attack(chooser: &mut Player<'_>, other: &Player<'_>, logger: &BattleLogger) -> Result<(String, i32)> {
    let unit = Arc::clone(chooser.field.unit().ok_or(DcbError::NoActiveUnit)?.card());
    let view = BattleView::new(&chooser.field, &other.field);
    let kind = chooser.controller.choose_attack(&view, &unit, &AttackKind::ALL);
    let attack = unit.attack(kind);

    logger.controller_choice(
        chooser.controller.name(),
        &format!("{}'s {} readies {} {}", chooser.name, unit.name, kind, attack.name),
    );
    Ok((attack.name.clone(), attack.damage))
}

/// Ask `chooser` for a support and consume it.
///
/// A hand card goes to the discard pile; a gamble discards the top card of
/// the deck, if there is one. Support effects are not applied.
fn choose_support(chooser: &mut Player<'_>, other: &Player<'_>, logger: &BattleLogger) -> Result<()> {
    let options = SupportOption::for_field(&chooser.field);
    let view = BattleView::new(&chooser.field, &other.field);
    let choice = chooser.controller.choose_support(&view, &options);

    match &choice {
        SupportOption::Card(card) => {
            chooser.field.take_from_hand(card)?;
        }
        SupportOption::Gamble => {
            let revealed = chooser.field.gamble();
            if let Some(card) = revealed {
                log_if_verbose!(logger, verbose, "{} gambles and reveals {}", chooser.name, card.name());
            }
        }
    }

    logger.controller_choice(
        chooser.controller.name(),
        &format!("{} supports with {}", chooser.name, choice),
    );
    Ok(())
}
