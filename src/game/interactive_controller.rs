//! Interactive TUI controller for human players
//!
//! Prints numbered menus and reads choices line by line. Input and output
//! are generic so the same controller can be driven from a script in tests.

use crate::core::{AttackKind, UnitCard};
use crate::game::controller::{BattleController, BattleView, HandDecision, SupportOption};
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::sync::Arc;

/// A controller that prompts a human player for decisions
pub struct InteractiveController<R, W> {
    input: R,
    output: W,
    /// Set once input hits EOF; every later prompt takes the first option
    exhausted: bool,
}

impl InteractiveController<StdinLock<'static>, Stdout> {
    /// Prompt on stdout and read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveController<R, W> {
    pub fn new(input: R, output: W) -> Self {
        InteractiveController {
            input,
            output,
            exhausted: false,
        }
    }

    /// Give back the output sink (useful for inspecting transcripts)
    pub fn into_output(self) -> W {
        self.output
    }

    fn emit(&mut self, line: &str) {
        // A closed terminal is not a battle error; the next read hits EOF
        let _ = writeln!(self.output, "{line}");
    }

    /// Helper: prompt user for a choice and validate input
    ///
    /// Special commands:
    /// - '?' shows help
    /// - 'v' shows both fields
    fn get_user_choice(&mut self, prompt: &str, num_options: usize, allow_pass: bool, view: &BattleView) -> Option<usize> {
        let fallback = if allow_pass { None } else { Some(0) };
        if self.exhausted || num_options == 0 {
            return fallback;
        }

        loop {
            let _ = write!(self.output, "{prompt} ");
            let _ = self.output.flush();

            let mut input = String::new();
            match self.input.read_line(&mut input) {
                Ok(0) | Err(_) => {
                    self.exhausted = true;
                    return fallback;
                }
                Ok(_) => {}
            }

            let trimmed = input.trim();
            match trimmed {
                "?" => {
                    self.display_help(allow_pass);
                    continue;
                }
                "v" => {
                    self.display_fields(view);
                    continue;
                }
                "" if !allow_pass => return Some(0),
                "" => continue,
                "p" | "pass" if allow_pass => return None,
                _ => {}
            }

            match trimmed.parse::<usize>() {
                Ok(choice) if choice < num_options => return Some(choice),
                _ => {
                    let hint = if allow_pass { " or 'p' to pass" } else { "" };
                    self.emit(&format!("Invalid choice. Enter 0-{}{hint}.", num_options - 1));
                }
            }
        }
    }

    fn display_help(&mut self, allow_pass: bool) {
        self.emit("");
        self.emit("=== Help ===");
        self.emit("  ?  - Show this help menu");
        self.emit("  v  - View both fields");
        self.emit("  Enter a number to choose; Enter alone picks option 0");
        if allow_pass {
            self.emit("  p  - Pass");
        }
        self.emit("");
    }

    fn display_fields(&mut self, view: &BattleView) {
        self.emit("");
        self.emit("=== Your field ===");
        self.display_field_summary(view.field());
        self.emit("=== Opponent field ===");
        self.display_field_summary(view.opponent());
        self.emit("");
    }

    fn display_field_summary(&mut self, field: &crate::core::Field) {
        let unit = match field.unit() {
            Some(unit) => format!("{} ({} HP)", unit.name(), unit.hp()),
            None => "(none)".to_string(),
        };
        self.emit(&format!("  Unit: {unit}"));
        self.emit(&format!(
            "  DP: {}  Deck: {}  Hand: {}  Discard: {}",
            field.dp().get_value(),
            field.deck().len(),
            field.hand().len(),
            field.discard_pile().len()
        ));
    }

    fn display_units(&mut self, units: &[Arc<UnitCard>]) {
        for (idx, unit) in units.iter().enumerate() {
            self.emit(&format!(
                "  [{idx}] {} ({}) HP {} DP {} PP {}",
                unit.name, unit.level, unit.hp, unit.dp, unit.pp
            ));
        }
    }

    fn choose_from_units(
        &mut self,
        view: &BattleView,
        header: &str,
        candidates: &[Arc<UnitCard>],
        allow_pass: bool,
    ) -> Option<Arc<UnitCard>> {
        self.emit(&format!("\n{header}"));
        self.display_units(candidates);
        let prompt = if allow_pass {
            format!("Choose (0-{}, p to pass):", candidates.len().saturating_sub(1))
        } else {
            format!("Choose (0-{}):", candidates.len().saturating_sub(1))
        };
        self.get_user_choice(&prompt, candidates.len(), allow_pass, view)
            .and_then(|idx| candidates.get(idx).cloned())
    }
}

impl<R: BufRead, W: Write> BattleController for InteractiveController<R, W> {
    fn name(&self) -> &str {
        "tui"
    }

    fn confirm_hand(&mut self, view: &BattleView) -> HandDecision {
        self.emit("\nYour hand:");
        for card in view.hand() {
            self.emit(&format!("  - {card}"));
        }
        self.emit("  [0] Keep hand");
        self.emit("  [1] Mulligan");
        match self.get_user_choice("Keep this hand? (0-1):", 2, false, view) {
            Some(1) => HandDecision::Mulligan,
            _ => HandDecision::KeepHand,
        }
    }

    fn choose_unit(&mut self, view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        self.choose_from_units(view, "Choose a unit to play:", candidates, false)
    }

    fn choose_dp_booster(&mut self, view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        let header = format!("Boost DP (current {})?", view.dp());
        self.choose_from_units(view, &header, candidates, true)
    }

    fn choose_evolution(&mut self, view: &BattleView, candidates: &[Arc<UnitCard>]) -> Option<Arc<UnitCard>> {
        let current = view.unit().map(|u| u.name().to_string()).unwrap_or_default();
        self.choose_from_units(view, &format!("Evolve {current}?"), candidates, true)
    }

    fn choose_attack(&mut self, view: &BattleView, unit: &UnitCard, options: &[AttackKind]) -> AttackKind {
        self.emit(&format!("\n{} attacks:", unit.name));
        for (idx, kind) in options.iter().enumerate() {
            let attack = unit.attack(*kind);
            self.emit(&format!("  [{idx}] {kind} {} ({} damage)", attack.name, attack.damage));
        }
        let prompt = format!("Choose attack (0-{}):", options.len().saturating_sub(1));
        self.get_user_choice(&prompt, options.len(), false, view)
            .and_then(|idx| options.get(idx).copied())
            .unwrap_or(AttackKind::C)
    }

    fn choose_support(&mut self, view: &BattleView, options: &[SupportOption]) -> SupportOption {
        self.emit("\nChoose a support:");
        for (idx, option) in options.iter().enumerate() {
            self.emit(&format!("  [{idx}] {option}"));
        }
        let prompt = format!("Choose support (0-{}):", options.len().saturating_sub(1));
        self.get_user_choice(&prompt, options.len(), false, view)
            .and_then(|idx| options.get(idx).cloned())
            .unwrap_or(SupportOption::Gamble)
    }
}
