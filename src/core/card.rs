//! Card types and definitions

use crate::core::{CardId, CardName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Unit level, which decides what a unit may evolve into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Rookie,
    Champion,
    Ultimate,
    Partner,
    Armor,
}

impl Level {
    /// Parse the single-letter level code used by card records.
    /// An empty code marks a partner unit.
    pub fn from_code(code: &str) -> Option<Level> {
        match code.trim().to_ascii_uppercase().as_str() {
            "R" => Some(Level::Rookie),
            "C" => Some(Level::Champion),
            "U" => Some(Level::Ultimate),
            "A" => Some(Level::Armor),
            "P" | "" => Some(Level::Partner),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Level::Rookie => "R",
            Level::Champion => "C",
            Level::Ultimate => "U",
            Level::Partner => "P",
            Level::Armor => "A",
        }
    }

    /// Levels a unit of this level may evolve into
    pub fn evolution_targets(&self) -> &'static [Level] {
        match self {
            Level::Rookie => &[Level::Champion],
            Level::Champion => &[Level::Ultimate],
            Level::Partner => &[Level::Champion, Level::Armor],
            Level::Ultimate | Level::Armor => &[],
        }
    }

    pub fn can_evolve_into(&self, target: Level) -> bool {
        self.evolution_targets().contains(&target)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Rookie => "Rookie",
            Level::Champion => "Champion",
            Level::Ultimate => "Ultimate",
            Level::Partner => "Partner",
            Level::Armor => "Armor",
        };
        write!(f, "{name}")
    }
}

/// The three attack buttons every unit has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    C,
    T,
    X,
}

impl AttackKind {
    pub const ALL: [AttackKind; 3] = [AttackKind::C, AttackKind::T, AttackKind::X];
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackKind::C => write!(f, "[C]"),
            AttackKind::T => write!(f, "[T]"),
            AttackKind::X => write!(f, "[X]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub damage: i32,
}

impl Attack {
    pub fn new(name: impl Into<String>, damage: i32) -> Self {
        Attack {
            name: name.into(),
            damage,
        }
    }
}

/// An attack with an optional effect description.
///
/// The effect is informational; the engine only applies the damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectAttack {
    #[serde(flatten)]
    pub attack: Attack,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

impl EffectAttack {
    pub fn new(name: impl Into<String>, damage: i32, effect: Option<String>) -> Self {
        EffectAttack {
            attack: Attack::new(name, damage),
            effect,
        }
    }
}

/// A non-unit card. Only its support text matters to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCard {
    pub id: CardId,
    pub name: CardName,
    pub support: String,
}

impl OptionCard {
    pub fn new(id: u32, name: impl Into<CardName>, support: impl Into<String>) -> Self {
        OptionCard {
            id: CardId::new(id),
            name: name.into(),
            support: support.into(),
        }
    }
}

/// A unit card definition as loaded from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCard {
    pub id: CardId,
    pub name: CardName,
    pub support: String,
    pub level: Level,
    pub specialty: String,
    pub hp: i32,
    pub dp: i32,
    pub pp: i32,
    pub c_attack: Attack,
    pub t_attack: Attack,
    pub x_attack: EffectAttack,
}

impl UnitCard {
    /// Create a unit with placeholder attacks; use the `with_*` methods to
    /// fill in the rest.
    pub fn new(id: u32, name: impl Into<CardName>, level: Level, hp: i32, dp: i32, pp: i32) -> Self {
        UnitCard {
            id: CardId::new(id),
            name: name.into(),
            support: String::new(),
            level,
            specialty: String::new(),
            hp,
            dp,
            pp,
            c_attack: Attack::new("C", 0),
            t_attack: Attack::new("T", 0),
            x_attack: EffectAttack::new("X", 0, None),
        }
    }

    pub fn with_attack(mut self, kind: AttackKind, name: impl Into<String>, damage: i32) -> Self {
        let attack = Attack::new(name, damage);
        match kind {
            AttackKind::C => self.c_attack = attack,
            AttackKind::T => self.t_attack = attack,
            AttackKind::X => self.x_attack.attack = attack,
        }
        self
    }

    pub fn with_x_effect(mut self, effect: impl Into<String>) -> Self {
        self.x_attack.effect = Some(effect.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = specialty.into();
        self
    }

    pub fn with_support(mut self, support: impl Into<String>) -> Self {
        self.support = support.into();
        self
    }

    pub fn attack(&self, kind: AttackKind) -> &Attack {
        match kind {
            AttackKind::C => &self.c_attack,
            AttackKind::T => &self.t_attack,
            AttackKind::X => &self.x_attack.attack,
        }
    }
}

/// Handle to a catalog card.
///
/// Cloning shares the catalog's allocation; cards are never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Option(Arc<OptionCard>),
    Unit(Arc<UnitCard>),
}

impl Card {
    pub fn id(&self) -> CardId {
        match self {
            Card::Option(card) => card.id,
            Card::Unit(card) => card.id,
        }
    }

    pub fn name(&self) -> &CardName {
        match self {
            Card::Option(card) => &card.name,
            Card::Unit(card) => &card.name,
        }
    }

    pub fn support(&self) -> &str {
        match self {
            Card::Option(card) => &card.support,
            Card::Unit(card) => &card.support,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Card::Unit(_))
    }

    pub fn as_unit(&self) -> Option<&Arc<UnitCard>> {
        match self {
            Card::Unit(unit) => Some(unit),
            Card::Option(_) => None,
        }
    }

    /// Identity comparison: true when both handles point at the same
    /// catalog entry
    pub fn same_card(&self, other: &Card) -> bool {
        match (self, other) {
            (Card::Option(a), Card::Option(b)) => Arc::ptr_eq(a, b),
            (Card::Unit(a), Card::Unit(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Option(card) => write!(f, "{}", card.name),
            Card::Unit(card) => write!(f, "{} ({}, {} HP)", card.name, card.level, card.hp),
        }
    }
}

impl From<UnitCard> for Card {
    fn from(unit: UnitCard) -> Self {
        Card::Unit(Arc::new(unit))
    }
}

impl From<Arc<UnitCard>> for Card {
    fn from(unit: Arc<UnitCard>) -> Self {
        Card::Unit(unit)
    }
}

impl From<OptionCard> for Card {
    fn from(card: OptionCard) -> Self {
        Card::Option(Arc::new(card))
    }
}
