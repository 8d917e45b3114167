//! Core battle types: cards, fields and players

pub mod card;
pub mod field;
pub mod player;
pub mod types;

pub use card::{Attack, AttackKind, Card, EffectAttack, Level, OptionCard, UnitCard};
pub use field::{ActiveUnit, CardPick, Field, Hand, HAND_SIZE};
pub use player::Player;
pub use types::{card_key, CardId, CardName, PlayerName};
