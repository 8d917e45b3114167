//! Error types for the battle simulator

use crate::core::Level;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DcbError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("Cannot draw from an empty deck")]
    DeckEmpty,

    #[error("Card not in hand: {0}")]
    CardNotInHand(String),

    #[error("Not a unit card: {0}")]
    NotAUnit(String),

    #[error("Hand index {index} out of range (hand size {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No active unit")]
    NoActiveUnit,

    #[error("A unit is already active")]
    UnitAlreadyActive,

    #[error("DP stack is empty")]
    StackEmpty,

    #[error("{from} cannot evolve into {to}")]
    InvalidEvolution { from: Level, to: Level },

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, DcbError>;
