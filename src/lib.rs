//! DCB Sim - battle engine for the Digital Card Battle card game
//!
//! Two players each bring a deck, draw a hand, put a unit into play and
//! trade attacks until one unit falls. The engine is built around a
//! short-circuiting Prep/Upgrade/Battle phase pipeline with pluggable
//! controllers making every decision.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;
pub mod zones;

pub use error::{DcbError, Result};
