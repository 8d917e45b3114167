//! Card catalog and decklist loaders
//!
//! Both formats are JSON: the catalog is an array of card records, a
//! decklist is an array of card names.

pub mod catalog;
pub mod deck;

pub use catalog::{CardCatalog, CardRecord, CatalogCell};
pub use deck::{DeckList, DeckLoader};
