//! Card catalog for looking up card definitions
//!
//! The catalog is built once from a list of card records and never changes
//! afterwards. Decks and fields hold shared handles into it.

use crate::core::{card_key, Attack, Card, CardId, CardName, EffectAttack, Level, OptionCard, UnitCard};
use crate::{DcbError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// A card as it appears in a catalog file.
///
/// A record describes a unit card iff it carries a `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub support: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_attack: Option<Attack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_attack: Option<Attack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_attack: Option<EffectAttack>,
}

impl CardRecord {
    pub fn is_unit(&self) -> bool {
        self.level.is_some()
    }

    /// Convert the record into a card
    pub fn into_card(self) -> Result<Card> {
        if self.name.trim().is_empty() {
            return Err(DcbError::CatalogLoad(format!("card {} has an empty name", self.id)));
        }

        let Some(code) = self.level else {
            return Ok(OptionCard {
                id: CardId::new(self.id),
                name: CardName::new(self.name),
                support: self.support,
            }
            .into());
        };

        let name = self.name;
        let missing = |field: &str| DcbError::CatalogLoad(format!("unit record `{name}` is missing `{field}`"));
        let level = Level::from_code(&code)
            .ok_or_else(|| DcbError::CatalogLoad(format!("unit record `{name}` has unknown level code `{code}`")))?;

        let unit = UnitCard {
            id: CardId::new(self.id),
            support: self.support,
            level,
            specialty: self.specialty.unwrap_or_default(),
            hp: self.hp.ok_or_else(|| missing("hp"))?,
            dp: self.dp.ok_or_else(|| missing("dp"))?,
            pp: self.pp.ok_or_else(|| missing("pp"))?,
            c_attack: self.c_attack.ok_or_else(|| missing("c_attack"))?,
            t_attack: self.t_attack.ok_or_else(|| missing("t_attack"))?,
            x_attack: self.x_attack.ok_or_else(|| missing("x_attack"))?,
            name: CardName::new(name.clone()),
        };

        // Stats and attack damage are never negative
        let values = [
            ("hp", unit.hp),
            ("dp", unit.dp),
            ("pp", unit.pp),
            ("c_attack", unit.c_attack.damage),
            ("t_attack", unit.t_attack.damage),
            ("x_attack", unit.x_attack.attack.damage),
        ];
        if let Some((field, value)) = values.into_iter().find(|(_, value)| *value < 0) {
            return Err(DcbError::CatalogLoad(format!(
                "unit record `{name}` has negative value {value} for `{field}`"
            )));
        }
        Ok(unit.into())
    }
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        match card {
            Card::Option(option) => CardRecord {
                id: option.id.as_u32(),
                name: option.name.to_string(),
                support: option.support.clone(),
                level: None,
                specialty: None,
                hp: None,
                dp: None,
                pp: None,
                c_attack: None,
                t_attack: None,
                x_attack: None,
            },
            Card::Unit(unit) => CardRecord {
                id: unit.id.as_u32(),
                name: unit.name.to_string(),
                support: unit.support.clone(),
                level: Some(unit.level.code().to_string()),
                specialty: Some(unit.specialty.clone()),
                hp: Some(unit.hp),
                dp: Some(unit.dp),
                pp: Some(unit.pp),
                c_attack: Some(unit.c_attack.clone()),
                t_attack: Some(unit.t_attack.clone()),
                x_attack: Some(unit.x_attack.clone()),
            },
        }
    }
}

/// Read-only registry of every known card, keyed by lowercase name
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: FxHashMap<String, Card>,
}

impl CardCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from card records. Duplicate names are rejected.
    pub fn load(records: impl IntoIterator<Item = CardRecord>) -> Result<Self> {
        let mut catalog = CardCatalog::new();
        for record in records {
            let card = record.into_card()?;
            let key = card.name().key();
            if catalog.cards.contains_key(&key) {
                return Err(DcbError::CatalogLoad(format!("duplicate card name `{}`", card.name())));
            }
            catalog.cards.insert(key, card);
        }
        Ok(catalog)
    }

    /// Parse a JSON array of card records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CardRecord> =
            serde_json::from_str(json).map_err(|e| DcbError::CatalogLoad(e.to_string()))?;
        Self::load(records)
    }

    /// Load a JSON catalog file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Add a single card, replacing any card with the same name
    pub fn add_card(&mut self, card: Card) {
        self.cards.insert(card.name().key(), card);
    }

    /// Look up a card by name (case-insensitive)
    pub fn get(&self, name: &str) -> Result<Card> {
        self.cards
            .get(&card_key(name))
            .cloned()
            .ok_or_else(|| DcbError::CardNotFound(name.to_string()))
    }

    /// Look up several cards, preserving order. Fails on the first unknown
    /// name.
    pub fn get_many<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Card>> {
        names.iter().map(|name| self.get(name.as_ref())).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&card_key(name))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All cards, ordered by card id
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by_key(|card| card.id());
        cards.into_iter()
    }

    /// Serialize the catalog back into a JSON array of records
    pub fn to_json_string(&self) -> Result<String> {
        let records: Vec<CardRecord> = self.iter().map(CardRecord::from).collect();
        serde_json::to_string_pretty(&records).map_err(|e| DcbError::SerializationError(e.to_string()))
    }
}

/// Load-once holder for a process-wide catalog.
///
/// The loader runs at most once per successful load: concurrent callers
/// wait for the first one and all get the same `Arc`. A failed load leaves
/// the cell empty so a later call can retry.
#[derive(Debug, Default)]
pub struct CatalogCell {
    cell: OnceLock<Arc<CardCatalog>>,
    loading: Mutex<()>,
}

impl CatalogCell {
    pub const fn new() -> Self {
        CatalogCell {
            cell: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<&Arc<CardCatalog>> {
        self.cell.get()
    }

    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<CardCatalog>>
    where
        F: FnOnce() -> Result<CardCatalog>,
    {
        if let Some(catalog) = self.cell.get() {
            return Ok(catalog.clone());
        }

        // The lock guards no data, so a poisoned lock is still usable
        let _guard = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = self.cell.get() {
            return Ok(catalog.clone());
        }
        let loaded = Arc::new(load()?);
        Ok(self.cell.get_or_init(|| loaded).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "name": "Agumon",
            "support": "Own attack +10",
            "level": "R",
            "specialty": "Fire",
            "hp": 450,
            "dp": 0,
            "pp": 1,
            "c_attack": {"name": "Spitfire", "damage": 300},
            "t_attack": {"name": "Claw Attack", "damage": 240},
            "x_attack": {"name": "Counter", "damage": 0, "effect": "Counter attack"}
        },
        {"id": 301, "name": "Recovery Floppy", "support": "Recover 300 HP"}
    ]"#;

    #[test]
    fn test_empty_catalog() {
        let catalog = CardCatalog::new();
        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
        assert!(matches!(catalog.get("Agumon"), Err(DcbError::CardNotFound(_))));
    }

    #[test]
    fn test_load_records() {
        let catalog = CardCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);

        let agumon = catalog.get("agumon").unwrap();
        let unit = agumon.as_unit().unwrap();
        assert_eq!(unit.level, Level::Rookie);
        assert_eq!(unit.hp, 450);
        assert_eq!(unit.c_attack.damage, 300);
        assert_eq!(unit.x_attack.effect.as_deref(), Some("Counter attack"));

        let floppy = catalog.get("RECOVERY FLOPPY").unwrap();
        assert!(!floppy.is_unit());
        assert_eq!(floppy.support(), "Recover 300 HP");
    }

    #[test]
    fn test_lookups_share_catalog_entry() {
        let catalog = CardCatalog::from_json_str(SAMPLE).unwrap();
        let a = catalog.get("Agumon").unwrap();
        let b = catalog.get("agumon").unwrap();
        assert!(a.same_card(&b));
    }

    #[test]
    fn test_get_many_preserves_order_and_fails_on_miss() {
        let catalog = CardCatalog::from_json_str(SAMPLE).unwrap();
        let cards = catalog.get_many(&["Recovery Floppy", "Agumon", "agumon"]).unwrap();
        let names: Vec<&str> = cards.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, ["Recovery Floppy", "Agumon", "Agumon"]);

        let result = catalog.get_many(&["Agumon", "Nope", "Alsonope"]);
        assert!(matches!(result, Err(DcbError::CardNotFound(name)) if name == "Nope"));
    }

    #[test]
    fn test_malformed_records() {
        let missing_hp = r#"[{"id": 1, "name": "Agumon", "level": "R", "dp": 0, "pp": 1,
            "c_attack": {"name": "a", "damage": 1},
            "t_attack": {"name": "b", "damage": 1},
            "x_attack": {"name": "c", "damage": 1}}]"#;
        assert!(matches!(CardCatalog::from_json_str(missing_hp), Err(DcbError::CatalogLoad(_))));

        let bad_level = r#"[{"id": 1, "name": "Agumon", "level": "Q"}]"#;
        assert!(matches!(CardCatalog::from_json_str(bad_level), Err(DcbError::CatalogLoad(_))));

        assert!(matches!(CardCatalog::from_json_str("{not json"), Err(DcbError::CatalogLoad(_))));

        let duplicate = r#"[{"id": 1, "name": "Trap"}, {"id": 2, "name": "TRAP"}]"#;
        assert!(matches!(CardCatalog::from_json_str(duplicate), Err(DcbError::CatalogLoad(_))));
    }

    #[test]
    fn test_negative_stats_are_rejected() {
        let healer = r#"[{"id": 1, "name": "Healer", "level": "R", "hp": 100, "dp": 0, "pp": 1,
            "c_attack": {"name": "Heal", "damage": -10},
            "t_attack": {"name": "b", "damage": 1},
            "x_attack": {"name": "c", "damage": 1}}]"#;
        match CardCatalog::from_json_str(healer) {
            Err(DcbError::CatalogLoad(message)) => assert!(message.contains("c_attack"), "{message}"),
            other => panic!("expected CatalogLoad, got {other:?}"),
        }

        let negative_hp = r#"[{"id": 1, "name": "Ghost", "level": "R", "hp": -1, "dp": 0, "pp": 1,
            "c_attack": {"name": "a", "damage": 1},
            "t_attack": {"name": "b", "damage": 1},
            "x_attack": {"name": "c", "damage": 1}}]"#;
        assert!(matches!(CardCatalog::from_json_str(negative_hp), Err(DcbError::CatalogLoad(_))));
    }

    #[test]
    fn test_json_dump_reloads() {
        let catalog = CardCatalog::from_json_str(SAMPLE).unwrap();
        let dumped = catalog.to_json_string().unwrap();
        let reloaded = CardCatalog::from_json_str(&dumped).unwrap();

        assert_eq!(reloaded.len(), catalog.len());
        assert_eq!(reloaded.get("Agumon").unwrap(), catalog.get("Agumon").unwrap());
    }

    #[test]
    fn test_catalog_cell_loads_once() {
        let cell = CatalogCell::new();
        assert!(cell.get().is_none());

        let first = cell.get_or_load(|| CardCatalog::from_json_str(SAMPLE)).unwrap();
        let second = cell
            .get_or_load(|| panic!("catalog must not be loaded twice"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_catalog_cell_failed_load_can_retry() {
        let cell = CatalogCell::new();
        assert!(cell
            .get_or_load(|| Err(DcbError::CatalogLoad("boom".to_string())))
            .is_err());
        assert!(cell.get().is_none());
        assert!(cell.get_or_load(|| CardCatalog::from_json_str(SAMPLE)).is_ok());
    }

    #[test]
    fn test_catalog_cell_concurrent_callers_load_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Barrier;

        let cell = CatalogCell::new();
        let loads = AtomicUsize::new(0);
        let barrier = Barrier::new(8);
        let loaded: Vec<Arc<CardCatalog>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cell.get_or_load(|| {
                            loads.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            CardCatalog::from_json_str(SAMPLE)
                        })
                        .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        for catalog in &loaded {
            assert!(Arc::ptr_eq(catalog, &loaded[0]));
        }
    }
}
