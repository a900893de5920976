//! Typed view over a loaded configuration document
//!
//! A document is one of three variants, picked once from its top-level keys:
//! - **PriceConfig** (`TraderCategories`): categories of encoded product lines
//! - **GeneralConfig** (`Traders`): trader NPC definitions
//! - **IDsConfig** (`IDs`): trader id to category name mappings
//!
//! Anything else is kept as an inert `Unknown` document so that nothing is
//! ever dropped on save.

mod entities;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub use entities::{Category, Trader, TraderIdEntry, Vec3};

use crate::constants::{discriminator, json};
use crate::error::{EditorError, Result};

/// Document kind, decided by the first discriminator key present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Price,
    General,
    Ids,
    Unknown,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Price => "PriceConfig",
            Variant::General => "GeneralConfig",
            Variant::Ids => "IDsConfig",
            Variant::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classify raw JSON. Checks `TraderCategories`, then `Traders`, then `IDs`;
/// the first key present wins.
pub fn classify(raw: &Value) -> Variant {
    let Some(object) = raw.as_object() else {
        return Variant::Unknown;
    };

    if object.contains_key(discriminator::TRADER_CATEGORIES) {
        Variant::Price
    } else if object.contains_key(discriminator::TRADERS) {
        Variant::General
    } else if object.contains_key(discriminator::IDS) {
        Variant::Ids
    } else {
        Variant::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    #[serde(rename = "TraderCategories")]
    pub categories: Vec<Category>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(rename = "Traders")]
    pub traders: Vec<Trader>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsConfig {
    #[serde(rename = "IDs")]
    pub entries: Vec<TraderIdEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A loaded document. The variant never changes after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Price(PriceConfig),
    General(GeneralConfig),
    Ids(IdsConfig),
    /// Parsed JSON with no discriminator key; read-only
    Unknown(Value),
}

/// Identity used to select an entity. Each variant has exactly one key kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    /// `Category.name`
    CategoryName(String),
    /// `Trader.given_name`
    GivenName(String),
    /// `TraderIdEntry.id`
    TraderId(i64),
}

impl EntityKey {
    /// Variant whose entities this key selects
    pub fn variant(&self) -> Variant {
        match self {
            EntityKey::CategoryName(_) => Variant::Price,
            EntityKey::GivenName(_) => Variant::General,
            EntityKey::TraderId(_) => Variant::Ids,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::CategoryName(name) => write!(f, "category '{name}'"),
            EntityKey::GivenName(name) => write!(f, "trader '{name}'"),
            EntityKey::TraderId(id) => write!(f, "trader id {id}"),
        }
    }
}

/// Full value of one entity, used for replacement and removal results
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Category(Category),
    Trader(Trader),
    IdEntry(TraderIdEntry),
}

impl Entity {
    pub fn variant(&self) -> Variant {
        match self {
            Entity::Category(_) => Variant::Price,
            Entity::Trader(_) => Variant::General,
            Entity::IdEntry(_) => Variant::Ids,
        }
    }
}

/// Parse and classify raw bytes. I/O stays with the caller.
pub fn load_document(bytes: &[u8]) -> Result<Document> {
    let raw: Value = serde_json::from_slice(bytes).map_err(|e| EditorError::Load {
        path: None,
        reason: e.to_string(),
    })?;
    Document::from_value(raw)
}

/// Pretty JSON, 4-space indent, non-ASCII written literally
pub fn serialize_document(document: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(json::INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    Ok(buf)
}

fn shape_error(variant: Variant, err: serde_json::Error) -> EditorError {
    EditorError::Load {
        path: None,
        reason: format!("malformed {variant}: {err}"),
    }
}

impl Document {
    /// Wrap parsed JSON in the variant picked by [`classify`]
    pub fn from_value(raw: Value) -> Result<Self> {
        let variant = classify(&raw);
        debug!(%variant, "classified document");
        let document = match variant {
            Variant::Price => Document::Price(
                serde_json::from_value(raw).map_err(|e| shape_error(variant, e))?,
            ),
            Variant::General => Document::General(
                serde_json::from_value(raw).map_err(|e| shape_error(variant, e))?,
            ),
            Variant::Ids => Document::Ids(
                serde_json::from_value(raw).map_err(|e| shape_error(variant, e))?,
            ),
            Variant::Unknown => Document::Unknown(raw),
        };
        Ok(document)
    }

    /// Empty document of the given variant
    pub fn empty(variant: Variant) -> Self {
        match variant {
            Variant::Price => Document::Price(PriceConfig {
                categories: Vec::new(),
                extra: Map::new(),
            }),
            Variant::General => Document::General(GeneralConfig {
                traders: Vec::new(),
                extra: Map::new(),
            }),
            Variant::Ids => Document::Ids(IdsConfig {
                entries: Vec::new(),
                extra: Map::new(),
            }),
            Variant::Unknown => Document::Unknown(Value::Object(Map::new())),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Document::Price(_) => Variant::Price,
            Document::General(_) => Variant::General,
            Document::Ids(_) => Variant::Ids,
            Document::Unknown(_) => Variant::Unknown,
        }
    }

    /// Non-fatal notice to show after loading, if any
    pub fn notice(&self) -> Option<EditorError> {
        matches!(self, Document::Unknown(_)).then_some(EditorError::UnknownVariant)
    }

    /// Number of top-level entities
    pub fn len(&self) -> usize {
        match self {
            Document::Price(c) => c.categories.len(),
            Document::General(c) => c.traders.len(),
            Document::Ids(c) => c.entries.len(),
            Document::Unknown(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> Option<&[Category]> {
        match self {
            Document::Price(c) => Some(&c.categories),
            _ => None,
        }
    }

    pub fn traders(&self) -> Option<&[Trader]> {
        match self {
            Document::General(c) => Some(&c.traders),
            _ => None,
        }
    }

    pub fn id_entries(&self) -> Option<&[TraderIdEntry]> {
        match self {
            Document::Ids(c) => Some(&c.entries),
            _ => None,
        }
    }

    /// Error for an operation that needs `expected`. Inert documents report
    /// `NoDocumentLoaded`.
    pub(crate) fn mismatch(&self, expected: Variant) -> EditorError {
        match self.variant() {
            Variant::Unknown => EditorError::NoDocumentLoaded,
            found => EditorError::VariantMismatch { expected, found },
        }
    }

    pub fn categories_mut(&mut self) -> Result<&mut Vec<Category>> {
        match self {
            Document::Price(c) => Ok(&mut c.categories),
            other => Err(other.mismatch(Variant::Price)),
        }
    }

    pub fn traders_mut(&mut self) -> Result<&mut Vec<Trader>> {
        match self {
            Document::General(c) => Ok(&mut c.traders),
            other => Err(other.mismatch(Variant::General)),
        }
    }

    pub fn id_entries_mut(&mut self) -> Result<&mut Vec<TraderIdEntry>> {
        match self {
            Document::Ids(c) => Ok(&mut c.entries),
            other => Err(other.mismatch(Variant::Ids)),
        }
    }

    /// Append a category with no products. Returns its index.
    pub fn add_category(&mut self, name: impl Into<String>) -> Result<usize> {
        let categories = self.categories_mut()?;
        categories.push(Category::new(name));
        Ok(categories.len() - 1)
    }

    pub fn add_trader(&mut self, trader: Trader) -> Result<usize> {
        let traders = self.traders_mut()?;
        traders.push(trader);
        Ok(traders.len() - 1)
    }

    pub fn add_id_entry(&mut self, entry: TraderIdEntry) -> Result<usize> {
        let entries = self.id_entries_mut()?;
        entries.push(entry);
        Ok(entries.len() - 1)
    }

    /// Index of the first entity matching `key`
    pub fn position(&self, key: &EntityKey) -> Result<Option<usize>> {
        let index = match (self, key) {
            (Document::Price(c), EntityKey::CategoryName(name)) => {
                c.categories.iter().position(|cat| &cat.name == name)
            }
            (Document::General(c), EntityKey::GivenName(name)) => {
                c.traders.iter().position(|t| &t.given_name == name)
            }
            (Document::Ids(c), EntityKey::TraderId(id)) => {
                c.entries.iter().position(|e| e.id == *id)
            }
            (other, key) => return Err(other.mismatch(key.variant())),
        };
        Ok(index)
    }

    /// Remove the first entity matching `key`. Later duplicates stay.
    pub fn delete_entity(&mut self, key: &EntityKey) -> Result<Option<Entity>> {
        let Some(index) = self.position(key)? else {
            return Ok(None);
        };

        let removed = match self {
            Document::Price(c) => Entity::Category(c.categories.remove(index)),
            Document::General(c) => Entity::Trader(c.traders.remove(index)),
            Document::Ids(c) => Entity::IdEntry(c.entries.remove(index)),
            // position() already rejected inert documents
            Document::Unknown(_) => return Err(EditorError::NoDocumentLoaded),
        };
        Ok(Some(removed))
    }

    /// Replace the first entity matching `key` in place. Returns its index.
    pub fn update_entity(&mut self, key: &EntityKey, value: Entity) -> Result<Option<usize>> {
        if value.variant() != key.variant() {
            return Err(EditorError::VariantMismatch {
                expected: key.variant(),
                found: value.variant(),
            });
        }

        let Some(index) = self.position(key)? else {
            return Ok(None);
        };

        match (self, value) {
            (Document::Price(c), Entity::Category(category)) => c.categories[index] = category,
            (Document::General(c), Entity::Trader(trader)) => c.traders[index] = trader,
            (Document::Ids(c), Entity::IdEntry(entry)) => c.entries[index] = entry,
            (other, value) => return Err(other.mismatch(value.variant())),
        }
        Ok(Some(index))
    }

    /// First category with this name
    pub fn category_mut(&mut self, name: &str) -> Result<Option<&mut Category>> {
        Ok(self.categories_mut()?.iter_mut().find(|c| c.name == name))
    }
}
