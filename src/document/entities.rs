//! Entity types stored in the three document variants
//!
//! Wire field names are fixed by the mod's file format. Every key that is not
//! modelled here lands in `extra` and is written back unchanged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::codec::{self, ProductRecord};
use crate::constants::passthrough;

/// Named group of products in a price catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "CategoryName")]
    pub name: String,

    /// Encoded product lines, display order
    #[serde(rename = "Products", default)]
    pub products: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            products: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Decoded products with their position in `products`.
    /// Lines with fewer than six fields are skipped.
    pub fn records(&self) -> impl Iterator<Item = (usize, ProductRecord)> + '_ {
        self.products
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| codec::decode(raw).ok().map(|record| (idx, record)))
    }

    /// Index of the first product line whose classname matches
    pub fn product_position(&self, classname: &str) -> Option<usize> {
        self.products
            .iter()
            .position(|raw| codec::classname_of(raw) == classname)
    }
}

/// Trader NPC definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    #[serde(rename = "Id", default)]
    pub id: i64,

    /// Object classname of the NPC
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "GivenName", default)]
    pub given_name: String,

    #[serde(rename = "Role", default)]
    pub role: String,

    #[serde(rename = "Position", default)]
    pub position: Vec3,

    #[serde(rename = "Orientation", default)]
    pub orientation: Vec3,

    /// Clothes and anything else the editor does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trader {
    /// New trader at the origin with an empty clothes list
    pub fn with_defaults(
        id: i64,
        name: impl Into<String>,
        given_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        let mut extra = Map::new();
        extra.insert(passthrough::CLOTHES.to_string(), Value::Array(Vec::new()));
        Self {
            id,
            name: name.into(),
            given_name: given_name.into(),
            role: role.into(),
            position: Vec3::zero(),
            orientation: Vec3::zero(),
            extra,
        }
    }
}

/// Mapping from a trader id to the categories it sells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderIdEntry {
    #[serde(rename = "Id", default)]
    pub id: i64,

    /// Category names; never checked against a price catalog
    #[serde(rename = "Categories", default)]
    pub categories: Vec<String>,

    /// Licences, currencies and other unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TraderIdEntry {
    /// New entry with empty category, licence and currency lists
    pub fn with_defaults(id: i64) -> Self {
        let mut extra = Map::new();
        extra.insert(
            passthrough::LICENCES_REQUIRED.to_string(),
            Value::Array(Vec::new()),
        );
        extra.insert(
            passthrough::CURRENCIES_ACCEPTED.to_string(),
            Value::Array(Vec::new()),
        );
        Self {
            id,
            categories: Vec::new(),
            extra,
        }
    }
}

/// Three-component vector (position or orientation)
///
/// Components are kept as JSON numbers so untouched values are written back
/// with their original integer or float spelling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Vec3(pub [Number; 3]);

impl Vec3 {
    /// `[0, 0, 0]` with integer components
    pub fn zero() -> Self {
        Self([Number::from(0), Number::from(0), Number::from(0)])
    }

    /// Returns None when any component is NaN or infinite
    pub fn from_f64(components: [f64; 3]) -> Option<Self> {
        let [x, y, z] = components;
        Some(Self([
            Number::from_f64(x)?,
            Number::from_f64(y)?,
            Number::from_f64(z)?,
        ]))
    }

    pub fn components(&self) -> [f64; 3] {
        let [x, y, z] = &self.0;
        [
            x.as_f64().unwrap_or(0.0),
            y.as_f64().unwrap_or(0.0),
            z.as_f64().unwrap_or(0.0),
        ]
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// Space separated, as shown in edit forms
impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = &self.0;
        write!(f, "{x} {y} {z}")
    }
}

/// Accepts any numeric array. Missing components are filled with 0,
/// components past the third are ignored. Either case is logged since the
/// next save writes the reshaped vector.
impl<'de> Deserialize<'de> for Vec3 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let numbers = Vec::<Number>::deserialize(deserializer)?;
        if numbers.len() != 3 {
            warn!(
                components = numbers.len(),
                "vector does not have 3 components, it will be saved as 3"
            );
        }
        let mut components = numbers.into_iter();
        let mut next = || components.next().unwrap_or_else(|| Number::from(0));
        Ok(Self([next(), next(), next()]))
    }
}
