//! Product line-item codec
//!
//! Products are stored as a single comma-joined string with six fields:
//! `classname,coefficient,maxStock,tradeQuantity,buyPrice,sellPrice`.
//! Fields are opaque text. Nothing is quoted or escaped, so a field that
//! contains a comma does not survive a round trip (files written by the
//! existing tooling depend on the unescaped form).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::product::{DELIMITER, FIELD_COUNT};

/// Decoded product line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductRecord {
    pub classname: String,
    pub coefficient: String,
    pub max_stock: String,
    pub trade_quantity: String,
    pub buy_price: String,
    pub sell_price: String,
}

/// Raw line split into fewer than six fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product line has {field_count} field(s), expected at least {}", FIELD_COUNT)]
pub struct InvalidRecord {
    pub field_count: usize,
}

impl ProductRecord {
    pub fn new(
        classname: impl Into<String>,
        coefficient: impl Into<String>,
        max_stock: impl Into<String>,
        trade_quantity: impl Into<String>,
        buy_price: impl Into<String>,
        sell_price: impl Into<String>,
    ) -> Self {
        Self {
            classname: classname.into(),
            coefficient: coefficient.into(),
            max_stock: max_stock.into(),
            trade_quantity: trade_quantity.into(),
            buy_price: buy_price.into(),
            sell_price: sell_price.into(),
        }
    }

    /// Fields in wire order
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            self.classname.as_str(),
            self.coefficient.as_str(),
            self.max_stock.as_str(),
            self.trade_quantity.as_str(),
            self.buy_price.as_str(),
            self.sell_price.as_str(),
        ]
    }
}

/// Split a raw product line.
/// Anything past the sixth field is dropped.
pub fn decode(raw: &str) -> Result<ProductRecord, InvalidRecord> {
    let parts: Vec<&str> = raw.split(DELIMITER).collect();
    if parts.len() < FIELD_COUNT {
        return Err(InvalidRecord {
            field_count: parts.len(),
        });
    }

    Ok(ProductRecord::new(
        parts[0], parts[1], parts[2], parts[3], parts[4], parts[5],
    ))
}

/// Join the six fields with the delimiter, in fixed order
pub fn encode(record: &ProductRecord) -> String {
    record.fields().join(DELIMITER.to_string().as_str())
}

/// Classname of a raw line, without requiring a full decode
pub fn classname_of(raw: &str) -> &str {
    raw.split(DELIMITER).next().unwrap_or(raw)
}

impl FromStr for ProductRecord {
    type Err = InvalidRecord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}
