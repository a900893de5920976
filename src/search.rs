//! Substring search over the loaded document
//!
//! Re-run on every query change; there is no ranking and no caching. Results
//! keep collection order and non-matching entities are left out.

use crate::codec::{self, ProductRecord};
use crate::constants::{display, product};
use crate::document::{Category, Document, Trader, TraderIdEntry};

/// Borrowed entity in a search result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Category(&'a Category),
    Trader(&'a Trader),
    IdEntry(&'a TraderIdEntry),
}

/// One row of a filtered view
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    /// Position in the document's collection
    pub index: usize,
    pub entity: EntityRef<'a>,
    /// Query found in the entity's own label
    pub label_match: bool,
    /// Query found in one of the category's product lines
    pub nested_match: bool,
    /// First matching product line, for the summary column
    pub first_nested: Option<ProductRecord>,
}

/// Trim and lower-case a raw query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Filter the document's collection by `query` (case-insensitive).
/// An empty query returns every entity with no match flags set.
pub fn search<'a>(document: &'a Document, query: &str) -> Vec<SearchHit<'a>> {
    let query = normalize_query(query);

    match document {
        Document::Price(config) => config
            .categories
            .iter()
            .enumerate()
            .filter_map(|(index, category)| match_category(index, category, &query))
            .collect(),
        Document::General(config) => config
            .traders
            .iter()
            .enumerate()
            .filter_map(|(index, trader)| {
                let label_match = !query.is_empty() && trader_label_matches(trader, &query);
                (query.is_empty() || label_match).then(|| SearchHit {
                    index,
                    entity: EntityRef::Trader(trader),
                    label_match,
                    nested_match: false,
                    first_nested: None,
                })
            })
            .collect(),
        Document::Ids(config) => config
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let label_match = !query.is_empty() && id_entry_label_matches(entry, &query);
                (query.is_empty() || label_match).then(|| SearchHit {
                    index,
                    entity: EntityRef::IdEntry(entry),
                    label_match,
                    nested_match: false,
                    first_nested: None,
                })
            })
            .collect(),
        Document::Unknown(_) => Vec::new(),
    }
}

fn match_category<'a>(index: usize, category: &'a Category, query: &str) -> Option<SearchHit<'a>> {
    if query.is_empty() {
        return Some(SearchHit {
            index,
            entity: EntityRef::Category(category),
            label_match: false,
            nested_match: false,
            first_nested: None,
        });
    }

    let label_match = category.name.to_lowercase().contains(query);
    let first_nested = category
        .products
        .iter()
        .find(|raw| product_line_matches(raw, query))
        .and_then(|raw| codec::decode(raw).ok());
    let nested_match = first_nested.is_some();

    (label_match || nested_match).then(|| SearchHit {
        index,
        entity: EntityRef::Category(category),
        label_match,
        nested_match,
        first_nested,
    })
}

/// Malformed lines (fewer than six fields) never match
fn product_line_matches(raw: &str, query: &str) -> bool {
    raw.split(product::DELIMITER).count() >= product::FIELD_COUNT
        && raw.to_lowercase().contains(query)
}

fn trader_label_matches(trader: &Trader, query: &str) -> bool {
    trader.given_name.to_lowercase().contains(query)
        || trader.role.to_lowercase().contains(query)
        || trader.id.to_string().contains(query)
}

fn id_entry_label_matches(entry: &TraderIdEntry, query: &str) -> bool {
    entry.id.to_string().contains(query)
        || entry
            .categories
            .iter()
            .any(|name| name.to_lowercase().contains(query))
}

impl SearchHit<'_> {
    /// Whether the row should be highlighted as a search hit
    pub fn is_hit(&self) -> bool {
        self.label_match || self.nested_match
    }

    /// Primary column text, marked when the row is a hit
    pub fn title(&self) -> String {
        let label = match self.entity {
            EntityRef::Category(category) => category.name.clone(),
            EntityRef::Trader(trader) => trader.given_name.clone(),
            EntityRef::IdEntry(entry) => format!("ID: {}", entry.id),
        };
        if self.is_hit() {
            format!("{label}{}", display::HIT_MARKER)
        } else {
            label
        }
    }

    /// Secondary column text
    pub fn summary(&self) -> String {
        match self.entity {
            EntityRef::Category(category) => match &self.first_nested {
                Some(record) => format!(
                    "{} | Buy:{} | Sell:{}",
                    record.classname, record.buy_price, record.sell_price
                ),
                None => format!("Products: {}", category.products.len()),
            },
            EntityRef::Trader(trader) => format!("ID: {} | Role: {}", trader.id, trader.role),
            EntityRef::IdEntry(entry) => format!("Categories: {}", entry.categories.len()),
        }
    }
}

/// Row of the per-category product list
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    /// Position in `Category::products`
    pub index: usize,
    pub record: ProductRecord,
    pub is_hit: bool,
}

/// Products of one category filtered by a query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductView {
    pub rows: Vec<ProductRow>,
    /// Row to select initially
    pub first_hit: Option<usize>,
}

/// Decoded products of `category`. With a non-empty query only matching
/// lines are kept. Malformed lines are always skipped.
pub fn filter_products(category: &Category, query: &str) -> ProductView {
    let query = normalize_query(query);

    let rows: Vec<ProductRow> = category
        .records()
        .filter_map(|(index, record)| {
            if query.is_empty() {
                return Some(ProductRow {
                    index,
                    record,
                    is_hit: false,
                });
            }
            codec::encode(&record)
                .to_lowercase()
                .contains(&query)
                .then_some(ProductRow {
                    index,
                    record,
                    is_hit: true,
                })
        })
        .collect();

    let first_hit = rows.iter().position(|row| row.is_hit);
    ProductView { rows, first_hit }
}
