//! Edit forms: raw user text in, validated entities out
//!
//! Text fields must be non-empty after trimming. Numeric fields are lenient:
//! an id that does not parse becomes `0` and a vector that does not parse
//! becomes `[0, 0, 0]`. Files saved by earlier tooling rely on that.

use tracing::warn;

use crate::codec::ProductRecord;
use crate::config::TraderTemplate;
use crate::document::{Trader, TraderIdEntry, Vec3};
use crate::error::{EditorError, Result};

fn required(field: &'static str, text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EditorError::ValidationFailed { field });
    }
    Ok(trimmed.to_string())
}

/// Validated category name
pub fn category_name(text: &str) -> Result<String> {
    required("CategoryName", text)
}

/// Integer id, `0` when the text is not an integer
pub fn parse_id(text: &str) -> i64 {
    text.trim().parse().unwrap_or_else(|_| {
        warn!(input = %text, "id is not an integer, using 0");
        0
    })
}

/// Three numbers separated by whitespace or commas, `[0, 0, 0]` otherwise.
/// Extra components are ignored.
pub fn parse_vec3(text: &str) -> Vec3 {
    let parts: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();

    let parsed = match parts.as_slice() {
        [x, y, z, ..] => match (x.parse::<f64>(), y.parse::<f64>(), z.parse::<f64>()) {
            (Ok(x), Ok(y), Ok(z)) => Vec3::from_f64([x, y, z]),
            _ => None,
        },
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        warn!(input = %text, "vector is not three finite numbers, using [0, 0, 0]");
        Vec3::zero()
    })
}

/// Keep the original spelling when the text was not edited
fn vec3_field(text: &str, current: &Vec3) -> Vec3 {
    if text.trim() == current.to_string() {
        current.clone()
    } else {
        parse_vec3(text)
    }
}

/// Trader edit form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraderForm {
    pub id: String,
    pub name: String,
    pub given_name: String,
    pub role: String,
    /// `x y z`
    pub position: String,
    /// `x y z`
    pub orientation: String,
}

impl TraderForm {
    /// Prefilled form for a new trader
    pub fn template(next_id: usize, template: &TraderTemplate) -> Self {
        Self::from_trader(&Trader::with_defaults(
            next_id as i64,
            &template.name,
            &template.given_name,
            &template.role,
        ))
    }

    pub fn from_trader(trader: &Trader) -> Self {
        Self {
            id: trader.id.to_string(),
            name: trader.name.clone(),
            given_name: trader.given_name.clone(),
            role: trader.role.clone(),
            position: trader.position.to_string(),
            orientation: trader.orientation.to_string(),
        }
    }

    /// Validate and write the form over `base`. Passthrough fields of `base`
    /// are kept.
    pub fn apply(&self, base: Trader) -> Result<Trader> {
        let name = required("Name", &self.name)?;
        let given_name = required("GivenName", &self.given_name)?;
        let role = required("Role", &self.role)?;

        Ok(Trader {
            id: parse_id(&self.id),
            name,
            given_name,
            role,
            position: vec3_field(&self.position, &base.position),
            orientation: vec3_field(&self.orientation, &base.orientation),
            extra: base.extra,
        })
    }
}

/// Trader id entry edit form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdEntryForm {
    pub id: String,
    /// One category name per line
    pub categories: String,
}

impl IdEntryForm {
    pub fn template(next_id: usize) -> Self {
        Self::from_entry(&TraderIdEntry::with_defaults(next_id as i64))
    }

    pub fn from_entry(entry: &TraderIdEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            categories: entry.categories.join("\n"),
        }
    }

    /// Blank lines are dropped, names are trimmed
    pub fn apply(&self, base: TraderIdEntry) -> TraderIdEntry {
        let categories = self
            .categories
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        TraderIdEntry {
            id: parse_id(&self.id),
            categories,
            extra: base.extra,
        }
    }
}

/// Product edit form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductForm {
    pub classname: String,
    pub coefficient: String,
    pub max_stock: String,
    pub trade_quantity: String,
    pub buy_price: String,
    pub sell_price: String,
}

impl ProductForm {
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            classname: record.classname.clone(),
            coefficient: record.coefficient.clone(),
            max_stock: record.max_stock.clone(),
            trade_quantity: record.trade_quantity.clone(),
            buy_price: record.buy_price.clone(),
            sell_price: record.sell_price.clone(),
        }
    }

    /// All six fields are required
    pub fn to_record(&self) -> Result<ProductRecord> {
        Ok(ProductRecord::new(
            required("classname", &self.classname)?,
            required("coefficient", &self.coefficient)?,
            required("maxStock", &self.max_stock)?,
            required("tradeQuantity", &self.trade_quantity)?,
            required("buyPrice", &self.buy_price)?,
            required("sellPrice", &self.sell_price)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_trader() -> Trader {
        serde_json::from_value(json!({
            "Id": 4,
            "Name": "pr_npc_neutrals",
            "GivenName": "Boris",
            "Role": "Weapons",
            "Position": [7500.5, 12, 2300],
            "Orientation": [0, 90, 0],
            "Clothes": ["Hat"]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_id_lenient() {
        assert_eq!(parse_id("42"), 42);
        assert_eq!(parse_id(" -7 "), -7);
        assert_eq!(parse_id("abc"), 0);
        assert_eq!(parse_id(""), 0);
        assert_eq!(parse_id("3.5"), 0);
    }

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1 2.5 -3").components(), [1.0, 2.5, -3.0]);
        assert_eq!(parse_vec3("1, 2, 3").components(), [1.0, 2.0, 3.0]);
        assert_eq!(parse_vec3("1 2 3 4").components(), [1.0, 2.0, 3.0]);
        assert_eq!(parse_vec3("1 2"), Vec3::zero());
        assert_eq!(parse_vec3("1 two 3"), Vec3::zero());
        assert_eq!(parse_vec3("nan 0 0"), Vec3::zero());
        assert_eq!(parse_vec3(""), Vec3::zero());
    }

    #[test]
    fn test_trader_form_round_trip_keeps_everything() {
        let trader = sample_trader();
        let form = TraderForm::from_trader(&trader);
        assert_eq!(form.position, "7500.5 12 2300");

        let applied = form.apply(trader.clone()).unwrap();
        assert_eq!(applied, trader);
    }

    #[test]
    fn test_trader_form_non_numeric_id_becomes_zero() {
        let trader = sample_trader();
        let mut form = TraderForm::from_trader(&trader);
        form.id = "abc".to_string();

        let applied = form.apply(trader).unwrap();
        assert_eq!(applied.id, 0);
    }

    #[test]
    fn test_trader_form_bad_vector_becomes_zero() {
        let trader = sample_trader();
        let mut form = TraderForm::from_trader(&trader);
        form.position = "here".to_string();
        form.orientation = "0 180 0".to_string();

        let applied = form.apply(trader).unwrap();
        assert_eq!(applied.position, Vec3::zero());
        assert_eq!(applied.orientation.components(), [0.0, 180.0, 0.0]);
        assert_eq!(applied.extra["Clothes"], json!(["Hat"]));
    }

    #[test]
    fn test_trader_form_requires_text_fields() {
        let trader = sample_trader();

        let mut form = TraderForm::from_trader(&trader);
        form.given_name = "   ".to_string();
        assert!(matches!(
            form.apply(trader.clone()),
            Err(EditorError::ValidationFailed { field: "GivenName" })
        ));

        let mut form = TraderForm::from_trader(&trader);
        form.role = String::new();
        assert!(matches!(
            form.apply(trader),
            Err(EditorError::ValidationFailed { field: "Role" })
        ));
    }

    #[test]
    fn test_trader_template() {
        let form = TraderForm::template(3, &TraderTemplate::default());
        assert_eq!(form.id, "3");
        assert_eq!(form.name, "pr_npc_neutrals");
        assert_eq!(form.position, "0 0 0");
    }

    #[test]
    fn test_id_entry_form_categories_by_line() {
        let entry = TraderIdEntry::with_defaults(1);
        let form = IdEntryForm {
            id: "9".to_string(),
            categories: "Weapons\n\n  Ammo  \r\nFood\n".to_string(),
        };

        let applied = form.apply(entry);
        assert_eq!(applied.id, 9);
        assert_eq!(applied.categories, vec!["Weapons", "Ammo", "Food"]);
        assert!(applied.extra.contains_key("LicencesRequired"));
    }

    #[test]
    fn test_id_entry_form_round_trip() {
        let mut entry = TraderIdEntry::with_defaults(2);
        entry.categories = vec!["A".to_string(), "B".to_string()];

        let form = IdEntryForm::from_entry(&entry);
        assert_eq!(form.categories, "A\nB");
        assert_eq!(form.apply(entry.clone()), entry);
    }

    #[test]
    fn test_product_form_trims_and_requires_all_fields() {
        let form = ProductForm {
            classname: " Water ".to_string(),
            coefficient: "1".to_string(),
            max_stock: "10".to_string(),
            trade_quantity: "1".to_string(),
            buy_price: "5".to_string(),
            sell_price: " 2".to_string(),
        };
        assert_eq!(form.to_record().unwrap().to_string(), "Water,1,10,1,5,2");

        let mut missing = form.clone();
        missing.buy_price = " ".to_string();
        assert!(matches!(
            missing.to_record(),
            Err(EditorError::ValidationFailed { field: "buyPrice" })
        ));
    }

    #[test]
    fn test_category_name() {
        assert_eq!(category_name("  Food ").unwrap(), "Food");
        assert!(category_name("").is_err());
    }
}
