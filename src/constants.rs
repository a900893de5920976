//! Application-wide constants
//!
//! Wire-exact JSON keys, codec parameters and default values shared by the
//! document model, the forms and the settings file.

/// Top-level keys that identify a document variant, in classification priority order
pub mod discriminator {
    /// Price catalog: list of categories with encoded product lines
    pub const TRADER_CATEGORIES: &str = "TraderCategories";

    /// General config: list of trader NPCs
    pub const TRADERS: &str = "Traders";

    /// Trader-to-category ID mapping
    pub const IDS: &str = "IDs";
}

/// Passthrough keys seeded on newly created entities
pub mod passthrough {
    pub const CLOTHES: &str = "Clothes";
    pub const LICENCES_REQUIRED: &str = "LicencesRequired";
    pub const CURRENCIES_ACCEPTED: &str = "CurrenciesAccepted";
}

/// Product line-item codec
pub mod product {
    /// Number of interpreted fields in an encoded product line
    pub const FIELD_COUNT: usize = 6;

    /// Field separator (no quoting, no escaping)
    pub const DELIMITER: char = ',';
}

/// Persisted JSON formatting
pub mod json {
    /// Indentation unit for pretty-printed documents
    pub const INDENT: &[u8] = b"    ";
}

/// Defaults for a newly created trader
pub mod trader {
    /// Object classname of the stock neutral NPC
    pub const DEFAULT_NAME: &str = "pr_npc_neutrals";

    pub const DEFAULT_GIVEN_NAME: &str = "New Trader";

    pub const DEFAULT_ROLE: &str = "Trader";
}

/// Search result presentation
pub mod display {
    /// Suffix appended to the title of rows that matched a non-empty query
    pub const HIT_MARKER: &str = " ★";
}

/// Settings file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "trader-editor";

    pub const FILENAME: &str = "settings.json";

    /// Environment variable that overrides the configured log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}
