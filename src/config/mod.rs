//! Configuration management for the trader editor
//!
//! Only editor preferences live here. The edited documents are handled by
//! `document` and `session`.

pub mod settings;

// Re-export commonly used types
pub use settings::{parse_log_level, EditorSettings, TraderTemplate};
