//! Editing core for trading-mod JSON configuration files
//!
//! Price catalogs, trader NPC definitions and trader-to-category id mappings
//! share one non-visual core: a typed document model, the product line
//! codec, substring search, and an editing session that writes the file back
//! after every change. Front-ends call into [`EditorSession`] and
//! [`search`]; they never touch raw JSON.

#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod forms;
pub mod persistence;
pub mod search;
pub mod session;

pub use codec::{decode, encode, ProductRecord};
pub use document::{
    classify, load_document, serialize_document, Category, Document, Entity, EntityKey, Trader,
    TraderIdEntry, Variant, Vec3,
};
pub use error::{EditorError, Result};
pub use session::EditorSession;
