//! Editor error types.
//!
//! Every condition here is recoverable: the caller reports it and keeps the
//! session running.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::Variant;

/// Errors surfaced by the document model and the mutation layer.
#[derive(Error, Debug)]
pub enum EditorError {
    /// File could not be read or its bytes are not valid JSON.
    #[error("failed to load {}: {reason}", describe_source(.path))]
    Load {
        /// Source file, when loading from disk.
        path: Option<PathBuf>,
        /// Human readable cause.
        reason: String,
    },

    /// Valid JSON that carries none of the discriminator keys.
    #[error("document has none of the keys TraderCategories, Traders or IDs")]
    UnknownVariant,

    /// Mutation attempted with no document loaded, or on an inert document.
    #[error("no document loaded")]
    NoDocumentLoaded,

    /// Operation does not apply to the loaded document's variant.
    #[error("operation needs a {expected} document, but a {found} document is loaded")]
    VariantMismatch {
        /// Variant the operation works on.
        expected: Variant,
        /// Variant of the loaded document.
        found: Variant,
    },

    /// A required text field was empty after trimming.
    #[error("field '{field}' must not be empty")]
    ValidationFailed {
        /// Name of the offending field.
        field: &'static str,
    },

    /// No entity matched the lookup key. Nothing was changed.
    #[error("no {what} found")]
    EntityNotFound {
        /// Description of what was looked up.
        what: String,
    },

    /// Writing the document failed. The in-memory edit is kept.
    #[error("failed to save {}: {source}", .path.display())]
    PersistenceFailed {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Document could not be turned into JSON bytes.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn describe_source(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<bytes>".to_string())
}

/// Result alias used across the core.
pub type Result<T> = std::result::Result<T, EditorError>;
