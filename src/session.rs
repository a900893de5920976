//! Editing session: the loaded document, its file, and every edit to it
//!
//! Each edit runs validate, apply, persist. The whole document is written
//! back after every successful edit. A failed write is reported but the edit
//! stays applied in memory, so the file and the model can differ until the
//! next successful save.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::codec;
use crate::config::TraderTemplate;
use crate::document::{
    self, Category, Document, Entity, EntityKey, Trader, TraderIdEntry, Variant,
};
use crate::error::{EditorError, Result};
use crate::forms::{self, IdEntryForm, ProductForm, TraderForm};
use crate::persistence::{DocumentStore, FileStore};
use crate::search::{self, ProductView, SearchHit};

/// Loaded document + associated file + unsaved-changes flag
#[derive(Debug)]
pub struct EditorSession<S: DocumentStore = FileStore> {
    document: Option<Document>,
    path: Option<PathBuf>,
    dirty: bool,
    store: S,
}

impl EditorSession<FileStore> {
    pub fn new() -> Self {
        Self::with_store(FileStore)
    }
}

impl Default for EditorSession<FileStore> {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(what: impl ToString) -> EditorError {
    EditorError::EntityNotFound {
        what: what.to_string(),
    }
}

impl<S: DocumentStore> EditorSession<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            document: None,
            path: None,
            dirty: false,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True when the model holds edits the file does not
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn variant(&self) -> Option<Variant> {
        self.document.as_ref().map(Document::variant)
    }

    // ==========================================================================
    // Lifecycle
    // ==========================================================================

    /// Load a file and associate it with the session.
    /// On failure the previously loaded document stays active.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<Variant> {
        let path = path.as_ref();
        let load_error = |reason: String| EditorError::Load {
            path: Some(path.to_path_buf()),
            reason,
        };

        let bytes = self
            .store
            .read(path)
            .map_err(|e| load_error(e.to_string()))?;
        let document = document::load_document(&bytes).map_err(|e| match e {
            EditorError::Load { reason, .. } => load_error(reason),
            other => other,
        })?;

        let variant = document.variant();
        if variant == Variant::Unknown {
            warn!(path = %path.display(), "File has no known top-level key, loaded read-only");
        } else {
            info!(path = %path.display(), %variant, entries = document.len(), "Loaded document");
        }

        self.document = Some(document);
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(variant)
    }

    /// Load raw bytes with no file behind them. Edits stay in memory until
    /// [`save_as`](Self::save_as).
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<Variant> {
        let document = document::load_document(bytes)?;
        let variant = document.variant();
        info!(%variant, entries = document.len(), "Loaded document from memory");

        self.document = Some(document);
        self.path = None;
        self.dirty = false;
        Ok(variant)
    }

    /// Drop the document and forget the file. Unsaved edits are discarded.
    pub fn unload(&mut self) {
        if self.dirty {
            warn!("Unloading document with unsaved changes");
        }
        self.document = None;
        self.path = None;
        self.dirty = false;
        info!("Document unloaded");
    }

    /// Write the document to its file. No-op when no file is associated.
    pub fn save(&mut self) -> Result<()> {
        if self.document.is_none() {
            return Err(EditorError::NoDocumentLoaded);
        }
        self.persist()
    }

    /// Associate a new file and write the document to it
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        if self.document.is_none() {
            return Err(EditorError::NoDocumentLoaded);
        }
        self.path = Some(path.into());
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let Some(document) = self.document.as_ref() else {
            return Ok(());
        };
        let Some(path) = self.path.as_ref() else {
            debug!("No file associated, edit kept in memory");
            return Ok(());
        };

        let bytes = document::serialize_document(document)?;
        match self.store.write(path, &bytes) {
            Ok(()) => {
                self.dirty = false;
                info!(path = %path.display(), "Saved document");
                Ok(())
            }
            Err(source) => {
                error!(path = %path.display(), error = %source, "Failed to save document");
                Err(EditorError::PersistenceFailed {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    /// Run an edit against the document, then persist.
    /// Nothing is persisted when `edit` fails.
    fn mutate<T>(&mut self, edit: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let document = self
            .document
            .as_mut()
            .ok_or(EditorError::NoDocumentLoaded)?;

        let outcome = edit(document)?;
        self.dirty = true;
        self.persist()?;
        Ok(outcome)
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Filtered rows for the main list; empty when nothing is loaded
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        self.document
            .as_ref()
            .map(|document| search::search(document, query))
            .unwrap_or_default()
    }

    /// Filtered product rows of one category
    pub fn products(&self, category: &str, query: &str) -> Result<ProductView> {
        let document = self.document.as_ref().ok_or(EditorError::NoDocumentLoaded)?;
        let categories = document
            .categories()
            .ok_or_else(|| document.mismatch(Variant::Price))?;
        let category = categories
            .iter()
            .find(|c| c.name == category)
            .ok_or_else(|| not_found(EntityKey::CategoryName(category.to_string())))?;
        Ok(search::filter_products(category, query))
    }

    /// Prefilled form for a new trader, numbered after the existing ones
    pub fn new_trader_form(&self, template: &TraderTemplate) -> Result<TraderForm> {
        let document = self.document.as_ref().ok_or(EditorError::NoDocumentLoaded)?;
        let traders = document
            .traders()
            .ok_or_else(|| document.mismatch(Variant::General))?;
        Ok(TraderForm::template(traders.len(), template))
    }

    /// Prefilled form for a new id entry, numbered after the existing ones
    pub fn new_id_entry_form(&self) -> Result<IdEntryForm> {
        let document = self.document.as_ref().ok_or(EditorError::NoDocumentLoaded)?;
        let entries = document
            .id_entries()
            .ok_or_else(|| document.mismatch(Variant::Ids))?;
        Ok(IdEntryForm::template(entries.len()))
    }

    // ==========================================================================
    // Categories
    // ==========================================================================

    /// Append an empty category. Names are not checked for duplicates.
    pub fn create_category(&mut self, name: &str) -> Result<usize> {
        let index = self.mutate(|document| {
            document.categories_mut()?;
            let name = forms::category_name(name)?;
            document.add_category(name)
        })?;
        info!(category = %name.trim(), index, "Created category");
        Ok(index)
    }

    /// Remove the first category with this name, products included
    pub fn delete_category(&mut self, name: &str) -> Result<Category> {
        let key = EntityKey::CategoryName(name.to_string());
        let removed = self.mutate(|document| match document.delete_entity(&key)? {
            Some(Entity::Category(category)) => Ok(category),
            _ => Err(not_found(&key)),
        })?;
        info!(category = %name, products = removed.products.len(), "Deleted category");
        Ok(removed)
    }

    // ==========================================================================
    // Traders
    // ==========================================================================

    pub fn create_trader(&mut self, form: &TraderForm) -> Result<usize> {
        let index = self.mutate(|document| {
            let next_id = document.traders_mut()?.len() as i64;
            let trader = form.apply(Trader::with_defaults(next_id, "", "", ""))?;
            document.add_trader(trader)
        })?;
        info!(trader = %form.given_name.trim(), index, "Created trader");
        Ok(index)
    }

    /// Overwrite the first trader with this given name. Unmodelled fields
    /// such as clothes are kept.
    pub fn update_trader(&mut self, given_name: &str, form: &TraderForm) -> Result<usize> {
        let key = EntityKey::GivenName(given_name.to_string());
        let index = self.mutate(|document| {
            let index = document.position(&key)?.ok_or_else(|| not_found(&key))?;
            let current = document.traders_mut()?[index].clone();
            let updated = form.apply(current)?;
            document
                .update_entity(&key, Entity::Trader(updated))?
                .ok_or_else(|| not_found(&key))
        })?;
        info!(trader = %given_name, index, "Updated trader");
        Ok(index)
    }

    /// Remove the first trader with this given name
    pub fn delete_trader(&mut self, given_name: &str) -> Result<Trader> {
        let key = EntityKey::GivenName(given_name.to_string());
        let removed = self.mutate(|document| match document.delete_entity(&key)? {
            Some(Entity::Trader(trader)) => Ok(trader),
            _ => Err(not_found(&key)),
        })?;
        info!(trader = %given_name, id = removed.id, "Deleted trader");
        Ok(removed)
    }

    // ==========================================================================
    // Trader id entries
    // ==========================================================================

    pub fn create_id_entry(&mut self, form: &IdEntryForm) -> Result<usize> {
        let index = self.mutate(|document| {
            let next_id = document.id_entries_mut()?.len() as i64;
            let entry = form.apply(TraderIdEntry::with_defaults(next_id));
            document.add_id_entry(entry)
        })?;
        info!(index, "Created trader id entry");
        Ok(index)
    }

    /// Overwrite the first entry with this id, keeping licences and currencies
    pub fn update_id_entry(&mut self, id: i64, form: &IdEntryForm) -> Result<usize> {
        let key = EntityKey::TraderId(id);
        let index = self.mutate(|document| {
            let index = document.position(&key)?.ok_or_else(|| not_found(&key))?;
            let current = document.id_entries_mut()?[index].clone();
            let updated = form.apply(current);
            document
                .update_entity(&key, Entity::IdEntry(updated))?
                .ok_or_else(|| not_found(&key))
        })?;
        info!(id, index, "Updated trader id entry");
        Ok(index)
    }

    /// Remove the first entry with this id
    pub fn delete_id_entry(&mut self, id: i64) -> Result<TraderIdEntry> {
        let key = EntityKey::TraderId(id);
        let removed = self.mutate(|document| match document.delete_entity(&key)? {
            Some(Entity::IdEntry(entry)) => Ok(entry),
            _ => Err(not_found(&key)),
        })?;
        info!(id, "Deleted trader id entry");
        Ok(removed)
    }

    // ==========================================================================
    // Products
    // ==========================================================================

    /// Append a product to the first category with this name.
    /// Returns the product's index in the category.
    pub fn create_product(&mut self, category: &str, form: &ProductForm) -> Result<usize> {
        let index = self.mutate(|document| {
            let target = document
                .category_mut(category)?
                .ok_or_else(|| not_found(EntityKey::CategoryName(category.to_string())))?;
            let record = form.to_record()?;
            target.products.push(codec::encode(&record));
            Ok(target.products.len() - 1)
        })?;
        info!(category = %category, product = %form.classname.trim(), index, "Created product");
        Ok(index)
    }

    /// Replace the first product with this classname
    pub fn update_product(
        &mut self,
        category: &str,
        classname: &str,
        form: &ProductForm,
    ) -> Result<usize> {
        let index = self.mutate(|document| {
            let target = document
                .category_mut(category)?
                .ok_or_else(|| not_found(EntityKey::CategoryName(category.to_string())))?;
            let index = target.product_position(classname).ok_or_else(|| {
                not_found(format!("product '{classname}' in category '{category}'"))
            })?;
            let record = form.to_record()?;
            target.products[index] = codec::encode(&record);
            Ok(index)
        })?;
        info!(category = %category, product = %classname, index, "Updated product");
        Ok(index)
    }

    /// Remove the first product with this classname. Returns the raw line.
    pub fn delete_product(&mut self, category: &str, classname: &str) -> Result<String> {
        let removed = self.mutate(|document| {
            let target = document
                .category_mut(category)?
                .ok_or_else(|| not_found(EntityKey::CategoryName(category.to_string())))?;
            let index = target.product_position(classname).ok_or_else(|| {
                not_found(format!("product '{classname}' in category '{category}'"))
            })?;
            Ok(target.products.remove(index))
        })?;
        info!(category = %category, product = %classname, "Deleted product");
        Ok(removed)
    }
}
