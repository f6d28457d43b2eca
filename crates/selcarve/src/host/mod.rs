//! The editor host boundary.
//!
//! Everything the commands need from the surrounding editor goes through
//! [`Host`], one method per host primitive. The crate never touches buffers,
//! views, or dialogs directly; a real plugin binding implements this trait on
//! top of the editor's API, and [`crate::infra::headless`] implements it for
//! standalone use.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::model::{DocumentId, Region};

/// Surface consumed from the host editor.
///
/// Read-side calls are infallible and coercing: out-of-range regions are
/// clipped, unknown handles read as empty documents. Mutating calls return
/// `Result` so adapter failures can carry context back to the caller.
pub trait Host {
    /// Document currently focused in the host, if any.
    fn active_document(&self) -> Option<DocumentId>;

    /// Length of the document in characters.
    fn document_len(&self, doc: DocumentId) -> usize;

    /// Path backing the document, when it has been saved before.
    fn source_path(&self, doc: DocumentId) -> Option<PathBuf>;

    /// Selection regions of the document, in document order.
    fn selections(&self, doc: DocumentId) -> Vec<Region>;

    /// Text covered by `region`, clipped to the document.
    fn text_in(&self, doc: DocumentId, region: Region) -> String;

    /// Create a new empty document and return its handle.
    fn create_document(&mut self) -> Result<DocumentId>;

    /// Insert `text` at character `offset` as a single undoable edit.
    fn insert(&mut self, doc: DocumentId, offset: usize, text: &str) -> Result<()>;

    /// Set the name the host displays for an unsaved document. Save dialogs
    /// pre-fill from it.
    fn set_display_name(&mut self, doc: DocumentId, name: &str) -> Result<()>;

    /// Replace the document's selection with a single region.
    fn set_selection(&mut self, doc: DocumentId, region: Region) -> Result<()>;

    /// Open the host's save-as dialog for the document.
    fn prompt_save_as(&mut self, doc: DocumentId) -> Result<()>;

    /// Save the document without prompting.
    fn save(&mut self, doc: DocumentId) -> Result<()>;

    /// Show a transient status message.
    fn status_message(&mut self, message: &str);
}
