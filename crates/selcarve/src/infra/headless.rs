//! Headless host adapter.
//!
//! Implements [`Host`] without an editor attached: documents are in-memory
//! strings addressed by character offset, and the save flow writes each
//! document under its display name into a configured output directory. With
//! no output directory, saves are only recorded, which is what unit tests
//! observe. "Accepting" a save-as prompt headlessly means taking the
//! suggested name as-is.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::domain::model::{DocumentId, Region};
use crate::host::Host;

#[derive(Debug, Default)]
struct ScratchDocument {
    text: String,
    display_name: Option<String>,
    source: Option<PathBuf>,
    selections: Vec<Region>,
}

/// In-memory [`Host`] used by the CLI and the test suite.
#[derive(Debug)]
pub struct HeadlessHost {
    documents: Vec<ScratchDocument>,
    active: Option<DocumentId>,
    out_dir: Option<PathBuf>,
    uniquify: bool,
    statuses: Vec<String>,
    prompted: Vec<DocumentId>,
    saved: Vec<DocumentId>,
    written: Vec<PathBuf>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            out_dir: None,
            uniquify: true,
            statuses: Vec::new(),
            prompted: Vec::new(),
            saved: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Host whose save flow writes into `dir`.
    pub fn with_out_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: Some(dir.into()),
            ..Self::new()
        }
    }

    /// Toggle numeric suffixing of colliding save targets.
    pub fn set_uniquify(&mut self, uniquify: bool) {
        self.uniquify = uniquify;
    }

    /// Open an unsaved document with `text` and make it active.
    pub fn open_scratch(&mut self, text: &str) -> DocumentId {
        self.push_document(ScratchDocument {
            text: text.to_owned(),
            ..ScratchDocument::default()
        })
    }

    /// Load `path` into a new document and make it active.
    pub fn open_source(&mut self, path: &Path) -> Result<DocumentId> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(self.push_document(ScratchDocument {
            text,
            source: Some(path.to_path_buf()),
            ..ScratchDocument::default()
        }))
    }

    /// Replace a document's selection set.
    pub fn set_selections(&mut self, doc: DocumentId, selections: Vec<Region>) {
        if let Some(document) = self.doc_mut(doc) {
            document.selections = selections;
        }
    }

    pub fn document_text(&self, doc: DocumentId) -> &str {
        self.doc(doc).map(|d| d.text.as_str()).unwrap_or("")
    }

    pub fn display_name(&self, doc: DocumentId) -> Option<&str> {
        self.doc(doc).and_then(|d| d.display_name.as_deref())
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn prompted_documents(&self) -> &[DocumentId] {
        &self.prompted
    }

    pub fn saved_documents(&self) -> &[DocumentId] {
        &self.saved
    }

    /// Paths written by the save flow, in write order.
    pub fn written_paths(&self) -> &[PathBuf] {
        &self.written
    }

    fn push_document(&mut self, document: ScratchDocument) -> DocumentId {
        let id = DocumentId(self.documents.len() as u64);
        self.documents.push(document);
        self.active = Some(id);
        id
    }

    fn doc(&self, doc: DocumentId) -> Option<&ScratchDocument> {
        self.documents.get(doc.0 as usize)
    }

    fn doc_mut(&mut self, doc: DocumentId) -> Option<&mut ScratchDocument> {
        self.documents.get_mut(doc.0 as usize)
    }

    fn require_mut(&mut self, doc: DocumentId) -> Result<&mut ScratchDocument> {
        self.documents
            .get_mut(doc.0 as usize)
            .ok_or_else(|| anyhow!("unknown document {doc}"))
    }

    fn write_out(&mut self, doc: DocumentId) -> Result<()> {
        let Some(dir) = self.out_dir.clone() else {
            return Ok(());
        };
        let document = self
            .doc(doc)
            .ok_or_else(|| anyhow!("unknown document {doc}"))?;
        let name = document
            .display_name
            .clone()
            .unwrap_or_else(|| "untitled.txt".to_owned());
        let text = document.text.clone();

        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        let target = if self.uniquify {
            unique_target(&dir, &name)
        } else {
            dir.join(&name)
        };
        fs::write(&target, text)
            .with_context(|| format!("failed to write {}", target.display()))?;
        info!(path = %target.display(), "wrote carved selection");
        self.written.push(target);
        Ok(())
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HeadlessHost {
    fn active_document(&self) -> Option<DocumentId> {
        self.active
    }

    fn document_len(&self, doc: DocumentId) -> usize {
        self.doc(doc).map(|d| d.text.chars().count()).unwrap_or(0)
    }

    fn source_path(&self, doc: DocumentId) -> Option<PathBuf> {
        self.doc(doc).and_then(|d| d.source.clone())
    }

    fn selections(&self, doc: DocumentId) -> Vec<Region> {
        self.doc(doc).map(|d| d.selections.clone()).unwrap_or_default()
    }

    fn text_in(&self, doc: DocumentId, region: Region) -> String {
        let Some(document) = self.doc(doc) else {
            return String::new();
        };
        let clipped = region.clamp(document.text.chars().count());
        let begin = byte_offset(&document.text, clipped.begin());
        let end = byte_offset(&document.text, clipped.end());
        document.text[begin..end].to_owned()
    }

    fn create_document(&mut self) -> Result<DocumentId> {
        Ok(self.push_document(ScratchDocument::default()))
    }

    fn insert(&mut self, doc: DocumentId, offset: usize, text: &str) -> Result<()> {
        let document = self.require_mut(doc)?;
        let offset = offset.min(document.text.chars().count());
        let at = byte_offset(&document.text, offset);
        document.text.insert_str(at, text);
        Ok(())
    }

    fn set_display_name(&mut self, doc: DocumentId, name: &str) -> Result<()> {
        self.require_mut(doc)?.display_name = Some(name.to_owned());
        Ok(())
    }

    fn set_selection(&mut self, doc: DocumentId, region: Region) -> Result<()> {
        self.require_mut(doc)?.selections = vec![region];
        Ok(())
    }

    fn prompt_save_as(&mut self, doc: DocumentId) -> Result<()> {
        self.prompted.push(doc);
        self.write_out(doc)
    }

    fn save(&mut self, doc: DocumentId) -> Result<()> {
        self.saved.push(doc);
        self.write_out(doc)
    }

    fn status_message(&mut self, message: &str) {
        debug!(message, "status");
        self.statuses.push(message.to_owned());
    }
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

fn unique_target(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (name, None),
    };
    for n in 2..10_000u32 {
        let next = match extension {
            Some(extension) => dir.join(format!("{stem}-{n}.{extension}")),
            None => dir.join(format!("{stem}-{n}")),
        };
        if !next.exists() {
            return next;
        }
    }
    candidate
}
