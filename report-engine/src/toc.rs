//! FILENAME: report-engine/src/toc.rs
//! Table-of-contents builder - a navigation tree parallel to content.
//!
//! Executors that opted into TOC participation open an entry in
//! `execute()` and close it in `close()`. Entries are stored in an arena
//! with parent/children index links; executors keep only the index of
//! the entry they opened, never an owning handle.

use serde::Serialize;

use crate::content::ContentId;

/// Index of one entry inside the TOC arena.
pub type TocNodeId = usize;

/// One node of the navigation tree.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    pub label: String,

    /// Content node this entry points at.
    pub content_id: ContentId,

    pub parent: Option<TocNodeId>,
    pub children: Vec<TocNodeId>,
}

/// Builds the TOC tree as the executor walk proceeds.
#[derive(Debug, Default)]
pub struct TocBuilder {
    entries: Vec<TocEntry>,

    /// Entries opened but not yet closed, innermost last.
    open_stack: Vec<TocNodeId>,
}

impl TocBuilder {
    pub fn new() -> Self {
        TocBuilder::default()
    }

    /// Opens a new entry under the innermost open entry (or as a root).
    pub fn open_entry(&mut self, label: impl Into<String>, content_id: ContentId) -> TocNodeId {
        let parent = self.open_stack.last().copied();
        let id = self.entries.len();
        self.entries.push(TocEntry {
            label: label.into(),
            content_id,
            parent,
            children: Vec::new(),
        });
        if let Some(parent_id) = parent {
            self.entries[parent_id].children.push(id);
        }
        self.open_stack.push(id);
        id
    }

    /// Closes an open entry. The walk is strictly depth-first, so the
    /// entry being closed is always the innermost open one.
    pub fn close_entry(&mut self, id: TocNodeId) {
        debug_assert_eq!(self.open_stack.last().copied(), Some(id));
        if self.open_stack.last() == Some(&id) {
            self.open_stack.pop();
        } else {
            self.open_stack.retain(|&open| open != id);
        }
    }

    /// Indices of the top-level entries.
    pub fn roots(&self) -> Vec<TocNodeId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn entry(&self, id: TocNodeId) -> Option<&TocEntry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries still open.
    pub fn open_count(&self) -> usize {
        self.open_stack.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
