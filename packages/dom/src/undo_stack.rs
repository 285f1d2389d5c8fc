//! # Undo/Redo Stack
//!
//! Owns the current document and is the single place edits are applied.
//!
//! ## Design
//!
//! - Documents are immutable, so history is a list of snapshots
//! - Dispatching an action pushes the previous document onto the undo stack
//! - Undo swaps the current document with the top of the undo stack
//! - New actions clear the redo stack
//! - Batches group several actions into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new(Document::new());
//! stack.dispatch(&action)?;
//! stack.undo();
//! stack.redo();
//! ```

use crate::actions::DomAction;
use crate::document::Document;
use crate::errors::DomResult;

/// Document state before one undo step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub document: Document,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct UndoStack {
    current: Document,

    /// Applied steps (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Undone steps (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batch: the document as it was when the batch began
    current_batch: Option<HistoryEntry>,
}

impl UndoStack {
    /// Create a stack with default max levels (100)
    pub fn new(document: Document) -> Self {
        Self::with_max_levels(document, 100)
    }

    pub fn with_max_levels(document: Document, max_levels: usize) -> Self {
        Self {
            current: document,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    pub fn current(&self) -> &Document {
        &self.current
    }

    /// Apply an action to the current document and record it for undo.
    ///
    /// On error the current document is unchanged.
    pub fn dispatch(&mut self, action: &DomAction) -> DomResult<&Document> {
        let next = action.apply(&self.current)?;
        tracing::debug!(action = action.name(), "Dispatched action");

        let previous = std::mem::replace(&mut self.current, next);
        if self.current_batch.is_none() {
            self.push_entry(HistoryEntry {
                document: previous,
                description: None,
            });
        } else {
            self.redo_stack.clear();
        }

        Ok(&self.current)
    }

    /// Start a batch of actions (undone/redone together)
    pub fn begin_batch(&mut self) {
        if self.current_batch.is_none() {
            self.current_batch = Some(HistoryEntry {
                document: self.current.clone(),
                description: None,
            });
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            // Empty batches leave no history
            if !batch.document.ptr_eq(&self.current) {
                self.push_entry(batch);
            }
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Undo the most recent step. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };

        let undone = std::mem::replace(&mut self.current, entry.document);
        self.redo_stack.push(HistoryEntry {
            document: undone,
            description: entry.description,
        });
        true
    }

    /// Redo the most recently undone step
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };

        let previous = std::mem::replace(&mut self.current, entry.document);
        self.undo_stack.push(HistoryEntry {
            document: previous,
            description: entry.description,
        });
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().and_then(|e| e.description.as_deref())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, keeping the current document
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdGenerator, NodeInit};

    fn add_page(stack: &mut UndoStack, ids: &mut IdGenerator) {
        let doc = stack.current();
        let page = doc.create_node_with(ids, NodeInit::page("Page"));
        let action = DomAction::AddNode {
            node: page,
            parent_id: doc.root_id().clone(),
            parent_prop: "pages".to_string(),
            parent_index: None,
        };
        stack.dispatch(&action).unwrap();
    }

    #[test]
    fn test_undo_redo() {
        let mut ids = IdGenerator::seeded(5);
        let mut stack = UndoStack::new(Document::new_with(&mut ids));

        add_page(&mut stack, &mut ids);
        assert_eq!(stack.current().pages().len(), 1);

        assert!(stack.undo());
        assert_eq!(stack.current().pages().len(), 0);
        assert!(stack.can_redo());

        assert!(stack.redo());
        assert_eq!(stack.current().pages().len(), 1);
        assert!(!stack.redo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut ids = IdGenerator::seeded(5);
        let mut stack = UndoStack::new(Document::new_with(&mut ids));

        add_page(&mut stack, &mut ids);
        stack.undo();
        assert!(stack.can_redo());

        add_page(&mut stack, &mut ids);
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_batch_is_one_step() {
        let mut ids = IdGenerator::seeded(5);
        let mut stack = UndoStack::new(Document::new_with(&mut ids));

        stack.begin_batch();
        stack.set_batch_description("Add two pages");
        add_page(&mut stack, &mut ids);
        add_page(&mut stack, &mut ids);
        stack.end_batch();

        assert_eq!(stack.undo_count(), 1);
        assert_eq!(stack.undo_description(), Some("Add two pages"));
        assert!(stack.undo());
        assert_eq!(stack.current().pages().len(), 0);
    }

    #[test]
    fn test_max_levels() {
        let mut ids = IdGenerator::seeded(5);
        let mut stack = UndoStack::with_max_levels(Document::new_with(&mut ids), 2);

        for _ in 0..4 {
            add_page(&mut stack, &mut ids);
        }
        assert_eq!(stack.undo_count(), 2);
    }

    #[test]
    fn test_failed_dispatch_keeps_state() {
        let mut ids = IdGenerator::seeded(5);
        let mut stack = UndoStack::new(Document::new_with(&mut ids));
        let root = stack.current().root_id().clone();

        let result = stack.dispatch(&DomAction::RemoveNode { node_id: root });
        assert!(result.is_err());
        assert!(!stack.can_undo());
        assert_eq!(stack.current().len(), 1);
    }
}
