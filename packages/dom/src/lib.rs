//! # Pagecraft DOM
//!
//! Document model for the Pagecraft application builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ dom: immutable application document          │
//! │  - Nodes, placements, bindable values        │
//! │  - Structural edits (add/move/remove)        │
//! │  - Actions + undo stack (single writer)      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ bindings: interpolations → dependency graph │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-react: document → page source      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Immutable documents**: every edit returns a new value
//! 2. **Tree invariants enforced on edit**: edits that would break the
//!    tree fail and leave the document as it was
//! 3. **Sibling order by fractional index**: inserting never renumbers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_dom::{Document, NodeInit, BindableValue};
//!
//! let doc = Document::new();
//! let page = doc.create_node(NodeInit::page("Home"));
//! let page_id = page.id.clone();
//! let doc = doc.add_node(page, doc.root_id(), "pages", None)?;
//!
//! let text = doc.create_node(
//!     NodeInit::element("Text").with_prop("content", BindableValue::constant("Hello")),
//! );
//! let doc = doc.add_node(text, &page_id, "children", None)?;
//! ```

mod actions;
mod bindable;
mod document;
mod errors;
pub mod fractional_index;
mod id_generator;
mod node;
mod undo_stack;

pub use actions::DomAction;
pub use bindable::{BindableMap, BindableValue, BindingFormat};
pub use document::{ChildNodes, Document, SerializedDocument};
pub use errors::{DomError, DomResult, FractionalIndexError, ReferenceError, StructuralError};
pub use id_generator::{propose_name, IdGenerator, ID_LENGTH};
pub use node::{Namespace, Node, NodeId, NodeInit, NodeKind, NodeType, Placement};
pub use undo_stack::{HistoryEntry, UndoStack};
