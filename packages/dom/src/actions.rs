//! # Document Actions
//!
//! Serializable edit operations. Every structural change made by the
//! editor is expressed as a [`DomAction`] and applied through
//! [`DomAction::apply`], one at a time, against the current document.
//!
//! ## Semantics
//!
//! ### AddNode
//! - Node must be detached, parent type must allow it
//! - Missing index means "after the last sibling"
//!
//! ### MoveNode
//! - Same checks as AddNode, plus no moving a node below itself
//!
//! ### RemoveNode
//! - Removes the node and its descendants
//! - Bindings that pointed into the subtree are left dangling and resolve
//!   as unresolved references at compile time

use crate::bindable::BindableValue;
use crate::document::Document;
use crate::errors::DomResult;
use crate::node::{Namespace, Node, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DomAction {
    AddNode {
        node: Node,
        parent_id: NodeId,
        parent_prop: String,
        #[serde(default)]
        parent_index: Option<String>,
    },

    MoveNode {
        node_id: NodeId,
        parent_id: NodeId,
        parent_prop: String,
        #[serde(default)]
        parent_index: Option<String>,
    },

    RemoveNode {
        node_id: NodeId,
    },

    SetNodeName {
        node_id: NodeId,
        name: String,
    },

    /// Set a namespaced value; `None` removes it
    SetNamespacedProp {
        node_id: NodeId,
        namespace: Namespace,
        prop: String,
        #[serde(default)]
        value: Option<BindableValue>,
    },

    SetPageState {
        page_id: NodeId,
        slot: String,
        default_value: serde_json::Value,
    },

    RemovePageState {
        page_id: NodeId,
        slot: String,
    },
}

impl DomAction {
    /// Apply to `doc`, returning the new document. `doc` is left untouched
    /// whether or not the action succeeds.
    pub fn apply(&self, doc: &Document) -> DomResult<Document> {
        match self {
            DomAction::AddNode {
                node,
                parent_id,
                parent_prop,
                parent_index,
            } => doc.add_node(node.clone(), parent_id, parent_prop, parent_index.as_deref()),

            DomAction::MoveNode {
                node_id,
                parent_id,
                parent_prop,
                parent_index,
            } => doc.move_node(node_id, parent_id, parent_prop, parent_index.as_deref()),

            DomAction::RemoveNode { node_id } => doc.remove_node(node_id),

            DomAction::SetNodeName { node_id, name } => doc.set_node_name(node_id, name),

            DomAction::SetNamespacedProp {
                node_id,
                namespace,
                prop,
                value,
            } => doc.set_node_namespaced_prop(node_id, *namespace, prop, value.clone()),

            DomAction::SetPageState {
                page_id,
                slot,
                default_value,
            } => doc.set_page_state(page_id, slot, default_value.clone()),

            DomAction::RemovePageState { page_id, slot } => doc.remove_page_state(page_id, slot),
        }
    }

    /// Debug name for logs
    pub fn name(&self) -> &'static str {
        match self {
            DomAction::AddNode { .. } => "addNode",
            DomAction::MoveNode { .. } => "moveNode",
            DomAction::RemoveNode { .. } => "removeNode",
            DomAction::SetNodeName { .. } => "setNodeName",
            DomAction::SetNamespacedProp { .. } => "setNamespacedProp",
            DomAction::SetPageState { .. } => "setPageState",
            DomAction::RemovePageState { .. } => "removePageState",
        }
    }
}
