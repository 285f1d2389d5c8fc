//! Error types for the document model

use crate::node::{Namespace, NodeId, NodeType};
use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;

/// Invalid tree shape. The attempted operation is rejected as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("Node {node} is already attached to {parent}")]
    AlreadyAttached { node: NodeId, parent: NodeId },

    #[error("A {child} node can't be placed under a {parent} node")]
    InvalidParent { child: NodeType, parent: NodeType },

    #[error("Moving {node} under {parent} would create a cycle")]
    CycleDetected { node: NodeId, parent: NodeId },

    #[error("Index {index} is already used under {parent}.{prop}")]
    DuplicateIndex {
        parent: NodeId,
        prop: String,
        index: String,
    },

    #[error("Node id {0} is already in use")]
    DuplicateId(NodeId),

    #[error("Invalid fractional index: {0}")]
    InvalidIndex(#[from] FractionalIndexError),
}

/// Lookup of something that doesn't exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("No node named {0}")]
    NameNotFound(String),

    #[error("Node {0} has no parent")]
    NoParent(NodeId),

    #[error("Node {node} is a {actual}, expected a {expected}")]
    WrongType {
        node: NodeId,
        expected: NodeType,
        actual: NodeType,
    },

    #[error("A {node_type} node has no {namespace} namespace")]
    MissingNamespace {
        node_type: NodeType,
        namespace: Namespace,
    },

    #[error("Page {page} has no state slot {slot}")]
    SlotNotFound { page: NodeId, slot: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FractionalIndexError {
    #[error("{0:?} must sort before {1:?}")]
    OutOfOrder(String, String),

    #[error("{0:?} has a trailing zero digit")]
    TrailingZero(String),

    #[error("{0:?} contains a character outside the key alphabet")]
    InvalidDigit(String),

    #[error("Index keys can't be empty")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Invalid document: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomError {
    pub fn is_structural(&self) -> bool {
        matches!(self, DomError::Structural(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, DomError::Reference(_))
    }
}

impl From<FractionalIndexError> for DomError {
    fn from(e: FractionalIndexError) -> Self {
        DomError::Structural(StructuralError::InvalidIndex(e))
    }
}

impl From<serde_json::Error> for DomError {
    fn from(e: serde_json::Error) -> Self {
        DomError::Serialization(e.to_string())
    }
}
