//! Resolved state of a page: what gets declared and what markup reads

use pagecraft_dom::NodeId;
use std::fmt;

/// Identity of one stateful construct on a page
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// A page local state slot
    PageSlot { page: NodeId, slot: String },
    /// A derived, query or fetched state node
    Node(NodeId),
    /// A controlled element prop
    Prop { node: NodeId, prop: String },
}

impl StateKey {
    pub fn node_id(&self) -> &NodeId {
        match self {
            StateKey::PageSlot { page, .. } => page,
            StateKey::Node(node) => node,
            StateKey::Prop { node, .. } => node,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::PageSlot { page, slot } => write!(f, "{}.{}", page, slot),
            StateKey::Node(node) => write!(f, "{}", node),
            StateKey::Prop { node, prop } => write!(f, "{}.{}", node, prop),
        }
    }
}

/// Generated identifiers of one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBinding {
    pub value: String,
    /// Present for value/setter pairs, absent for read-only values
    pub setter: Option<String>,
}

/// Expression ready for the code generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// Emitted verbatim
    Code(String),
    /// Source evaluated at runtime against the page scope object
    Runtime(String),
}

impl ResolvedValue {
    pub fn placeholder() -> Self {
        ResolvedValue::Code(PLACEHOLDER.to_string())
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            ResolvedValue::Code(code) => Some(code),
            ResolvedValue::Runtime(_) => None,
        }
    }
}

/// Stand-in for anything that can't be resolved
pub const PLACEHOLDER: &str = "undefined";

/// A resolved element prop, as read by markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedProp {
    Value(ResolvedValue),
    /// Controlled prop wired to state. No setter when the state is read-only.
    Controlled {
        value: String,
        setter: Option<String>,
    },
}

/// Right-hand side of a declaration, before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateSource {
    /// `useState` pair owned by a page slot, initialised with JSON
    PageSlot { initial: String },
    /// `useState` pair owned by a controlled prop
    ControlledPair { initial: Option<String> },
    /// Read-only controlled prop computed from other state
    Computed {
        expression: String,
        deps: Vec<String>,
    },
    Derived {
        code: String,
        params: Vec<(String, String)>,
        deps: Vec<String>,
    },
    Query {
        api_id: String,
        node_id: NodeId,
        params: Vec<(String, String)>,
    },
    Fetched { params: Vec<(String, String)> },
}

/// One state declaration of a page, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDeclaration {
    pub key: StateKey,
    /// Readable label: node name, `page.slot` or `element.prop`
    pub label: String,
    pub binding: StateBinding,
    pub source: StateSource,
}

/// What the resolver needs to know about components
pub trait PropSchema {
    /// Whether `component` renders its props. Elements of unknown
    /// components contribute no state and no resolved props.
    fn knows(&self, _component: &str) -> bool {
        true
    }

    /// Props of `component` that own interactive state
    fn controlled_props(&self, component: &str) -> Vec<String>;

    fn is_controlled(&self, component: &str, prop: &str) -> bool {
        self.controlled_props(component).iter().any(|p| p == prop)
    }

    /// Initial value used when a controlled prop has no const value
    fn default_value(&self, component: &str, prop: &str) -> Option<serde_json::Value>;
}
