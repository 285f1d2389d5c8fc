//! # Document Nodes
//!
//! Every node carries the same header (id, name, placement, attributes)
//! and one [`NodeKind`] variant with the data specific to its type.
//!
//! ```text
//! application
//! ├── themes: theme
//! ├── apis:   api
//! └── pages:  page
//!             ├── children:     element ── <slot>: element ...
//!             ├── derivedState: derivedState
//!             ├── queryState:   queryState
//!             └── fetchedState: fetchedState
//! ```

use crate::bindable::{BindableMap, BindableValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque node identifier, unique within a document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Application,
    Theme,
    Api,
    Page,
    Element,
    DerivedState,
    QueryState,
    FetchedState,
}

impl NodeType {
    /// Node types this type may be attached under
    pub fn allowed_parents(self) -> &'static [NodeType] {
        match self {
            NodeType::Application => &[],
            NodeType::Theme | NodeType::Api | NodeType::Page => &[NodeType::Application],
            NodeType::Element => &[NodeType::Page, NodeType::Element],
            NodeType::DerivedState | NodeType::QueryState | NodeType::FetchedState => {
                &[NodeType::Page]
            }
        }
    }

    pub fn can_be_child_of(self, parent: NodeType) -> bool {
        self.allowed_parents().contains(&parent)
    }

    /// Derived, query and fetched state: page children that compute one value
    pub fn is_page_state(self) -> bool {
        matches!(
            self,
            NodeType::DerivedState | NodeType::QueryState | NodeType::FetchedState
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Application => "application",
            NodeType::Theme => "theme",
            NodeType::Api => "api",
            NodeType::Page => "page",
            NodeType::Element => "element",
            NodeType::DerivedState => "derivedState",
            NodeType::QueryState => "queryState",
            NodeType::FetchedState => "fetchedState",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named attribute maps on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Namespace {
    Attributes,
    Props,
    Params,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Namespace::Attributes => "attributes",
            Namespace::Props => "props",
            Namespace::Params => "params",
        })
    }
}

/// Where a node sits under its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub parent_id: NodeId,
    /// Which child collection of the parent
    pub parent_prop: String,
    /// Fractional index among siblings in the same collection
    pub parent_index: String,
}

/// Type-specific node data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Application,
    Theme,
    Api,
    Page {
        /// Local state slots with their default values
        #[serde(default)]
        state: BTreeMap<String, serde_json::Value>,
    },
    Element {
        #[serde(default)]
        props: BindableMap,
    },
    DerivedState {
        #[serde(default)]
        params: BindableMap,
    },
    QueryState {
        #[serde(default)]
        params: BindableMap,
    },
    FetchedState {
        #[serde(default)]
        params: BindableMap,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Application => NodeType::Application,
            NodeKind::Theme => NodeType::Theme,
            NodeKind::Api => NodeType::Api,
            NodeKind::Page { .. } => NodeType::Page,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::DerivedState { .. } => NodeType::DerivedState,
            NodeKind::QueryState { .. } => NodeType::QueryState,
            NodeKind::FetchedState { .. } => NodeType::FetchedState,
        }
    }
}

/// A document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Placement>,
    #[serde(default)]
    pub attributes: BindableMap,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent.as_ref().map(|p| &p.parent_id)
    }

    /// Attribute map for `namespace`, if this node type has one
    pub fn namespace(&self, namespace: Namespace) -> Option<&BindableMap> {
        match (namespace, &self.kind) {
            (Namespace::Attributes, _) => Some(&self.attributes),
            (Namespace::Props, NodeKind::Element { props }) => Some(props),
            (
                Namespace::Params,
                NodeKind::DerivedState { params }
                | NodeKind::QueryState { params }
                | NodeKind::FetchedState { params },
            ) => Some(params),
            _ => None,
        }
    }

    pub fn namespace_mut(&mut self, namespace: Namespace) -> Option<&mut BindableMap> {
        match (namespace, &mut self.kind) {
            (Namespace::Attributes, _) => Some(&mut self.attributes),
            (Namespace::Props, NodeKind::Element { props }) => Some(props),
            (
                Namespace::Params,
                NodeKind::DerivedState { params }
                | NodeKind::QueryState { params }
                | NodeKind::FetchedState { params },
            ) => Some(params),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&BindableValue> {
        self.attributes.get(name)
    }

    /// Const string attribute
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(BindableValue::as_str)
    }

    /// Component name of an element node
    pub fn component(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Element { .. } => self.attribute_str("component"),
            _ => None,
        }
    }

    pub fn props(&self) -> Option<&BindableMap> {
        self.namespace(Namespace::Props)
    }

    pub fn params(&self) -> Option<&BindableMap> {
        self.namespace(Namespace::Params)
    }

    pub fn page_state(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        match &self.kind {
            NodeKind::Page { state } => Some(state),
            _ => None,
        }
    }
}

/// Fields for a node that hasn't been created yet
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInit {
    pub name: Option<String>,
    pub attributes: BindableMap,
    pub kind: NodeKind,
}

impl NodeInit {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            attributes: BindableMap::new(),
            kind,
        }
    }

    pub fn theme() -> Self {
        Self::new(NodeKind::Theme)
    }

    pub fn api(base_url: &str) -> Self {
        Self::new(NodeKind::Api).with_attribute("baseUrl", BindableValue::constant(base_url))
    }

    pub fn page(title: &str) -> Self {
        Self::new(NodeKind::Page {
            state: BTreeMap::new(),
        })
        .with_attribute("title", BindableValue::constant(title))
    }

    pub fn element(component: &str) -> Self {
        Self::new(NodeKind::Element {
            props: BindableMap::new(),
        })
        .with_attribute("component", BindableValue::constant(component))
    }

    /// Derived state computing its value with `code`, a function of `params`
    pub fn derived_state(code: &str) -> Self {
        Self::new(NodeKind::DerivedState {
            params: BindableMap::new(),
        })
        .with_attribute("code", BindableValue::constant(code))
    }

    /// Query state running through the api connection `api`
    pub fn query_state(api: &NodeId) -> Self {
        Self::new(NodeKind::QueryState {
            params: BindableMap::new(),
        })
        .with_attribute("api", BindableValue::constant(api.as_str()))
    }

    pub fn fetched_state() -> Self {
        Self::new(NodeKind::FetchedState {
            params: BindableMap::new(),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: BindableValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Set an element prop. Ignored for other kinds.
    pub fn with_prop(mut self, name: impl Into<String>, value: BindableValue) -> Self {
        if let NodeKind::Element { props } = &mut self.kind {
            props.insert(name.into(), value);
        }
        self
    }

    /// Set a state param. Ignored for kinds without params.
    pub fn with_param(mut self, name: impl Into<String>, value: BindableValue) -> Self {
        if let NodeKind::DerivedState { params }
        | NodeKind::QueryState { params }
        | NodeKind::FetchedState { params } = &mut self.kind
        {
            params.insert(name.into(), value);
        }
        self
    }

    /// Add a page state slot. Ignored for other kinds.
    pub fn with_state(mut self, slot: impl Into<String>, default_value: serde_json::Value) -> Self {
        if let NodeKind::Page { state } = &mut self.kind {
            state.insert(slot.into(), default_value);
        }
        self
    }

    /// Name used when none was given
    pub fn default_name(&self) -> String {
        match &self.kind {
            NodeKind::Element { .. } => self
                .attributes
                .get("component")
                .and_then(BindableValue::as_str)
                .map(lower_first)
                .unwrap_or_else(|| "element".to_string()),
            kind => kind.node_type().as_str().to_string(),
        }
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_parents() {
        assert!(NodeType::Element.can_be_child_of(NodeType::Page));
        assert!(NodeType::Element.can_be_child_of(NodeType::Element));
        assert!(!NodeType::Element.can_be_child_of(NodeType::Application));
        assert!(NodeType::Page.can_be_child_of(NodeType::Application));
        assert!(NodeType::DerivedState.can_be_child_of(NodeType::Page));
        assert!(!NodeType::DerivedState.can_be_child_of(NodeType::Element));
        assert!(NodeType::Application.allowed_parents().is_empty());
    }

    #[test]
    fn test_namespaces_by_kind() {
        let element = Node {
            id: NodeId::new("a"),
            name: "text".into(),
            parent: None,
            attributes: BindableMap::new(),
            kind: NodeInit::element("Text").kind,
        };
        assert!(element.namespace(Namespace::Props).is_some());
        assert!(element.namespace(Namespace::Params).is_none());
        assert!(element.namespace(Namespace::Attributes).is_some());
    }

    #[test]
    fn test_default_names() {
        assert_eq!(NodeInit::element("TextField").default_name(), "textField");
        assert_eq!(NodeInit::page("Home").default_name(), "page");
        assert_eq!(NodeInit::derived_state("p => p").default_name(), "derivedState");
    }

    #[test]
    fn test_node_serialization_flattens_kind() {
        let node = Node {
            id: NodeId::new("x1"),
            name: "page".into(),
            parent: Some(Placement {
                parent_id: NodeId::new("root"),
                parent_prop: "pages".into(),
                parent_index: "V".into(),
            }),
            attributes: BindableMap::new(),
            kind: NodeKind::Page {
                state: BTreeMap::new(),
            },
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "page");
        assert_eq!(json["parent"]["parentProp"], "pages");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
