//! # Document
//!
//! Immutable application document. Every edit returns a new [`Document`];
//! the previous value stays valid and unchanged, so a compile started
//! against one version can finish while the editor moves on.
//!
//! Nodes are stored as `Arc<Node>` in a map that is copied on write. An
//! edit clones the map (pointer copies only) and replaces the touched
//! nodes, all other nodes are shared between versions.
//!
//! ## Lifecycle
//!
//! ```text
//! create_node → add_node → move_node / set_* → remove_node
//!  (detached)    (placed)     (new document)    (subtree gone)
//! ```

use crate::bindable::BindableValue;
use crate::errors::{DomError, DomResult, ReferenceError, StructuralError};
use crate::fractional_index::{key_after, key_between, validate_key};
use crate::id_generator::{propose_name, IdGenerator};
use crate::node::{Namespace, Node, NodeId, NodeInit, NodeKind, NodeType, Placement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

type NodeMap = BTreeMap<NodeId, Arc<Node>>;
type NameIndex = BTreeMap<String, NodeId>;

/// parent id → slot → child ids sorted by index
type ChildIndex = HashMap<NodeId, BTreeMap<String, Vec<NodeId>>>;

/// Children of one node, grouped by slot and sorted by index
pub type ChildNodes<'a> = BTreeMap<&'a str, Vec<&'a Node>>;

/// Application document
#[derive(Clone)]
pub struct Document {
    nodes: Arc<NodeMap>,
    /// Names of all nodes in the document, kept next to the node map so
    /// uniqueness checks don't rescan it
    names: Arc<NameIndex>,
    root: NodeId,
    /// Built on first child lookup. Valid for this document's lifetime.
    children: Arc<OnceLock<ChildIndex>>,
}

/// Plain serializable form of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedDocument {
    pub root: NodeId,
    pub nodes: BTreeMap<NodeId, Node>,
}

impl Document {
    /// Create a document holding only the application node
    pub fn new() -> Self {
        Self::new_with(&mut IdGenerator::new())
    }

    pub fn new_with(ids: &mut IdGenerator) -> Self {
        let root = Node {
            id: ids.new_id(),
            name: "application".to_string(),
            parent: None,
            attributes: Default::default(),
            kind: NodeKind::Application,
        };
        let root_id = root.id.clone();

        let mut nodes = NodeMap::new();
        let mut names = NameIndex::new();
        names.insert(root.name.clone(), root_id.clone());
        nodes.insert(root_id.clone(), Arc::new(root));

        Self::from_parts(nodes, names, root_id)
    }

    fn from_parts(nodes: NodeMap, names: NameIndex, root: NodeId) -> Self {
        Self {
            nodes: Arc::new(nodes),
            names: Arc::new(names),
            root,
            children: Arc::new(OnceLock::new()),
        }
    }

    // ---- Lookup ----

    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    pub fn root(&self) -> &Node {
        // The root is inserted on construction and can't be removed
        &self.nodes[&self.root]
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node, ReferenceError> {
        self.get_node(id)
            .ok_or_else(|| ReferenceError::NodeNotFound(id.clone()))
    }

    /// Node of a specific type
    pub fn node_of_type(&self, id: &NodeId, expected: NodeType) -> Result<&Node, ReferenceError> {
        let node = self.node(id)?;
        if node.node_type() != expected {
            return Err(ReferenceError::WrongType {
                node: id.clone(),
                expected,
                actual: node.node_type(),
            });
        }
        Ok(node)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.names.get(name).and_then(|id| self.get_node(id))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when both values share the same node storage
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    pub fn parent(&self, node: &Node) -> Option<&Node> {
        node.parent_id().and_then(|id| self.get_node(id))
    }

    fn child_index(&self) -> &ChildIndex {
        self.children.get_or_init(|| {
            let mut index: HashMap<NodeId, BTreeMap<String, Vec<&Node>>> = HashMap::new();
            for node in self.nodes() {
                if let Some(placement) = &node.parent {
                    index
                        .entry(placement.parent_id.clone())
                        .or_default()
                        .entry(placement.parent_prop.clone())
                        .or_default()
                        .push(node);
                }
            }

            index
                .into_iter()
                .map(|(parent, slots)| {
                    let slots = slots
                        .into_iter()
                        .map(|(prop, mut children)| {
                            children.sort_by(|a, b| sibling_key(a).cmp(&sibling_key(b)));
                            (prop, children.into_iter().map(|n| n.id.clone()).collect())
                        })
                        .collect();
                    (parent, slots)
                })
                .collect()
        })
    }

    /// Children of `parent_id` grouped by slot, each slot sorted by index
    pub fn child_nodes(&self, parent_id: &NodeId) -> ChildNodes<'_> {
        let Some(slots) = self.child_index().get(parent_id) else {
            return ChildNodes::new();
        };

        slots
            .iter()
            .map(|(prop, ids)| {
                let children = ids.iter().filter_map(|id| self.get_node(id)).collect();
                (prop.as_str(), children)
            })
            .collect()
    }

    /// Children of `parent_id` in one slot, sorted by index
    pub fn children_in(&self, parent_id: &NodeId, prop: &str) -> Vec<&Node> {
        self.child_index()
            .get(parent_id)
            .and_then(|slots| slots.get(prop))
            .map(|ids| ids.iter().filter_map(|id| self.get_node(id)).collect())
            .unwrap_or_default()
    }

    /// All nodes below `node_id`, depth first, slots in name order
    pub fn descendants(&self, node_id: &NodeId) -> Vec<&Node> {
        let mut result = Vec::new();
        self.collect_descendants(node_id, &mut result);
        result
    }

    fn collect_descendants<'a>(&'a self, node_id: &NodeId, result: &mut Vec<&'a Node>) {
        for children in self.child_nodes(node_id).into_values() {
            for child in children {
                result.push(child);
                self.collect_descendants(&child.id, result);
            }
        }
    }

    /// All nodes above `node_id`, root first
    pub fn ancestors(&self, node_id: &NodeId) -> Vec<&Node> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get_node(node_id).and_then(|n| self.parent(n));

        while let Some(node) = current {
            // Guard against malformed input; valid documents never loop
            if !seen.insert(&node.id) {
                break;
            }
            result.push(node);
            current = self.parent(node);
        }

        result.reverse();
        result
    }

    pub fn pages(&self) -> Vec<&Node> {
        self.children_in(&self.root, "pages")
    }

    pub fn page_by_name(&self, name: &str) -> Option<&Node> {
        self.node_by_name(name)
            .filter(|n| n.node_type() == NodeType::Page)
    }

    /// Index key placing a node at `position` among the current children
    /// of `parent_id.prop` (clamped to the end)
    pub fn index_at(&self, parent_id: &NodeId, prop: &str, position: usize) -> DomResult<String> {
        self.node(parent_id)?;
        let siblings = self.children_in(parent_id, prop);
        let position = position.min(siblings.len());

        let before = position
            .checked_sub(1)
            .and_then(|i| siblings.get(i))
            .and_then(|n| n.parent.as_ref())
            .map(|p| p.parent_index.as_str());
        let after = siblings
            .get(position)
            .and_then(|n| n.parent.as_ref())
            .map(|p| p.parent_index.as_str());

        Ok(key_between(before, after)?)
    }

    // ---- Structural edits ----

    /// Create a detached node with a fresh id and a unique name
    pub fn create_node(&self, init: NodeInit) -> Node {
        self.create_node_with(&mut IdGenerator::new(), init)
    }

    pub fn create_node_with(&self, ids: &mut IdGenerator, init: NodeInit) -> Node {
        let id = ids.unique_id(|id| self.nodes.contains_key(id));
        let candidate = init.name.clone().unwrap_or_else(|| init.default_name());
        let name = propose_name(&candidate, |n| self.names.contains_key(n));

        Node {
            id,
            name,
            parent: None,
            attributes: init.attributes,
            kind: init.kind,
        }
    }

    /// Attach a detached node under `parent_id.parent_prop`.
    ///
    /// Without `parent_index` the node goes after the current last sibling.
    pub fn add_node(
        &self,
        mut node: Node,
        parent_id: &NodeId,
        parent_prop: &str,
        parent_index: Option<&str>,
    ) -> DomResult<Document> {
        if let Some(placement) = &node.parent {
            return Err(StructuralError::AlreadyAttached {
                node: node.id.clone(),
                parent: placement.parent_id.clone(),
            }
            .into());
        }
        if self.nodes.contains_key(&node.id) {
            return Err(StructuralError::DuplicateId(node.id.clone()).into());
        }

        let parent = self.node(parent_id)?;
        check_parent_type(node.node_type(), parent.node_type())?;

        let index = self.resolve_index(parent_id, parent_prop, parent_index, None)?;

        // Detached nodes may have been named against an older document
        if self.names.contains_key(&node.name) {
            let renamed = propose_name(&node.name, |n| self.names.contains_key(n));
            tracing::debug!(from = %node.name, to = %renamed, "Renamed node on add");
            node.name = renamed;
        }

        node.parent = Some(Placement {
            parent_id: parent_id.clone(),
            parent_prop: parent_prop.to_string(),
            parent_index: index,
        });

        tracing::debug!(node = %node.id, parent = %parent_id, prop = parent_prop, "Added node");

        let mut nodes = (*self.nodes).clone();
        let mut names = (*self.names).clone();
        names.insert(node.name.clone(), node.id.clone());
        nodes.insert(node.id.clone(), Arc::new(node));

        Ok(Self::from_parts(nodes, names, self.root.clone()))
    }

    /// Re-parent and/or reorder an attached node
    pub fn move_node(
        &self,
        node_id: &NodeId,
        parent_id: &NodeId,
        parent_prop: &str,
        parent_index: Option<&str>,
    ) -> DomResult<Document> {
        let node = self.node(node_id)?;
        let parent = self.node(parent_id)?;
        check_parent_type(node.node_type(), parent.node_type())?;

        if node_id == parent_id || self.ancestors(parent_id).iter().any(|a| &a.id == node_id) {
            return Err(StructuralError::CycleDetected {
                node: node_id.clone(),
                parent: parent_id.clone(),
            }
            .into());
        }

        let index = self.resolve_index(parent_id, parent_prop, parent_index, Some(node_id))?;

        let mut moved = node.clone();
        moved.parent = Some(Placement {
            parent_id: parent_id.clone(),
            parent_prop: parent_prop.to_string(),
            parent_index: index,
        });

        tracing::debug!(node = %node_id, parent = %parent_id, prop = parent_prop, "Moved node");
        Ok(self.replace_node(moved))
    }

    /// Remove a node and everything below it
    pub fn remove_node(&self, node_id: &NodeId) -> DomResult<Document> {
        let node = self.node(node_id)?;
        if node.parent.is_none() {
            return Err(ReferenceError::NoParent(node_id.clone()).into());
        }

        let mut removed: Vec<&Node> = vec![node];
        removed.extend(self.descendants(node_id));

        let mut nodes = (*self.nodes).clone();
        let mut names = (*self.names).clone();
        for node in &removed {
            nodes.remove(&node.id);
            names.remove(&node.name);
        }

        tracing::debug!(node = %node_id, count = removed.len(), "Removed subtree");
        Ok(Self::from_parts(nodes, names, self.root.clone()))
    }

    /// Pick the index for a node placed under `parent_id.prop`.
    ///
    /// `moving` is excluded from sibling checks so a node can keep its key.
    fn resolve_index(
        &self,
        parent_id: &NodeId,
        prop: &str,
        requested: Option<&str>,
        moving: Option<&NodeId>,
    ) -> DomResult<String> {
        let siblings: Vec<&Node> = self
            .children_in(parent_id, prop)
            .into_iter()
            .filter(|n| Some(&n.id) != moving)
            .collect();

        match requested {
            Some(index) => {
                validate_key(index).map_err(StructuralError::from)?;
                let taken = siblings
                    .iter()
                    .filter_map(|n| n.parent.as_ref())
                    .any(|p| p.parent_index == index);
                if taken {
                    return Err(StructuralError::DuplicateIndex {
                        parent: parent_id.clone(),
                        prop: prop.to_string(),
                        index: index.to_string(),
                    }
                    .into());
                }
                Ok(index.to_string())
            }
            None => {
                let last = siblings
                    .last()
                    .and_then(|n| n.parent.as_ref())
                    .map(|p| p.parent_index.as_str());
                Ok(key_after(last)?)
            }
        }
    }

    /// New document with `node` replacing the node of the same id
    fn replace_node(&self, node: Node) -> Document {
        let mut nodes = (*self.nodes).clone();
        let mut names = (*self.names).clone();

        if let Some(old) = nodes.get(&node.id) {
            if old.name != node.name {
                names.remove(&old.name);
                names.insert(node.name.clone(), node.id.clone());
            }
        }
        nodes.insert(node.id.clone(), Arc::new(node));

        Self::from_parts(nodes, names, self.root.clone())
    }

    // ---- Attribute edits ----

    /// Rename a node, resolving collisions with a counter suffix
    pub fn set_node_name(&self, node_id: &NodeId, name: &str) -> DomResult<Document> {
        let node = self.node(node_id)?;
        if node.name == name {
            return Ok(self.clone());
        }

        let name = propose_name(name, |n| {
            self.names.get(n).is_some_and(|owner| owner != node_id)
        });
        let mut renamed = node.clone();
        renamed.name = name;
        Ok(self.replace_node(renamed))
    }

    /// Set (or with `None`, remove) an element prop
    pub fn set_node_prop(
        &self,
        node_id: &NodeId,
        prop: &str,
        value: Option<BindableValue>,
    ) -> DomResult<Document> {
        self.set_node_namespaced_prop(node_id, Namespace::Props, prop, value)
    }

    /// Set (or with `None`, remove) a value in one of the node's namespaces
    pub fn set_node_namespaced_prop(
        &self,
        node_id: &NodeId,
        namespace: Namespace,
        prop: &str,
        value: Option<BindableValue>,
    ) -> DomResult<Document> {
        let mut node = self.node(node_id)?.clone();
        let node_type = node.node_type();
        let map = node
            .namespace_mut(namespace)
            .ok_or(ReferenceError::MissingNamespace {
                node_type,
                namespace,
            })?;

        match value {
            Some(value) => {
                map.insert(prop.to_string(), value);
            }
            None => {
                map.remove(prop);
            }
        }

        Ok(self.replace_node(node))
    }

    /// Declare a page state slot with its default value
    pub fn set_page_state(
        &self,
        page_id: &NodeId,
        slot: &str,
        default_value: serde_json::Value,
    ) -> DomResult<Document> {
        let mut page = self.node_of_type(page_id, NodeType::Page)?.clone();
        if let NodeKind::Page { state } = &mut page.kind {
            state.insert(slot.to_string(), default_value);
        }
        Ok(self.replace_node(page))
    }

    pub fn remove_page_state(&self, page_id: &NodeId, slot: &str) -> DomResult<Document> {
        let mut page = self.node_of_type(page_id, NodeType::Page)?.clone();
        if let NodeKind::Page { state } = &mut page.kind {
            if state.remove(slot).is_none() {
                return Err(ReferenceError::SlotNotFound {
                    page: page_id.clone(),
                    slot: slot.to_string(),
                }
                .into());
            }
        }
        Ok(self.replace_node(page))
    }

    // ---- Validation & persistence ----

    /// Check every tree invariant. Returns one message per violation.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.get_node(&self.root) {
            None => errors.push(format!("root {} is missing", self.root)),
            Some(root) => {
                if root.node_type() != NodeType::Application {
                    errors.push(format!("root {} is a {}", root.id, root.node_type()));
                }
                if root.parent.is_some() {
                    errors.push(format!("root {} has a parent", root.id));
                }
            }
        }

        let mut seen_names = HashSet::new();
        let mut seen_indexes = HashSet::new();

        for (key, node) in self.nodes.iter() {
            if key != &node.id {
                errors.push(format!("node stored under {} has id {}", key, node.id));
            }
            if !seen_names.insert(node.name.as_str()) {
                errors.push(format!("name {} is used more than once", node.name));
            }

            let Some(placement) = &node.parent else {
                if node.id != self.root {
                    errors.push(format!("node {} is detached", node.id));
                }
                continue;
            };

            match self.get_node(&placement.parent_id) {
                None => errors.push(format!(
                    "node {} has missing parent {}",
                    node.id, placement.parent_id
                )),
                Some(parent) => {
                    if !node.node_type().can_be_child_of(parent.node_type()) {
                        errors.push(format!(
                            "{} {} can't be placed under {} {}",
                            node.node_type(),
                            node.id,
                            parent.node_type(),
                            parent.id
                        ));
                    }
                }
            }

            if let Err(e) = validate_key(&placement.parent_index) {
                errors.push(format!("node {}: {}", node.id, e));
            }
            let slot_key = (
                &placement.parent_id,
                placement.parent_prop.as_str(),
                placement.parent_index.as_str(),
            );
            if !seen_indexes.insert(slot_key) {
                errors.push(format!(
                    "index {} is used twice under {}.{}",
                    placement.parent_index, placement.parent_id, placement.parent_prop
                ));
            }

            if !self.reaches_root(node) {
                errors.push(format!("node {} is not reachable from the root", node.id));
            }
        }

        errors
    }

    fn reaches_root(&self, node: &Node) -> bool {
        let mut current = node;
        for _ in 0..self.nodes.len() {
            if current.id == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    pub fn to_serialized(&self) -> SerializedDocument {
        SerializedDocument {
            root: self.root.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.as_ref().clone()))
                .collect(),
        }
    }

    /// Rebuild a document, rejecting anything that breaks a tree invariant
    pub fn from_serialized(serialized: SerializedDocument) -> DomResult<Document> {
        let mut names = NameIndex::new();
        let mut nodes = NodeMap::new();
        for (id, node) in serialized.nodes {
            names.insert(node.name.clone(), node.id.clone());
            nodes.insert(id, Arc::new(node));
        }

        let document = Self::from_parts(nodes, names, serialized.root);
        let errors = document.validate();
        if !errors.is_empty() {
            return Err(DomError::Invalid(errors));
        }
        Ok(document)
    }

    pub fn to_json(&self) -> DomResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_serialized())?)
    }

    pub fn from_json(json: &str) -> DomResult<Document> {
        let serialized: SerializedDocument = serde_json::from_str(json)?;
        Self::from_serialized(serialized)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.nodes == other.nodes
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .finish()
    }
}

fn sibling_key(node: &Node) -> (&str, &NodeId) {
    let index = node
        .parent
        .as_ref()
        .map(|p| p.parent_index.as_str())
        .unwrap_or("");
    (index, &node.id)
}

fn check_parent_type(child: NodeType, parent: NodeType) -> Result<(), StructuralError> {
    if child.can_be_child_of(parent) {
        Ok(())
    } else {
        Err(StructuralError::InvalidParent { child, parent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Document, IdGenerator) {
        let mut ids = IdGenerator::seeded(1);
        (Document::new_with(&mut ids), ids)
    }

    #[test]
    fn test_new_document_has_only_root() {
        let (doc, _) = fixture();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.root().node_type(), NodeType::Application);
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_create_node_is_detached_with_unique_name() {
        let (doc, mut ids) = fixture();
        let page = doc.create_node_with(&mut ids, NodeInit::page("Home"));
        assert!(page.parent.is_none());
        assert_eq!(page.name, "page");

        let doc = doc.add_node(page, &doc.root_id().clone(), "pages", None).unwrap();
        let second = doc.create_node_with(&mut ids, NodeInit::page("Other"));
        assert_eq!(second.name, "page1");
    }

    #[test]
    fn test_add_node_renames_on_late_collision() {
        let (doc, mut ids) = fixture();
        let root = doc.root_id().clone();
        let a = doc.create_node_with(&mut ids, NodeInit::page("A"));
        let b = doc.create_node_with(&mut ids, NodeInit::page("B"));
        assert_eq!(a.name, b.name);

        let doc = doc.add_node(a, &root, "pages", None).unwrap();
        let doc = doc.add_node(b, &root, "pages", None).unwrap();
        let names: Vec<&str> = doc.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["page", "page1"]);
    }

    #[test]
    fn test_child_lookup_is_cached_per_document() {
        let (doc, mut ids) = fixture();
        let root = doc.root_id().clone();
        let page = doc.create_node_with(&mut ids, NodeInit::page("Home"));
        let doc = doc.add_node(page, &root, "pages", None).unwrap();

        let first = doc.child_nodes(&root);
        let second = doc.child_nodes(&root);
        assert_eq!(first, second);
        assert!(doc.children.get().is_some());

        // Clones share the cache
        let copy = doc.clone();
        assert!(copy.children.get().is_some());
    }

    #[test]
    fn test_set_node_name_resolves_collision() {
        let (doc, mut ids) = fixture();
        let root = doc.root_id().clone();
        let a = doc.create_node_with(&mut ids, NodeInit::page("A").named("home"));
        let b = doc.create_node_with(&mut ids, NodeInit::page("B").named("about"));
        let b_id = b.id.clone();
        let doc = doc.add_node(a, &root, "pages", None).unwrap();
        let doc = doc.add_node(b, &root, "pages", None).unwrap();

        let doc = doc.set_node_name(&b_id, "home").unwrap();
        assert_eq!(doc.node(&b_id).unwrap().name, "home1");
        assert!(doc.node_by_name("about").is_none());
        assert_eq!(doc.node_by_name("home1").unwrap().id, b_id);
    }

    #[test]
    fn test_missing_namespace_is_reference_error() {
        let (doc, mut ids) = fixture();
        let root = doc.root_id().clone();
        let page = doc.create_node_with(&mut ids, NodeInit::page("Home"));
        let page_id = page.id.clone();
        let doc = doc.add_node(page, &root, "pages", None).unwrap();

        let err = doc
            .set_node_namespaced_prop(&page_id, Namespace::Params, "x", None)
            .unwrap_err();
        assert!(err.is_reference());
    }

    #[test]
    fn test_page_state_slots() {
        let (doc, mut ids) = fixture();
        let root = doc.root_id().clone();
        let page = doc.create_node_with(&mut ids, NodeInit::page("Home"));
        let page_id = page.id.clone();
        let doc = doc.add_node(page, &root, "pages", None).unwrap();

        let doc = doc
            .set_page_state(&page_id, "count", serde_json::json!(0))
            .unwrap();
        let state = doc.node(&page_id).unwrap().page_state().unwrap();
        assert_eq!(state.get("count"), Some(&serde_json::json!(0)));

        let doc = doc.remove_page_state(&page_id, "count").unwrap();
        assert!(doc.remove_page_state(&page_id, "count").unwrap_err().is_reference());
    }

    #[test]
    fn test_json_roundtrip_preserves_document() {
        let (doc, mut ids) = fixture();
        let root = doc.root_id().clone();
        let page = doc.create_node_with(&mut ids, NodeInit::page("Home"));
        let doc = doc.add_node(page, &root, "pages", None).unwrap();

        let json = doc.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_from_serialized_rejects_orphans() {
        let (doc, _) = fixture();
        let mut serialized = doc.to_serialized();
        let orphan = Node {
            id: NodeId::new("orphan1"),
            name: "orphan".into(),
            parent: Some(Placement {
                parent_id: NodeId::new("missing"),
                parent_prop: "pages".into(),
                parent_index: "V".into(),
            }),
            attributes: Default::default(),
            kind: NodeKind::Page {
                state: Default::default(),
            },
        };
        serialized.nodes.insert(orphan.id.clone(), orphan);

        let err = Document::from_serialized(serialized).unwrap_err();
        assert!(matches!(err, DomError::Invalid(_)));
    }
}
