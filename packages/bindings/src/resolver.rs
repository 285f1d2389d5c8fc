//! # Binding Resolver
//!
//! Turns the bindable values of one page into generated expressions and
//! orders the page's state declarations.
//!
//! ## Algorithm
//!
//! ```text
//! collect   page slots, state nodes, controlled props of rendered elements
//!     ↓
//! classify  controlled props: owned pair | shared (alias) | computed
//!     ↓
//! resolve   params / inputs → code + dependency edges
//!     ↓
//! order     depth-first topological sort, cycle → CycleError
//!     ↓
//! markup    every prop of a rendered element → ResolvedProp
//! ```
//!
//! Identifiers are allocated from the function scope the first time a
//! state is referenced or declared, and memoized per state key. A
//! controlled prop bound to another pair shares that pair's identifiers.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::BindingResult;
use crate::graph::DependencyGraph;
use crate::state::{
    PropSchema, ResolvedProp, ResolvedValue, StateBinding, StateDeclaration, StateKey,
    StateSource, PLACEHOLDER,
};
use crate::template::{parse_template, render_segments, Reference, TemplatePart};
use pagecraft_dom::{
    BindableValue, BindingFormat, Document, Node, NodeId, NodeKind, NodeType,
};
use pagecraft_scope::{to_identifier, Scope};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Name of the single slot a derived, query or fetched state exposes
pub const STATE_VALUE_SLOT: &str = "value";

/// Everything the code generator needs to know about a page's state
#[derive(Debug, Clone)]
pub struct PageBindings {
    pub page_id: NodeId,
    /// State declarations, dependencies first
    pub declarations: Vec<StateDeclaration>,
    /// Resolved props of every element on the page
    pub props: BTreeMap<NodeId, BTreeMap<String, ResolvedProp>>,
    /// Entries of the page scope object runtime expressions evaluate against
    pub runtime_scope: Vec<(String, String)>,
    /// Whether any prop needs runtime evaluation
    pub uses_runtime: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Function scope with every allocated identifier
    pub scope: Scope,
}

impl PageBindings {
    pub fn element_props(&self, node_id: &NodeId) -> Option<&BTreeMap<String, ResolvedProp>> {
        self.props.get(node_id)
    }

    pub fn prop(&self, node_id: &NodeId, prop: &str) -> Option<&ResolvedProp> {
        self.props.get(node_id).and_then(|props| props.get(prop))
    }

    pub fn declaration(&self, key: &StateKey) -> Option<&StateDeclaration> {
        self.declarations.iter().find(|d| &d.key == key)
    }
}

/// Page slot holding the rendered element tree
pub const CHILDREN_SLOT: &str = "children";

/// Elements a page renders: its `children` and every element nested in
/// any slot below them, depth first
pub fn markup_elements<'a>(document: &'a Document, page_id: &NodeId) -> Vec<&'a Node> {
    let mut result = Vec::new();
    collect_markup(document, document.children_in(page_id, CHILDREN_SLOT), &mut result);
    result
}

fn collect_markup<'a>(document: &'a Document, nodes: Vec<&'a Node>, result: &mut Vec<&'a Node>) {
    for node in nodes {
        if node.node_type() != NodeType::Element {
            continue;
        }
        result.push(node);
        for children in document.child_nodes(&node.id).into_values() {
            collect_markup(document, children, result);
        }
    }
}

/// Resolve the bindings of the page `page_id`
pub fn resolve_page(
    document: &Document,
    page_id: &NodeId,
    schema: &dyn PropSchema,
    scope: Scope,
) -> BindingResult<PageBindings> {
    BindingResolver::new(document, page_id, schema, scope)?.resolve()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Inside a state declaration, before the page scope object exists
    State,
    /// In rendered markup
    Markup,
}

#[derive(Debug, Clone)]
enum Entry<'a> {
    PageSlot {
        default: &'a serde_json::Value,
    },
    State(&'a Node),
    /// Controlled prop owning a value/setter pair
    Owned {
        element: &'a Node,
        component: &'a str,
        value: Option<&'a BindableValue>,
    },
    /// Controlled prop computed from other state, read only
    Computed {
        element: &'a Node,
        value: &'a BindableValue,
    },
    /// Controlled prop sharing another pair
    Alias { target: StateKey },
}

pub struct BindingResolver<'a> {
    document: &'a Document,
    page: &'a Node,
    schema: &'a dyn PropSchema,
    scope: Scope,
    on_page: BTreeSet<NodeId>,
    markup: Vec<&'a Node>,
    entries: BTreeMap<StateKey, Entry<'a>>,
    order: Vec<StateKey>,
    bindings: BTreeMap<StateKey, StateBinding>,
    diagnostics: Vec<Diagnostic>,
    uses_runtime: bool,
}

impl<'a> BindingResolver<'a> {
    pub fn new(
        document: &'a Document,
        page_id: &NodeId,
        schema: &'a dyn PropSchema,
        scope: Scope,
    ) -> BindingResult<Self> {
        let page = document.node_of_type(page_id, NodeType::Page)?;

        let mut on_page: BTreeSet<NodeId> =
            document.descendants(page_id).iter().map(|n| n.id.clone()).collect();
        on_page.insert(page_id.clone());

        Ok(Self {
            document,
            page,
            schema,
            scope,
            on_page,
            markup: markup_elements(document, page_id),
            entries: BTreeMap::new(),
            order: Vec::new(),
            bindings: BTreeMap::new(),
            diagnostics: Vec::new(),
            uses_runtime: false,
        })
    }

    pub fn resolve(mut self) -> BindingResult<PageBindings> {
        self.collect();

        let mut graph = DependencyGraph::new();
        let mut sources = BTreeMap::new();

        for key in self.order.clone() {
            graph.add_node(key.clone());
            let mut deps = Vec::new();
            if let Some(source) = self.build_source(&key, &mut deps) {
                sources.insert(key.clone(), source);
            }
            for dep in deps {
                graph.add_dependency(key.clone(), dep);
            }
        }

        let ordered = graph.topological_order(|key| self.label(key))?;

        let mut declarations = Vec::with_capacity(sources.len());
        for key in ordered {
            let Some(source) = sources.remove(&key) else {
                continue;
            };
            declarations.push(StateDeclaration {
                label: self.label(&key),
                binding: self.binding_of(&key),
                key,
                source,
            });
        }

        let props = self.resolve_markup_props();
        let runtime_scope = self.runtime_scope();

        debug!(
            page = %self.page.name,
            declarations = declarations.len(),
            warnings = self.diagnostics.len(),
            "Resolved page bindings"
        );

        Ok(PageBindings {
            page_id: self.page.id.clone(),
            declarations,
            props,
            runtime_scope,
            uses_runtime: self.uses_runtime,
            diagnostics: self.diagnostics,
            scope: self.scope,
        })
    }

    // ---- Collection ----

    fn collect(&mut self) {
        let document = self.document;
        let page = self.page;

        if let Some(state) = page.page_state() {
            for (slot, default) in state {
                self.insert(
                    StateKey::PageSlot {
                        page: page.id.clone(),
                        slot: slot.clone(),
                    },
                    Entry::PageSlot { default },
                );
            }
        }

        for children in document.child_nodes(&page.id).into_values() {
            for child in children {
                if child.node_type().is_page_state() {
                    self.insert(StateKey::Node(child.id.clone()), Entry::State(child));
                }
            }
        }

        // Register every controlled prop before classifying, so bindings
        // can point at props further down the tree
        let mut controlled = Vec::new();
        for element in self.markup.clone() {
            let Some(component) = element.component().filter(|c| self.schema.knows(c)) else {
                continue;
            };
            for prop in self.schema.controlled_props(component) {
                let value = element.props().and_then(|props| props.get(&prop));
                let key = StateKey::Prop {
                    node: element.id.clone(),
                    prop: prop.clone(),
                };
                self.insert(
                    key.clone(),
                    Entry::Owned {
                        element,
                        component,
                        value: None,
                    },
                );
                controlled.push((key, element, component, value));
            }
        }

        for (key, element, component, value) in controlled {
            let entry = match value {
                Some(binding @ BindableValue::Binding { node_id, prop }) => {
                    match self.pair_slot(node_id, prop) {
                        Some(target) if target != key => Entry::Alias { target },
                        _ => Entry::Computed {
                            element,
                            value: binding,
                        },
                    }
                }
                Some(value @ BindableValue::BoundExpression { .. }) => {
                    Entry::Computed { element, value }
                }
                value => Entry::Owned {
                    element,
                    component,
                    value,
                },
            };
            self.entries.insert(key, entry);
        }
    }

    fn insert(&mut self, key: StateKey, entry: Entry<'a>) {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, entry);
    }

    /// Key of a value/setter pair `node.slot` on this page, if there is one
    fn pair_slot(&self, node_id: &NodeId, slot: &str) -> Option<StateKey> {
        let key = match self.slot_key(node_id, slot)? {
            key @ (StateKey::PageSlot { .. } | StateKey::Prop { .. }) => key,
            StateKey::Node(_) => return None,
        };
        Some(key)
    }

    /// Key of the named slot of a node on this page
    fn slot_key(&self, node_id: &NodeId, slot: &str) -> Option<StateKey> {
        if !self.on_page.contains(node_id) {
            return None;
        }
        let node = self.document.get_node(node_id)?;

        let key = match node.node_type() {
            NodeType::Page => StateKey::PageSlot {
                page: node.id.clone(),
                slot: slot.to_string(),
            },
            NodeType::Element => StateKey::Prop {
                node: node.id.clone(),
                prop: slot.to_string(),
            },
            t if t.is_page_state() && slot == STATE_VALUE_SLOT => StateKey::Node(node.id.clone()),
            _ => return None,
        };

        self.entries.contains_key(&key).then_some(key)
    }

    // ---- Identifiers ----

    /// Follow aliases to the key that owns the identifiers
    fn owner_of(&self, key: &StateKey) -> Option<StateKey> {
        let mut current = key.clone();
        let mut seen = BTreeSet::new();

        loop {
            match self.entries.get(&current)? {
                Entry::Alias { target } => {
                    if !seen.insert(current.clone()) {
                        return None;
                    }
                    current = target.clone();
                }
                _ => return Some(current),
            }
        }
    }

    /// Identifiers of `key`, allocated on first use
    fn binding_of(&mut self, key: &StateKey) -> StateBinding {
        let Some(owner) = self.owner_of(key) else {
            return StateBinding {
                value: PLACEHOLDER.to_string(),
                setter: None,
            };
        };
        if let Some(binding) = self.bindings.get(&owner) {
            return binding.clone();
        }

        // (base name, owns a setter)
        let shape = match (&owner, self.entries.get(&owner)) {
            (StateKey::PageSlot { slot, .. }, _) => Some((slot.clone(), true)),
            (StateKey::Prop { prop, .. }, Some(Entry::Owned { element, .. })) => {
                Some((format!("{}{}", element.name, upper_first(prop)), true))
            }
            (StateKey::Prop { prop, .. }, Some(Entry::Computed { element, .. })) => {
                Some((format!("{}{}", element.name, upper_first(prop)), false))
            }
            (StateKey::Node(id), _) => Some((
                self.document
                    .get_node(id)
                    .map(|n| n.name.clone())
                    .unwrap_or_else(|| id.to_string()),
                false,
            )),
            _ => None,
        };

        let binding = match shape {
            Some((base, true)) => self.pair(&base),
            Some((base, false)) => StateBinding {
                value: self.scope.create_unique_binding(&base),
                setter: None,
            },
            None => StateBinding {
                value: PLACEHOLDER.to_string(),
                setter: None,
            },
        };

        debug!(key = %owner, value = %binding.value, "Allocated state binding");
        self.bindings.insert(owner, binding.clone());
        binding
    }

    fn pair(&mut self, base: &str) -> StateBinding {
        let value = self.scope.create_unique_binding(base);
        let setter = self
            .scope
            .create_unique_binding(&format!("set{}", upper_first(&value)));
        StateBinding {
            value,
            setter: Some(setter),
        }
    }

    fn label(&self, key: &StateKey) -> String {
        let name_of = |id: &NodeId| {
            self.document
                .get_node(id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        match key {
            StateKey::PageSlot { page, slot } => format!("{}.{}", name_of(page), slot),
            StateKey::Node(id) => name_of(id),
            StateKey::Prop { node, prop } => format!("{}.{}", name_of(node), prop),
        }
    }

    // ---- Declarations ----

    fn build_source(&mut self, key: &StateKey, deps: &mut Vec<StateKey>) -> Option<StateSource> {
        let entry = self.entries.get(key)?.clone();

        if let Entry::Alias { target } = entry {
            deps.push(target);
            return None;
        }
        self.binding_of(key);

        let source = match entry {
            Entry::PageSlot { default } => StateSource::PageSlot {
                initial: to_json(default),
            },
            Entry::Owned {
                element,
                component,
                value,
            } => {
                let prop = match key {
                    StateKey::Prop { prop, .. } => prop.as_str(),
                    _ => "",
                };
                StateSource::ControlledPair {
                    initial: self.initial_value(element, component, prop, value),
                }
            }
            Entry::Computed { element, value } => {
                let prop = match key {
                    StateKey::Prop { prop, .. } => prop.clone(),
                    _ => String::new(),
                };
                let mut own_deps = Vec::new();
                let expression = self.resolve_code(element, &prop, value, &mut own_deps);
                let dep_names = self.dependency_names(&own_deps);
                deps.extend(own_deps);
                StateSource::Computed {
                    expression,
                    deps: dep_names,
                }
            }
            Entry::State(node) => self.state_source(node, deps),
            Entry::Alias { .. } => return None,
        };

        Some(source)
    }

    fn state_source(&mut self, node: &'a Node, deps: &mut Vec<StateKey>) -> StateSource {
        let params = self.resolve_params(node, deps);

        match &node.kind {
            NodeKind::DerivedState { .. } => {
                let code = match node.attribute_str("code") {
                    Some(code) => code.to_string(),
                    None => {
                        self.report(
                            Diagnostic::new(
                                DiagnosticKind::IncompleteState,
                                format!("Derived state `{}` has no code", node.name),
                            )
                            .at(&node.id, Some("code")),
                        );
                        "() => undefined".to_string()
                    }
                };
                StateSource::Derived {
                    code,
                    params,
                    deps: self.dependency_names(deps),
                }
            }
            NodeKind::QueryState { .. } => {
                let api_id = match node.attribute_str("api") {
                    Some(api) => {
                        let exists = self
                            .document
                            .get_node(&NodeId::new(api))
                            .is_some_and(|n| n.node_type() == NodeType::Api);
                        if !exists {
                            self.report(
                                Diagnostic::new(
                                    DiagnosticKind::UnresolvedInterpolation,
                                    format!("Query `{}` uses unknown api {}", node.name, api),
                                )
                                .at(&node.id, Some("api")),
                            );
                        }
                        api.to_string()
                    }
                    None => {
                        self.report(
                            Diagnostic::new(
                                DiagnosticKind::IncompleteState,
                                format!("Query `{}` has no api", node.name),
                            )
                            .at(&node.id, Some("api")),
                        );
                        String::new()
                    }
                };
                StateSource::Query {
                    api_id,
                    node_id: node.id.clone(),
                    params,
                }
            }
            _ => StateSource::Fetched { params },
        }
    }

    fn resolve_params(&mut self, node: &'a Node, deps: &mut Vec<StateKey>) -> Vec<(String, String)> {
        let Some(params) = node.params() else {
            return Vec::new();
        };
        params
            .iter()
            .map(|(name, value)| (name.clone(), self.resolve_code(node, name, value, deps)))
            .collect()
    }

    fn initial_value(
        &mut self,
        element: &Node,
        component: &str,
        prop: &str,
        value: Option<&BindableValue>,
    ) -> Option<String> {
        match value {
            Some(BindableValue::Const { value }) => Some(to_json(value)),
            Some(BindableValue::Secret { value }) => Some(secret_token(value)),
            Some(BindableValue::JsExpression { .. }) => {
                self.report_misplaced_runtime(element, prop);
                None
            }
            _ => self
                .schema
                .default_value(component, prop)
                .map(|value| to_json(&value)),
        }
    }

    /// Value identifiers of `keys`, deduplicated, in order of first use
    fn dependency_names(&mut self, keys: &[StateKey]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for key in keys {
            let value = self.binding_of(key).value;
            if value != PLACEHOLDER && !names.contains(&value) {
                names.push(value);
            }
        }
        names
    }

    // ---- Values ----

    /// Resolve a value inside a state declaration, where only plain code works
    fn resolve_code(
        &mut self,
        owner: &Node,
        prop: &str,
        value: &BindableValue,
        deps: &mut Vec<StateKey>,
    ) -> String {
        match self.resolve_value(owner, prop, value, Position::State, deps) {
            ResolvedValue::Code(code) => code,
            ResolvedValue::Runtime(_) => PLACEHOLDER.to_string(),
        }
    }

    fn resolve_value(
        &mut self,
        owner: &Node,
        prop: &str,
        value: &BindableValue,
        position: Position,
        deps: &mut Vec<StateKey>,
    ) -> ResolvedValue {
        match value {
            BindableValue::Const { value } => ResolvedValue::Code(to_json(value)),

            BindableValue::Binding {
                node_id,
                prop: slot,
            } => match self.slot_key(node_id, slot) {
                Some(key) => {
                    let code = self.binding_of(&key).value;
                    deps.push(key);
                    ResolvedValue::Code(code)
                }
                None => {
                    self.report(
                        Diagnostic::new(
                            DiagnosticKind::UnresolvedInterpolation,
                            format!("Can't resolve binding to {}.{}", node_id, slot),
                        )
                        .at(&owner.id, Some(prop)),
                    );
                    ResolvedValue::placeholder()
                }
            },

            BindableValue::BoundExpression { value, format } => {
                ResolvedValue::Code(self.resolve_template(owner, prop, value, *format, deps))
            }

            BindableValue::JsExpression { value } => match position {
                Position::Markup => {
                    self.uses_runtime = true;
                    ResolvedValue::Runtime(value.clone())
                }
                Position::State => {
                    self.report_misplaced_runtime(owner, prop);
                    ResolvedValue::placeholder()
                }
            },

            BindableValue::Secret { value } => ResolvedValue::Code(secret_token(value)),
        }
    }

    fn resolve_template(
        &mut self,
        owner: &Node,
        prop: &str,
        text: &str,
        format: Option<BindingFormat>,
        deps: &mut Vec<StateKey>,
    ) -> String {
        let template = parse_template(text);
        let format = format.unwrap_or(if template.is_single_interpolation() {
            BindingFormat::Expression
        } else {
            BindingFormat::StringLiteral
        });

        let mut out = String::new();
        if format == BindingFormat::StringLiteral {
            out.push('`');
        }

        for part in &template.parts {
            match part {
                TemplatePart::Text(text) => match format {
                    BindingFormat::StringLiteral => out.push_str(&escape_template_text(text)),
                    BindingFormat::Expression => out.push_str(text),
                },
                TemplatePart::Interpolation(reference) => {
                    let code = match self.resolve_reference(reference) {
                        Some((key, code)) => {
                            deps.push(key);
                            code
                        }
                        None => {
                            self.report(
                                Diagnostic::new(
                                    DiagnosticKind::UnresolvedInterpolation,
                                    format!("Can't resolve `{{{{{}}}}}`", reference),
                                )
                                .at(&owner.id, Some(prop)),
                            );
                            PLACEHOLDER.to_string()
                        }
                    };
                    push_code(&mut out, &code, format);
                }
                TemplatePart::Invalid { source, error } => {
                    self.report(
                        Diagnostic::new(
                            DiagnosticKind::MalformedInterpolation,
                            format!("Malformed interpolation {}: {}", source, error),
                        )
                        .at(&owner.id, Some(prop)),
                    );
                    push_code(&mut out, PLACEHOLDER, format);
                }
            }
        }

        if format == BindingFormat::StringLiteral {
            out.push('`');
        }
        out
    }

    /// Resolve `name.path` to the state it reads and the code reading it
    fn resolve_reference(&mut self, reference: &Reference) -> Option<(StateKey, String)> {
        let document = self.document;
        let node = document.node_by_name(&reference.root)?;
        if !self.on_page.contains(&node.id) {
            return None;
        }

        let (key, rest) = match node.node_type() {
            t if t.is_page_state() => (StateKey::Node(node.id.clone()), &reference.segments[..]),
            NodeType::Page | NodeType::Element => {
                let (first, rest) = reference.segments.split_first()?;
                let slot = first.as_field()?;
                (self.slot_key(&node.id, slot)?, rest)
            }
            _ => return None,
        };

        let code = format!("{}{}", self.binding_of(&key).value, render_segments(rest));
        Some((key, code))
    }

    fn report_misplaced_runtime(&mut self, owner: &Node, prop: &str) {
        self.report(
            Diagnostic::new(
                DiagnosticKind::MisplacedRuntimeExpression,
                "Runtime expressions are only evaluated in element props",
            )
            .at(&owner.id, Some(prop)),
        );
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    // ---- Markup ----

    fn resolve_markup_props(&mut self) -> BTreeMap<NodeId, BTreeMap<String, ResolvedProp>> {
        let mut result = BTreeMap::new();

        for element in self.markup.clone() {
            let Some(component) = element.component().filter(|c| self.schema.knows(c)) else {
                // Rendered as a bare fragment
                result.insert(element.id.clone(), BTreeMap::new());
                continue;
            };

            let mut props = BTreeMap::new();
            if let Some(values) = element.props() {
                for (prop, value) in values {
                    let key = StateKey::Prop {
                        node: element.id.clone(),
                        prop: prop.clone(),
                    };
                    let resolved = if self.entries.contains_key(&key) {
                        self.controlled(&key)
                    } else {
                        let mut deps = Vec::new();
                        ResolvedProp::Value(self.resolve_value(
                            element,
                            prop,
                            value,
                            Position::Markup,
                            &mut deps,
                        ))
                    };
                    props.insert(prop.clone(), resolved);
                }
            }

            for prop in self.schema.controlled_props(component) {
                if props.contains_key(&prop) {
                    continue;
                }
                let key = StateKey::Prop {
                    node: element.id.clone(),
                    prop: prop.clone(),
                };
                props.insert(prop, self.controlled(&key));
            }

            result.insert(element.id.clone(), props);
        }

        result
    }

    fn controlled(&mut self, key: &StateKey) -> ResolvedProp {
        let StateBinding { value, setter } = self.binding_of(key);
        ResolvedProp::Controlled { value, setter }
    }

    /// Page scope object entries: state by node name, slots and controlled
    /// props grouped under their page or element name
    fn runtime_scope(&mut self) -> Vec<(String, String)> {
        let mut direct: BTreeMap<String, String> = BTreeMap::new();
        let mut grouped: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

        for key in self.order.clone() {
            let value = self.binding_of(&key).value;
            let (owner, field) = match &key {
                StateKey::Node(_) => {
                    direct.insert(self.label(&key), value);
                    continue;
                }
                StateKey::PageSlot { page, slot } => (page, slot),
                StateKey::Prop { node, prop } => (node, prop),
            };
            let owner_name = self
                .document
                .get_node(owner)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| owner.to_string());
            grouped
                .entry(owner_name)
                .or_default()
                .insert(field.clone(), value);
        }

        for (name, fields) in grouped {
            let fields: Vec<String> = fields
                .iter()
                .map(|(field, value)| format!("{}: {}", object_key(field), value))
                .collect();
            direct.insert(name, format!("{{ {} }}", fields.join(", ")));
        }

        direct
            .into_iter()
            .map(|(name, value)| (object_key(&name), value))
            .collect()
    }
}

fn push_code(out: &mut String, code: &str, format: BindingFormat) {
    match format {
        BindingFormat::StringLiteral => {
            out.push_str("${");
            out.push_str(code);
            out.push('}');
        }
        BindingFormat::Expression => out.push_str(code),
    }
}

fn escape_template_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn to_json(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| PLACEHOLDER.to_string())
}

/// Opaque reference token for a secret, never its value
pub fn secret_token(reference: &str) -> String {
    format!("{{ \"$$secret\": {} }}", to_json(&serde_json::Value::from(reference)))
}

/// Key usable in an object literal
fn object_key(name: &str) -> String {
    if to_identifier(name) == name {
        name.to_string()
    } else {
        to_json(&serde_json::Value::from(name))
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
