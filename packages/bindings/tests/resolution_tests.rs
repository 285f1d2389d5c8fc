//! Resolution against documents produced by edits

use pagecraft_bindings::{
    resolve_page, DiagnosticKind, PropSchema, ResolvedProp, ResolvedValue, StateSource,
};
use pagecraft_dom::{
    BindableValue, Document, DomAction, IdGenerator, NodeId, NodeInit, UndoStack,
};
use pagecraft_scope::Scope;

struct Fields;

impl PropSchema for Fields {
    fn controlled_props(&self, component: &str) -> Vec<String> {
        if component == "TextField" {
            vec!["value".to_string()]
        } else {
            Vec::new()
        }
    }

    fn default_value(&self, _component: &str, _prop: &str) -> Option<serde_json::Value> {
        None
    }
}

struct Editor {
    stack: UndoStack,
    ids: IdGenerator,
    page: NodeId,
}

impl Editor {
    fn new() -> Self {
        let mut ids = IdGenerator::seeded(3);
        let mut stack = UndoStack::new(Document::new_with(&mut ids));
        let root = stack.current().root_id().clone();
        let page = stack
            .current()
            .create_node_with(&mut ids, NodeInit::page("Home").named("home"));
        let page_id = page.id.clone();
        stack
            .dispatch(&DomAction::AddNode {
                node: page,
                parent_id: root,
                parent_prop: "pages".into(),
                parent_index: None,
            })
            .unwrap();
        Self {
            stack,
            ids,
            page: page_id,
        }
    }

    fn add(&mut self, init: NodeInit, prop: &str) -> NodeId {
        let node = self.stack.current().create_node_with(&mut self.ids, init);
        let id = node.id.clone();
        self.stack
            .dispatch(&DomAction::AddNode {
                node,
                parent_id: self.page.clone(),
                parent_prop: prop.into(),
                parent_index: None,
            })
            .unwrap();
        id
    }

    fn remove(&mut self, node_id: &NodeId) {
        self.stack
            .dispatch(&DomAction::RemoveNode {
                node_id: node_id.clone(),
            })
            .unwrap();
    }
}

#[test]
fn test_dangling_binding_after_removal_is_a_warning() {
    let mut editor = Editor::new();
    let source = editor.add(NodeInit::element("TextField").named("source"), "children");
    let reader = editor.add(
        NodeInit::element("Text")
            .with_prop("content", BindableValue::binding(source.clone(), "value")),
        "children",
    );

    let before = resolve_page(editor.stack.current(), &editor.page, &Fields, Scope::new()).unwrap();
    assert_eq!(
        before.prop(&reader, "content"),
        Some(&ResolvedProp::Value(ResolvedValue::Code(
            "sourceValue".to_string()
        )))
    );

    editor.remove(&source);

    let after = resolve_page(editor.stack.current(), &editor.page, &Fields, Scope::new()).unwrap();
    assert!(after.declarations.is_empty());
    assert_eq!(
        after.prop(&reader, "content"),
        Some(&ResolvedProp::Value(ResolvedValue::placeholder()))
    );
    assert_eq!(after.diagnostics.len(), 1);
    assert_eq!(
        after.diagnostics[0].kind,
        DiagnosticKind::UnresolvedInterpolation
    );
}

#[test]
fn test_dangling_interpolation_after_removal_is_a_warning() {
    let mut editor = Editor::new();
    let total = editor.add(NodeInit::derived_state("() => 1").named("total"), "derivedState");
    editor.add(
        NodeInit::derived_state("({ t }) => t * 2")
            .named("double")
            .with_param("t", BindableValue::bound("{{total}}")),
        "derivedState",
    );

    editor.remove(&total);

    let page = resolve_page(editor.stack.current(), &editor.page, &Fields, Scope::new()).unwrap();
    assert_eq!(page.declarations.len(), 1);
    assert_eq!(
        page.declarations[0].source,
        StateSource::Derived {
            code: "({ t }) => t * 2".to_string(),
            params: vec![("t".to_string(), "undefined".to_string())],
            deps: Vec::new(),
        }
    );
    assert_eq!(page.diagnostics.len(), 1);
}

#[test]
fn test_undo_restores_resolution() {
    let mut editor = Editor::new();
    let total = editor.add(NodeInit::derived_state("() => 1").named("total"), "derivedState");
    let text = editor.add(
        NodeInit::element("Text").with_prop("content", BindableValue::bound("{{total}}")),
        "children",
    );

    editor.remove(&total);
    assert!(editor.stack.undo());

    let page = resolve_page(editor.stack.current(), &editor.page, &Fields, Scope::new()).unwrap();
    assert!(page.diagnostics.is_empty());
    assert_eq!(
        page.prop(&text, "content"),
        Some(&ResolvedProp::Value(ResolvedValue::Code("total".to_string())))
    );
}

#[test]
fn test_resolution_is_deterministic() {
    let mut editor = Editor::new();
    editor.add(NodeInit::derived_state("() => [1, 2]").named("items"), "derivedState");
    editor.add(
        NodeInit::derived_state("({ items }) => items.length")
            .named("count")
            .with_param("items", BindableValue::bound("{{items}}")),
        "derivedState",
    );
    editor.add(NodeInit::element("TextField").named("filter"), "children");

    let doc = editor.stack.current();
    let first = resolve_page(doc, &editor.page, &Fields, Scope::new()).unwrap();
    let second = resolve_page(doc, &editor.page, &Fields, Scope::new()).unwrap();

    assert_eq!(first.declarations, second.declarations);
    assert_eq!(first.props, second.props);
}
