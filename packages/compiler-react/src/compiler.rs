//! # Page Compiler
//!
//! Compiles one page of a document into a React function component.
//!
//! ```text
//! imports     react namespace, components, runtime hooks   (sealed)
//!     ↓
//! bindings    resolve_page → ordered declarations + props
//!     ↓
//! body        const declarations, page scope object
//!     ↓
//! markup      registry renders each element, slots first
//!     ↓
//! pretty      best-effort re-indent, raw text on failure
//! ```

use crate::context::{CompileOptions, CompilerContext};
use crate::declarations::{render_declaration, string_literal, Hooks};
use crate::error::CompileResult;
use crate::pretty::format_source;
use crate::registry::{
    push_indented, render_jsx, wrap_fragments, ComponentDefinition, ComponentRegistry,
    RegistrySchema, RenderRequest, CHILDREN_SLOT,
};
use pagecraft_bindings::{
    markup_elements, resolve_page, Diagnostic, DiagnosticKind, PageBindings, PropSchema, ResolvedProp,
    ResolvedValue,
};
use pagecraft_dom::{BindableValue, Document, Node, NodeId, NodeType};
use pagecraft_scope::{ImportTable, Scope, SealedImports};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

const REACT_MODULE: &str = "react";
const USE_DATA_QUERY: &str = "useDataQuery";
const USE_FETCHED_STATE: &str = "useFetchedState";
const EVALUATE_EXPRESSION: &str = "evaluateExpression";
const NODE_MARKER: &str = "NodeMarker";

/// Generated source of one page
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPage {
    pub page_id: NodeId,
    pub page_name: String,
    /// Name of the exported function component
    pub component_name: String,
    pub source: String,
    /// Warnings collected while compiling
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledPage {
    pub fn file_name(&self) -> String {
        format!("{}.jsx", self.component_name)
    }
}

/// Outcome for one page of [`compile_application`]
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutput {
    pub page_id: NodeId,
    pub page_name: String,
    pub result: CompileResult<CompiledPage>,
}

/// Compile every page independently. A page that fails doesn't stop the
/// others.
pub fn compile_application(
    document: &Document,
    registry: &dyn ComponentRegistry,
    options: &CompileOptions,
) -> Vec<PageOutput> {
    document
        .pages()
        .into_iter()
        .map(|page| {
            let result = compile_page(document, &page.id, registry, options);
            if let Err(error) = &result {
                warn!(page = %page.name, %error, "Page failed to compile");
            }
            PageOutput {
                page_id: page.id.clone(),
                page_name: page.name.clone(),
                result,
            }
        })
        .collect()
}

/// Compile the page `page_id` to a module with one default export
#[instrument(skip_all, fields(page = %page_id))]
pub fn compile_page(
    document: &Document,
    page_id: &NodeId,
    registry: &dyn ComponentRegistry,
    options: &CompileOptions,
) -> CompileResult<CompiledPage> {
    let page = document.node_of_type(page_id, NodeType::Page)?;
    let schema = RegistrySchema(registry);
    let page_state: Vec<NodeType> = document
        .child_nodes(page_id)
        .into_values()
        .flatten()
        .map(Node::node_type)
        .filter(|t| t.is_page_state())
        .collect();
    // Elements outside the rendered tree get no imports and no state
    let elements = markup_elements(document, page_id);

    let mut diagnostics = Vec::new();

    // ---- Imports ----

    let mut imports = ImportTable::new();
    imports.import_namespace(REACT_MODULE, "React")?;

    let mut runtime_props = false;
    for element in &elements {
        match element.component().and_then(|c| registry.definition(c)) {
            Some(definition) => {
                imports.import_named(&definition.source, definition.export_name());
                runtime_props |= has_runtime_prop(element, &schema);
            }
            None => {
                let message = match element.component() {
                    Some(component) => format!("Unknown component `{}`", component),
                    None => format!("Element `{}` has no component", element.name),
                };
                warn!(node = %element.id, "{}", message);
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::UnknownComponent, message)
                        .at(&element.id, Some("component")),
                );
            }
        }
    }

    let runtime = options.runtime_module.as_str();
    if page_state.contains(&NodeType::QueryState) {
        imports.import_named(runtime, USE_DATA_QUERY);
    }
    if page_state.contains(&NodeType::FetchedState) {
        imports.import_named(runtime, USE_FETCHED_STATE);
    }
    if runtime_props {
        imports.import_named(runtime, EVALUATE_EXPRESSION);
    }
    if options.editor_mode && !elements.is_empty() {
        imports.import_named(runtime, NODE_MARKER);
    }

    let component_name = imports.declare(&component_name_for(&page.name));
    let imports = imports.seal();

    // ---- Bindings ----

    let function_scope = Scope::with_parent(imports.scope());
    let mut bindings = resolve_page(document, page_id, &schema, function_scope)?;
    let page_scope = bindings
        .uses_runtime
        .then(|| bindings.scope.create_unique_binding("pageScope"));
    diagnostics.append(&mut bindings.diagnostics);

    let hooks = Hooks {
        react: imports
            .namespace_of(REACT_MODULE)
            .unwrap_or("React")
            .to_string(),
        use_data_query: alias_or(&imports, runtime, USE_DATA_QUERY),
        use_fetched_state: alias_or(&imports, runtime, USE_FETCHED_STATE),
    };

    // ---- Body ----

    let ctx = CompilerContext::new(options.clone());
    ctx.add(&imports.render());
    ctx.add("\n");
    ctx.add_line(&format!("export default function {}() {{", component_name));
    ctx.indent();

    for declaration in &bindings.declarations {
        // Continuation lines of user code are left for the pretty printer
        ctx.add_indented(&render_declaration(declaration, &hooks));
        ctx.add("\n");
    }
    if let Some(name) = &page_scope {
        let fields: Vec<String> = bindings
            .runtime_scope
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        let literal = if fields.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", fields.join(", "))
        };
        ctx.add_line(&format!("const {} = {};", name, literal));
    }
    if !bindings.declarations.is_empty() || page_scope.is_some() {
        ctx.add("\n");
    }

    let renderer = MarkupRenderer {
        document,
        bindings: &bindings,
        registry,
        imports: &imports,
        options,
        hooks: &hooks,
        evaluate: alias_or(&imports, runtime, EVALUATE_EXPRESSION),
        page_scope: page_scope.as_deref().unwrap_or("{}"),
        marker: options
            .editor_mode
            .then(|| alias_or(&imports, runtime, NODE_MARKER)),
    };
    let roots: Vec<String> = document
        .children_in(page_id, CHILDREN_SLOT)
        .into_iter()
        .filter(|n| n.node_type() == NodeType::Element)
        .map(|n| renderer.render_element(n))
        .collect();

    if roots.is_empty() {
        ctx.add_line("return null;");
    } else {
        ctx.add_line("return (");
        ctx.indent();
        ctx.add_lines(&wrap_fragments(&roots));
        ctx.dedent();
        ctx.add_line(");");
    }
    ctx.dedent();
    ctx.add_line("}");

    let raw = ctx.get_output();
    let source = if options.pretty {
        match format_source(&raw) {
            Ok(formatted) => formatted,
            Err(error) => {
                warn!(%error, "Formatting skipped");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::Formatting,
                    format!("Output left unformatted: {}", error),
                ));
                raw
            }
        }
    } else {
        raw
    };

    info!(
        page = %page.name,
        component = %component_name,
        declarations = bindings.declarations.len(),
        warnings = diagnostics.len(),
        "Compiled page"
    );

    Ok(CompiledPage {
        page_id: page.id.clone(),
        page_name: page.name.clone(),
        component_name,
        source,
        diagnostics,
    })
}

struct MarkupRenderer<'a> {
    document: &'a Document,
    bindings: &'a PageBindings,
    registry: &'a dyn ComponentRegistry,
    imports: &'a SealedImports,
    options: &'a CompileOptions,
    hooks: &'a Hooks,
    evaluate: String,
    page_scope: &'a str,
    marker: Option<String>,
}

impl MarkupRenderer<'_> {
    fn render_element(&self, element: &Node) -> String {
        let slots: BTreeMap<String, Vec<String>> = self
            .document
            .child_nodes(&element.id)
            .into_iter()
            .map(|(slot, children)| {
                let rendered = children
                    .into_iter()
                    .filter(|n| n.node_type() == NodeType::Element)
                    .map(|n| self.render_element(n))
                    .collect();
                (slot.to_string(), rendered)
            })
            .collect();

        let component = element.component().unwrap_or_default();
        let fragment = match self.registry.definition(component) {
            Some(definition) => {
                let tag = self
                    .imports
                    .alias_of(&definition.source, definition.export_name())
                    .unwrap_or(definition.export_name());
                let attributes = self.attributes(element, definition);
                self.registry.render(&RenderRequest {
                    tag,
                    component,
                    attributes: &attributes,
                    slots: &slots,
                    options: self.options,
                })
            }
            None => {
                // Keep the children visible when the component itself isn't
                let mut flattened = BTreeMap::new();
                flattened.insert(
                    CHILDREN_SLOT.to_string(),
                    slots.into_values().flatten().collect::<Vec<_>>(),
                );
                let tag = format!("{}.Fragment", self.hooks.react);
                render_jsx(&RenderRequest {
                    tag: &tag,
                    component,
                    attributes: &[],
                    slots: &flattened,
                    options: self.options,
                })
            }
        };

        match &self.marker {
            Some(marker) => {
                let mut out = format!(
                    "<{} nodeId={}>\n",
                    marker,
                    string_literal(element.id.as_str())
                );
                push_indented(&mut out, &fragment, 1);
                out.push_str(&format!("</{}>", marker));
                out
            }
            None => fragment,
        }
    }

    /// `(name, {expression})` pairs in prop name order, each controlled
    /// prop followed by its change event
    fn attributes(&self, element: &Node, definition: &ComponentDefinition) -> Vec<(String, String)> {
        let Some(props) = self.bindings.element_props(&element.id) else {
            return Vec::new();
        };

        let mut attributes = Vec::new();
        for (name, prop) in props {
            match prop {
                ResolvedProp::Value(ResolvedValue::Code(code)) => {
                    attributes.push((name.clone(), format!("{{{}}}", code)));
                }
                ResolvedProp::Value(ResolvedValue::Runtime(source)) => {
                    attributes.push((
                        name.clone(),
                        format!(
                            "{{{}({}, {})}}",
                            self.evaluate,
                            string_literal(source),
                            self.page_scope
                        ),
                    ));
                }
                ResolvedProp::Controlled { value, setter } => {
                    attributes.push((name.clone(), format!("{{{}}}", value)));

                    let change_event = definition
                        .props
                        .get(name)
                        .and_then(|p| p.controlled.as_ref())
                        .map(|c| c.change_event.as_str());
                    if let (Some(setter), Some(event)) = (setter, change_event) {
                        if !props.contains_key(event) {
                            attributes.push((event.to_string(), format!("{{{}}}", setter)));
                        }
                    }
                }
            }
        }
        attributes
    }
}

fn alias_or(imports: &SealedImports, source: &str, name: &str) -> String {
    imports.alias_of(source, name).unwrap_or(name).to_string()
}

/// Whether markup evaluates one of the element's props at runtime
fn has_runtime_prop(element: &Node, schema: &dyn PropSchema) -> bool {
    let component = element.component().unwrap_or_default();
    element.props().is_some_and(|props| {
        props.iter().any(|(name, value)| {
            matches!(value, BindableValue::JsExpression { .. })
                && !schema.is_controlled(component, name)
        })
    })
}

/// `order-history` → `OrderHistory`
pub fn component_name_for(page_name: &str) -> String {
    let name: String = page_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    match name.chars().next() {
        None => "Page".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Page{}", name),
        Some(_) => name,
    }
}
