//! # Component Registry
//!
//! The generator never hard-codes component behavior. It asks a
//! [`ComponentRegistry`] for each component's prop schema and hands it the
//! resolved props and rendered child slots to get a markup fragment.
//!
//! ```text
//! element "TextField" ──► definition()  import source, props, controlled
//!                     └─► render()      <TextField value={v} onChange={setV} />
//! ```

use crate::context::CompileOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use pagecraft_bindings::PropSchema;
/// Slot rendered as JSX children rather than a prop
pub use pagecraft_bindings::CHILDREN_SLOT;

/// Module the built-in catalog is imported from
pub const BUILTIN_SOURCE: &str = "@pagecraft/components";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropKind {
    String,
    Number,
    Boolean,
    Json,
    Event,
}

/// Change-back wiring of a controlled prop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlledProp {
    /// Event prop the component calls with the new value
    pub change_event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDefinition {
    pub kind: PropKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled: Option<ControlledProp>,
}

impl PropDefinition {
    pub fn new(kind: PropKind) -> Self {
        Self {
            kind,
            default_value: None,
            controlled: None,
        }
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn controlled(mut self, change_event: &str) -> Self {
        self.controlled = Some(ControlledProp {
            change_event: change_event.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub name: String,
    /// Module to import the component from
    pub source: String,
    /// Exported name, when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
    #[serde(default)]
    pub props: BTreeMap<String, PropDefinition>,
}

impl ComponentDefinition {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            export_name: None,
            props: BTreeMap::new(),
        }
    }

    pub fn with_prop(mut self, name: &str, prop: PropDefinition) -> Self {
        self.props.insert(name.to_string(), prop);
        self
    }

    pub fn export_name(&self) -> &str {
        self.export_name.as_deref().unwrap_or(&self.name)
    }

    pub fn controlled_props(&self) -> impl Iterator<Item = (&str, &ControlledProp)> {
        self.props
            .iter()
            .filter_map(|(name, prop)| prop.controlled.as_ref().map(|c| (name.as_str(), c)))
    }
}

/// Everything a registry needs to render one element
pub struct RenderRequest<'a> {
    /// Local alias the component was imported under
    pub tag: &'a str,
    /// Component name the element asked for
    pub component: &'a str,
    /// `(prop, {expression})` pairs in emission order
    pub attributes: &'a [(String, String)],
    /// Rendered children by slot name
    pub slots: &'a BTreeMap<String, Vec<String>>,
    pub options: &'a CompileOptions,
}

/// Source of component schemas and renderers
pub trait ComponentRegistry {
    fn definition(&self, component: &str) -> Option<&ComponentDefinition>;

    /// Render one element as a (possibly multi-line) markup fragment
    fn render(&self, request: &RenderRequest<'_>) -> String {
        render_jsx(request)
    }
}

/// Registry backed by a map of definitions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentCatalog {
    components: BTreeMap<String, ComponentDefinition>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text, Button, TextField, Select, Image, Stack and DataGrid
    pub fn builtin() -> Self {
        use PropKind::*;

        let mut catalog = Self::new();
        catalog.register(
            ComponentDefinition::new("Text", BUILTIN_SOURCE)
                .with_prop("content", PropDefinition::new(String))
                .with_prop("variant", PropDefinition::new(String)),
        );
        catalog.register(
            ComponentDefinition::new("Button", BUILTIN_SOURCE)
                .with_prop("label", PropDefinition::new(String))
                .with_prop("disabled", PropDefinition::new(Boolean))
                .with_prop("onClick", PropDefinition::new(Event)),
        );
        catalog.register(
            ComponentDefinition::new("TextField", BUILTIN_SOURCE)
                .with_prop(
                    "value",
                    PropDefinition::new(String)
                        .with_default(serde_json::json!(""))
                        .controlled("onChange"),
                )
                .with_prop("label", PropDefinition::new(String))
                .with_prop("placeholder", PropDefinition::new(String)),
        );
        catalog.register(
            ComponentDefinition::new("Select", BUILTIN_SOURCE)
                .with_prop(
                    "value",
                    PropDefinition::new(Json)
                        .with_default(serde_json::Value::Null)
                        .controlled("onChange"),
                )
                .with_prop("options", PropDefinition::new(Json).with_default(serde_json::json!([])))
                .with_prop("label", PropDefinition::new(String)),
        );
        catalog.register(
            ComponentDefinition::new("Image", BUILTIN_SOURCE)
                .with_prop("src", PropDefinition::new(String))
                .with_prop("alt", PropDefinition::new(String)),
        );
        catalog.register(
            ComponentDefinition::new("Stack", BUILTIN_SOURCE)
                .with_prop(
                    "direction",
                    PropDefinition::new(String).with_default(serde_json::json!("column")),
                )
                .with_prop("gap", PropDefinition::new(Number)),
        );
        catalog.register(
            ComponentDefinition::new("DataGrid", BUILTIN_SOURCE)
                .with_prop("rows", PropDefinition::new(Json).with_default(serde_json::json!([])))
                .with_prop("columns", PropDefinition::new(Json))
                .with_prop(
                    "selection",
                    PropDefinition::new(Json)
                        .with_default(serde_json::Value::Null)
                        .controlled("onSelectionChange"),
                ),
        );
        catalog
    }

    /// Add or replace a definition
    pub fn register(&mut self, definition: ComponentDefinition) {
        self.components.insert(definition.name.clone(), definition);
    }

    pub fn extend(&mut self, definitions: impl IntoIterator<Item = ComponentDefinition>) {
        for definition in definitions {
            self.register(definition);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

impl ComponentRegistry for ComponentCatalog {
    fn definition(&self, component: &str) -> Option<&ComponentDefinition> {
        self.components.get(component)
    }
}

/// Exposes a registry's controlled props to the binding resolver
pub struct RegistrySchema<'a>(pub &'a dyn ComponentRegistry);

impl PropSchema for RegistrySchema<'_> {
    fn knows(&self, component: &str) -> bool {
        self.0.definition(component).is_some()
    }

    fn controlled_props(&self, component: &str) -> Vec<String> {
        self.0
            .definition(component)
            .map(|d| d.controlled_props().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default()
    }

    fn default_value(&self, component: &str, prop: &str) -> Option<serde_json::Value> {
        self.0
            .definition(component)?
            .props
            .get(prop)?
            .default_value
            .clone()
    }
}

/// Default renderer.
///
/// Without named slots the opening tag stays on one line; with them each
/// attribute and slot gets its own line:
///
/// ```text
/// <Card                        <Text content={"Hi"} />
///   header={
///     <Text content={"Hi"} />
///   }
/// >
///   ...children
/// </Card>
/// ```
pub fn render_jsx(request: &RenderRequest<'_>) -> String {
    let tag = request.tag;
    let children = request
        .slots
        .get(CHILDREN_SLOT)
        .filter(|children| !children.is_empty());
    let named: Vec<(&String, &Vec<String>)> = request
        .slots
        .iter()
        .filter(|(slot, children)| slot.as_str() != CHILDREN_SLOT && !children.is_empty())
        .collect();

    let mut out = String::new();

    if named.is_empty() {
        out.push('<');
        out.push_str(tag);
        for (name, value) in request.attributes {
            out.push_str(&format!(" {}={}", name, value));
        }
        match children {
            None => out.push_str(" />"),
            Some(children) => {
                out.push_str(">\n");
                push_indented(&mut out, &children.join("\n"), 1);
                out.push_str(&format!("</{}>", tag));
            }
        }
        return out;
    }

    out.push_str(&format!("<{}\n", tag));
    for (name, value) in request.attributes {
        out.push_str(&format!("  {}={}\n", name, value));
    }
    for (slot, fragments) in named {
        out.push_str(&format!("  {}={{\n", slot));
        push_indented(&mut out, &wrap_fragments(fragments), 2);
        out.push_str("  }\n");
    }
    match children {
        None => out.push_str("/>"),
        Some(children) => {
            out.push_str(">\n");
            push_indented(&mut out, &children.join("\n"), 1);
            out.push_str(&format!("</{}>", tag));
        }
    }
    out
}

/// One fragment as is, several inside `<>...</>`
pub fn wrap_fragments(fragments: &[String]) -> String {
    match fragments {
        [single] => single.clone(),
        many => {
            let mut out = String::from("<>\n");
            push_indented(&mut out, &many.join("\n"), 1);
            out.push_str("</>");
            out
        }
    }
}

/// Append `text` with every line indented by `level` steps, newline terminated
pub fn push_indented(out: &mut String, text: &str, level: usize) {
    let indent = "  ".repeat(level);
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(&indent);
            out.push_str(line);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(
        tag: &'a str,
        attributes: &'a [(String, String)],
        slots: &'a BTreeMap<String, Vec<String>>,
        options: &'a CompileOptions,
    ) -> RenderRequest<'a> {
        RenderRequest {
            tag,
            component: tag,
            attributes,
            slots,
            options,
        }
    }

    #[test]
    fn test_builtin_controlled_props() {
        let catalog = ComponentCatalog::builtin();
        let schema = RegistrySchema(&catalog);

        assert_eq!(schema.controlled_props("TextField"), vec!["value"]);
        assert_eq!(schema.controlled_props("DataGrid"), vec!["selection"]);
        assert!(schema.controlled_props("Text").is_empty());
        assert!(schema.controlled_props("Unknown").is_empty());
        assert_eq!(
            schema.default_value("TextField", "value"),
            Some(serde_json::json!(""))
        );
    }

    #[test]
    fn test_render_self_closing() {
        let attributes = vec![("content".to_string(), "{\"Hi\"}".to_string())];
        let slots = BTreeMap::new();
        let options = CompileOptions::default();

        assert_eq!(
            render_jsx(&request("Text", &attributes, &slots, &options)),
            "<Text content={\"Hi\"} />"
        );
    }

    #[test]
    fn test_render_children() {
        let mut slots = BTreeMap::new();
        slots.insert(
            CHILDREN_SLOT.to_string(),
            vec!["<A />".to_string(), "<B>\n  <C />\n</B>".to_string()],
        );
        let options = CompileOptions::default();

        assert_eq!(
            render_jsx(&request("Stack", &[], &slots, &options)),
            "<Stack>\n  <A />\n  <B>\n    <C />\n  </B>\n</Stack>"
        );
    }

    #[test]
    fn test_render_named_slots() {
        let attributes = vec![("elevation".to_string(), "{2}".to_string())];
        let mut slots = BTreeMap::new();
        slots.insert("header".to_string(), vec!["<A />".to_string(), "<B />".to_string()]);
        let options = CompileOptions::default();

        assert_eq!(
            render_jsx(&request("Card", &attributes, &slots, &options)),
            "<Card\n  elevation={2}\n  header={\n    <>\n      <A />\n      <B />\n    </>\n  }\n/>"
        );
    }

    #[test]
    fn test_definitions_deserialize_from_config_shape() {
        let definition: ComponentDefinition = serde_json::from_value(serde_json::json!({
            "name": "Rating",
            "source": "@acme/widgets",
            "props": {
                "value": { "kind": "number", "defaultValue": 3, "controlled": { "changeEvent": "onRate" } },
                "max": { "kind": "number" }
            }
        }))
        .unwrap();

        assert_eq!(definition.export_name(), "Rating");
        let controlled: Vec<_> = definition.controlled_props().collect();
        assert_eq!(controlled.len(), 1);
        assert_eq!(controlled[0].0, "value");
        assert_eq!(controlled[0].1.change_event, "onRate");
    }

    #[test]
    fn test_extend_replaces_builtins() {
        let mut catalog = ComponentCatalog::builtin();
        catalog.extend([ComponentDefinition::new("Text", "@acme/widgets")]);
        assert_eq!(catalog.definition("Text").unwrap().source, "@acme/widgets");
        assert_eq!(catalog.names().count(), 7);
    }
}
