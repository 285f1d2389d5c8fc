//! Right-hand sides of state declarations, one renderer per state kind

use pagecraft_bindings::{StateBinding, StateDeclaration, StateSource};
use pagecraft_scope::to_identifier;

/// Local names of the runtime hooks a page body calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hooks {
    /// Namespace alias of `react`
    pub react: String,
    pub use_data_query: String,
    pub use_fetched_state: String,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            react: "React".to_string(),
            use_data_query: "useDataQuery".to_string(),
            use_fetched_state: "useFetchedState".to_string(),
        }
    }
}

/// One `const` statement declaring `declaration`
pub fn render_declaration(declaration: &StateDeclaration, hooks: &Hooks) -> String {
    let target = declaration_target(&declaration.binding);
    let react = &hooks.react;

    let value = match &declaration.source {
        StateSource::PageSlot { initial } => format!("{}.useState({})", react, initial),
        StateSource::ControlledPair { initial } => format!(
            "{}.useState({})",
            react,
            initial.as_deref().unwrap_or_default()
        ),
        StateSource::Computed { expression, deps } => format!(
            "{}.useMemo(() => {}, [{}])",
            react,
            expression,
            deps.join(", ")
        ),
        // User code sits on its own lines so a trailing line comment can't
        // swallow the call
        StateSource::Derived { code, params, deps } => format!(
            "{}.useMemo(() => (\n{}\n)({}), [{}])",
            react,
            code,
            object_literal(params),
            deps.join(", ")
        ),
        StateSource::Query {
            api_id,
            node_id,
            params,
        } => format!(
            "{}({}, {}, {})",
            hooks.use_data_query,
            string_literal(api_id),
            string_literal(node_id.as_str()),
            object_literal(params)
        ),
        StateSource::Fetched { params } => {
            format!("{}({})", hooks.use_fetched_state, object_literal(params))
        }
    };

    format!("const {} = {};", target, value)
}

fn declaration_target(binding: &StateBinding) -> String {
    match &binding.setter {
        Some(setter) => format!("[{}, {}]", binding.value, setter),
        None => binding.value.clone(),
    }
}

/// `{ key: value, ... }`, quoting keys that aren't identifiers
pub fn object_literal(entries: &[(String, String)]) -> String {
    if entries.is_empty() {
        return "{}".to_string();
    }
    let fields: Vec<String> = entries
        .iter()
        .map(|(key, value)| {
            if to_identifier(key) == *key {
                format!("{}: {}", key, value)
            } else {
                format!("{}: {}", string_literal(key), value)
            }
        })
        .collect();
    format!("{{ {} }}", fields.join(", "))
}

/// JSON string literal, which is also a valid JS string literal
pub fn string_literal(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_bindings::StateKey;
    use pagecraft_dom::NodeId;

    fn declaration(value: &str, setter: Option<&str>, source: StateSource) -> StateDeclaration {
        StateDeclaration {
            key: StateKey::Node(NodeId::new("n1")),
            label: value.to_string(),
            binding: StateBinding {
                value: value.to_string(),
                setter: setter.map(str::to_string),
            },
            source,
        }
    }

    #[test]
    fn test_page_slot_pair() {
        let decl = declaration(
            "count",
            Some("setCount"),
            StateSource::PageSlot {
                initial: "0".to_string(),
            },
        );
        assert_eq!(
            render_declaration(&decl, &Hooks::default()),
            "const [count, setCount] = React.useState(0);"
        );
    }

    #[test]
    fn test_controlled_pair_without_default() {
        let decl = declaration(
            "pickerValue",
            Some("setPickerValue"),
            StateSource::ControlledPair { initial: None },
        );
        assert_eq!(
            render_declaration(&decl, &Hooks::default()),
            "const [pickerValue, setPickerValue] = React.useState();"
        );
    }

    #[test]
    fn test_derived_state() {
        let decl = declaration(
            "double",
            None,
            StateSource::Derived {
                code: "({ n }) => n * 2".to_string(),
                params: vec![("n".to_string(), "total".to_string())],
                deps: vec!["total".to_string()],
            },
        );
        assert_eq!(
            render_declaration(&decl, &Hooks::default()),
            "const double = React.useMemo(() => (\n({ n }) => n * 2\n)({ n: total }), [total]);"
        );
    }

    #[test]
    fn test_computed_state() {
        let decl = declaration(
            "labelValue",
            None,
            StateSource::Computed {
                expression: "`Hi ${name}`".to_string(),
                deps: vec!["name".to_string()],
            },
        );
        assert_eq!(
            render_declaration(&decl, &Hooks::default()),
            "const labelValue = React.useMemo(() => `Hi ${name}`, [name]);"
        );
    }

    #[test]
    fn test_query_uses_hook_alias() {
        let hooks = Hooks {
            use_data_query: "useDataQuery1".to_string(),
            ..Hooks::default()
        };
        let decl = declaration(
            "users",
            None,
            StateSource::Query {
                api_id: "api0001".to_string(),
                node_id: NodeId::new("qry0001"),
                params: vec![("page size".to_string(), "10".to_string())],
            },
        );
        assert_eq!(
            render_declaration(&decl, &hooks),
            r#"const users = useDataQuery1("api0001", "qry0001", { "page size": 10 });"#
        );
    }

    #[test]
    fn test_fetched_state_without_params() {
        let decl = declaration("feed", None, StateSource::Fetched { params: Vec::new() });
        assert_eq!(
            render_declaration(&decl, &Hooks::default()),
            "const feed = useFetchedState({});"
        );
    }
}
