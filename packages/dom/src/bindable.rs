//! Bindable attribute values

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map of property name to value, ordered for deterministic output
pub type BindableMap = BTreeMap<String, BindableValue>;

/// How a bound expression turns into generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingFormat {
    /// Surrounding text is kept, interpolations are spliced into a template literal
    StringLiteral,
    /// The text is emitted verbatim with interpolations replaced
    Expression,
}

/// Value attached to a node property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BindableValue {
    /// Inline literal
    Const { value: serde_json::Value },

    /// Another node's named state slot
    #[serde(rename_all = "camelCase")]
    Binding { node_id: NodeId, prop: String },

    /// Text with `{{name.path}}` interpolations
    BoundExpression {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<BindingFormat>,
    },

    /// Evaluated at runtime against the page scope
    JsExpression { value: String },

    /// Reference into an external secret store
    Secret { value: String },
}

impl BindableValue {
    pub fn constant(value: impl Into<serde_json::Value>) -> Self {
        BindableValue::Const {
            value: value.into(),
        }
    }

    pub fn binding(node_id: NodeId, prop: impl Into<String>) -> Self {
        BindableValue::Binding {
            node_id,
            prop: prop.into(),
        }
    }

    pub fn bound(value: impl Into<String>) -> Self {
        BindableValue::BoundExpression {
            value: value.into(),
            format: None,
        }
    }

    pub fn bound_with_format(value: impl Into<String>, format: BindingFormat) -> Self {
        BindableValue::BoundExpression {
            value: value.into(),
            format: Some(format),
        }
    }

    pub fn js(value: impl Into<String>) -> Self {
        BindableValue::JsExpression {
            value: value.into(),
        }
    }

    pub fn secret(reference: impl Into<String>) -> Self {
        BindableValue::Secret {
            value: reference.into(),
        }
    }

    pub fn as_const(&self) -> Option<&serde_json::Value> {
        match self {
            BindableValue::Const { value } => Some(value),
            _ => None,
        }
    }

    /// Const string value, if this is one
    pub fn as_str(&self) -> Option<&str> {
        self.as_const().and_then(|v| v.as_str())
    }
}
