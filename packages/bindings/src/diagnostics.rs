//! Non-fatal problems found while compiling a page

use pagecraft_dom::NodeId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// An interpolation or binding names a node that can't be found
    UnresolvedInterpolation,
    /// An interpolation that doesn't parse
    MalformedInterpolation,
    /// A runtime expression somewhere it can't be evaluated
    MisplacedRuntimeExpression,
    /// An element whose component isn't in the registry
    UnknownComponent,
    /// A state node missing something it needs (code, api)
    IncompleteState,
    /// The pretty printer gave up
    Formatting,
}

/// Warning attached to otherwise successful output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub node_id: Option<NodeId>,
    pub prop: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            node_id: None,
            prop: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, node_id: &NodeId, prop: Option<&str>) -> Self {
        self.node_id = Some(node_id.clone());
        self.prop = prop.map(str::to_string);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.node_id, &self.prop) {
            (Some(node), Some(prop)) => write!(f, "{}.{}: {}", node, prop, self.message),
            (Some(node), None) => write!(f, "{}: {}", node, self.message),
            _ => f.write_str(&self.message),
        }
    }
}
