//! # Pagecraft Bindings
//!
//! Resolves the `{{name.path}}` interpolations and direct bindings of a
//! page into generated expressions, and orders the page's stateful
//! constructs by their dependencies.
//!
//! ```text
//! Document ──► BindingResolver ──► PageBindings
//!                 │                  ├── declarations (dependencies first)
//!                 │                  ├── resolved element props
//!                 │                  └── diagnostics (warnings)
//!                 └── CycleError (fatal for the page)
//! ```
//!
//! Unresolvable names never fail resolution: they produce a warning and
//! the placeholder `undefined`.

mod diagnostics;
mod error;
pub mod graph;
pub mod lexer;
mod resolver;
mod state;
pub mod template;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{BindingError, BindingResult, CycleError, TemplateParseError};
pub use graph::DependencyGraph;
pub use resolver::{
    markup_elements, resolve_page, secret_token, BindingResolver, PageBindings, CHILDREN_SLOT,
    STATE_VALUE_SLOT,
};
pub use state::{
    PropSchema, ResolvedProp, ResolvedValue, StateBinding, StateDeclaration, StateKey,
    StateSource, PLACEHOLDER,
};
pub use template::{parse_reference, parse_template, PathSegment, Reference, Template, TemplatePart};
