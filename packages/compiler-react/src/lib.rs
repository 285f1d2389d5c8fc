//! # Pagecraft React Compiler
//!
//! Generates one React function component per page of a document.
//!
//! ```rust,ignore
//! use pagecraft_compiler_react::{compile_page, CompileOptions, ComponentCatalog};
//!
//! let catalog = ComponentCatalog::builtin();
//! let page = compile_page(&document, &page_id, &catalog, &CompileOptions::default())?;
//! println!("{}", page.source);
//! for warning in &page.diagnostics {
//!     eprintln!("{}", warning);
//! }
//! ```
//!
//! Output is deterministic: the same document and registry always give
//! byte-identical source.

mod compiler;
mod context;
mod declarations;
mod error;
pub mod pretty;
mod registry;

pub use compiler::{
    compile_application, compile_page, component_name_for, CompiledPage, PageOutput,
};
pub use context::{CompileOptions, CompilerContext, DEFAULT_RUNTIME_MODULE};
pub use declarations::{render_declaration, Hooks};
pub use error::{CompileError, CompileResult};
pub use pretty::{format_source, FormatError};
pub use registry::{
    render_jsx, ComponentCatalog, ComponentDefinition, ComponentRegistry, ControlledProp,
    PropDefinition, PropKind, RegistrySchema, RenderRequest, BUILTIN_SOURCE, CHILDREN_SLOT,
};

pub use pagecraft_bindings::{Diagnostic, DiagnosticKind};
