//! Identifier allocation for generated code.
//!
//! A [`Scope`] hands out identifiers that don't collide with anything
//! already bound in it or its parents. An [`ImportTable`] sits on the
//! module scope and deduplicates imports; sealing it yields the
//! read-only [`SealedImports`] used while rendering.

mod error;
mod imports;
mod scope;

pub use error::{ImportError, NamingConflictError};
pub use imports::{ImportTable, SealedImports};
pub use scope::{to_identifier, Scope};
