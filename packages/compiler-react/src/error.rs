use pagecraft_bindings::{BindingError, CycleError};
use pagecraft_dom::ReferenceError;
use pagecraft_scope::ImportError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort compilation of one page
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid page: {0}")]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("Import allocation failed: {0}")]
    Import(#[from] ImportError),
}

impl From<BindingError> for CompileError {
    fn from(error: BindingError) -> Self {
        match error {
            BindingError::Reference(e) => CompileError::Reference(e),
            BindingError::Cycle(e) => CompileError::Cycle(e),
        }
    }
}
