use pagecraft_dom::ReferenceError;
use thiserror::Error;

/// A `{{...}}` interpolation that couldn't be parsed.
///
/// Positions are byte offsets into the whole bound expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateParseError {
    #[error("Unclosed interpolation starting at {pos}")]
    Unclosed { pos: usize },

    #[error("Empty interpolation at {pos}")]
    Empty { pos: usize },

    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of interpolation at {pos}: expected {expected}")]
    UnexpectedEnd { pos: usize, expected: String },

    #[error("Invalid character at {pos}")]
    InvalidToken { pos: usize },
}

impl TemplateParseError {
    pub fn unexpected_token(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_end(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEnd {
            pos,
            expected: expected.into(),
        }
    }
}

/// Stateful nodes that depend on each other in a loop
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Dependency cycle at {node}: {}", path.join(" -> "))]
pub struct CycleError {
    /// The node that was reached again while still being visited
    pub node: String,
    /// The loop, starting and ending at `node`
    pub path: Vec<String>,
}

pub type BindingResult<T> = Result<T, BindingError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Cycle(#[from] CycleError),
}
