use thiserror::Error;

/// Two different imports asked for the same local name
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Alias {alias} is already bound to {existing}, can't bind it to {requested}")]
pub struct NamingConflictError {
    pub alias: String,
    pub existing: String,
    pub requested: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Naming conflict: {0}")]
    NamingConflict(#[from] NamingConflictError),

    #[error("{0:?} is not a valid identifier")]
    InvalidIdentifier(String),
}
