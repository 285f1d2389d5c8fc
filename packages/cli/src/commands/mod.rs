pub mod check;
pub mod compile;
pub mod init;

pub use check::{check, CheckArgs};
pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use pagecraft_compiler_react::Diagnostic;
use pagecraft_dom::{Document, DomError};
use std::path::Path;

/// Read and validate the serialized document at `path`
pub(crate) fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(anyhow!(
            "Document not found: {} (run `pagecraft init` to create one)",
            path.display()
        ));
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    match Document::from_json(&json) {
        Ok(document) => Ok(document),
        Err(DomError::Invalid(violations)) => {
            for violation in &violations {
                eprintln!("  {} {}", "✗".red(), violation);
            }
            Err(anyhow!(
                "{} is not a valid document ({} problems)",
                path.display(),
                violations.len()
            ))
        }
        Err(err) => Err(err).with_context(|| format!("Cannot load {}", path.display())),
    }
}

pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!("    {} {}", "warning:".yellow(), diagnostic);
    }
}
