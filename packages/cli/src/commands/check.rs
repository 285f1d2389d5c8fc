use super::{load_document, print_diagnostics};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_react::compile_application;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Validate the document and compile every page without writing output
pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let document_path = config.get_document_path(cwd);

    println!("🔍 {} {}", "Checking".green().bold(), document_path.display());

    let document = load_document(&document_path)?;
    let outputs = compile_application(&document, &config.catalog(), &config.compile_options(false));

    let mut total_warnings = 0;
    let mut total_errors = 0;

    for output in &outputs {
        match &output.result {
            Ok(page) => {
                let mark = if page.diagnostics.is_empty() {
                    "✓".green()
                } else {
                    "⚠".yellow()
                };
                println!("  {} {}", mark, output.page_name);
                print_diagnostics(&page.diagnostics);
                total_warnings += page.diagnostics.len();
            }
            Err(e) => {
                total_errors += 1;
                println!("  {} {} - {}", "✗".red(), output.page_name, e.to_string().red());
            }
        }
    }

    println!();
    println!(
        "   {} pages, {} errors, {} warnings",
        outputs.len(),
        total_errors,
        total_warnings
    );

    if total_errors > 0 {
        return Err(anyhow!("{} page(s) have errors", total_errors));
    }
    if args.deny_warnings && total_warnings > 0 {
        return Err(anyhow!("{} warning(s) found", total_warnings));
    }
    Ok(())
}
