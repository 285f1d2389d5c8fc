use super::{load_document, print_diagnostics};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_react::{compile_application, compile_page, PageOutput};
use std::fs;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Compile only the page with this name
    #[arg(short, long)]
    pub page: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Wrap elements in node markers for the editor overlay
    #[arg(long)]
    pub editor: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = load_document(&config.get_document_path(cwd))?;
    let catalog = config.catalog();
    let options = config.compile_options(args.editor);

    if !args.stdout {
        println!("{}", "🔨 Compiling pages...".bright_blue().bold());
    }

    let outputs = match &args.page {
        Some(name) => {
            let page = document
                .page_by_name(name)
                .ok_or_else(|| anyhow!("No page named {}", name))?;
            vec![PageOutput {
                page_id: page.id.clone(),
                page_name: page.name.clone(),
                result: compile_page(&document, &page.id, &catalog, &options),
            }]
        }
        None => compile_application(&document, &catalog, &options),
    };

    if outputs.is_empty() {
        println!("{}", "⚠️  The document has no pages".yellow());
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(out) => std::path::PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for output in &outputs {
        match &output.result {
            Ok(page) if args.stdout => {
                success_count += 1;
                println!("{}", page.source);
                for diagnostic in &page.diagnostics {
                    eprintln!("{} {}", "warning:".yellow(), diagnostic);
                }
            }
            Ok(page) => {
                fs::create_dir_all(&out_dir)?;
                let output_file = out_dir.join(page.file_name());
                fs::write(&output_file, &page.source)?;
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    output.page_name,
                    output_file.display()
                );
                print_diagnostics(&page.diagnostics);
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    output.page_name,
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return match error_count {
            0 => Ok(()),
            n => Err(anyhow!("{} page(s) failed to compile", n)),
        };
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Compiled {} pages successfully",
            "✅".green(),
            success_count
        );
        Ok(())
    } else {
        println!(
            "{} Compiled {} pages, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} page(s) failed to compile", error_count))
    }
}
