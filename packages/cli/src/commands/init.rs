use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_dom::{BindableValue, Document, NodeInit};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path of the starter document
    #[arg(short, long, default_value = "app.json")]
    pub document: String,

    /// Directory generated pages are written to
    #[arg(short, long, default_value = "generated")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    let config = Config {
        document_path: args.document.clone(),
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };

    // Create starter document
    let document_path = config.get_document_path(cwd);
    if !document_path.exists() {
        if let Some(parent) = document_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&document_path, starter_document()?.to_json()?)?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} in the editor", args.document);
    println!("  2. Run: pagecraft compile");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}

/// One page with a name field and a greeting that reads it
pub(crate) fn starter_document() -> Result<Document> {
    let doc = Document::new();
    let root = doc.root_id().clone();

    let page = doc.create_node(NodeInit::page("Home").named("home"));
    let page_id = page.id.clone();
    let doc = doc.add_node(page, &root, "pages", None)?;

    let stack = doc.create_node(
        NodeInit::element("Stack")
            .named("layout")
            .with_prop("gap", BindableValue::constant(16)),
    );
    let stack_id = stack.id.clone();
    let doc = doc.add_node(stack, &page_id, "children", None)?;

    let name_input = doc.create_node(
        NodeInit::element("TextField")
            .named("nameInput")
            .with_prop("label", BindableValue::constant("Your name")),
    );
    let doc = doc.add_node(name_input, &stack_id, "children", None)?;

    let greeting = doc.create_node(
        NodeInit::element("Text")
            .named("greeting")
            .with_prop("content", BindableValue::bound("Hello {{nameInput.value}}!")),
    );
    let doc = doc.add_node(greeting, &stack_id, "children", None)?;

    Ok(doc)
}
