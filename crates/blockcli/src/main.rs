// crates/blockcli/src/main.rs

use anyhow::{Context, Result};
use blockcore::{
    export_file_name, Config, DocumentError, ElementEvent, ElementKind, ElementStatus, ExecutionEvent, WorkflowDocument,
};
use blockruntime::{RuntimeConfig, WorkflowSession};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockflow")]
#[command(about = "Build and run element workflows", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty workflow file
    New {
        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// Append an element of the given type
    Add {
        /// Element type (see `blockflow kinds`)
        kind: String,

        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// Delete the element at an index
    Remove {
        index: usize,

        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// Set config fields on an element, as key=value pairs
    Set {
        index: usize,

        /// Values are parsed as JSON when possible, otherwise kept as text
        fields: Vec<String>,

        /// Fill in the form defaults for the element's type first
        #[arg(long)]
        defaults: bool,

        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// Attach a PDF to a pdf_upload element (records its name and size)
    Attach {
        index: usize,

        pdf: PathBuf,

        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// Run the workflow and print each element's result
    Run {
        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,

        /// Pause before each element, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,

        /// Fail elements that take longer than this, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Write the resulting statuses back to the workflow file
        #[arg(long)]
        save: bool,
    },

    /// Remove every element
    Clear {
        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// List elements, their status and a summary
    Show {
        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// Write a timestamped copy of the workflow
    Export {
        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,

        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Replace the workflow with an exported one
    Import {
        source: PathBuf,

        #[arg(short, long, default_value = "workflow.json")]
        file: PathBuf,
    },

    /// List available element types and their fields
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Run { .. }, false) => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::New { file } => {
            let session = new_session(RuntimeConfig::default());
            save(&session, &file)?;
            println!("✨ Created empty workflow: {}", file.display());
        }

        Commands::Add { kind, file } => {
            let kind: ElementKind = kind.parse()?;
            let mut session = if file.exists() {
                load(&file, RuntimeConfig::default())?
            } else {
                new_session(RuntimeConfig::default())
            };
            let element = session.add_element(kind);
            let (name, id) = (element.kind().display_name().into_owned(), element.id().clone());
            let index = session.document().len() - 1;
            println!("➕ Added {} ({}) at index {}", name, id, index);
            save(&session, &file)?;
        }

        Commands::Remove { index, file } => {
            let mut session = load(&file, RuntimeConfig::default())?;
            let removed = session.remove_element(index)?;
            println!("🗑️  Removed {} ({})", removed.kind().display_name(), removed.id());
            save(&session, &file)?;
        }

        Commands::Set {
            index,
            fields,
            defaults,
            file,
        } => {
            let mut session = load(&file, RuntimeConfig::default())?;
            let status = configure(&mut session, index, &fields, defaults)?;
            if let Some(element) = session.document().get(index) {
                println!("⚙️  {} is now {}", element.kind().display_name(), status);
            }
            save(&session, &file)?;
        }

        Commands::Attach { index, pdf, file } => {
            let mut session = load(&file, RuntimeConfig::default())?;
            let config = attach_pdf(&pdf)?;
            let status = session.update_config(index, config)?;
            println!("📄 Attached {} ({})", pdf.display(), status);
            save(&session, &file)?;
        }

        Commands::Run {
            file,
            delay_ms,
            timeout_ms,
            save: write_back,
        } => {
            let config = RuntimeConfig {
                step_delay_ms: delay_ms,
                element_timeout_ms: timeout_ms,
                ..RuntimeConfig::default()
            };
            let mut session = load(&file, config)?;
            run_workflow(&mut session).await?;
            if write_back {
                save(&session, &file)?;
            }
        }

        Commands::Clear { file } => {
            let mut session = load(&file, RuntimeConfig::default())?;
            session.clear();
            save(&session, &file)?;
            println!("🧹 Cleared workflow: {}", file.display());
        }

        Commands::Show { file } => {
            let session = load(&file, RuntimeConfig::default())?;
            show_workflow(session.document());
        }

        Commands::Export { file, out_dir } => {
            let session = load(&file, RuntimeConfig::default())?;
            let target = out_dir.join(export_file_name(&chrono::Local::now()));
            save(&session, &target)?;
            tracing::info!("Exported {} elements to {}", session.document().len(), target.display());
            println!("💾 Exported workflow to {}", target.display());
        }

        Commands::Import { source, file } => {
            let json = std::fs::read_to_string(&source)
                .with_context(|| format!("Failed to read {}", source.display()))?;
            let mut session = new_session(RuntimeConfig::default());
            match session.import_json(&json) {
                Ok(count) => {
                    save(&session, &file)?;
                    println!("✅ Workflow imported successfully! Loaded {} elements.", count);
                }
                Err(e) => {
                    tracing::error!("Import of {} failed: {}", source.display(), e);
                    return Err(e).context("❌ Error importing workflow");
                }
            }
        }

        Commands::Kinds => {
            list_kinds();
        }
    }

    Ok(())
}

fn new_session(config: RuntimeConfig) -> WorkflowSession {
    WorkflowSession::with_config(Arc::new(blocknodes::default_registry()), config)
}

fn load(file: &Path, config: RuntimeConfig) -> Result<WorkflowSession> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read workflow {}", file.display()))?;
    let document = WorkflowDocument::from_json_str(&json)
        .with_context(|| format!("Failed to load workflow {}", file.display()))?;
    tracing::debug!("Loaded {} elements from {}", document.len(), file.display());
    Ok(new_session(config).with_document(document))
}

fn save(session: &WorkflowSession, file: &Path) -> Result<()> {
    std::fs::write(file, session.export_json()?)
        .with_context(|| format!("Failed to write {}", file.display()))
}

/// Merge `key=value` pairs into an element's config, optionally on top of
/// its form defaults. Unknown indexes fail with `IndexOutOfRange`.
fn configure(session: &mut WorkflowSession, index: usize, pairs: &[String], defaults: bool) -> Result<ElementStatus> {
    let mut config = Config::new();
    if defaults {
        let element = session.document().get(index).ok_or(DocumentError::IndexOutOfRange {
            index,
            len: session.document().len(),
        })?;
        config = element.kind().default_config();
    }
    config.extend(parse_fields(pairs)?);

    let status = session.update_config(index, config)?;
    tracing::debug!("Element {} configured, status {}", index, status);
    Ok(status)
}

/// Parse `key=value` pairs; values that are not valid JSON stay strings
fn parse_fields(pairs: &[String]) -> Result<Config> {
    let mut config = Config::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", pair))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        config.insert(key.to_string(), value);
    }
    Ok(config)
}

/// File intake: only the name and size reach the element's config
fn attach_pdf(pdf: &Path) -> Result<Config> {
    let metadata = std::fs::metadata(pdf).with_context(|| format!("Cannot read {}", pdf.display()))?;
    let filename = pdf
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", pdf.display()))?;

    let mut config = Config::new();
    config.insert("filename".to_string(), Value::from(filename));
    config.insert("size".to_string(), Value::from(metadata.len()));
    Ok(config)
}

async fn run_workflow(session: &mut WorkflowSession) -> Result<()> {
    if session.document().is_empty() {
        println!("⚠️  No workflow elements to execute!");
        return Ok(());
    }

    println!("🚀 Executing workflow...");

    let mut events = session.subscribe_events();

    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ExecutionEvent::ElementStarted { index, kind, .. } => {
                    println!("  ⚡ [{}] {}", index, kind.display_name());
                }
                ExecutionEvent::ElementFailed { element_id, error, .. } => {
                    println!("  ❌ {} failed: {}", element_id, error);
                }
                ExecutionEvent::ElementEvent { event, .. } => match event {
                    ElementEvent::Info { message } => println!("     ℹ️  {}", message),
                    ElementEvent::Warning { message } => println!("     ⚠️  {}", message),
                },
                ExecutionEvent::RunCompleted { duration_ms, .. } => {
                    println!("✅ Workflow execution completed in {}ms", duration_ms);
                }
                _ => {}
            }
        }
    });

    let results = session.run().await.clone();

    // Wait for events to finish printing
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    event_task.abort();

    println!();
    println!("📋 Execution Results:");
    for element in session.document().iter() {
        if let Some(result) = results.get(element.id()) {
            println!(
                "  {} {}: {}",
                status_emoji(element.status()),
                element.kind().display_name(),
                blockcore::display_value(result)
            );
        }
    }

    println!();
    println!("📊 {}", session.document().stats());
    Ok(())
}

fn status_emoji(status: ElementStatus) -> &'static str {
    match status {
        ElementStatus::Ready => "✅",
        ElementStatus::Error => "❌",
        ElementStatus::Pending | ElementStatus::Processing => "⏳",
    }
}

fn show_workflow(document: &WorkflowDocument) {
    if document.is_empty() {
        println!("👋 Empty workflow. Add elements with `blockflow add <type>`.");
        return;
    }

    println!("🔧 Workflow ({} elements)", document.len());
    for (index, element) in document.iter().enumerate() {
        println!(
            "  [{}] {} {} ({}) - {}",
            index,
            status_emoji(element.status()),
            element.kind().display_name(),
            element.id(),
            element.status()
        );
        if !element.config().is_empty() {
            println!("      config: {}", Value::Object(element.config().clone()));
        }
        if let Some(output) = element.output() {
            println!("      output: {}", output);
        }
    }

    println!();
    println!("📊 {}", document.stats());
}

fn list_kinds() {
    println!("📦 Available Element Types:");
    println!();

    let registry = blocknodes::default_registry();

    for kind in registry.list_kinds() {
        if let Some(metadata) = registry.get_metadata(&kind) {
            println!("  • {} - {} ({})", kind, metadata.display_name, metadata.category);
            println!("    {}", metadata.description);
            for field in &metadata.fields {
                let marker = if field.required { "*" } else { " " };
                match &field.default {
                    Some(default) => println!("      {}{} - {} [default: {}]", marker, field.name, field.label, default),
                    None => println!("      {}{} - {}", marker, field.name, field.label),
                }
            }
        } else {
            println!("  • {}", kind);
        }
    }
}
