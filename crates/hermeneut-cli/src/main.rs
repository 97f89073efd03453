//! Hermeneut CLI - compile extracted claims into CIDOC-CRM TriG

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use hermeneut_core::config::Config;
use hermeneut_core::domain::compiler::{CompiledGraph, Compiler, EntityRegistry};
use hermeneut_core::domain::graph::{GraphInput, Severity};
use hermeneut_core::domain::publication::{BiblioBuilder, DocumentMetadata, TrigContainer};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "hermeneut")]
#[command(author, version, about = "Relation-to-event CIDOC-CRM graph compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a claim graph into a TriG nanopublication
    Compile {
        /// Claim graph JSON ({nodes, relations} or a work_schema_metadata wrapper)
        input: PathBuf,
        /// Document id used in graph names (defaults to the input file stem)
        #[arg(long)]
        doc_id: Option<String>,
        /// Document metadata JSON for the bibliographic block
        #[arg(long)]
        biblio: Option<PathBuf>,
        /// Extra graph block appended before the head graph (repeatable)
        #[arg(long = "graph")]
        graphs: Vec<PathBuf>,
        /// Write the TriG document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile without writing output; fails when relations were dropped
    Check {
        /// Claim graph JSON
        input: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the compiled document
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hermeneut=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            doc_id,
            biblio,
            graphs,
            output,
        } => cmd_compile(
            &input,
            doc_id.as_deref(),
            biblio.as_deref(),
            &graphs,
            output.as_deref(),
            cli.format,
            cli.quiet,
        ),

        Commands::Check { input } => cmd_check(&input, cli.format, cli.quiet),

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

fn read_file(path: &Path, what: &str) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))
}

fn compile_file(
    input: &Path,
    config: &Config,
    registry: &mut EntityRegistry,
) -> anyhow::Result<CompiledGraph> {
    let text = read_file(input, "input")?;
    let graph = GraphInput::from_json(&text).map_err(|e| {
        let hint = e
            .suggestion()
            .map(|s| format!(" (try `{s}`)"))
            .unwrap_or_default();
        anyhow::anyhow!("[{}] {}{}", e.code(), e, hint)
    })?;
    debug!(
        input = %input.display(),
        nodes = graph.nodes().len(),
        relations = graph.relations().len(),
        "Loaded claim graph"
    );
    Ok(Compiler::from_config(config).compile_with(&graph, registry))
}

fn default_doc_id(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn print_diagnostics(graph: &CompiledGraph) {
    for diagnostic in &graph.diagnostics {
        let level = match diagnostic.severity() {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        eprintln!("  [{}] {}: {}", diagnostic.code(), level, diagnostic);
    }
}

fn print_summary(graph: &CompiledGraph) {
    let stats = &graph.stats;
    eprintln!("Entities declared:  {}", stats.entities_declared);
    eprintln!("Events minted:      {}", stats.events_minted);
    eprintln!("Events amended:     {}", stats.events_amended);
    eprintln!("Backpatches:        {}", stats.backpatches);
    eprintln!("Direct statements:  {}", stats.statements);
    eprintln!(
        "Relations:          {} compiled, {} dropped",
        stats.relations_compiled, stats.relations_dropped
    );
}

fn cmd_compile(
    input: &Path,
    doc_id: Option<&str>,
    biblio: Option<&Path>,
    graphs: &[PathBuf],
    output: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut registry = EntityRegistry::new();
    let compiled = compile_file(input, &config, &mut registry)?;
    let doc_id = doc_id
        .map(str::to_string)
        .unwrap_or_else(|| default_doc_id(input));

    let mut container = TrigContainer::new(&config.namespaces, &doc_id);
    if let Some(path) = biblio {
        let metadata = DocumentMetadata::from_json(&read_file(path, "metadata")?)
            .with_context(|| format!("Failed to parse document metadata: {}", path.display()))?;
        container =
            container.with_biblio(BiblioBuilder::new(&doc_id).build(&metadata, &mut registry));
    }
    for path in graphs {
        container = container.with_graph(read_file(path, "graph")?);
    }
    let trig = container.render(&compiled);

    match output {
        Some(path) => {
            fs::write(path, &trig)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(output = %path.display(), doc = container.doc(), "Wrote container");
        }
        None if format == OutputFormat::Text => print!("{trig}"),
        None => {}
    }

    match format {
        OutputFormat::Json => {
            let report = compiled.report(Some(&doc_id));
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if !quiet {
                print_summary(&compiled);
                print_diagnostics(&compiled);
            }
        }
    }
    Ok(())
}

fn cmd_check(input: &Path, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let compiled = compile_file(input, &config, &mut EntityRegistry::new())?;

    match format {
        OutputFormat::Json => {
            let doc_id = default_doc_id(input);
            let report = compiled.report(Some(&doc_id));
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if !quiet {
                for diagnostic in &compiled.diagnostics {
                    println!("[{}] {}", diagnostic.code(), diagnostic);
                }
                println!(
                    "{} relations compiled, {} dropped",
                    compiled.stats.relations_compiled, compiled.stats.relations_dropped
                );
            }
        }
    }

    if compiled.has_warnings() {
        bail!(
            "{} relation(s) dropped from {}",
            compiled.stats.relations_dropped,
            input.display()
        );
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compile_args() {
        let cli = Cli::try_parse_from([
            "hermeneut",
            "compile",
            "doc.json",
            "--doc-id",
            "d1",
            "--graph",
            "prov.trig",
            "--graph",
            "info.trig",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Compile {
                input,
                doc_id,
                graphs,
                output,
                ..
            } => {
                assert_eq!(input, PathBuf::from("doc.json"));
                assert_eq!(doc_id.as_deref(), Some("d1"));
                assert_eq!(graphs.len(), 2);
                assert!(output.is_none());
            }
            _ => panic!("expected compile"),
        }
    }

    #[test]
    fn test_default_doc_id() {
        assert_eq!(default_doc_id(Path::new("/tmp/reynaert_2019.json")), "reynaert_2019");
    }
}
