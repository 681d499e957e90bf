//! biokg - command-line interface over the hybridization engine
//!
//! Builds the hybrid ontology described by a configuration file and answers
//! questions about it.

use std::path::PathBuf;

use anyhow::Context;
use biokg_core::{BiokgConfig, HybridOntology};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "biokg")]
#[command(version)]
#[command(about = "Biomedical knowledge graph ontology engine", long_about = None)]
struct Cli {
    /// Run configuration (YAML)
    #[arg(long, short = 'c', default_value = "biokg.yaml")]
    config: PathBuf,

    /// Debug-level logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extended schema
    Schema {
        /// JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Print a class and its ancestors
    Ancestors {
        /// Class label, any casing
        label: String,
    },
    /// Print the hierarchy as a tree
    Show {
        /// Include classes the schema does not use
        #[arg(long)]
        full: bool,
        /// Also write the displayed graph as GRAPHML
        #[arg(long)]
        graphml: Option<PathBuf>,
    },
    /// Build the hybrid ontology and report its size
    Check,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "biokg_core=debug,biokg=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(config: &BiokgConfig) -> anyhow::Result<HybridOntology> {
    config
        .build_ontology()
        .context("failed to build hybrid ontology")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = BiokgConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Schema { json } => {
            let schema = config.extended_schema()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else {
                print!("{}", schema.to_yaml_string()?);
            }
        }

        Commands::Ancestors { label } => {
            let ontology = build(&config)?;
            let ancestors = ontology.ancestors(&label)?;
            for (depth, class) in ancestors.iter().enumerate() {
                let marker = if depth == 0 { class.bold() } else { class.normal() };
                println!("{}{}", "  ".repeat(depth), marker);
            }
        }

        Commands::Show { full, graphml } => {
            let ontology = build(&config)?;
            print!("{}", ontology.show_structure(full));
            if let Some(path) = graphml {
                ontology.write_graphml(&path, full)?;
                println!("\n{} {}", "✓ GRAPHML written to".green(), path.display());
            }
        }

        Commands::Check => {
            let ontology = build(&config)?;
            let graph = ontology.graph();
            let extensions = graph.nodes().filter(|(_, n)| n.user_extension).count();

            println!("{}", "✓ Hybrid ontology is consistent".green().bold());
            println!("  Root: {}", ontology.root());
            println!("  Ontologies: {}", ontology.ontology_count());
            println!("  Classes: {}", graph.node_count());
            println!("  is_a edges: {}", graph.edge_count());
            println!("  Schema entities: {}", ontology.extended_schema().len());
            println!("  User extensions: {}", extensions);
        }
    }

    Ok(())
}
