mod serve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use strand_core::config::DEFAULT_CONFIG_FILE;
use strand_core::graph::models::{Neighbor, SearchHit};
use strand_core::{
    Config, Direction, DiscourseGraph, FileSource, GraphHandle, QueryError, SearchQuery,
};

#[derive(Parser)]
#[command(name = "strand")]
#[command(version, about = "Search and explore discourse graphs", long_about = None)]
struct Cli {
    /// Config file (defaults to ./strand.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file, overriding the configured one
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ranked full-text search over node titles and content
    Search {
        /// Query text
        #[arg(required = true)]
        query: Vec<String>,
        /// Only nodes with this category tag (e.g. CLM)
        #[arg(long = "type")]
        node_type: Option<String>,
        /// Only nodes whose creator contains this text
        #[arg(long)]
        creator: Option<String>,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List the nodes directly connected to a node
    Neighbors {
        uid: String,
        /// outgoing, incoming or both
        #[arg(short, long, default_value_t = Direction::Both)]
        direction: Direction,
    },
    /// Show the k-hop neighborhood of a node
    Explore {
        uid: String,
        /// Number of hops, 1 to 4
        #[arg(short = 'k', long)]
        depth: Option<usize>,
        /// outgoing, incoming or both
        #[arg(short, long, default_value_t = Direction::Both)]
        direction: Direction,
        /// Only reach nodes with this category tag
        #[arg(long = "type")]
        node_type: Option<String>,
        /// Only follow relationships with this label
        #[arg(long)]
        relation: Option<String>,
    },
    /// Show a node with its relationships
    Show { uid: String },
    /// Show index statistics
    Stats,
    /// List node schemas and relationship definitions
    Schemas,
    /// List creators and their node counts
    Creators,
    /// Serve the JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind
        #[arg(long)]
        host: Option<String>,
    },
    /// Write a default strand.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays parseable.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init { force } = cli.command {
        return init_config(force);
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    if let Some(dataset) = &cli.dataset {
        config.dataset.path = dataset.clone();
    }
    debug!(dataset = %config.dataset.path.display(), "Using dataset");

    let source = FileSource::new(&config.dataset.path);
    let graph = DiscourseGraph::load(&source, &config)
        .with_context(|| format!("Failed to load dataset {}", config.dataset.path.display()))?;

    match cli.command {
        Commands::Search {
            query,
            node_type,
            creator,
            limit,
        } => {
            let query = SearchQuery {
                text: query.join(" "),
                node_type,
                creator,
                limit,
            };
            let hits = graph.search(&query);
            if cli.json {
                print_json(&hits)?;
            } else {
                print_hits(&hits);
            }
        }
        Commands::Neighbors { uid, direction } => {
            let result = graph
                .direct_neighbors(&uid, direction)
                .or_else(|e| not_found(e, cli.json))?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("{} neighbors of {}:", result.direction, result.uid);
                if result.neighbors.is_empty() {
                    println!("  (none)");
                }
                for neighbor in &result.neighbors {
                    println!("  {}", describe_neighbor(neighbor));
                }
            }
        }
        Commands::Explore {
            uid,
            depth,
            direction,
            node_type,
            relation,
        } => {
            let mut query = graph.neighborhood_query(uid).with_direction(direction);
            if let Some(depth) = depth {
                query = query.with_depth(depth);
            }
            query.node_type = node_type;
            query.relation = relation;

            let result = graph.neighborhood(&query).or_else(|e| not_found(e, cli.json))?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "Neighborhood of {} (depth {}, {}): {} nodes",
                    result.uid, result.depth, result.direction, result.total
                );
                for hop in &result.hops {
                    println!("\nHop {} ({})", hop.distance, hop.count);
                    for node in &hop.nodes {
                        let title = node.node.as_ref().map_or("(unknown node)", |n| n.title.as_str());
                        let via = match (&node.reached_from, &node.relation_label) {
                            (Some(from), Some(label)) => format!("  <- {} [{}]", from, label),
                            (Some(from), None) => format!("  <- {} [ref]", from),
                            _ => String::new(),
                        };
                        println!("  {}  {}{}", node.uid, title, via);
                    }
                }
            }
        }
        Commands::Show { uid } => {
            let details = graph.node_details(&uid).or_else(|e| not_found(e, cli.json))?;
            if cli.json {
                print_json(&details)?;
            } else {
                let node = &details.node;
                println!("{}", node.title_clean);
                println!("  UID: {}", node.uid);
                println!("  Type: {}", node.node_type.as_deref().unwrap_or("-"));
                println!("  Creator: {}", or_dash(&node.creator));
                println!("  Created: {}", or_dash(&node.created));
                println!("  Modified: {}", or_dash(&node.modified));
                if let Some(url) = &node.url {
                    println!("  URL: {}", url);
                }
                for rel in &details.outgoing {
                    println!("  -> {} [{}]", rel.destination_uid, rel.label);
                }
                for rel in &details.incoming {
                    println!("  <- {} [{}]", rel.source_uid, rel.label);
                }
                for uid in &node.linked_node_uids {
                    println!("  -> {} [ref]", uid);
                }
                for uid in &details.referenced_by {
                    println!("  <- {} [ref]", uid);
                }
            }
        }
        Commands::Stats => {
            let stats = graph.stats();
            if cli.json {
                print_json(stats)?;
            } else {
                println!("Dataset: {}", source.path().display());
                println!("  Nodes: {}", stats.nodes);
                println!("  Schemas: {}", stats.schemas);
                println!("  Relationship definitions: {}", stats.relation_defs);
                println!("  Relationships: {}", stats.relations);
                println!("  Creators: {}", stats.creators);
                println!("  Undeclared predicates: {}", stats.unresolved_predicates);
                println!("  Dangling relationships: {}", stats.dangling_relations);
                println!("  Undeclared category tags: {}", stats.undeclared_types);
                println!("  Duplicate node uids: {}", stats.duplicate_nodes);
                println!("  Skipped entries: {}", stats.skipped_entries);
                if let Some(fingerprint) = &stats.fingerprint {
                    println!("  SHA-256: {}", fingerprint);
                }
            }
        }
        Commands::Schemas => {
            let schemas = graph.schemas();
            let defs = graph.relation_defs();
            if cli.json {
                print_json(&serde_json::json!({ "schemas": schemas, "relation_defs": defs }))?;
            } else {
                println!("Node schemas:");
                for schema in &schemas {
                    let tag = schema.node_type.as_deref().unwrap_or("-");
                    println!("  {:<8} {}  ({})", tag, schema.label, schema.uid);
                }
                println!("\nRelationship definitions:");
                for def in &defs {
                    println!("  {}: {} -> {}", def.label, def.domain_label, def.range_label);
                }
            }
        }
        Commands::Creators => {
            let counts: Vec<(&str, usize)> = graph
                .creators()
                .iter()
                .map(|name| (name.as_str(), graph.nodes_by_creator(name).len()))
                .collect();
            if cli.json {
                let rows: Vec<_> = counts
                    .iter()
                    .map(|(name, nodes)| serde_json::json!({ "name": name, "nodes": nodes }))
                    .collect();
                print_json(&rows)?;
            } else {
                for (name, nodes) in counts {
                    println!("  {:<30} {}", name, nodes);
                }
            }
        }
        Commands::Serve { port, host } => {
            let serve_config = serve::ServeConfig {
                host: host.unwrap_or_else(|| config.server.host.clone()),
                port: port.unwrap_or(config.server.port),
            };
            let state = serve::AppState {
                graph: std::sync::Arc::new(GraphHandle::new(graph)),
                source,
            };
            serve::start_server(state, serve_config).await?;
        }
        Commands::Init { force } => init_config(force)?,
    }

    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(&path, Config::default_config_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Report a missing uid, as JSON when requested, and fail the command.
fn not_found<T>(err: QueryError, json: bool) -> Result<T> {
    if json {
        print_json(&err)?;
    }
    Err(err.into())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No results.");
        return;
    }
    for (rank, hit) in hits.iter().enumerate() {
        let tag = hit.node.node_type.as_deref().unwrap_or("-");
        println!(
            "{:>2}. [{}] {}  ({}, score {:.3})",
            rank + 1,
            tag,
            hit.node.title,
            hit.node.uid,
            hit.score
        );
        if !hit.snippet.is_empty() {
            println!("    {}", hit.snippet);
        }
    }
}

fn describe_neighbor(neighbor: &Neighbor) -> String {
    let arrow = match neighbor.direction {
        Direction::Incoming => "<-",
        _ => "->",
    };
    let title = neighbor
        .node
        .as_ref()
        .map_or("(unknown node)", |n| n.title.as_str());
    let label = neighbor.relation_label.as_deref().unwrap_or("ref");
    format!("{} {}  {}  [{}]", arrow, neighbor.uid, title, label)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
