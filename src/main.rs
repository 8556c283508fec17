//! theory-graph CLI: merge theory records and export Cypher scripts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use theory_graph::config::Config;
use theory_graph::corpus::TheoryCorpus;
use theory_graph::cypher;
use theory_graph::error::TheoryResult;
use theory_graph::export::GraphExport;
use theory_graph::graph::{BuildReport, CollisionKind, EdgePolicy, GraphBuilder, analytics};
use theory_graph::output;

#[derive(Parser)]
#[command(name = "theory-graph", version, about = "Merge theory records and export Cypher scripts")]
struct Cli {
    /// Config file (default: ./theory-graph.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Theory data file, overriding the config.
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data file with blank theories if it does not exist.
    Init,

    /// Structurally validate the data file.
    Validate,

    /// Build the merged graph and print a summary.
    Build {
        /// Print the graph snapshot as JSON instead of a summary.
        #[arg(long)]
        json: bool,

        /// Keep one edge per (subject, object, predicate) instead of per pair.
        #[arg(long)]
        multi_edge: bool,
    },

    /// Write Cypher scripts to the export directory.
    Export {
        /// Export a single theory by id.
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        id: Option<u64>,

        /// Export every theory.
        #[arg(long)]
        all: bool,

        /// Output directory, overriding the config.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print the Cypher script for one theory.
    Show {
        #[arg(long)]
        id: u64,
    },

    /// List theories not yet marked complete.
    Incomplete,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())?;
    Ok(())
}

fn run(cli: Cli) -> TheoryResult<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    match cli.command {
        Commands::Init => {
            let existed = config.data_file.exists();
            let corpus = TheoryCorpus::open_or_seed(&config.data_file, config.seed_count)?;
            if existed {
                println!(
                    "{} already exists ({} theories)",
                    config.data_file.display(),
                    corpus.len()
                );
            } else {
                println!(
                    "Created {} with {} blank theories",
                    config.data_file.display(),
                    corpus.len()
                );
            }
        }

        Commands::Validate => {
            let corpus = TheoryCorpus::open(&config.data_file)?;
            let complete = corpus.len() - corpus.incomplete().count();
            println!(
                "{}: {} theories ({} complete) are well-formed",
                config.data_file.display(),
                corpus.len(),
                complete
            );
        }

        Commands::Build { json, multi_edge } => {
            let corpus = TheoryCorpus::open(&config.data_file)?;
            let policy = if multi_edge {
                EdgePolicy::Multi
            } else {
                config.edge_policy
            };
            let report = GraphBuilder::new()
                .with_policy(policy)
                .build_with_report(corpus.theories());

            if json {
                let snapshot = output::snapshot_json(&GraphExport::from(&report.graph))?;
                println!("{snapshot}");
            } else {
                print_report(&report);
            }
        }

        Commands::Export { id, all, out_dir } => {
            let corpus = TheoryCorpus::open(&config.data_file)?;
            let dir = out_dir.unwrap_or(config.export_dir);
            // clap guarantees exactly one of --id and --all.
            let paths = match id {
                Some(id) if !all => vec![output::write_script(&dir, corpus.get(id)?)?],
                _ => output::write_all(&dir, corpus.theories())?,
            };
            for path in &paths {
                println!("Wrote {}", path.display());
            }
        }

        Commands::Show { id } => {
            let corpus = TheoryCorpus::open(&config.data_file)?;
            let script = cypher::export(corpus.get(id)?)?;
            print!("{script}");
        }

        Commands::Incomplete => {
            let corpus = TheoryCorpus::open(&config.data_file)?;
            let incomplete: Vec<_> = corpus.incomplete().collect();
            if incomplete.is_empty() {
                println!("All theories are complete.");
            } else {
                println!("Incomplete theories ({}):", incomplete.len());
                for t in incomplete {
                    println!("  {} / {}", t.id, t.name);
                }
            }
        }
    }

    Ok(())
}

fn print_report(report: &BuildReport) {
    let summary = analytics::summarize(&report.graph);
    println!("Graph ({} nodes, {} edges):", report.graph.node_count(), report.graph.edge_count());
    println!("  constructs:     {}", summary.construct_nodes);
    println!("  theories:       {}", summary.theory_nodes);
    println!("  has_construct:  {}", summary.membership_edges);
    println!("  relationships:  {}", summary.relationship_edges);
    println!(
        "  annotations:    {} on {} nodes",
        summary.annotations, summary.annotated_nodes
    );

    let top: Vec<_> = analytics::degree_centrality(&report.graph)
        .into_iter()
        .filter(|d| d.total > 0)
        .take(5)
        .collect();
    if !top.is_empty() {
        println!("\nMost connected:");
        for d in &top {
            println!("  \"{}\" [{}] in={} out={}", d.name, d.kind, d.in_degree, d.out_degree);
        }
    }

    let loops = analytics::feedback_loops(&report.graph);
    if !loops.is_empty() {
        println!("\nFeedback loops ({}):", loops.len());
        for l in &loops {
            println!("  {}", l.members.join(" <-> "));
        }
    }

    let isolated = analytics::isolated_constructs(&report.graph);
    if !isolated.is_empty() {
        println!("\nUnconnected constructs ({}): {}", isolated.len(), isolated.join(", "));
    }

    let conflicts: Vec<_> = report.constructs.conflicts().collect();
    if !conflicts.is_empty() {
        println!("\nConstructs with conflicting descriptions ({}):", conflicts.len());
        for c in conflicts {
            println!("  \"{}\" (kept description from theory {})", c.name, c.declared_in);
        }
    }

    if report.relabelled_edges > 0 {
        println!("\nEdges relabelled by later triples: {}", report.relabelled_edges);
    }

    if !report.dropped_annotations.is_empty() {
        println!("\nDropped annotations ({}):", report.dropped_annotations.len());
        for d in &report.dropped_annotations {
            println!("  theory {}: \"{}\" {} (no such node)", d.theory_id, d.construct, d.relation);
        }
    }

    if !report.name_collisions.is_empty() {
        println!("\nName collisions ({}):", report.name_collisions.len());
        for c in &report.name_collisions {
            let what = match c.kind {
                CollisionKind::TheoryReplacedConstruct => "theory replaced construct node",
                CollisionKind::TheoryReplacedTheory => "theory replaced earlier theory node",
                CollisionKind::TripleReferencesTheory => "triple endpoint is a theory node",
            };
            println!("  \"{}\" in theory {}: {what}", c.name, c.theory_id);
        }
    }
}
