use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::info;

use zk_graph::config::GraphConfig;
use zk_graph::filter::{
    FilterState, FilterUpdate, GraphView, SkimTextMatcher, SubstringMatcher, TextMatcher,
};
use zk_graph::graph::NoteGraph;
use zk_graph::zk::{fetch_graph, fetch_tag_catalog, load_graph_file, load_tag_catalog, open_file};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Saved `zk graph --format json` output to read instead of running zk (`-` for stdin)
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// Notebook directory passed to zk
    #[arg(long, global = true)]
    notebook: Option<PathBuf>,
    /// JSON graph config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Where the filter state is stored between runs
    #[arg(long, global = true, default_value = ".zk-graph-filter.json")]
    state: PathBuf,
    /// Match the text query as a plain substring instead of fuzzily
    #[arg(long, global = true)]
    exact: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print node, edge and tag counts
    Stats {
        /// Compare against `zk tag list`, or this saved catalog when given a path
        #[arg(long, num_args = 0..=1, default_missing_value = "zk")]
        check_tags: Option<PathBuf>,
    },
    /// List tags, most used first
    Tags {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Change the stored filter
    Filter {
        #[arg(long)]
        query: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
        #[arg(long)]
        select: Option<String>,
        #[arg(long)]
        show_tags: Option<bool>,
        #[arg(long)]
        reset: bool,
    },
    /// Write the filtered nodes and links as JSON
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show what a note or tag is connected to
    Neighbors { path: String },
    /// Open a note in the configured program
    Open { path: String },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    env_logger::Builder::from_env(env).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => GraphConfig::load(path)?,
        None => GraphConfig::default(),
    };

    let raw = match &args.input {
        Some(path) => load_graph_file(path)?,
        None => fetch_graph(args.notebook.as_deref())?,
    };
    let graph = NoteGraph::build(raw, &config).context("failed to build the note graph")?;

    let matcher: Box<dyn TextMatcher> = if args.exact {
        Box::new(SubstringMatcher)
    } else {
        Box::new(SkimTextMatcher::default())
    };
    let mut view = GraphView::with_matcher(graph, &config, matcher);
    view.replace_filter(FilterState::load(&args.state)?);

    match args.command {
        Command::Stats { check_tags } => {
            let stats = view.graph().stats();
            println!("notes:         {}", stats.notes);
            println!("tags:          {}", stats.tags);
            println!("links:         {}", stats.links);
            println!("tag edges:     {}", stats.tag_edges);
            println!("dropped links: {}", stats.dropped_links);
            println!(
                "visible:       {} nodes, {} edges",
                view.visible_node_ids().len(),
                view.visible_edge_ids().len()
            );

            if let Some(source) = check_tags {
                let catalog = if source.as_os_str() == "zk" {
                    fetch_tag_catalog(args.notebook.as_deref())?
                } else {
                    load_tag_catalog(&source)?
                };
                let mismatches = view.graph().reconcile_tag_catalog(&catalog);
                println!(
                    "tag catalog:   {} of {} entries disagree",
                    mismatches,
                    catalog.len()
                );
            }
        }
        Command::Tags { limit } => {
            let tags = view.graph().tags_by_count();
            let limit = limit.unwrap_or(tags.len());
            for tag in tags.into_iter().take(limit) {
                println!("{:>5}  {}", tag.notes.len(), tag.name);
            }
        }
        Command::Filter {
            query,
            tags,
            clear_tags,
            select,
            show_tags,
            reset,
        } => {
            if reset {
                view.replace_filter(FilterState::default());
            }
            let tags = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tags)
            };
            view.set_filter(FilterUpdate {
                filter_string: query,
                tags,
                selected_node: select,
                show_tags,
            });
            view.filter().save(&args.state)?;
            info!("saved filter state to {}", args.state.display());
            println!(
                "{} of {} nodes visible",
                view.visible_node_ids().len(),
                view.graph().node_count()
            );
        }
        Command::Export { output } => {
            let json = serde_json::to_string_pretty(&view.export())
                .context("failed to encode the filtered graph")?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => writeln!(io::stdout(), "{json}").context("failed to write to stdout")?,
            }
        }
        Command::Neighbors { path } => {
            let node = view
                .find_node(&path)
                .ok_or_else(|| anyhow!("no note or tag named {path}"))?;
            println!(
                "{} [{}] in {} out {}",
                node.title,
                node.kind.label(),
                node.in_degree,
                node.out_degree
            );
            for neighbor in view.connected_nodes(node.id) {
                if let Some(neighbor) = view.graph().node(neighbor) {
                    println!(
                        "  {} [{}] {}",
                        neighbor.path,
                        neighbor.kind.label(),
                        neighbor.title
                    );
                }
            }
            println!("{} edges", view.connected_edges(node.id).len());
        }
        Command::Open { path } => {
            let node = view
                .find_node(&path)
                .ok_or_else(|| anyhow!("no note named {path}"))?;
            let abs_path = node
                .abs_path
                .as_deref()
                .ok_or_else(|| anyhow!("{path} has no absolute path to open"))?;
            open_file(&config.opener.program, abs_path);
        }
    }

    Ok(())
}
