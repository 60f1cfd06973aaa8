use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Instant;
use udongraph::network_ids::{self, NetworkIdResolver, NetworkScene};
use udongraph::prelude::*;

/// Inspect, validate and compile node graphs from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a graph and print the assembler listing
    Compile {
        /// Path to the graph JSON file
        graph_path: String,
        /// Also write the compiled node list to this file (bincode)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report structural problems in a graph
    Validate {
        graph_path: String,
        /// Repair what can be repaired and write the result back
        #[arg(long)]
        repair: bool,
    },
    /// Print the flow highlight around one node
    Highlight { graph_path: String, node_id: String },
    /// Compare a scene's network ids with an id file
    Netids {
        /// Path to the scene JSON file
        scene_path: String,
        /// Path to the id file to import
        ids_path: String,
        /// Accept every conflict and print the resulting id file
        #[arg(long)]
        accept_all: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Compile { graph_path, output } => run_compile(&graph_path, output.as_deref()),
        Command::Validate { graph_path, repair } => run_validate(&graph_path, repair),
        Command::Highlight {
            graph_path,
            node_id,
        } => run_highlight(&graph_path, &node_id),
        Command::Netids {
            scene_path,
            ids_path,
            accept_all,
        } => run_netids(&scene_path, &ids_path, accept_all),
    }
}

fn load_graph(path: &str) -> Graph {
    let data = GraphData::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph '{}': {}", path, e)));
    Graph::from_data(Arc::new(NodeRegistry::with_defaults()), data)
}

fn run_compile(graph_path: &str, output: Option<&str>) {
    let start = Instant::now();
    let graph = load_graph(graph_path);

    let program = graph.compile();
    if let Some(output) = output {
        program
            .save(output)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save program: {}", e)));
        println!("Wrote {} node(s) to '{}'", program.nodes.len(), output);
    }

    match graph.compile_with(&ListingAssembler) {
        CompileStatus::Compiled { assembly } => print!("{}", assembly),
        CompileStatus::Failed { message } => exit_with_error(&message),
        CompileStatus::NotCompiled => exit_with_error("Nothing was compiled"),
    }
    println!("\nCompiled in {:?}", start.elapsed());
}

fn run_validate(graph_path: &str, repair: bool) {
    let mut graph = load_graph(graph_path);

    let issues = graph.validate();
    if issues.is_empty() {
        println!("No issues found.");
        return;
    }
    println!("Found {} issue(s):", issues.len());
    for issue in &issues {
        let fixable = if issue.fix.is_some() { "fixable" } else { "manual" };
        println!("  - [{}] {}", fixable, issue);
    }

    if repair {
        let fixed = graph.repair();
        let json = graph
            .data()
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
        std::fs::write(graph_path, json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", graph_path, e)));
        println!("\nRepaired {} issue(s) and saved '{}'", fixed.len(), graph_path);
    }
}

fn run_highlight(graph_path: &str, node_id: &str) {
    let graph = load_graph(graph_path);
    let selected = NodeId::from(node_id);
    if !graph.contains(&selected) {
        exit_with_error(&format!("Node '{}' is not in the graph", node_id));
    }

    let result = highlight(&graph, &selected);
    if result.is_cleared() {
        println!("Node '{}' has no flow ports; nothing highlighted.", node_id);
        return;
    }

    println!("Highlighted nodes:");
    for id in &result.highlighted_nodes {
        println!("  {} ({})", id, graph.title(id).unwrap_or_default());
    }
    println!("Highlighted flow edges:");
    for edge in &result.highlighted_edges {
        println!("  {}", edge);
    }
    println!(
        "Muted: {} node(s), {} edge(s)",
        result.muted_nodes.len(),
        result.muted_edges.len()
    );
}

fn run_netids(scene_path: &str, ids_path: &str, accept_all: bool) {
    let scene_json = std::fs::read_to_string(scene_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read scene file '{}': {}", scene_path, e))
    });
    let scene = NetworkScene::from_json(&scene_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse scene JSON: {}", e)));
    let loaded = network_ids::load_ids(ids_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import ids: {}", e)));

    let mut resolver = NetworkIdResolver::new(scene, loaded);
    let report = resolver.report();
    println!(
        "{} conflict group(s), {} clean id(s)",
        report.groups.len(),
        report.clean.len()
    );
    for group in &report.groups {
        let ids = group.ids().iter().map(|id| id.to_string()).collect::<Vec<_>>();
        let paths = group.paths().iter().cloned().collect::<Vec<_>>();
        println!(
            "  - {}: ids [{}] paths [{}]",
            group.kind,
            ids.join(", "),
            paths.join(", ")
        );
    }

    if accept_all {
        resolver.accept_all();
        let remaining = resolver.report().groups.len();
        let exported = network_ids::export_ids(resolver.scene())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to export ids: {}", e)));
        println!("\nAfter accepting all ({} group(s) remain):", remaining);
        println!("{}", exported);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
