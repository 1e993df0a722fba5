use std::env;
use std::fmt::Display;
use std::process;

use json::JsonValue;

use flownet::analysis::{analyze, NetworkReport};
use flownet::context::CallContext;
use flownet::graph::{compute_flow, FlowResult, MinCut, PairFlow};
use flownet::io;
use flownet::options::FlowOptions;
use flownet::types::{Edge, Graph, Vertex, VertexAmount};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = env::args().collect();
    let flows_position = args.iter().position(|a| a == "--flows");
    let flows_file = match flows_position {
        Some(i) if i + 2 == args.len() => args.pop(),
        Some(_) => {
            usage();
            return;
        }
        None => None,
    };
    if flows_file.is_some() {
        args.pop();
    }

    match (args.get(1).map(String::as_str), args.len()) {
        (Some("--network"), 3) => run_network(&args[2], flows_file),
        (Some("--matrix"), 5) => {
            let graph = io::read_capacity_matrix(&args[2]).unwrap_or_else(|e| fail(&args[2], e));
            let source = parse_index(&args[3]);
            let sink = parse_index(&args[4]);
            run_query(&graph, &source, &sink, flows_file);
        }
        (Some("--csv"), 5) => {
            let graph = io::read_edges_csv(&args[2]).unwrap_or_else(|e| fail(&args[2], e));
            run_query(&graph, &args[3], &args[4], flows_file);
        }
        (Some(file), 4) if !file.starts_with("--") => {
            let graph = io::read_edges_csv(file).unwrap_or_else(|e| fail(file, e));
            run_query(&graph, &args[2], &args[3], flows_file);
        }
        _ => usage(),
    }
}

fn usage() {
    println!("Usage: cli [--csv] <edges.csv> <source> <sink> [--flows <flows.csv>]");
    println!("Usage: cli --matrix <matrix.txt> <source> <sink> [--flows <flows.csv>]");
    println!("Usage: cli --network <network.json> [--flows <flows.csv>]");
    println!("Edge lists contain from,to,capacity lines; matrix rows are separated by newlines.");
    println!("Option --network prints the full report for the origins and destinations in the file.");
    println!("Option --flows writes the per-edge flow assignment as csv.");
}

fn fail(what: &str, error: impl Display) -> ! {
    eprintln!("Error processing \"{what}\": {error}");
    process::exit(1)
}

fn parse_index(input: &str) -> usize {
    input
        .parse()
        .unwrap_or_else(|_| fail(input, "expected a vertex index"))
}

fn run_query<V: Vertex>(graph: &Graph<V>, source: &V, sink: &V, flows_file: Option<String>) {
    println!(
        "Read {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    let call_context = CallContext::new(&format!("{source} -> {sink}"));
    let result = compute_flow(graph, source, sink, &FlowOptions::default(), &call_context)
        .unwrap_or_else(|e| fail(&format!("{source} -> {sink}"), e));
    println!("{}", flow_json(&result).pretty(2));
    if let Some(flows_file) = flows_file {
        io::write_edge_flows_csv(&result.edge_flows, &flows_file).unwrap_or_else(|e| fail(&flows_file, e));
        println!("Wrote flows to {flows_file}.");
    }
}

fn run_network(path: &str, flows_file: Option<String>) {
    let network = io::read_network_json(path).unwrap_or_else(|e| fail(path, e));
    println!(
        "Read {} vertices and {} edges, {} origins, {} destinations",
        network.graph.vertex_count(),
        network.graph.edge_count(),
        network.origins.len(),
        network.destinations.len()
    );
    let call_context = CallContext::new(path);
    let report = analyze(
        &network.graph,
        &network.origins,
        &network.destinations,
        &network.options,
        &call_context,
    )
    .unwrap_or_else(|e| fail(path, e));
    println!("{}", report_json(&report).pretty(2));
    if let Some(flows_file) = flows_file {
        io::write_edge_flows_csv(&report.network.edge_flows, &flows_file).unwrap_or_else(|e| fail(&flows_file, e));
        println!("Wrote flows to {flows_file}.");
    }
}

fn flow_json<V: Vertex>(result: &FlowResult<V>) -> JsonValue {
    let min_cut = result.min_cut.as_ref().map(cut_json).unwrap_or(JsonValue::Null);
    json::object! {
        source: result.source.to_string(),
        sink: result.sink.to_string(),
        maxFlowValue: result.total,
        augmentations: result.augmentations,
        edgeFlows: result.used_edges().map(|e| json::object! {
            from: e.from.to_string(),
            to: e.to.to_string(),
            capacity: e.capacity,
            flow: e.flow,
        }).collect::<Vec<_>>(),
        minCut: min_cut,
    }
}

fn report_json<V: Vertex>(report: &NetworkReport<V>) -> JsonValue {
    let network = &report.network;
    let min_cut = network.min_cut.as_ref().map(cut_json).unwrap_or(JsonValue::Null);
    let strongest_origin = report
        .strongest_origin()
        .map(|a| a.vertex.to_string().into())
        .unwrap_or(JsonValue::Null);
    json::object! {
        vertexCount: report.vertex_count,
        edgeCount: report.edge_count,
        pairFlows: pairs_json(&report.pair_flows),
        originTotals: amounts_json(&report.origin_totals),
        destinationTotals: amounts_json(&report.destination_totals),
        originCapacities: amounts_json(&report.origin_capacities),
        destinationCapacities: amounts_json(&report.destination_capacities),
        strongestOrigin: strongest_origin,
        network: json::object! {
            maxFlowValue: network.total,
            augmentations: network.augmentations,
            originFlows: amounts_json(&network.origin_flows),
            destinationFlows: amounts_json(&network.destination_flows),
            minCut: min_cut,
            attribution: json::object! {
                estimate: true,
                ambiguous: network.attribution.ambiguous,
                unattributed: network.attribution.unattributed,
                pairs: pairs_json(&network.attribution.pairs),
            },
        },
        smallestCapacityEdges: edges_json(&report.smallest_capacity_edges),
        bottlenecks: edges_json(&report.bottlenecks),
        leastSupplied: amounts_json(&report.least_supplied),
    }
}

fn cut_json<V: Vertex>(cut: &MinCut<V>) -> JsonValue {
    json::object! {
        capacity: cut.capacity,
        sourceSide: cut.source_side.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        edges: edges_json(&cut.edges),
    }
}

fn edges_json<V: Vertex>(edges: &[Edge<V>]) -> JsonValue {
    edges
        .iter()
        .map(|e| json::object! {
            from: e.from.to_string(),
            to: e.to.to_string(),
            capacity: e.capacity,
        })
        .collect::<Vec<_>>()
        .into()
}

fn pairs_json<V: Vertex>(pairs: &[PairFlow<V>]) -> JsonValue {
    pairs
        .iter()
        .map(|p| json::object! {
            origin: p.origin.to_string(),
            destination: p.destination.to_string(),
            flow: p.amount,
        })
        .collect::<Vec<_>>()
        .into()
}

fn amounts_json<V: Vertex>(amounts: &[VertexAmount<V>]) -> JsonValue {
    amounts
        .iter()
        .map(|a| json::object! {
            vertex: a.vertex.to_string(),
            amount: a.amount,
        })
        .collect::<Vec<_>>()
        .into()
}
