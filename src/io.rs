use std::fs::{read_to_string, File};
use std::io::{self, BufRead, BufReader, Write};

use regex::Regex;
use serde::Deserialize;

use crate::error::LoadError;
use crate::options::FlowOptions;
use crate::types::{Capacity, Edge, EdgeFlow, Graph, Vertex};

/// A graph together with the origins and destinations to analyze.
#[derive(Debug, Clone)]
pub struct Network {
    pub graph: Graph<String>,
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub options: FlowOptions,
}

/// Reads `from,to,capacity` lines. Blank lines and lines starting with `#`
/// are skipped, labels may be quoted.
pub fn read_edges_csv(path: &str) -> Result<Graph<String>, LoadError> {
    let f = BufReader::new(File::open(path)?);
    let line_pattern = Regex::new(r#"^\s*"?([A-Za-z0-9_.:\-]+)"?\s*,\s*"?([A-Za-z0-9_.:\-]+)"?\s*,\s*(-?[0-9]+)\s*$"#)?;
    let mut edges = Vec::new();
    for (i, line) in f.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(captures) = line_pattern.captures(trimmed) else {
            return Err(LoadError::Format {
                line: i + 1,
                message: format!("Expected from,to,capacity, but got {line}"),
            });
        };
        edges.push(Edge::new(
            captures[1].to_string(),
            captures[2].to_string(),
            parse_capacity(&captures[3], i + 1)?,
        ));
    }
    Ok(Graph::from_edges(edges)?)
}

/// Reads a square capacity matrix, one row per line, entries separated by
/// whitespace or commas. Vertices are the row indices.
pub fn read_capacity_matrix(path: &str) -> Result<Graph<usize>, LoadError> {
    let f = BufReader::new(File::open(path)?);
    let separator = Regex::new(r"[\s,]+")?;
    let mut matrix: Vec<Vec<Capacity>> = Vec::new();
    for (i, line) in f.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = separator
            .split(trimmed)
            .map(|entry| parse_capacity(entry, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        matrix.push(row);
    }
    Ok(Graph::from_matrix(&matrix)?)
}

pub fn read_network_json(path: &str) -> Result<Network, LoadError> {
    parse_network_json(&read_to_string(path)?)
}

/// Parses a network description:
///
/// ```json
/// {
///   "edges": [{"from": "T1", "to": "W1", "capacity": 25}],
///   "origins": ["T1"],
///   "destinations": ["W1"],
///   "options": {"maxAugmentations": 1000}
/// }
/// ```
///
/// Instead of `edges`, a square `matrix` with optional `labels` (default
/// "0", "1", ...) may be given.
pub fn parse_network_json(contents: &str) -> Result<Network, LoadError> {
    let description: NetworkDescription = serde_json::from_str(contents)?;
    let graph = match (description.edges, description.matrix) {
        (Some(edges), None) => Graph::from_edges(
            edges
                .into_iter()
                .map(|e| Edge::new(e.from, e.to, e.capacity)),
        )?,
        (None, Some(matrix)) => {
            let labels = description
                .labels
                .unwrap_or_else(|| (0..matrix.len()).map(|i| i.to_string()).collect());
            Graph::from_labeled_matrix(labels, &matrix)?
        }
        (Some(_), Some(_)) => {
            return Err(LoadError::Network(
                "expected either \"edges\" or \"matrix\", not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(LoadError::Network(
                "expected \"edges\" or \"matrix\"".to_string(),
            ))
        }
    };
    Ok(Network {
        graph,
        origins: description.origins,
        destinations: description.destinations,
        options: description.options.unwrap_or_default(),
    })
}

pub fn write_edge_flows_csv<V: Vertex>(flows: &[EdgeFlow<V>], path: &str) -> Result<(), io::Error> {
    let mut file = File::create(path)?;
    writeln!(file, "from,to,capacity,flow")?;
    for EdgeFlow {
        from,
        to,
        capacity,
        flow,
    } in flows
    {
        writeln!(file, "{from},{to},{capacity},{flow}")?;
    }
    Ok(())
}

fn parse_capacity(input: &str, line: usize) -> Result<Capacity, LoadError> {
    input.parse().map_err(|e| LoadError::Format {
        line,
        message: format!("Invalid capacity {input}: {e}"),
    })
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
struct NetworkDescription {
    edges: Option<Vec<EdgeRecord>>,
    matrix: Option<Vec<Vec<Capacity>>>,
    labels: Option<Vec<String>>,
    #[serde(default)]
    origins: Vec<String>,
    #[serde(default)]
    destinations: Vec<String>,
    options: Option<FlowOptions>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct EdgeRecord {
    from: String,
    to: String,
    capacity: Capacity,
}
