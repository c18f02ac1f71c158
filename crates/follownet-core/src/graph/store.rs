//! Follows-graph store and streaming ingestion
//!
//! The store owns the directed adjacency lists, the sparse coordinate table
//! and the lazily built in-degree table. It is populated by two streaming
//! passes over line-oriented files:
//!
//! 1. [`GraphStore::load_locations`]: line `i` holds `"<lat>,<lon>"` for node `i`
//!    and the line count fixes the node count `N`.
//! 2. [`GraphStore::load_connections`]: line `i` holds the comma separated
//!    targets followed by node `i`.
//!
//! Ingestion is lenient: malformed lines, non-integer tokens, out-of-range ids
//! and self-loops are dropped and counted in the returned [`LoadReport`].
//! Each pass stages its output and commits only after the whole file was
//! read, so a failed load leaves the store untouched.

use crate::stats::top_n_by_degree;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

/// Dense node identity in `[1, N]`
pub type NodeId = u32;

/// Default upper bound on a node count inferred from connection targets
pub const DEFAULT_NODE_CEILING: usize = 200_000_000;

/// Geographic coordinate attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees
    pub lat: f32,
    /// Longitude in decimal degrees
    pub lon: f32,
}

/// Diagnostics collected by a single ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Lines read from the file
    pub lines_read: u64,
    /// Batches the lines were grouped into
    pub batches: u64,
    /// Accepted records (locations or directed edges)
    pub accepted: u64,
    /// Lines that could not be parsed as a whole (locations) or carried at
    /// least one non-integer token (connections)
    pub malformed_lines: u64,
    /// Individual tokens dropped because they were not integers
    pub invalid_tokens: u64,
    /// Edges dropped because an endpoint fell outside `[1, N]`
    pub out_of_range: u64,
    /// Edges dropped because source and target were equal
    pub self_loops: u64,
    /// Node count after the pass was committed
    pub node_count: usize,
}

/// In-memory directed follows graph
#[derive(Debug, Clone)]
pub struct GraphStore {
    /// Total node count `N`
    node_count: usize,
    /// Outgoing targets per node; slot `i` holds node `i + 1`
    adjacency: Vec<Vec<NodeId>>,
    /// Sparse coordinates, absent for malformed lines
    locations: HashMap<NodeId, Location>,
    /// Running total of accepted directed edges
    edge_count: usize,
    /// In-degree per node, built once on demand; slot `i` holds node `i + 1`
    in_degree_cache: OnceLock<Vec<usize>>,
    /// Largest target id accepted while the node count is being inferred
    node_ceiling: usize,
    locations_loaded: bool,
    connections_loaded: bool,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self {
            node_count: 0,
            adjacency: Vec::new(),
            locations: HashMap::new(),
            edge_count: 0,
            in_degree_cache: OnceLock::new(),
            node_ceiling: DEFAULT_NODE_CEILING,
            locations_loaded: false,
            connections_loaded: false,
        }
    }
}

impl GraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the node count inferred from connection targets
    ///
    /// Only applies when no locations file fixed `N`: targets above the
    /// ceiling are then dropped as out of range instead of growing `N`.
    pub fn with_node_ceiling(mut self, ceiling: usize) -> Self {
        self.node_ceiling = ceiling;
        self
    }

    /// Build a store with a fixed node count from in-memory edges
    ///
    /// Applies the same acceptance rules as [`GraphStore::load_connections`]:
    /// endpoints outside `[1, node_count]` and self-loops are dropped.
    /// The returned store is sealed against further ingestion.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut adjacency = vec![Vec::new(); node_count];
        let mut edge_count = 0;
        for (source, target) in edges {
            if source == target || !in_range(source, node_count) || !in_range(target, node_count)
            {
                continue;
            }
            adjacency[source as usize - 1].push(target);
            edge_count += 1;
        }

        Self {
            node_count,
            adjacency,
            edge_count,
            locations_loaded: true,
            connections_loaded: true,
            ..Self::default()
        }
    }

    /// Load node coordinates, fixing the node count to the file's line count
    pub fn load_locations(&mut self, path: impl AsRef<Path>, batch_size: usize) -> Result<LoadReport> {
        let path = path.as_ref();
        if self.locations_loaded || self.connections_loaded {
            return Err(Error::invalid_state(
                "locations must be loaded once, before any connections",
            ));
        }

        info!(path = %path.display(), batch_size, "Loading locations");
        let mut report = LoadReport::default();
        let mut staged = HashMap::new();

        stream_batches(path, batch_size, &mut report, |first_line, batch, report| {
            for (offset, line) in batch.iter().enumerate() {
                let line_no = first_line + offset;
                match (parse_location(line), NodeId::try_from(line_no)) {
                    (Some(location), Ok(id)) => {
                        staged.insert(id, location);
                        report.accepted += 1;
                    }
                    _ => report.malformed_lines += 1,
                }
            }
        })?;

        self.node_count = report.lines_read as usize;
        self.adjacency = vec![Vec::new(); self.node_count];
        self.locations = staged;
        self.locations_loaded = true;
        report.node_count = self.node_count;

        info!(
            located = report.accepted,
            malformed = report.malformed_lines,
            nodes = self.node_count,
            "Locations loaded"
        );
        Ok(report)
    }

    /// Load follow edges; line `i` lists the targets of node `i`
    ///
    /// When no node count was fixed beforehand it is inferred afterwards as
    /// the larger of the line count and the largest accepted target id.
    pub fn load_connections(
        &mut self,
        path: impl AsRef<Path>,
        batch_size: usize,
    ) -> Result<LoadReport> {
        let path = path.as_ref();
        if self.connections_loaded {
            return Err(Error::invalid_state("connections were already loaded"));
        }

        let fixed_count = self.node_count;
        info!(
            path = %path.display(),
            batch_size,
            fixed_nodes = fixed_count,
            "Loading connections"
        );

        let mut report = LoadReport::default();
        let mut staged: Vec<Vec<NodeId>> = vec![Vec::new(); fixed_count];
        let mut max_target = 0usize;
        let mut above_ceiling = 0u64;
        let ceiling = self.node_ceiling.min(NodeId::MAX as usize);

        stream_batches(path, batch_size, &mut report, |first_line, batch, report| {
            for (offset, line) in batch.iter().enumerate() {
                let line_no = first_line + offset;
                if fixed_count == 0 && staged.len() < line_no {
                    staged.resize_with(line_no, Vec::new);
                }
                let source_ok = line_no <= NodeId::MAX as usize
                    && (fixed_count == 0 || line_no <= fixed_count);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let mut line_malformed = false;
                for token in line.split(',') {
                    let Ok(target) = token.trim().parse::<i64>() else {
                        report.invalid_tokens += 1;
                        line_malformed = true;
                        continue;
                    };
                    let limit = if fixed_count == 0 {
                        ceiling
                    } else {
                        fixed_count.min(NodeId::MAX as usize)
                    };
                    let target_ok = target >= 1 && target <= limit as i64;
                    if fixed_count == 0 && target > limit as i64 {
                        above_ceiling += 1;
                    }
                    if !source_ok || !target_ok {
                        report.out_of_range += 1;
                        continue;
                    }
                    if target as usize == line_no {
                        report.self_loops += 1;
                        continue;
                    }
                    staged[line_no - 1].push(target as NodeId);
                    max_target = max_target.max(target as usize);
                    report.accepted += 1;
                }
                if line_malformed {
                    report.malformed_lines += 1;
                }
            }
        })?;

        if above_ceiling > 0 {
            warn!(
                dropped = above_ceiling,
                ceiling, "Connection targets above the node ceiling were dropped"
            );
        }
        if fixed_count == 0 {
            let lines = (report.lines_read as usize).min(NodeId::MAX as usize);
            self.node_count = lines.max(max_target);
            debug!(
                lines,
                max_target,
                nodes = self.node_count,
                "Inferred node count from connections"
            );
        }
        staged.resize_with(self.node_count, Vec::new);

        self.adjacency = staged;
        self.edge_count = report.accepted as usize;
        self.connections_loaded = true;
        report.node_count = self.node_count;

        info!(
            edges = self.edge_count,
            invalid_tokens = report.invalid_tokens,
            out_of_range = report.out_of_range,
            self_loops = report.self_loops,
            nodes = self.node_count,
            "Connections loaded"
        );
        Ok(report)
    }

    /// Total node count `N`
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of accepted directed edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All node ids in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        1..=self.node_count as NodeId
    }

    /// Outgoing targets of a node in file order; empty for unknown ids
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|slot| self.adjacency[slot].as_slice())
            .unwrap_or(&[])
    }

    /// Every accepted directed edge in source order
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(slot, targets)| targets.iter().map(move |&t| (slot as NodeId + 1, t)))
    }

    /// Coordinates of a node, if its location line was well formed
    pub fn location(&self, id: NodeId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    /// Number of nodes with a known location
    pub fn located_count(&self) -> usize {
        self.locations.len()
    }

    /// Out-degree of a node
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// In-degree of a node
    ///
    /// Answers from the cache when [`GraphStore::precompute_in_degrees`] ran;
    /// otherwise scans every adjacency list without caching the result.
    pub fn in_degree(&self, id: NodeId) -> usize {
        if let Some(cache) = self.in_degree_cache.get() {
            return self.slot(id).map(|slot| cache[slot]).unwrap_or(0);
        }
        self.adjacency
            .iter()
            .map(|targets| targets.iter().filter(|&&t| t == id).count())
            .sum()
    }

    /// Build the in-degree table for every node in one pass; idempotent
    pub fn precompute_in_degrees(&self) -> &[usize] {
        if self.in_degree_cache.get().is_some() {
            debug!("In-degrees already precomputed");
        }
        self.in_degree_cache.get_or_init(|| {
            let mut degrees = vec![0usize; self.node_count];
            for targets in &self.adjacency {
                for &target in targets {
                    degrees[target as usize - 1] += 1;
                }
            }
            debug!(nodes = self.node_count, "Precomputed in-degrees");
            degrees
        })
    }

    /// In-degree table if it has been built; slot `i` holds node `i + 1`
    pub fn in_degree_cache(&self) -> Option<&[usize]> {
        self.in_degree_cache.get().map(Vec::as_slice)
    }

    /// The `n` most followed nodes, by in-degree descending then id ascending
    pub fn top_n_by_in_degree(&self, n: usize) -> Vec<(NodeId, usize)> {
        top_n_by_degree(self.precompute_in_degrees(), n)
    }

    fn slot(&self, id: NodeId) -> Option<usize> {
        in_range(id, self.node_count).then(|| id as usize - 1)
    }
}

fn in_range(id: NodeId, node_count: usize) -> bool {
    id >= 1 && (id as usize) <= node_count
}

/// Parse `"<lat>,<lon>"`; anything but exactly two numeric tokens is rejected
fn parse_location(line: &str) -> Option<Location> {
    let mut parts = line.trim().split(',');
    let lat = parts.next()?.trim().parse::<f32>().ok()?;
    let lon = parts.next()?.trim().parse::<f32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Location { lat, lon })
}

/// Stream a file in batches of `batch_size` lines
///
/// The callback receives the 1-indexed line number of the first line in the
/// batch. Invalid UTF-8 is replaced rather than rejected so a bad byte only
/// spoils its own line.
fn stream_batches<F>(
    path: &Path,
    batch_size: usize,
    report: &mut LoadReport,
    mut process: F,
) -> Result<()>
where
    F: FnMut(usize, &[String], &mut LoadReport),
{
    if batch_size == 0 {
        return Err(Error::invalid_input("batch_size must be at least 1"));
    }

    let file = File::open(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Cannot open input file");
        Error::io(path, e)
    })?;
    let mut reader = BufReader::new(file);
    let mut batch: Vec<String> = Vec::with_capacity(batch_size.min(1 << 16));
    let mut buf = Vec::new();
    let mut first_line = 1usize;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            error!(path = %path.display(), error = %e, "Read failed mid-stream");
            Error::io(path, e)
        })?;
        if read == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buf);
        batch.push(text.trim_end_matches(['\n', '\r']).to_string());
        report.lines_read += 1;

        if batch.len() >= batch_size {
            process(first_line, &batch, report);
            report.batches += 1;
            debug!(batch = report.batches, lines = report.lines_read, "Processed batch");
            first_line += batch.len();
            batch.clear();
        }
    }

    if !batch.is_empty() {
        process(first_line, &batch, report);
        report.batches += 1;
    }
    Ok(())
}
