//! Directed graph with one adjacency [`BitSet`] per node.
//!
//! Nodes are identified by `0..n`. An edge `(a, b)` is stored as member `b`
//! of the adjacency set of `a`. Self-loops are allowed, multi-edges are not
//! representable.
//!
//! # Examples
//!
//! ```
//! use bitgraph::Graph;
//!
//! let mut graph = Graph::new(5);
//!
//! graph.insert_edge(0, 1);
//! graph.insert_edge(0, 2);
//! graph.insert_edge(1, 3);
//!
//! assert_eq!(graph.neighbours(0).unwrap().values(), vec![1, 2]);
//!
//! graph.remove_node(1).unwrap();
//!
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.neighbours(0).unwrap().values(), vec![1]);
//! ```

mod config;

pub use config::{GraphConfig, RemovalPolicy};

use std::{fmt, iter::Enumerate, slice};

use tracing::{debug, warn};

use crate::core::{
    AllocError, BitSet, InsertEdgeError, InsertEdgeErrorKind, NodeAbsentError,
};

#[derive(Debug, Clone)]
pub struct Graph {
    adjacency: Vec<BitSet>,
    policy: RemovalPolicy,
}

impl Graph {
    /// Creates a graph with `node_count` nodes and no edges.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated. See
    /// [`try_new`](Graph::try_new) for the fallible version.
    pub fn new(node_count: usize) -> Self {
        Self::with_config(node_count, GraphConfig::default())
    }

    pub fn try_new(node_count: usize) -> Result<Self, AllocError> {
        Self::try_with_config(node_count, GraphConfig::default())
    }

    pub fn with_config(node_count: usize, config: GraphConfig) -> Self {
        match Self::try_with_config(node_count, config) {
            Ok(graph) => graph,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_with_config(node_count: usize, config: GraphConfig) -> Result<Self, AllocError> {
        let reserve = config.node_capacity.max(node_count);

        let mut adjacency = Vec::new();
        if adjacency.try_reserve_exact(reserve).is_err() {
            warn!(nodes = reserve, "graph storage allocation failed");
            return Err(AllocError::nodes(reserve));
        }

        for _ in 0..node_count {
            // On failure, the sets created so far are dropped together with
            // `adjacency`.
            adjacency.push(BitSet::try_new()?);
        }

        Ok(Self {
            adjacency,
            policy: config.removal_policy,
        })
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.policy
    }

    pub fn set_removal_policy(&mut self, policy: RemovalPolicy) {
        self.policy = policy;
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BitSet::len).sum()
    }

    pub fn contains_node(&self, node: usize) -> bool {
        node < self.adjacency.len()
    }

    /// Appends a node without edges and returns its id.
    pub fn add_node(&mut self) -> usize {
        match self.try_add_node() {
            Ok(node) => node,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_add_node(&mut self) -> Result<usize, AllocError> {
        let node = self.adjacency.len();

        if self.adjacency.try_reserve(1).is_err() {
            warn!(nodes = node + 1, "graph storage allocation failed");
            return Err(AllocError::nodes(node + 1));
        }

        self.adjacency.push(BitSet::try_new()?);
        Ok(node)
    }

    /// Inserts edge `(src, dst)` and returns whether it is new.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint does not exist. See
    /// [`try_insert_edge`](Graph::try_insert_edge) for the fallible version.
    pub fn insert_edge(&mut self, src: usize, dst: usize) -> bool {
        match self.try_insert_edge(src, dst) {
            Ok(inserted) => inserted,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_insert_edge(&mut self, src: usize, dst: usize) -> Result<bool, InsertEdgeError> {
        let n = self.node_count();

        let kind = if src >= n {
            Some(InsertEdgeErrorKind::SourceAbsent)
        } else if dst >= n {
            Some(InsertEdgeErrorKind::DestinationAbsent)
        } else {
            None
        };

        if let Some(kind) = kind {
            warn!(src, dst, node_count = n, "rejected edge with invalid node index");
            return Err(InsertEdgeError::new(src, dst, kind));
        }

        self.adjacency[src]
            .try_insert(dst)
            .map_err(|error| InsertEdgeError::new(src, dst, error.into()))
    }

    /// Removes edge `(src, dst)` if present and returns whether it was.
    pub fn remove_edge(&mut self, src: usize, dst: usize) -> Result<bool, NodeAbsentError> {
        self.check_node(src)?;
        self.check_node(dst)?;

        Ok(self.adjacency[src].remove(dst))
    }

    /// Returns `false` also when either endpoint does not exist.
    pub fn contains_edge(&self, src: usize, dst: usize) -> bool {
        self.adjacency
            .get(src)
            .map_or(false, |neighbours| neighbours.contains(dst))
    }

    /// Out-neighbours of `node`, borrowed from the graph.
    pub fn neighbours(&self, node: usize) -> Result<&BitSet, NodeAbsentError> {
        self.check_node(node)?;
        Ok(&self.adjacency[node])
    }

    /// Out-degree of `node`.
    pub fn degree(&self, node: usize) -> Result<usize, NodeAbsentError> {
        self.neighbours(node).map(BitSet::len)
    }

    /// Removes `node` together with all edges into it and returns its
    /// adjacency set (with ids in the numbering from before the removal).
    ///
    /// The sets of nodes `node + 1..n` move one position down. Whether the
    /// ids stored in the sets follow the move is given by the graph's
    /// [`RemovalPolicy`].
    pub fn remove_node(&mut self, node: usize) -> Result<BitSet, NodeAbsentError> {
        self.check_node(node)?;

        let removed = self.adjacency.remove(node);

        match self.policy {
            RemovalPolicy::Renumber => {
                for neighbours in self.adjacency.iter_mut() {
                    neighbours.remove_and_close_gap(node);
                }
            }
            RemovalPolicy::Shift => {
                for neighbours in self.adjacency.iter_mut() {
                    neighbours.remove(node);
                }

                let stale = self.stale_sets(node);
                if stale > 0 {
                    warn!(node, sets = stale, "node removal left stale neighbour ids");
                }
            }
        }

        debug!(
            node,
            policy = ?self.policy,
            node_count = self.adjacency.len(),
            "removed node"
        );

        Ok(removed)
    }

    /// Removes all edges, keeping the nodes.
    pub fn clear_edges(&mut self) {
        for neighbours in self.adjacency.iter_mut() {
            neighbours.clear();
        }
    }

    /// Iterates over `(node, neighbours)` pairs in node order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.adjacency.iter().enumerate(),
        }
    }

    /// Number of adjacency sets holding an id greater than `node`.
    fn stale_sets(&self, node: usize) -> usize {
        self.adjacency
            .iter()
            .filter(|neighbours| neighbours.max().map_or(false, |max| max > node))
            .count()
    }

    fn check_node(&self, node: usize) -> Result<(), NodeAbsentError> {
        if self.contains_node(node) {
            Ok(())
        } else {
            warn!(node, node_count = self.node_count(), "invalid node index");
            Err(NodeAbsentError::new(node, self.node_count()))
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency == other.adjacency
    }
}

impl Eq for Graph {}

/// Lists the neighbours of every node, one node per line.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, neighbours) in self.iter() {
            write!(f, "Node {node}:")?;

            if neighbours.is_empty() {
                f.write_str(" -")?;
            }

            for neighbour in neighbours {
                write!(f, " {neighbour}")?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = (usize, &'a BitSet);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    inner: Enumerate<slice::Iter<'a, BitSet>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a BitSet);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
