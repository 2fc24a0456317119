use arbitrary::Arbitrary;
use rustc_hash::FxHashSet;

use crate::{
    core::{AllocError, BitSet, InsertEdgeError, InsertEdgeErrorKind, NodeAbsentError},
    graph::{Graph, RemovalPolicy},
};

use super::arbitrary::{MutOp, Mutate};

#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub struct ModelParams {
    allow_loops: bool,
    max_node_count: Option<usize>,
    max_remove_nodes: Option<usize>,
    max_remove_edges: Option<usize>,
    removal_policy: RemovalPolicy,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            allow_loops: true,
            max_node_count: None,
            max_remove_nodes: None,
            max_remove_edges: None,
            removal_policy: RemovalPolicy::Renumber,
        }
    }
}

impl ModelParams {
    pub fn no_loops(self) -> Self {
        Self {
            allow_loops: false,
            ..self
        }
    }

    pub fn max_node_count(self, value: usize) -> Self {
        Self {
            max_node_count: Some(value),
            ..self
        }
    }

    pub fn max_remove_nodes(self, value: usize) -> Self {
        Self {
            max_remove_nodes: Some(value),
            ..self
        }
    }

    pub fn no_remove_nodes(self) -> Self {
        self.max_remove_nodes(0)
    }

    pub fn max_remove_edges(self, value: usize) -> Self {
        Self {
            max_remove_edges: Some(value),
            ..self
        }
    }

    pub fn no_remove_edges(self) -> Self {
        self.max_remove_edges(0)
    }

    pub fn no_remove(self) -> Self {
        self.no_remove_nodes().no_remove_edges()
    }

    pub fn renumber(self) -> Self {
        self.removal_policy(RemovalPolicy::Renumber)
    }

    pub fn shift(self) -> Self {
        self.removal_policy(RemovalPolicy::Shift)
    }

    pub fn removal_policy(self, value: RemovalPolicy) -> Self {
        Self {
            removal_policy: value,
            ..self
        }
    }
}

/// Reference implementation of [`Graph`] as a plain set of `(src, dst)`
/// pairs.
#[derive(Debug, Clone)]
pub struct Model {
    node_count: usize,
    edges: FxHashSet<(usize, usize)>,
    removed_nodes: usize,
    removed_edges: usize,
    params: ModelParams,
}

impl Model {
    pub fn new(params: ModelParams) -> Self {
        Self {
            node_count: 0,
            edges: FxHashSet::default(),
            removed_nodes: 0,
            removed_edges: 0,
            params,
        }
    }

    /// Graph with the same removal policy as the model.
    pub fn graph(&self) -> Graph {
        let mut graph = Graph::new(0);
        graph.set_removal_policy(self.params.removal_policy);
        graph
    }

    /// Returns `false` if the operation is not allowed by the parameters and
    /// should be skipped.
    pub fn check(&self, op: &MutOp) -> bool {
        match op {
            MutOp::AddNode if self.params.max_node_count == Some(self.node_count) => false,
            MutOp::RemoveNode(_) if self.params.max_remove_nodes == Some(self.removed_nodes) => {
                false
            }
            MutOp::RemoveEdge(_, _) if self.params.max_remove_edges == Some(self.removed_edges) => {
                false
            }
            MutOp::InsertEdge(src, dst) if !self.params.allow_loops => {
                src.get(self.node_count) != dst.get(self.node_count)
            }
            _ => true,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, src: usize, dst: usize) -> bool {
        self.edges.contains(&(src, dst))
    }

    /// Same nodes and same edges as `graph`.
    pub fn is_equivalent(&self, graph: &Graph) -> bool {
        self.node_count == graph.node_count()
            && self.edges.len() == graph.edge_count()
            && self
                .edges
                .iter()
                .all(|&(src, dst)| graph.contains_edge(src, dst))
    }

    fn check_node(&self, node: usize) -> Result<(), NodeAbsentError> {
        if node < self.node_count {
            Ok(())
        } else {
            Err(NodeAbsentError::new(node, self.node_count))
        }
    }
}

impl Mutate for Model {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn add_node(&mut self) -> Result<usize, AllocError> {
        self.node_count += 1;
        Ok(self.node_count - 1)
    }

    fn remove_node(&mut self, node: usize) -> Result<BitSet, NodeAbsentError> {
        self.check_node(node)?;

        self.removed_nodes += 1;
        self.node_count -= 1;

        let removed = self
            .edges
            .iter()
            .filter(|(src, _)| *src == node)
            .map(|(_, dst)| *dst)
            .collect::<BitSet>();

        let shift = |id: usize| if id > node { id - 1 } else { id };

        self.edges = self
            .edges
            .iter()
            .filter(|&&(src, dst)| src != node && dst != node)
            .map(|&(src, dst)| match self.params.removal_policy {
                RemovalPolicy::Renumber => (shift(src), shift(dst)),
                RemovalPolicy::Shift => (shift(src), dst),
            })
            .collect();

        Ok(removed)
    }

    fn insert_edge(&mut self, src: usize, dst: usize) -> Result<bool, InsertEdgeError> {
        if src >= self.node_count {
            return Err(InsertEdgeError::new(
                src,
                dst,
                InsertEdgeErrorKind::SourceAbsent,
            ));
        }

        if dst >= self.node_count {
            return Err(InsertEdgeError::new(
                src,
                dst,
                InsertEdgeErrorKind::DestinationAbsent,
            ));
        }

        Ok(self.edges.insert((src, dst)))
    }

    fn remove_edge(&mut self, src: usize, dst: usize) -> Result<bool, NodeAbsentError> {
        self.check_node(src)?;
        self.check_node(dst)?;

        self.removed_edges += 1;
        Ok(self.edges.remove(&(src, dst)))
    }

    fn clear_edges(&mut self) {
        self.edges.clear();
    }
}
