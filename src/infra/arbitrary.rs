use std::fmt;

use arbitrary::{Arbitrary, Unstructured};

use crate::{
    core::{AllocError, BitSet, InsertEdgeError, NodeAbsentError},
    graph::Graph,
};

#[derive(Debug, Arbitrary, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Index(pub usize);

impl Index {
    pub fn get(&self, m: usize) -> Option<usize> {
        if m > 0 {
            Some(self.0 % m)
        } else {
            None
        }
    }

    pub fn map(self, m: usize) -> Option<Index> {
        self.get(m).map(Index)
    }
}

#[derive(Debug, Arbitrary, Clone, PartialEq, Eq)]
pub enum MutOp {
    AddNode,
    RemoveNode(Index),
    InsertEdge(Index, Index),
    RemoveEdge(Index, Index),
    ClearEdges,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutOpResult {
    AddNode(Result<usize, AllocError>),
    RemoveNode(Result<BitSet, NodeAbsentError>),
    InsertEdge(Result<bool, InsertEdgeError>),
    RemoveEdge(Result<bool, NodeAbsentError>),
    ClearEdges,
}

/// Mutation interface shared by [`Graph`] and the reference model, so that a
/// sequence of operations can be applied to both.
pub trait Mutate {
    fn node_count(&self) -> usize;
    fn add_node(&mut self) -> Result<usize, AllocError>;
    fn remove_node(&mut self, node: usize) -> Result<BitSet, NodeAbsentError>;
    fn insert_edge(&mut self, src: usize, dst: usize) -> Result<bool, InsertEdgeError>;
    fn remove_edge(&mut self, src: usize, dst: usize) -> Result<bool, NodeAbsentError>;
    fn clear_edges(&mut self);
}

impl Mutate for Graph {
    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn add_node(&mut self) -> Result<usize, AllocError> {
        self.try_add_node()
    }

    fn remove_node(&mut self, node: usize) -> Result<BitSet, NodeAbsentError> {
        Graph::remove_node(self, node)
    }

    fn insert_edge(&mut self, src: usize, dst: usize) -> Result<bool, InsertEdgeError> {
        self.try_insert_edge(src, dst)
    }

    fn remove_edge(&mut self, src: usize, dst: usize) -> Result<bool, NodeAbsentError> {
        Graph::remove_edge(self, src, dst)
    }

    fn clear_edges(&mut self) {
        Graph::clear_edges(self)
    }
}

impl MutOp {
    pub fn apply<G: Mutate>(self, graph: &mut G) -> MutOpResult {
        let n = graph.node_count();

        match self {
            MutOp::AddNode => MutOpResult::AddNode(graph.add_node()),
            MutOp::RemoveNode(index) => {
                MutOpResult::RemoveNode(graph.remove_node(index.get(n).unwrap_or_default()))
            }
            MutOp::InsertEdge(src, dst) => {
                let src = src.get(n).unwrap_or_default();
                let dst = dst.get(n).unwrap_or_default();
                MutOpResult::InsertEdge(graph.insert_edge(src, dst))
            }
            MutOp::RemoveEdge(src, dst) => {
                let src = src.get(n).unwrap_or_default();
                let dst = dst.get(n).unwrap_or_default();
                MutOpResult::RemoveEdge(graph.remove_edge(src, dst))
            }
            MutOp::ClearEdges => {
                graph.clear_edges();
                MutOpResult::ClearEdges
            }
        }
    }
}

pub struct MutOpsSeq(pub Vec<MutOp>);

impl IntoIterator for MutOpsSeq {
    type Item = MutOp;
    type IntoIter = std::vec::IntoIter<MutOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MutOpsSeq {
    /// Applies the operations and prints them as code that reproduces the
    /// final state.
    pub fn replay<G: Mutate>(self, graph: &mut G) {
        println!("let mut graph = Graph::new(0);");
        println!();

        for op in self {
            let n = graph.node_count();

            let op = match op {
                MutOp::RemoveNode(index) => MutOp::RemoveNode(index.map(n).unwrap_or_default()),
                MutOp::InsertEdge(src, dst) => MutOp::InsertEdge(
                    src.map(n).unwrap_or_default(),
                    dst.map(n).unwrap_or_default(),
                ),
                MutOp::RemoveEdge(src, dst) => MutOp::RemoveEdge(
                    src.map(n).unwrap_or_default(),
                    dst.map(n).unwrap_or_default(),
                ),
                op => op,
            };

            match &op {
                MutOp::AddNode => println!("graph.add_node();"),
                MutOp::RemoveNode(index) => println!("graph.remove_node({}).ok();", index.0),
                MutOp::InsertEdge(src, dst) => {
                    println!("graph.try_insert_edge({}, {}).ok();", src.0, dst.0)
                }
                MutOp::RemoveEdge(src, dst) => {
                    println!("graph.remove_edge({}, {}).ok();", src.0, dst.0)
                }
                MutOp::ClearEdges => println!("graph.clear_edges();"),
            }

            op.apply(graph);
        }

        println!();
        println!("check_consistency(&graph).unwrap();");
    }
}

impl fmt::Debug for MutOpsSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MutOpsSeq(vec![")?;

        for op in self.0.iter() {
            writeln!(f, "    MutOp::{:?},", op)?;
        }

        writeln!(f, "])")?;
        writeln!(f, ".replay(&mut graph);")?;
        writeln!(f)?;
        writeln!(f, "// use `cargo test fuzz_replay_mut_ops_seq`")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum OpKind {
    AddNode,
    InsertEdge,
    RemoveNode,
    RemoveEdge,
    ClearEdges,
}

impl<'a> Arbitrary<'a> for MutOpsSeq {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let n_target = u.int_in_range(10..=1000)?;
        let r = u.nice_f64()?;

        // Directed graph with self-loops.
        let m_target = ((n_target * n_target) as f64 * r).round() as usize;

        let total = u.len();

        let mut n = 0usize;
        let mut m = 0usize;
        let mut seq = Vec::with_capacity(n_target);

        while !u.is_empty() {
            let rv = (n as f64 / n_target as f64).min(1.0);
            let re = if m_target > 0 {
                (m as f64 / m_target as f64).min(1.0)
            } else {
                1.0
            };
            let r = (total - u.len()) as f64 / total as f64;

            let op = match arbitrary_op(u, rv, re, r) {
                Ok(op) => op,
                Err(_) => break,
            };

            match op {
                MutOp::AddNode => n += 1,
                MutOp::RemoveNode(_) => n = n.saturating_sub(1),
                MutOp::InsertEdge(_, _) => m += 1,
                MutOp::RemoveEdge(_, _) => m = m.saturating_sub(1),
                MutOp::ClearEdges => m = 0,
            }

            seq.push(op);
        }

        Ok(MutOpsSeq(seq))
    }
}

fn arbitrary_op(u: &mut Unstructured<'_>, rv: f64, re: f64, r: f64) -> arbitrary::Result<MutOp> {
    // The fuller the graph, the lower the weight of adding. Progress through
    // the input is mixed in, with less influence on edges so that they keep
    // being inserted until the end.
    let wv = non_linear_decrease(0.4 * rv + 0.6 * r);
    let we = non_linear_decrease(0.6 * re + 0.4 * r);

    u.choose_weighted(
        &[
            OpKind::AddNode,
            OpKind::InsertEdge,
            OpKind::RemoveNode,
            OpKind::RemoveEdge,
            OpKind::ClearEdges,
        ],
        // Removal is the opposite of adding, scaled down. Clearing is rare.
        &[wv, we, (1.0 - wv) * 0.25, (1.0 - we) * 0.5, 0.01],
    )
    .and_then(|kind| match kind {
        OpKind::AddNode => Ok(MutOp::AddNode),
        OpKind::InsertEdge => Ok(MutOp::InsertEdge(u.arbitrary()?, u.arbitrary()?)),
        OpKind::RemoveNode => Ok(MutOp::RemoveNode(u.arbitrary()?)),
        OpKind::RemoveEdge => Ok(MutOp::RemoveEdge(u.arbitrary()?, u.arbitrary()?)),
        OpKind::ClearEdges => Ok(MutOp::ClearEdges),
    })
}

trait UnstructuredExt {
    fn nice_f64(&mut self) -> arbitrary::Result<f64>;
    fn choose_weighted<'b, T>(
        &mut self,
        choices: &'b [T],
        weights: &'b [f64],
    ) -> arbitrary::Result<&'b T>;
}

impl<'a> UnstructuredExt for Unstructured<'a> {
    fn nice_f64(&mut self) -> arbitrary::Result<f64> {
        const RESOLUTION: u8 = 100;
        let int = self.int_in_range(0..=RESOLUTION)?;
        Ok(int as f64 / RESOLUTION as f64)
    }

    fn choose_weighted<'b, T>(
        &mut self,
        choices: &'b [T],
        weights: &'b [f64],
    ) -> arbitrary::Result<&'b T> {
        if choices.is_empty() || choices.len() != weights.len() {
            return Err(arbitrary::Error::EmptyChoose);
        }

        let weight_sum = weights.iter().copied().sum::<f64>();
        let bound = self.nice_f64()? * weight_sum;

        let mut acc = 0.0;
        for (choice, weight) in choices.iter().zip(weights.iter().copied()) {
            acc += weight;

            if acc >= bound {
                return Ok(choice);
            }
        }

        // Rounding errors in the accumulated sum.
        Ok(&choices[choices.len() - 1])
    }
}

// f(0) = 1, f(1) ~= 0.152
fn non_linear_decrease(x: f64) -> f64 {
    1.0 / (x + 1.0).powf(std::f64::consts::E)
}
