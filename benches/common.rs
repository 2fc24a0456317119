#![allow(dead_code)]

use bitgraph::Graph;
use fastrand::Rng;
use petgraph::prelude::*;

pub const RANDOM_SEED: u64 = 0xef6f79ed30ba75a;

/// Geometric skipping over the pairs `(v, w)` with `w < v`, each included
/// with probability `p`.
pub struct RandomEdges {
    v: usize,
    w: usize,
    n: usize,
    p: f32,
}

impl RandomEdges {
    pub fn new(node_count: usize, p: f32) -> Self {
        Self {
            v: 1,
            w: usize::MAX,
            n: node_count,
            p,
        }
    }

    pub fn next_edge(&mut self, rng: &mut Rng) -> Option<(usize, usize)> {
        let Self { v, w, .. } = self;
        let n = self.n;
        let p = self.p;

        if *v >= n {
            return None;
        }

        let r = rng.f32();
        *w = w.wrapping_add(1) + ((1.0 - r).log10() / (1.0 - p).log10()).floor() as usize;

        while *w >= *v && *v < n {
            *w -= *v;
            *v += 1;
        }

        if *v < n {
            Some((*v, *w))
        } else {
            None
        }
    }
}

pub fn bitgraph_random(node_count: usize, density: f32, rng: &mut Rng) -> Graph {
    let mut graph = Graph::new(node_count);
    let mut edges = RandomEdges::new(node_count, density);

    while let Some((u, v)) = edges.next_edge(rng) {
        graph.insert_edge(u, v);
    }

    graph
}

pub fn petgraph_random(node_count: usize, density: f32, rng: &mut Rng) -> DiGraph<(), ()> {
    let mut graph = DiGraph::with_capacity(node_count, 0);

    for _ in 0..node_count {
        graph.add_node(());
    }

    let mut edges = RandomEdges::new(node_count, density);

    while let Some((u, v)) = edges.next_edge(rng) {
        graph.update_edge(NodeIndex::new(u), NodeIndex::new(v), ());
    }

    graph
}

pub fn random_values(count: usize, bound: usize, rng: &mut Rng) -> Vec<usize> {
    (0..count).map(|_| rng.usize(..bound)).collect()
}
