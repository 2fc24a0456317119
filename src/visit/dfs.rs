use fixedbitset::FixedBitSet;

use super::{VisitSet, Visitor};
use crate::graph::Graph;

/// Depth-first traversal in preorder.
pub struct Dfs<S = FixedBitSet> {
    visited: S,
    stack: Vec<usize>,
}

pub struct DfsRooted<'a, S> {
    dfs: &'a mut Dfs<S>,
}

pub struct DfsAll<'a, S> {
    dfs: &'a mut Dfs<S>,
    next_root: usize,
}

impl Dfs {
    pub fn new(graph: &Graph) -> Self {
        Self::with_visit_set(FixedBitSet::with_capacity(graph.node_count()))
    }
}

impl<S: VisitSet> Dfs<S> {
    pub fn with_visit_set(visited: S) -> Self {
        Self {
            visited,
            stack: Vec::new(),
        }
    }

    /// Starts a traversal from `root`. Nodes visited by previous traversals
    /// are skipped unless [`reset`](Dfs::reset) is called in between.
    pub fn start(&mut self, root: usize) -> DfsRooted<'_, S> {
        self.stack.clear();
        self.stack.push(root);
        DfsRooted { dfs: self }
    }

    /// Traverses the whole graph, starting a new tree from the lowest
    /// unvisited node whenever the current one is exhausted.
    pub fn start_all(&mut self) -> DfsAll<'_, S> {
        self.stack.clear();
        DfsAll {
            dfs: self,
            next_root: 0,
        }
    }

    pub fn reset(&mut self) {
        self.visited.reset_visited();
        self.stack.clear();
    }

    pub fn is_visited(&self, node: usize) -> bool {
        self.visited.is_visited(node)
    }

    pub fn visited(&self) -> &S {
        &self.visited
    }

    fn next(&mut self, graph: &Graph) -> Option<usize> {
        while let Some(node) = self.stack.pop() {
            // The graph might have shrunk since the node was discovered.
            if !graph.contains_node(node) || self.visited.is_visited(node) {
                continue;
            }

            let Ok(neighbours) = graph.neighbours(node) else {
                continue;
            };

            self.visited.visit(node);

            // Pushed in descending order so that the lowest neighbour is
            // explored first.
            let visited = &self.visited;
            self.stack.extend(
                neighbours
                    .iter()
                    .rev()
                    .filter(|neighbour| !visited.is_visited(*neighbour)),
            );

            return Some(node);
        }

        None
    }
}

impl<S: VisitSet> Visitor for DfsRooted<'_, S> {
    type Item = usize;

    fn visit_next(&mut self, graph: &Graph) -> Option<Self::Item> {
        self.dfs.next(graph)
    }
}

impl<S: VisitSet> Visitor for DfsAll<'_, S> {
    type Item = usize;

    fn visit_next(&mut self, graph: &Graph) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.dfs.next(graph) {
                return Some(node);
            }

            while self.next_root < graph.node_count() && self.dfs.is_visited(self.next_root) {
                self.next_root += 1;
            }

            if self.next_root >= graph.node_count() {
                return None;
            }

            self.dfs.stack.push(self.next_root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::GraphConfig,
        infra::testing::{add_random_edges, create_path},
    };

    // The traversal the iterative one must agree with.
    fn recursive(graph: &Graph, node: usize, visited: &mut Vec<bool>, order: &mut Vec<usize>) {
        visited[node] = true;
        order.push(node);

        for v in graph.neighbours(node).unwrap().values() {
            if !visited[v] {
                recursive(graph, v, visited, order);
            }
        }
    }

    #[test]
    fn preorder() {
        let mut graph = Graph::new(6);

        graph.insert_edge(0, 3);
        graph.insert_edge(0, 1);
        graph.insert_edge(1, 2);
        graph.insert_edge(2, 0);
        graph.insert_edge(3, 2);
        graph.insert_edge(3, 4);

        let mut dfs = Dfs::new(&graph);
        let order = dfs.start(0).iter(&graph).collect::<Vec<_>>();

        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(!dfs.is_visited(5));
        assert_eq!(dfs.visited().count_ones(..), 5);
    }

    #[test]
    fn matches_recursive_order() {
        let mut rng = fastrand::Rng::with_seed(0xef6f79ed30ba75a);

        for _ in 0..20 {
            let mut graph = Graph::new(10);
            add_random_edges(&mut graph, 15, &mut rng);

            let mut visited = vec![false; 10];
            let mut expected = Vec::new();
            recursive(&graph, 0, &mut visited, &mut expected);

            let order = Dfs::new(&graph).start(0).into_iter(&graph).collect::<Vec<_>>();
            assert_eq!(order, expected);
        }
    }

    #[test]
    fn bool_vec_visit_set() {
        let graph = create_path(4, GraphConfig::default());

        let mut dfs = Dfs::with_visit_set(vec![false; graph.node_count()]);
        let order = dfs.start(1).iter(&graph).collect::<Vec<_>>();

        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(dfs.visited(), &vec![false, true, true, true]);
    }

    #[test]
    fn restart_skips_visited() {
        let graph = create_path(4, GraphConfig::default());
        let mut dfs = Dfs::new(&graph);

        assert_eq!(dfs.start(2).iter(&graph).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(dfs.start(0).iter(&graph).collect::<Vec<_>>(), vec![0, 1]);

        dfs.reset();
        assert_eq!(dfs.start(2).iter(&graph).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn start_all() {
        let mut graph = Graph::new(5);

        graph.insert_edge(1, 0);
        graph.insert_edge(3, 4);
        graph.insert_edge(4, 2);

        let mut dfs = Dfs::new(&graph);
        let order = dfs.start_all().iter(&graph).collect::<Vec<_>>();

        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn graph_shrinks_during_traversal() {
        let mut graph = create_path(4, GraphConfig::default());
        graph.insert_edge(0, 3);

        let mut dfs = Dfs::new(&graph);
        let mut visitor = dfs.start(0);

        assert_eq!(visitor.visit_next(&graph), Some(0));

        // Node 3 is still on the stack, but no longer exists.
        graph.remove_node(3).unwrap();

        assert_eq!(visitor.iter(&graph).collect::<Vec<_>>(), vec![1, 2]);
    }
}
