//! Graph traversal.
//!
//! The traversal is **iterative**, that is, it doesn't use recursion. This
//! means that
//!
//! * &#128077; visitor is lazy and can be stopped without tricks,
//! * &#128077; visitor state (including the visited markers) is independent
//!   on the graph itself, which never tracks visitation,
//! * &#128077; traversal is not limited by the size of the program stack.
//!
//! Neighbours are discovered in ascending order of their ids, so the order of
//! [`Dfs`] is the same as the order of the textbook recursive depth-first
//! search.

pub mod dfs;
mod visit_set;

#[doc(inline)]
pub use self::{dfs::Dfs, visit_set::VisitSet};

use crate::{core::NodeAbsentError, graph::Graph};

/// Trait for a specific graph traversal approach.
pub trait Visitor {
    /// The type of the elements being visited.
    type Item;

    /// Advances the visitor and returns the next visited element in given
    /// graph.
    ///
    /// The difference from the [`Iterator::next`] is that the visitor doesn't
    /// hold a reference to the graph and thus allows modifications to the graph
    /// between individual visitor steps.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitgraph::{visit::{Dfs, Visitor}, Graph};
    ///
    /// let mut graph = Graph::new(4);
    /// graph.insert_edge(0, 1);
    /// graph.insert_edge(1, 2);
    /// graph.insert_edge(2, 3);
    ///
    /// let mut dfs = Dfs::new(&graph);
    /// let mut visitor = dfs.start(0);
    ///
    /// while let Some(node) = visitor.visit_next(&graph) {
    ///     if node == 0 {
    ///         // Cut the path ahead of the traversal.
    ///         graph.remove_edge(1, 2).unwrap();
    ///     }
    /// }
    ///
    /// assert!(dfs.is_visited(1));
    /// assert!(!dfs.is_visited(2));
    /// ```
    fn visit_next(&mut self, graph: &Graph) -> Option<Self::Item>;

    /// Returns an [iterator](Iterator) that uses the visitor to iterate over
    /// the elements in given graph.
    fn iter<'a>(&'a mut self, graph: &'a Graph) -> Iter<'a, Self>
    where
        Self: Sized,
    {
        Iter {
            visitor: self,
            graph,
        }
    }

    /// Converts the visitor into an [iterator](Iterator) to visit the elements
    /// in given graph.
    fn into_iter(self, graph: &Graph) -> IntoIter<'_, Self>
    where
        Self: Sized,
    {
        IntoIter {
            visitor: self,
            graph,
        }
    }
}

/// Visitor iterator returned from [`Visitor::iter`].
pub struct Iter<'a, V> {
    visitor: &'a mut V,
    graph: &'a Graph,
}

impl<V> Iterator for Iter<'_, V>
where
    V: Visitor,
{
    type Item = V::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.visitor.visit_next(self.graph)
    }
}

/// Visitor iterator returned from [`Visitor::into_iter`].
pub struct IntoIter<'a, V> {
    visitor: V,
    graph: &'a Graph,
}

impl<V> Iterator for IntoIter<'_, V>
where
    V: Visitor,
{
    type Item = V::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.visitor.visit_next(self.graph)
    }
}

/// Returns the nodes reachable from `root` in depth-first order.
pub fn depth_first(graph: &Graph, root: usize) -> Result<Vec<usize>, NodeAbsentError> {
    graph.neighbours(root)?;

    let mut dfs = Dfs::new(graph);
    let order = dfs.start(root).iter(graph).collect();
    Ok(order)
}
