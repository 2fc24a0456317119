use fixedbitset::FixedBitSet;

/// Visited markers of a traversal, owned by the traversal and never by the
/// graph.
pub trait VisitSet {
    /// Marks `node` as visited and returns `true` if it was not visited
    /// before.
    fn visit(&mut self, node: usize) -> bool;
    fn is_visited(&self, node: usize) -> bool;
    fn visited_count(&self) -> usize;
    fn reset_visited(&mut self);
}

impl VisitSet for FixedBitSet {
    fn visit(&mut self, node: usize) -> bool {
        if node >= self.len() {
            self.grow(node + 1);
        }
        !self.put(node)
    }

    fn is_visited(&self, node: usize) -> bool {
        self.contains(node)
    }

    fn visited_count(&self) -> usize {
        self.count_ones(..)
    }

    fn reset_visited(&mut self) {
        self.clear()
    }
}

/// One flag per node, as a plain visited array.
impl VisitSet for Vec<bool> {
    fn visit(&mut self, node: usize) -> bool {
        if node >= self.len() {
            self.resize(node + 1, false);
        }
        !std::mem::replace(&mut self[node], true)
    }

    fn is_visited(&self, node: usize) -> bool {
        self.get(node).copied().unwrap_or(false)
    }

    fn visited_count(&self) -> usize {
        self.iter().filter(|visited| **visited).count()
    }

    fn reset_visited(&mut self) {
        self.fill(false);
    }
}
