/// What happens to stored neighbour ids when a node is removed.
///
/// Removing node `k` always deletes the edges into `k` and moves the
/// adjacency sets of nodes `k + 1..n` one slot down. The policy decides
/// whether the ids stored *inside* the surviving sets follow that move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum RemovalPolicy {
    /// Every stored id greater than `k` is decremented, so edges keep
    /// pointing at the same nodes and all ids stay in `0..n - 1`.
    #[default]
    Renumber,
    /// Stored ids are left untouched. Ids greater than `k` refer to the old
    /// numbering afterwards and the id `n - 1` may be out of range.
    Shift,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphConfig {
    pub(crate) removal_policy: RemovalPolicy,
    pub(crate) node_capacity: usize,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removal_policy(self, value: RemovalPolicy) -> Self {
        Self {
            removal_policy: value,
            ..self
        }
    }

    pub fn renumber(self) -> Self {
        self.removal_policy(RemovalPolicy::Renumber)
    }

    pub fn shift(self) -> Self {
        self.removal_policy(RemovalPolicy::Shift)
    }

    /// Reserves room for this many adjacency sets up front. Has no effect
    /// on the node count.
    pub fn node_capacity(self, value: usize) -> Self {
        Self {
            node_capacity: value,
            ..self
        }
    }
}
