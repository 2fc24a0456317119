use fastrand::Rng;
use thiserror::Error;

use crate::{
    core::BitSet,
    graph::{Graph, GraphConfig},
};

pub fn create_complete(node_count: usize, config: GraphConfig) -> Graph {
    let mut graph = Graph::with_config(node_count, config);

    for u in 0..node_count {
        for v in 0..node_count {
            if u != v {
                graph.insert_edge(u, v);
            }
        }
    }

    graph
}

pub fn create_path(node_count: usize, config: GraphConfig) -> Graph {
    let mut graph = Graph::with_config(node_count, config);

    for u in 1..node_count {
        graph.insert_edge(u - 1, u);
    }

    graph
}

/// Inserts `count` edges between randomly chosen nodes. Pairs that would
/// form a self-loop are skipped, so fewer edges may be added.
pub fn add_random_edges(graph: &mut Graph, count: usize, rng: &mut Rng) {
    let n = graph.node_count();

    if n == 0 {
        return;
    }

    for _ in 0..count {
        let src = rng.usize(..n);
        let dst = rng.usize(..n);

        if src != dst {
            graph.insert_edge(src, dst);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyCheckError {
    #[error("set size ({0}) is not equal to the number of set bits ({1})")]
    SetSizeMismatch(usize, usize),
    #[error("set capacity ({0}) is not a multiple of 8")]
    CapacityMisaligned(usize),
    #[error("set storage has {0} bytes but capacity is {1}")]
    StorageCapacityMismatch(usize, usize),
    #[error("values iterator is not strictly ascending at {0}")]
    ValuesUnordered(usize),
    #[error("adjacency set of node {0} is inconsistent: {1}")]
    AdjacencySet(usize, Box<ConsistencyCheckError>),
    #[error("node {0} has neighbour {1} which does not exist")]
    NeighbourOutOfRange(usize, usize),
    #[error("edge count ({0}) is not equal to sum of degrees ({1})")]
    EdgeCountMismatch(usize, usize),
}

pub fn check_set_consistency(set: &BitSet) -> Result<(), ConsistencyCheckError> {
    if set.capacity() % 8 != 0 {
        return Err(ConsistencyCheckError::CapacityMisaligned(set.capacity()));
    }

    if set.as_bytes().len() * 8 != set.capacity() {
        return Err(ConsistencyCheckError::StorageCapacityMismatch(
            set.as_bytes().len(),
            set.capacity(),
        ));
    }

    let ones = set
        .as_bytes()
        .iter()
        .map(|byte| byte.count_ones() as usize)
        .sum::<usize>();

    if ones != set.len() {
        return Err(ConsistencyCheckError::SetSizeMismatch(set.len(), ones));
    }

    let values = set.values();
    if let Some(pos) = values.windows(2).position(|pair| pair[0] >= pair[1]) {
        return Err(ConsistencyCheckError::ValuesUnordered(pos));
    }

    Ok(())
}

/// Checks the structural invariants of the graph and all its adjacency sets.
///
/// Neighbour ids left stale by [`RemovalPolicy::Shift`](crate::graph::RemovalPolicy::Shift)
/// are only reported if they are out of range.
pub fn check_consistency(graph: &Graph) -> Result<(), ConsistencyCheckError> {
    let n = graph.node_count();
    let mut degree_sum = 0;

    for (node, neighbours) in graph {
        check_set_consistency(neighbours)
            .map_err(|error| ConsistencyCheckError::AdjacencySet(node, Box::new(error)))?;

        if let Some(max) = neighbours.max() {
            if max >= n {
                return Err(ConsistencyCheckError::NeighbourOutOfRange(node, max));
            }
        }

        degree_sum += neighbours.len();
    }

    if degree_sum != graph.edge_count() {
        return Err(ConsistencyCheckError::EdgeCountMismatch(
            graph.edge_count(),
            degree_sum,
        ));
    }

    Ok(())
}

/// Routes log events of the crate to the test output. Filtered by
/// `RUST_LOG`, warnings by default.
#[cfg(test)]
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Only the first call in a test binary installs the subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Runs `f` and returns the number of warning events it emitted.
#[cfg(test)]
pub(crate) fn count_warnings<F: FnOnce()>(f: F) -> usize {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        Layer,
    };

    struct CountWarnings(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for CountWarnings {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(CountWarnings(count.clone()));

    tracing::subscriber::with_default(subscriber, f);

    count.load(Ordering::Relaxed)
}
