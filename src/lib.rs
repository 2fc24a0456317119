//! Dynamically sized bit sets and a directed graph whose adjacency is stored
//! as one bit set per node.
//!
//! ```
//! use bitgraph::{core::BitSet, Graph};
//!
//! let set: BitSet = [1, 2, 3].into_iter().collect();
//! assert_eq!(set.to_string(), "{1, 2, 3}");
//!
//! let mut graph = Graph::new(3);
//! graph.insert_edge(0, 2);
//! graph.remove_node(1).unwrap();
//!
//! assert!(graph.contains_edge(0, 1));
//! ```

pub mod core;
pub mod graph;
pub mod infra;
pub mod visit;

pub use crate::{
    core::BitSet,
    graph::{Graph, GraphConfig, RemovalPolicy},
};

pub mod prelude {
    pub use crate::{
        core::BitSet,
        graph::{Graph, GraphConfig, RemovalPolicy},
        visit::{Dfs, Visitor},
    };
}
