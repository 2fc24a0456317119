use std::fmt;

use thiserror::Error;

/// The backing storage could not be obtained from the allocator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[error("allocation failed: could not reserve storage for {requested} {unit}")]
pub struct AllocError {
    pub requested: usize,
    pub unit: AllocUnit,
}

impl AllocError {
    pub fn bytes(requested: usize) -> Self {
        Self {
            requested,
            unit: AllocUnit::Bytes,
        }
    }

    pub fn nodes(requested: usize) -> Self {
        Self {
            requested,
            unit: AllocUnit::Nodes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocUnit {
    Bytes,
    Nodes,
}

impl fmt::Display for AllocUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            AllocUnit::Bytes => "bytes",
            AllocUnit::Nodes => "nodes",
        };
        f.write_str(unit)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot choose a member of an empty set")]
pub struct EmptySetError;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("node {node} does not exist in a graph with {node_count} nodes")]
pub struct NodeAbsentError {
    pub node: usize,
    pub node_count: usize,
}

impl NodeAbsentError {
    pub fn new(node: usize, node_count: usize) -> Self {
        Self { node, node_count }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("inserting edge ({src}, {dst}) failed: {kind}")]
pub struct InsertEdgeError {
    pub src: usize,
    pub dst: usize,
    pub kind: InsertEdgeErrorKind,
}

impl InsertEdgeError {
    pub fn new(src: usize, dst: usize, kind: InsertEdgeErrorKind) -> Self {
        Self { src, dst, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertEdgeErrorKind {
    SourceAbsent,
    DestinationAbsent,
    Alloc(AllocError),
}

impl fmt::Display for InsertEdgeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertEdgeErrorKind::SourceAbsent => f.write_str("source does not exist"),
            InsertEdgeErrorKind::DestinationAbsent => f.write_str("destination does not exist"),
            InsertEdgeErrorKind::Alloc(error) => write!(f, "{error}"),
        }
    }
}

impl From<AllocError> for InsertEdgeErrorKind {
    fn from(error: AllocError) -> Self {
        InsertEdgeErrorKind::Alloc(error)
    }
}
