use crate::NodeId;

use std::error::Error;
use std::fmt;

/// Errors raised by genome construction and
/// by operations between genomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenomeError {
    /// The genomes' input/output nodes differ.
    /// Holds the `(inputs, outputs)` counts of both genomes.
    IncompatibleInterface {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// An input vector of the wrong length was supplied.
    InputLength { expected: usize, found: usize },
    /// The node's ID is a duplicate.
    DuplicateNode(NodeId),
    /// The edge's endpoints do not exist.
    NonexistantEndpoints(NodeId, NodeId),
    /// An edge with the same endpoints already exists.
    DuplicateEdge(NodeId, NodeId),
}

impl fmt::Display for GenomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleInterface { expected, found } => write!(
                f,
                "genome interface mismatch: expected {} inputs and {} outputs, found {} and {} \
                 (or differing node ids)",
                expected.0, expected.1, found.0, found.1
            ),
            Self::InputLength { expected, found } => write!(
                f,
                "input vector of length {} given to network with {} inputs",
                found, expected
            ),
            Self::DuplicateNode(id) => write!(f, "duplicate node insertion with id {}", id),
            Self::NonexistantEndpoints(source, target) => write!(
                f,
                "edge insertion between nonexistant endpoint(s) {} -> {}",
                source, target
            ),
            Self::DuplicateEdge(source, target) => {
                write!(f, "duplicate edge insertion {} -> {}", source, target)
            }
        }
    }
}

impl Error for GenomeError {}
