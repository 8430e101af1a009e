use crate::{EdgeId, NodeId};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Returns the identifier of the edge from `source` to `target`.
///
/// Identifiers depend only on the endpoints, so structurally
/// identical edges share an identifier across genomes, and
/// edges in opposite directions never do.
///
/// # Examples
/// ```
/// use evoneat_cppn::genomics::{edge_endpoints, edge_id};
///
/// assert_eq!(edge_id(3, 9), edge_id(3, 9));
/// assert_ne!(edge_id(3, 9), edge_id(9, 3));
/// assert_eq!(edge_endpoints(edge_id(3, 9)), (3, 9));
/// ```
pub fn edge_id(source: NodeId, target: NodeId) -> EdgeId {
    (EdgeId::from(source) << 32) | EdgeId::from(target)
}

/// Inverse of [`edge_id`].
pub fn edge_endpoints(id: EdgeId) -> (NodeId, NodeId) {
    ((id >> 32) as NodeId, id as NodeId)
}

/// Edges are weighted, directed connections between nodes.
/// Disabled edges carry no signal, but remain part of
/// the genome and may be re-enabled.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    pub(super) weight: f32,
    pub(crate) enabled: bool,
}

impl Edge {
    /// Returns a new _enabled_ edge with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat_cppn::genomics::{edge_id, Edge};
    ///
    /// let edge = Edge::new(0, 7, 1.5);
    /// assert!(edge.enabled());
    /// assert_eq!(edge.id(), edge_id(0, 7));
    /// ```
    pub fn new(source: NodeId, target: NodeId, weight: f32) -> Edge {
        Edge {
            source,
            target,
            weight,
            enabled: true,
        }
    }

    pub fn id(&self) -> EdgeId {
        edge_id(self.source, self.target)
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({:.4}{})",
            self.source,
            self.target,
            self.weight,
            if self.enabled { "" } else { ", disabled" }
        )
    }
}
