use crate::graph::NodeId;

/// Rejections raised while ingesting similarity edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A category paired with itself. Admitting it would let BFS discover
    /// the node from itself.
    #[error("category {0} cannot be similar to itself")]
    SelfEdge(NodeId),
}
