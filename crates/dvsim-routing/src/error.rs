use dvsim_core::NodeId;

/// Errors that can occur within the routing layer.
///
/// All of these are configuration errors: they indicate a malformed topology
/// or a protocol violation, never a transient condition worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("neighbor costs for node {node} include the node itself")]
    SelfNeighbor { node: NodeId },

    #[error("non-positive link weight {weight} to neighbor {neighbor}")]
    InvalidLinkWeight { neighbor: NodeId, weight: u32 },

    #[error("vector received from {neighbor} but no direct link cost to it is known")]
    UnknownNeighbor { neighbor: NodeId },
}
