use dvsim_core::NodeId;
use dvsim_network::NetworkError;
use dvsim_routing::RoutingError;

/// Errors that abort a simulation run.
///
/// Link-level transport failures are handled locally (the link is marked
/// down); only setup failures, configuration errors, and total isolation of
/// a node surface here.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("configuration error at node {node}")]
    Configuration {
        node: NodeId,
        #[source]
        source: RoutingError,
    },

    #[error("node {node} engine stopped unexpectedly")]
    NodeGone { node: NodeId },

    #[error("node {node} lost every link to its neighbors")]
    NodeIsolated { node: NodeId },

    #[error("no convergence within {limit} rounds")]
    RoundLimitExceeded { limit: u64 },

    #[error("unexpected peer {peer} dialed node {node}")]
    UnexpectedPeer { node: NodeId, peer: NodeId },

    #[error("transport setup failed")]
    Setup(#[from] NetworkError),
}
