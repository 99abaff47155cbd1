//! Wires a topology into a running simulation: listeners, link channels,
//! node engines, and the convergence monitor.

use std::collections::HashMap;

use dvsim_core::{RoutingVector, SimConfig, Topology};
use dvsim_network::{Channel, Listener, NetworkError, RetryPolicy};
use tokio::sync::mpsc;

use crate::engine::{NodeEndpoints, NodeEngine};
use crate::error::SimError;
use crate::monitor::{ConvergenceMonitor, SimulationReport};

/// Build all transport channels and node engines for `topology`, then run
/// the convergence monitor to completion.
///
/// Channel ownership is injected: every node receives exactly the endpoint
/// halves of its own links. For each undirected link the lower-id node dials
/// the higher-id node's listener and announces itself with a hello vector,
/// so the accepting side can attribute the channel without any shared
/// registry.
pub async fn run(topology: &Topology, config: &SimConfig) -> Result<SimulationReport, SimError> {
    let n = topology.len();
    let retry = RetryPolicy {
        max_attempts: config.connect_attempts,
        delay: config.connect_delay(),
    };

    let mut listeners = Vec::with_capacity(n);
    let mut addrs = Vec::with_capacity(n);
    for _ in topology.node_ids() {
        let listener = Listener::bind_loopback().await?;
        addrs.push(listener.local_addr()?);
        listeners.push(listener);
    }

    let mut endpoints: Vec<NodeEndpoints> = (0..n).map(|_| NodeEndpoints::default()).collect();
    let mut expected_inbound = vec![0usize; n];

    for (a, b, _weight) in topology.links() {
        let mut channel = Channel::connect(addrs[b.index()], &retry).await?;
        channel.send(RoutingVector::hello(a)).await?;
        let (sender, receiver) = channel.split();
        endpoints[a.index()].senders.insert(b, sender);
        endpoints[a.index()].receivers.push((b, receiver));
        expected_inbound[b.index()] += 1;
    }

    for id in topology.node_ids() {
        for _ in 0..expected_inbound[id.index()] {
            let mut channel = listeners[id.index()].accept().await?;
            let hello = channel
                .recv()
                .await?
                .ok_or(SimError::Setup(NetworkError::Closed))?;
            let peer = hello.from;
            if peer >= id || topology.weight(peer, id) == 0 {
                return Err(SimError::UnexpectedPeer { node: id, peer });
            }
            let (sender, receiver) = channel.split();
            endpoints[id.index()].senders.insert(peer, sender);
            endpoints[id.index()].receivers.push((peer, receiver));
        }
    }
    // Topology is static: no further connections are ever accepted.
    drop(listeners);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut handles = Vec::with_capacity(n);
    let mut live_links = HashMap::new();
    for (id, node_endpoints) in topology.node_ids().zip(endpoints) {
        let neighbor_costs = topology.neighbors(id);
        live_links.insert(id, neighbor_costs.len());
        handles.push(NodeEngine::spawn(
            id,
            &neighbor_costs,
            node_endpoints,
            event_tx.clone(),
            config.channel_capacity,
        )?);
    }
    drop(event_tx);

    tracing::info!(nodes = n, links = topology.links().len(), "simulation started");
    let monitor = ConvergenceMonitor::new(handles, event_rx, live_links, config);
    monitor.run().await
}
