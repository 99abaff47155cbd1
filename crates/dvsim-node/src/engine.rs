use std::collections::{BTreeMap, HashMap, HashSet};

use dvsim_core::{NodeId, RoutingVector};
use dvsim_network::{ChannelReceiver, ChannelSender};
use dvsim_routing::{RoutingError, RoutingTable};
use tokio::sync::{mpsc, oneshot};

use crate::error::SimError;

/// Events emitted by a node engine to the convergence monitor.
#[derive(Debug)]
pub enum EngineEvent {
    /// The node's routing table changed in a merge.
    TableChanged { node: NodeId },

    /// A link to a neighbor failed (send error or channel close).
    LinkDown { node: NodeId, neighbor: NodeId },

    /// A fatal configuration error was detected; the engine has stopped.
    ConfigFailure { node: NodeId, error: RoutingError },
}

/// Result of one broadcast instruction.
#[derive(Debug)]
pub struct BroadcastOutcome {
    /// Number of neighbors the snapshot was delivered to.
    pub sent: usize,
    /// Neighbors whose link failed during this broadcast.
    pub failed: Vec<NodeId>,
}

/// The transport endpoints injected into one node at startup: exactly the
/// channel halves for its own links, no ambient lookup anywhere.
#[derive(Debug, Default)]
pub struct NodeEndpoints {
    /// Sending half per neighbor.
    pub senders: HashMap<NodeId, ChannelSender>,
    /// Receiving half per neighbor.
    pub receivers: Vec<(NodeId, ChannelReceiver)>,
}

enum NodeCommand {
    Broadcast { reply: oneshot::Sender<BroadcastOutcome> },
    Pending { reply: oneshot::Sender<bool> },
    Report { reply: oneshot::Sender<RoutingVector> },
    Shutdown,
}

enum Inbound {
    Vector(RoutingVector),
    LinkClosed { neighbor: NodeId },
}

/// Command-side handle to a spawned node engine, used by the monitor.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    id: NodeId,
    command_tx: mpsc::Sender<NodeCommand>,
}

impl NodeHandle {
    /// The node this handle commands.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Instruct the node to broadcast its current snapshot to all live
    /// neighbors and clear its pending-update flag.
    pub async fn broadcast(&self) -> Result<BroadcastOutcome, SimError> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeCommand::Broadcast { reply }, rx).await
    }

    /// Query the pending-update flag.
    pub async fn pending(&self) -> Result<bool, SimError> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeCommand::Pending { reply }, rx).await
    }

    /// Fetch a consistent snapshot of the node's table.
    pub async fn report(&self) -> Result<RoutingVector, SimError> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeCommand::Report { reply }, rx).await
    }

    /// Tell the engine to stop. Best effort: a node that already stopped is
    /// not an error at shutdown time.
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(NodeCommand::Shutdown).await;
    }

    async fn send<T>(
        &self,
        command: NodeCommand,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, SimError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SimError::NodeGone { node: self.id })?;
        rx.await.map_err(|_| SimError::NodeGone { node: self.id })
    }
}

/// One simulated router: a task exclusively owning the routing table, plus
/// one receiver task per inbound link.
pub struct NodeEngine;

impl NodeEngine {
    /// Seed the routing table and spawn the engine and its receiver tasks.
    ///
    /// The engine merges inbound vectors into its table, raises its
    /// pending-update flag on change, and notifies the monitor through
    /// `event_tx`. Table access is serialized by task ownership: merges and
    /// snapshots all happen on the engine task.
    pub fn spawn(
        id: NodeId,
        neighbor_costs: &BTreeMap<NodeId, u32>,
        endpoints: NodeEndpoints,
        event_tx: mpsc::UnboundedSender<EngineEvent>,
        channel_capacity: usize,
    ) -> Result<NodeHandle, SimError> {
        let table = RoutingTable::new(id, neighbor_costs)
            .map_err(|source| SimError::Configuration { node: id, source })?;

        let (command_tx, command_rx) = mpsc::channel(channel_capacity.max(1));
        let (inbound_tx, inbound_rx) = mpsc::channel(channel_capacity.max(1));

        for (neighbor, receiver) in endpoints.receivers {
            tokio::spawn(run_receiver(id, neighbor, receiver, inbound_tx.clone()));
        }

        let task = EngineTask {
            id,
            table,
            senders: endpoints.senders,
            dead_links: HashSet::new(),
            pending: false,
            event_tx,
            // Held so the inbound channel stays open even with zero links.
            _inbound_tx: inbound_tx,
        };
        tokio::spawn(task.run(command_rx, inbound_rx));

        tracing::debug!(node = %id, neighbors = neighbor_costs.len(), "node engine spawned");
        Ok(NodeHandle { id, command_tx })
    }
}

struct EngineTask {
    id: NodeId,
    table: RoutingTable,
    senders: HashMap<NodeId, ChannelSender>,
    dead_links: HashSet<NodeId>,
    pending: bool,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    _inbound_tx: mpsc::Sender<Inbound>,
}

impl EngineTask {
    async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<NodeCommand>,
        mut inbound_rx: mpsc::Receiver<Inbound>,
    ) {
        loop {
            tokio::select! {
                Some(inbound) = inbound_rx.recv() => {
                    if !self.handle_inbound(inbound).await {
                        break;
                    }
                }
                command = command_rx.recv() => {
                    match command {
                        Some(NodeCommand::Broadcast { reply }) => {
                            let outcome = self.broadcast().await;
                            let _ = reply.send(outcome);
                        }
                        Some(NodeCommand::Pending { reply }) => {
                            let _ = reply.send(self.pending);
                        }
                        Some(NodeCommand::Report { reply }) => {
                            let _ = reply.send(self.table.snapshot());
                        }
                        Some(NodeCommand::Shutdown) | None => break,
                    }
                }
            }
        }
        tracing::debug!(node = %self.id, "node engine stopped");
    }

    /// Returns false when the engine must stop (fatal configuration error).
    async fn handle_inbound(&mut self, inbound: Inbound) -> bool {
        match inbound {
            Inbound::Vector(vector) => {
                let from = vector.from;
                match self.table.merge(from, &vector) {
                    Ok(true) => {
                        self.pending = true;
                        let _ = self
                            .event_tx
                            .send(EngineEvent::TableChanged { node: self.id });
                        true
                    }
                    Ok(false) => true,
                    Err(error) => {
                        tracing::error!(node = %self.id, %error, "fatal merge failure");
                        let _ = self.event_tx.send(EngineEvent::ConfigFailure {
                            node: self.id,
                            error,
                        });
                        false
                    }
                }
            }
            Inbound::LinkClosed { neighbor } => {
                self.mark_link_down(neighbor).await;
                true
            }
        }
    }

    async fn broadcast(&mut self) -> BroadcastOutcome {
        let snapshot = self.table.snapshot();
        let mut sent = 0;
        let mut failed = Vec::new();

        for (&neighbor, sender) in &mut self.senders {
            if self.dead_links.contains(&neighbor) {
                continue;
            }
            match sender.send(snapshot.clone()).await {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::warn!(
                        node = %self.id,
                        %neighbor,
                        %error,
                        "send failed, marking link down"
                    );
                    failed.push(neighbor);
                }
            }
        }
        for &neighbor in &failed {
            self.mark_link_down(neighbor).await;
        }

        self.pending = false;
        tracing::trace!(node = %self.id, sent, "broadcast snapshot");
        BroadcastOutcome { sent, failed }
    }

    async fn mark_link_down(&mut self, neighbor: NodeId) {
        if self.dead_links.insert(neighbor) {
            let _ = self.event_tx.send(EngineEvent::LinkDown {
                node: self.id,
                neighbor,
            });
        }
    }
}

/// Reads framed vectors off one inbound link and forwards them to the
/// engine task. Malformed frames are dropped; close or i/o error ends the
/// receiver and reports the link down, without touching any other node.
async fn run_receiver(
    node: NodeId,
    neighbor: NodeId,
    mut receiver: ChannelReceiver,
    inbound_tx: mpsc::Sender<Inbound>,
) {
    loop {
        match receiver.recv().await {
            Ok(Some(vector)) => {
                if vector.from != neighbor {
                    tracing::warn!(
                        node = %node,
                        expected = %neighbor,
                        claimed = %vector.from,
                        "vector sender mismatch, dropping"
                    );
                    continue;
                }
                tracing::trace!(node = %node, from = %neighbor, "received vector");
                if inbound_tx.send(Inbound::Vector(vector)).await.is_err() {
                    return;
                }
            }
            Ok(None) => {
                tracing::debug!(node = %node, %neighbor, "link channel closed");
                let _ = inbound_tx.send(Inbound::LinkClosed { neighbor }).await;
                return;
            }
            Err(error) if error.is_recoverable() => {
                tracing::warn!(node = %node, %neighbor, %error, "dropping malformed vector");
            }
            Err(error) => {
                tracing::warn!(node = %node, %neighbor, %error, "link error");
                let _ = inbound_tx.send(Inbound::LinkClosed { neighbor }).await;
                return;
            }
        }
    }
}
