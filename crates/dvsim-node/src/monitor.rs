use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::time::Duration;

use dvsim_core::{NodeId, RoutingVector, SimConfig};
use tokio::sync::mpsc;

use crate::engine::{EngineEvent, NodeHandle};
use crate::error::SimError;

/// The monitor's state over the whole simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Topology built, nodes starting.
    Initializing,
    /// Active round-robin exchange.
    RoundRobin,
    /// Terminal: no further exchange can change any table.
    Converged,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::RoundRobin => write!(f, "RoundRobin"),
            Self::Converged => write!(f, "Converged"),
        }
    }
}

/// Final result of a converged simulation.
#[derive(Debug)]
pub struct SimulationReport {
    /// Final routing table snapshot per node.
    pub tables: BTreeMap<NodeId, RoutingVector>,
    /// Total rounds driven, including the final quiescent pass.
    pub rounds: u64,
    /// Round in which the last table change was observed (0 if no table
    /// ever changed after seeding).
    pub last_update_round: u64,
}

/// Drives discrete broadcast rounds and detects global quiescence.
///
/// Each round is one full pass over the nodes in ascending id order: a node
/// is told to broadcast iff its pending-update flag is set, or
/// unconditionally on the first round. Convergence is declared after a pass
/// with zero broadcasts, once an idle grace window confirms no table-change
/// notification is still in flight and a final poll finds no pending flag.
pub struct ConvergenceMonitor {
    handles: Vec<NodeHandle>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
    live_links: HashMap<NodeId, usize>,
    downed: HashSet<(NodeId, NodeId)>,
    grace: Duration,
    round_limit: u64,
    state: MonitorState,
    round: u64,
    last_update_round: u64,
}

impl ConvergenceMonitor {
    /// `live_links` is each node's initial neighbor count; the monitor
    /// aborts the run if any node with links loses all of them.
    pub fn new(
        handles: Vec<NodeHandle>,
        event_rx: mpsc::UnboundedReceiver<EngineEvent>,
        live_links: HashMap<NodeId, usize>,
        config: &SimConfig,
    ) -> Self {
        Self {
            handles,
            event_rx,
            live_links,
            downed: HashSet::new(),
            grace: config.grace(),
            round_limit: config.round_limit,
            state: MonitorState::Initializing,
            round: 0,
            last_update_round: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Run rounds until convergence, then collect final tables and stop all
    /// node engines.
    pub async fn run(mut self) -> Result<SimulationReport, SimError> {
        let result = self.drive().await;
        for handle in &self.handles {
            handle.shutdown().await;
        }
        result
    }

    async fn drive(&mut self) -> Result<SimulationReport, SimError> {
        self.state = MonitorState::RoundRobin;
        tracing::debug!(nodes = self.handles.len(), "entering round-robin exchange");

        loop {
            self.round += 1;
            if self.round > self.round_limit {
                return Err(SimError::RoundLimitExceeded {
                    limit: self.round_limit,
                });
            }

            let mut broadcasts = 0usize;
            for i in 0..self.handles.len() {
                self.drain_events()?;
                let handle = &self.handles[i];
                if self.round == 1 || handle.pending().await? {
                    let outcome = handle.broadcast().await?;
                    broadcasts += 1;
                    tracing::debug!(
                        round = self.round,
                        node = %handle.id(),
                        sent = outcome.sent,
                        failed = outcome.failed.len(),
                        "node broadcast"
                    );
                }
            }

            // Wait out in-flight deliveries from this pass before deciding
            // anything about the next one.
            let changed = self.settle().await?;

            if broadcasts == 0 && !changed && !self.any_pending().await? {
                self.state = MonitorState::Converged;
                tracing::info!(
                    rounds = self.round,
                    last_update_round = self.last_update_round,
                    "simulation converged"
                );
                break;
            }
        }

        let mut tables = BTreeMap::new();
        for handle in &self.handles {
            tables.insert(handle.id(), handle.report().await?);
        }
        Ok(SimulationReport {
            tables,
            rounds: self.round,
            last_update_round: self.last_update_round,
        })
    }

    /// Handle one engine event. Returns true for a table change.
    fn note(&mut self, event: EngineEvent) -> Result<bool, SimError> {
        match event {
            EngineEvent::TableChanged { node } => {
                self.last_update_round = self.round;
                tracing::trace!(round = self.round, %node, "table changed");
                Ok(true)
            }
            EngineEvent::LinkDown { node, neighbor } => {
                if self.downed.insert((node, neighbor)) {
                    tracing::warn!(%node, %neighbor, "link down");
                    if let Some(count) = self.live_links.get_mut(&node) {
                        *count = count.saturating_sub(1);
                        if *count == 0 {
                            return Err(SimError::NodeIsolated { node });
                        }
                    }
                }
                Ok(false)
            }
            EngineEvent::ConfigFailure { node, error } => {
                Err(SimError::Configuration {
                    node,
                    source: error,
                })
            }
        }
    }

    /// Drain already-queued events without blocking.
    fn drain_events(&mut self) -> Result<(), SimError> {
        while let Ok(event) = self.event_rx.try_recv() {
            self.note(event)?;
        }
        Ok(())
    }

    /// Block on the event channel until it stays idle for a full grace
    /// window. Returns whether any table change was observed.
    async fn settle(&mut self) -> Result<bool, SimError> {
        let mut changed = false;
        loop {
            match tokio::time::timeout(self.grace, self.event_rx.recv()).await {
                Ok(Some(event)) => {
                    if self.note(event)? {
                        changed = true;
                    }
                }
                // All engines gone or idle window elapsed.
                Ok(None) => break,
                Err(_) => break,
            }
        }
        Ok(changed)
    }

    /// Final verification poll: a pending flag may be set slightly before
    /// its notification is observed.
    async fn any_pending(&mut self) -> Result<bool, SimError> {
        for handle in &self.handles {
            if handle.pending().await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
