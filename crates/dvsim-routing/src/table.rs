use std::collections::BTreeMap;

use dvsim_core::{CostEntry, NodeId, RoutingVector};

use crate::error::RoutingError;

/// One node's routing table: destination -> best known cost.
///
/// The table always contains the node's own entry at cost 0. With
/// non-negative weights and a static topology, every entry is monotone
/// non-increasing over the node's lifetime: costs only drop or newly appear.
///
/// The table is exclusively owned by its node's task; `merge` and `snapshot`
/// are serialized by that ownership, so no internal locking is needed.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    self_id: NodeId,
    costs: BTreeMap<NodeId, u32>,
}

impl RoutingTable {
    /// Seed a table with `{self: 0}` plus the direct neighbor costs.
    ///
    /// Fails if `neighbor_costs` contains the node itself or a zero weight
    /// (zero means "no link" in the adjacency matrix and must never reach
    /// this layer).
    pub fn new(
        self_id: NodeId,
        neighbor_costs: &BTreeMap<NodeId, u32>,
    ) -> Result<Self, RoutingError> {
        let mut costs = BTreeMap::new();
        costs.insert(self_id, 0);
        for (&neighbor, &weight) in neighbor_costs {
            if neighbor == self_id {
                return Err(RoutingError::SelfNeighbor { node: self_id });
            }
            if weight == 0 {
                return Err(RoutingError::InvalidLinkWeight { neighbor, weight });
            }
            costs.insert(neighbor, weight);
        }
        Ok(Self { self_id, costs })
    }

    /// Apply the distance-vector relaxation rule for a vector received from
    /// a direct neighbor. Returns whether any entry changed.
    ///
    /// For each advertised `(dest, cost)`, the candidate cost is the current
    /// cost to `from` plus the advertised cost; an entry is inserted or
    /// lowered only when the candidate is strictly better, which keeps the
    /// merge idempotent. The self entry is never touched.
    ///
    /// A vector from a node with no known direct cost is a configuration
    /// error: the direct link weight must be seeded before any exchange.
    pub fn merge(&mut self, from: NodeId, vector: &RoutingVector) -> Result<bool, RoutingError> {
        let via = *self
            .costs
            .get(&from)
            .ok_or(RoutingError::UnknownNeighbor { neighbor: from })?;

        let mut changed = false;
        for entry in &vector.entries {
            if entry.dest == self.self_id {
                continue;
            }
            let candidate = via.saturating_add(entry.cost);
            match self.costs.get(&entry.dest) {
                Some(&current) if candidate >= current => {}
                _ => {
                    self.costs.insert(entry.dest, candidate);
                    changed = true;
                }
            }
        }

        if changed {
            tracing::debug!(
                node = %self.self_id,
                neighbor = %from,
                entries = self.costs.len(),
                "routing table relaxed"
            );
        }
        Ok(changed)
    }

    /// An immutable copy of the table for transmission or reporting.
    pub fn snapshot(&self) -> RoutingVector {
        let entries = self
            .costs
            .iter()
            .map(|(&dest, &cost)| CostEntry { dest, cost })
            .collect();
        RoutingVector::new(self.self_id, entries)
    }

    /// Current best known cost to `dest`, if any path has been learned.
    pub fn cost_to(&self, dest: NodeId) -> Option<u32> {
        self.costs.get(&dest).copied()
    }

    /// Known destinations in ascending id order.
    pub fn destinations(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.costs.keys().copied()
    }

    /// The owning node's id.
    pub fn self_id(&self) -> NodeId {
        self.self_id
    }

    /// Number of known destinations, including the node itself.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Always false: the self entry is present from construction on.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
