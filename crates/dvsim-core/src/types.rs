use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identity of a simulated node, stable for the simulation's lifetime.
///
/// Ids are dense indices into the adjacency matrix. The letter label exists
/// only for human-readable output and is never used by the protocol itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The underlying matrix index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Display letter for this node ('A' for 0, 'B' for 1, ...).
    pub fn label(self) -> char {
        (b'A' + (self.0 % 26) as u8) as char
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// One advertised (destination, cost) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Destination node.
    pub dest: NodeId,
    /// Best known cost from the sender to `dest`.
    pub cost: u32,
}

/// A snapshot of a node's routing table as advertised to its neighbors.
///
/// This is the single unit of the inter-node wire format: an explicit ordered
/// list of entries rather than a free-form map, so key types and ordering are
/// unambiguous. Destinations the sender cannot reach are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingVector {
    /// The advertising node.
    pub from: NodeId,
    /// Entries sorted by destination id.
    pub entries: Vec<CostEntry>,
}

impl RoutingVector {
    /// Build a vector from entries, normalizing them to ascending destination
    /// order for deterministic encoding.
    pub fn new(from: NodeId, mut entries: Vec<CostEntry>) -> Self {
        entries.sort_by_key(|e| e.dest);
        Self { from, entries }
    }

    /// An empty vector used by the dialing side of a link to announce its
    /// identity before any table exchange. Merging it is a no-op.
    pub fn hello(from: NodeId) -> Self {
        Self {
            from,
            entries: Vec::new(),
        }
    }

    /// Look up the advertised cost to `dest`, if present.
    pub fn get(&self, dest: NodeId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.dest == dest)
            .map(|e| e.cost)
    }

    /// Number of advertised destinations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no destinations are advertised.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_label() {
        assert_eq!(NodeId(0).label(), 'A');
        assert_eq!(NodeId(1).label(), 'B');
        assert_eq!(NodeId(25).label(), 'Z');
    }

    #[test]
    fn test_node_id_display_and_index() {
        let id = NodeId(7);
        assert_eq!(format!("{}", id), "7");
        assert_eq!(id.index(), 7);
        assert_eq!(NodeId::from(7), id);
    }

    #[test]
    fn test_vector_entries_are_normalized() {
        let vector = RoutingVector::new(
            NodeId(0),
            vec![
                CostEntry {
                    dest: NodeId(2),
                    cost: 5,
                },
                CostEntry {
                    dest: NodeId(0),
                    cost: 0,
                },
                CostEntry {
                    dest: NodeId(1),
                    cost: 1,
                },
            ],
        );
        let dests: Vec<usize> = vector.entries.iter().map(|e| e.dest.index()).collect();
        assert_eq!(dests, vec![0, 1, 2]);
    }

    #[test]
    fn test_vector_get() {
        let vector = RoutingVector::new(
            NodeId(1),
            vec![
                CostEntry {
                    dest: NodeId(0),
                    cost: 4,
                },
                CostEntry {
                    dest: NodeId(1),
                    cost: 0,
                },
            ],
        );
        assert_eq!(vector.get(NodeId(0)), Some(4));
        assert_eq!(vector.get(NodeId(1)), Some(0));
        assert_eq!(vector.get(NodeId(9)), None);
    }

    #[test]
    fn test_hello_is_empty() {
        let hello = RoutingVector::hello(NodeId(3));
        assert!(hello.is_empty());
        assert_eq!(hello.from, NodeId(3));
        assert_eq!(hello.len(), 0);
    }

    #[test]
    fn test_vector_serde_roundtrip() {
        let vector = RoutingVector::new(
            NodeId(2),
            vec![
                CostEntry {
                    dest: NodeId(0),
                    cost: 3,
                },
                CostEntry {
                    dest: NodeId(2),
                    cost: 0,
                },
            ],
        );
        let json = serde_json::to_string(&vector).expect("serialize failed");
        let decoded: RoutingVector = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(decoded, vector);
    }

    #[test]
    fn test_node_id_serde_is_transparent() {
        let json = serde_json::to_string(&NodeId(5)).expect("serialize failed");
        assert_eq!(json, "5");
    }
}
