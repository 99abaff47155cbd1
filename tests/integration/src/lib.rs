//! Test oracles for the integration suite.
//!
//! The simulator's converged tables are checked against an independent
//! all-pairs shortest-path computation so the two can never share a bug.

use dvsim_core::{NodeId, Topology};

/// Floyd-Warshall all-pairs shortest paths over the same adjacency matrix
/// the simulator consumes. `None` means unreachable. Costs are widened to
/// u64 so summing link weights cannot overflow in the oracle.
pub fn floyd_warshall(topology: &Topology) -> Vec<Vec<Option<u64>>> {
    let n = topology.len();
    let mut dist: Vec<Vec<Option<u64>>> = vec![vec![None; n]; n];

    for i in 0..n {
        dist[i][i] = Some(0);
    }
    for (a, b, w) in topology.links() {
        dist[a.index()][b.index()] = Some(w as u64);
        dist[b.index()][a.index()] = Some(w as u64);
    }

    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if let (Some(ik), Some(kj)) = (dist[i][k], dist[k][j]) {
                    let through = ik + kj;
                    if dist[i][j].map_or(true, |d| through < d) {
                        dist[i][j] = Some(through);
                    }
                }
            }
        }
    }
    dist
}

/// Convenience lookup into the oracle result.
pub fn oracle_cost(dist: &[Vec<Option<u64>>], from: NodeId, to: NodeId) -> Option<u64> {
    dist[from.index()][to.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_triangle() {
        let topology = Topology::parse("0 1 5\n1 0 2\n5 2 0\n").unwrap();
        let dist = floyd_warshall(&topology);
        assert_eq!(oracle_cost(&dist, NodeId(0), NodeId(2)), Some(3));
        assert_eq!(oracle_cost(&dist, NodeId(0), NodeId(1)), Some(1));
        assert_eq!(oracle_cost(&dist, NodeId(1), NodeId(1)), Some(0));
    }

    #[test]
    fn test_oracle_disconnected() {
        let topology = Topology::parse("0 1 0\n1 0 0\n0 0 0\n").unwrap();
        let dist = floyd_warshall(&topology);
        assert_eq!(oracle_cost(&dist, NodeId(0), NodeId(2)), None);
        assert_eq!(oracle_cost(&dist, NodeId(2), NodeId(2)), Some(0));
    }
}
