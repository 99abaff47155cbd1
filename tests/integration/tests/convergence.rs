//! Integration tests: full simulations run to convergence and checked
//! against the Floyd-Warshall oracle.
//!
//! Every test drives real node tasks over real loopback TCP channels; the
//! only difference from a production run is a short monitor grace window to
//! keep the suite fast.

use dvsim_core::{NodeId, SimConfig, Topology};
use dvsim_integration_tests::{floyd_warshall, oracle_cost};
use dvsim_node::{simulation, SimulationReport};

fn quick_config() -> SimConfig {
    SimConfig {
        connect_delay_ms: 10,
        grace_ms: 60,
        ..SimConfig::default()
    }
}

async fn run_topology(matrix: &str) -> (Topology, SimulationReport) {
    let topology = Topology::parse(matrix).expect("topology parse failed");
    let report = simulation::run(&topology, &quick_config())
        .await
        .expect("simulation failed");
    (topology, report)
}

/// Every node's converged cost to every destination must match the oracle,
/// including unreachable destinations (absent from the table).
fn assert_matches_oracle(topology: &Topology, report: &SimulationReport) {
    let dist = floyd_warshall(topology);
    for from in topology.node_ids() {
        let table = &report.tables[&from];
        for to in topology.node_ids() {
            let expected = oracle_cost(&dist, from, to);
            let actual = table.get(to).map(u64::from);
            assert_eq!(
                actual, expected,
                "cost from {} to {} diverges from oracle",
                from, to
            );
        }
    }
}

// =========================================================================
// Connected graphs: exact shortest-path convergence
// =========================================================================

#[tokio::test]
async fn test_triangle_scenario() {
    let (topology, report) = run_topology("0 1 5\n1 0 2\n5 2 0\n").await;

    // The indirect route 0-1-2 (cost 3) must beat the direct 0-2 link.
    let table0 = &report.tables[&NodeId(0)];
    assert_eq!(table0.get(NodeId(0)), Some(0));
    assert_eq!(table0.get(NodeId(1)), Some(1));
    assert_eq!(table0.get(NodeId(2)), Some(3));

    let table1 = &report.tables[&NodeId(1)];
    assert_eq!(table1.get(NodeId(0)), Some(1));
    assert_eq!(table1.get(NodeId(1)), Some(0));
    assert_eq!(table1.get(NodeId(2)), Some(2));

    let table2 = &report.tables[&NodeId(2)];
    assert_eq!(table2.get(NodeId(0)), Some(3));
    assert_eq!(table2.get(NodeId(1)), Some(2));
    assert_eq!(table2.get(NodeId(2)), Some(0));

    assert_matches_oracle(&topology, &report);
}

#[tokio::test]
async fn test_line_graph() {
    // 0 -2- 1 -3- 2 -1- 3 -4- 4
    let matrix = "\
0 2 0 0 0
2 0 3 0 0
0 3 0 1 0
0 0 1 0 4
0 0 0 4 0
";
    let (topology, report) = run_topology(matrix).await;
    assert_matches_oracle(&topology, &report);

    let table0 = &report.tables[&NodeId(0)];
    assert_eq!(table0.get(NodeId(4)), Some(10));
}

#[tokio::test]
async fn test_ring_with_shortcut() {
    // Ring 0-1-2-3-0 plus a cheap diagonal 0-2.
    let matrix = "\
0 1 2 0
1 0 4 0
2 4 0 1
0 0 1 0
";
    let (topology, report) = run_topology(matrix).await;
    assert_matches_oracle(&topology, &report);

    // 1 reaches 3 via 1-0-2-3 (cost 4), not 1-2-3 (cost 5).
    assert_eq!(report.tables[&NodeId(1)].get(NodeId(3)), Some(4));
}

#[tokio::test]
async fn test_dense_ten_node_graph_within_round_bound() {
    // Deterministic pseudo-random weights over a fully connected 10-node
    // graph; the weight is derived from the unordered pair so the matrix
    // comes out symmetric.
    let n = 10;
    let mut matrix = String::new();
    for i in 0..n {
        let row: Vec<String> = (0..n)
            .map(|j| {
                if i == j {
                    "0".to_string()
                } else {
                    let (a, b) = if i < j { (i, j) } else { (j, i) };
                    (((a * 7 + b * 13) % 20) + 1).to_string()
                }
            })
            .collect();
        matrix.push_str(&row.join(" "));
        matrix.push('\n');
    }
    let (topology, report) = run_topology(&matrix).await;
    assert_matches_oracle(&topology, &report);

    // Classic Bellman-Ford bound plus the unconditional first round and the
    // final quiescent pass.
    assert!(
        report.rounds <= (n as u64) + 2,
        "took {} rounds for {} nodes",
        report.rounds,
        n
    );
}

// =========================================================================
// Disconnected graphs: convergence with unreachable destinations
// =========================================================================

#[tokio::test]
async fn test_two_components() {
    // Components {0, 1} and {2, 3}.
    let matrix = "\
0 3 0 0
3 0 0 0
0 0 0 2
0 0 2 0
";
    let (topology, report) = run_topology(matrix).await;
    assert_matches_oracle(&topology, &report);

    // Cross-component destinations never appear in the tables.
    assert_eq!(report.tables[&NodeId(0)].get(NodeId(2)), None);
    assert_eq!(report.tables[&NodeId(0)].get(NodeId(3)), None);
    assert_eq!(report.tables[&NodeId(3)].get(NodeId(0)), None);
    assert_eq!(report.tables[&NodeId(0)].get(NodeId(1)), Some(3));
}

#[tokio::test]
async fn test_two_isolated_nodes() {
    let (_topology, report) = run_topology("0 0\n0 0\n").await;

    for (id, table) in &report.tables {
        assert_eq!(table.len(), 1, "node {} learned a phantom route", id);
        assert_eq!(table.get(*id), Some(0));
    }
    // Nothing ever changed after seeding.
    assert_eq!(report.last_update_round, 0);
}

#[tokio::test]
async fn test_isolated_node_beside_connected_pair() {
    let matrix = "\
0 1 0
1 0 0
0 0 0
";
    let (topology, report) = run_topology(matrix).await;
    assert_matches_oracle(&topology, &report);
    assert_eq!(report.tables[&NodeId(2)].len(), 1);
}

// =========================================================================
// Reporting invariants
// =========================================================================

#[tokio::test]
async fn test_last_update_round_never_exceeds_rounds() {
    let (_topology, report) = run_topology("0 1 5\n1 0 2\n5 2 0\n").await;
    assert!(report.last_update_round <= report.rounds);
    assert!(report.rounds >= 2);
}

#[tokio::test]
async fn test_snapshot_tables_contain_self_at_zero() {
    let matrix = "\
0 1 0 0
1 0 1 0
0 1 0 1
0 0 1 0
";
    let (topology, report) = run_topology(matrix).await;
    for id in topology.node_ids() {
        assert_eq!(report.tables[&id].get(id), Some(0));
        assert_eq!(report.tables[&id].from, id);
    }
}
