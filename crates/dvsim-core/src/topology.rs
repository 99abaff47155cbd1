use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::NodeId;

/// The static link topology of a simulation, parsed from an adjacency matrix.
///
/// Entry (i, j) is the weight of the link between nodes i and j; 0 means no
/// link. The matrix must be square and symmetric with a zero diagonal. Links
/// never appear or disappear after parsing.
#[derive(Debug, Clone)]
pub struct Topology {
    weights: Vec<Vec<u32>>,
}

impl Topology {
    /// Parse an adjacency matrix from text: N rows of N whitespace-separated
    /// non-negative integers. Blank lines are ignored.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let rows: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
        if rows.is_empty() {
            return Err(ConfigError::EmptyTopology);
        }

        let n = rows.len();
        let mut weights = Vec::with_capacity(n);
        for (row, line) in rows.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != n {
                return Err(ConfigError::RowWidth {
                    row,
                    expected: n,
                    found: tokens.len(),
                });
            }
            let mut parsed = Vec::with_capacity(n);
            for (col, token) in tokens.iter().enumerate() {
                // Parse signed first so "-3" reports as an invalid weight
                // rather than a generic integer error.
                let value: i64 = token.parse().map_err(|_| ConfigError::InvalidWeight {
                    row,
                    col,
                    token: (*token).into(),
                })?;
                if value < 0 || value > u32::MAX as i64 {
                    return Err(ConfigError::InvalidWeight {
                        row,
                        col,
                        token: (*token).into(),
                    });
                }
                parsed.push(value as u32);
            }
            weights.push(parsed);
        }

        for (i, row) in weights.iter().enumerate() {
            if row[i] != 0 {
                return Err(ConfigError::NonzeroDiagonal { row: i });
            }
            for j in (i + 1)..n {
                if row[j] != weights[j][i] {
                    return Err(ConfigError::AsymmetricWeight {
                        a: i,
                        b: j,
                        w_ab: row[j],
                        w_ba: weights[j][i],
                    });
                }
            }
        }

        tracing::debug!(nodes = n, "topology parsed");
        Ok(Self { weights })
    }

    /// Read and parse a topology file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;
        Self::parse(&input)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True for the degenerate zero-node topology (never produced by `parse`).
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.len()).map(NodeId)
    }

    /// Link weight between two nodes; 0 means no link.
    pub fn weight(&self, a: NodeId, b: NodeId) -> u32 {
        self.weights[a.index()][b.index()]
    }

    /// Direct neighbors of `id` with their link costs (strictly positive,
    /// never the node itself).
    pub fn neighbors(&self, id: NodeId) -> BTreeMap<NodeId, u32> {
        self.weights[id.index()]
            .iter()
            .enumerate()
            .filter(|&(j, &w)| j != id.index() && w > 0)
            .map(|(j, &w)| (NodeId(j), w))
            .collect()
    }

    /// All undirected links as (lower id, higher id, weight) triples.
    pub fn links(&self) -> Vec<(NodeId, NodeId, u32)> {
        let mut links = Vec::new();
        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                let w = self.weights[i][j];
                if w > 0 {
                    links.push((NodeId(i), NodeId(j), w));
                }
            }
        }
        links
    }
}
