use std::path::PathBuf;

/// Configuration failures: malformed topology input or config files.
///
/// These are fatal at startup; nothing in the simulator recovers from them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("topology is empty")]
    EmptyTopology,

    #[error("row {row}: expected {expected} entries, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {col}: invalid weight {token:?}")]
    InvalidWeight {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("row {row}: diagonal entry must be 0")]
    NonzeroDiagonal { row: usize },

    #[error("asymmetric link weight between nodes {a} and {b}: {w_ab} != {w_ba}")]
    AsymmetricWeight {
        a: usize,
        b: usize,
        w_ab: u32,
        w_ba: u32,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
