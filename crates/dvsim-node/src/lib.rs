//! DVSIM Node — per-node engine runtime and the convergence monitor.
//!
//! Each node runs as its own tokio task that exclusively owns its routing
//! table, with one receiver task per inbound link. The convergence monitor
//! drives discrete broadcast rounds over command channels and detects global
//! quiescence from table-change notifications.
//!
//! This crate provides:
//! - [`NodeEngine`] / [`NodeHandle`] — spawn and command one node.
//! - [`ConvergenceMonitor`] — round driving and quiescence detection.
//! - [`simulation::run`] — wire a whole topology together and run it to
//!   convergence.

pub mod engine;
pub mod error;
pub mod monitor;
pub mod simulation;

pub use engine::{BroadcastOutcome, EngineEvent, NodeEngine, NodeHandle};
pub use error::SimError;
pub use monitor::{ConvergenceMonitor, MonitorState, SimulationReport};
