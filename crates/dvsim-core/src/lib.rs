//! DVSIM Core — shared types for the distance-vector routing simulator.
//!
//! This crate provides:
//! - [`NodeId`] — integer node identity with a letter display label.
//! - [`RoutingVector`] and [`CostEntry`] — the wire message advertised
//!   between neighboring nodes.
//! - [`Topology`] — adjacency-matrix loading and validation.
//! - [`SimConfig`] — simulation tuning knobs, loadable from TOML.

pub mod config;
pub mod error;
pub mod topology;
pub mod types;

pub use config::SimConfig;
pub use error::ConfigError;
pub use topology::Topology;
pub use types::{CostEntry, NodeId, RoutingVector};
