//! DVSIM Routing — per-node routing table and vector-merge logic.
//!
//! This crate provides:
//! - [`RoutingTable`] — the table of best known costs owned by one node,
//!   with the Bellman-Ford relaxation rule applied on every merge.
//! - [`RoutingError`] — configuration failures detected while seeding or
//!   merging.
//!
//! The table is purely synchronous; concurrency discipline (who may merge,
//! who may snapshot) is the owning node task's responsibility.

pub mod error;
pub mod table;

pub use error::RoutingError;
pub use table::RoutingTable;
