//! DVSIM Network — the point-to-point transport between neighboring nodes.
//!
//! Each undirected link in the topology maps to exactly one duplex TCP
//! connection on loopback, carrying length-delimited JSON routing vectors.
//! Delivery is reliable and FIFO per channel; nothing is guaranteed across
//! channels.
//!
//! This crate provides:
//! - [`VectorCodec`] — length-prefixed JSON framing for routing vectors.
//! - [`Channel`] / [`ChannelSender`] / [`ChannelReceiver`] — one duplex
//!   framed connection per link, splittable into halves.
//! - [`Listener`] — accepts inbound link connections.
//! - [`RetryPolicy`] — bounded connect retry with fixed backoff.

pub mod channel;
pub mod codec;
pub mod error;

pub use channel::{Channel, ChannelReceiver, ChannelSender, Listener, RetryPolicy};
pub use codec::VectorCodec;
pub use error::NetworkError;
