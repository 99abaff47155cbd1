use std::net::SocketAddr;
use std::time::Duration;

use dvsim_core::RoutingVector;
use futures::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::codec::VectorCodec;
use crate::error::NetworkError;

/// Bounded retry for the connect race at startup: all nodes start
/// concurrently, so a dial may land before the remote listener is up.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts before reporting the link as unreachable.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(1),
        }
    }
}

/// The sending half of a link channel.
#[derive(Debug)]
pub struct ChannelSender {
    write: FramedWrite<OwnedWriteHalf, VectorCodec>,
}

impl ChannelSender {
    /// Send one routing vector, flushing the frame.
    pub async fn send(&mut self, vector: RoutingVector) -> Result<(), NetworkError> {
        self.write.send(vector).await
    }
}

/// The receiving half of a link channel.
#[derive(Debug)]
pub struct ChannelReceiver {
    read: FramedRead<OwnedReadHalf, VectorCodec>,
}

impl ChannelReceiver {
    /// Receive the next framed vector. `Ok(None)` means the peer closed the
    /// channel cleanly. A `Decode` error consumes only the bad frame; the
    /// caller may keep receiving.
    pub async fn recv(&mut self) -> Result<Option<RoutingVector>, NetworkError> {
        self.read.next().await.transpose()
    }
}

/// One duplex framed connection corresponding to exactly one undirected link.
#[derive(Debug)]
pub struct Channel {
    read: FramedRead<OwnedReadHalf, VectorCodec>,
    write: FramedWrite<OwnedWriteHalf, VectorCodec>,
    peer_addr: SocketAddr,
}

impl Channel {
    fn from_stream(stream: TcpStream) -> Result<Self, NetworkError> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr()?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            read: FramedRead::new(read_half, VectorCodec::new()),
            write: FramedWrite::new(write_half, VectorCodec::new()),
            peer_addr,
        })
    }

    /// Actively establish the channel to a neighbor's listener, retrying
    /// refused connections under the given bounded policy.
    pub async fn connect(addr: SocketAddr, retry: &RetryPolicy) -> Result<Self, NetworkError> {
        for attempt in 1..=retry.max_attempts {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    tracing::debug!(%addr, attempt, "link channel connected");
                    return Self::from_stream(stream);
                }
                Err(error) => {
                    tracing::debug!(%addr, attempt, %error, "connect failed, retrying");
                    if attempt < retry.max_attempts {
                        tokio::time::sleep(retry.delay).await;
                    }
                }
            }
        }
        Err(NetworkError::ConnectExhausted {
            addr,
            attempts: retry.max_attempts,
        })
    }

    /// Send one routing vector.
    pub async fn send(&mut self, vector: RoutingVector) -> Result<(), NetworkError> {
        self.write.send(vector).await
    }

    /// Receive the next routing vector; `Ok(None)` on clean close.
    pub async fn recv(&mut self) -> Result<Option<RoutingVector>, NetworkError> {
        self.read.next().await.transpose()
    }

    /// The remote endpoint's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Split into independently owned halves so sending and receiving can
    /// live on different tasks.
    pub fn split(self) -> (ChannelSender, ChannelReceiver) {
        (
            ChannelSender { write: self.write },
            ChannelReceiver { read: self.read },
        )
    }
}

/// Accepts inbound link connections for one node.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to an ephemeral loopback port.
    pub async fn bind_loopback() -> Result<Self, NetworkError> {
        let inner = TcpListener::bind(("127.0.0.1", 0)).await?;
        Ok(Self { inner })
    }

    /// The bound address to hand to dialing neighbors.
    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.inner.local_addr()?)
    }

    /// Accept the next inbound connection as a duplex channel.
    pub async fn accept(&self) -> Result<Channel, NetworkError> {
        let (stream, addr) = self.inner.accept().await?;
        tracing::debug!(%addr, "accepted link channel");
        Channel::from_stream(stream)
    }
}
