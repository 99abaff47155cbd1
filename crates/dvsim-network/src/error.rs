use std::net::SocketAddr;

/// Errors raised by the transport layer.
///
/// `Decode` is the only recoverable variant: the frame is dropped and the
/// channel stays usable. Everything else marks the link as down.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("failed to connect to {addr} after {attempts} attempts")]
    ConnectExhausted { addr: SocketAddr, attempts: u32 },

    #[error("channel i/o error")]
    Io(#[from] std::io::Error),

    #[error("channel closed by peer")]
    Closed,

    #[error("malformed vector frame")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode vector frame")]
    Encode(#[source] serde_json::Error),
}

impl NetworkError {
    /// True if the channel remains usable after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
